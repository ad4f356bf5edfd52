use rust_decimal::Decimal;

use crate::{
    audit,
    dto::cart::{AddToCartRequest, CartView},
    error::{AppError, AppResult},
    middleware::auth::Customer,
    models::{Cart, CartItem},
    response::{ApiResponse, Meta},
    services::reconcile::mutate_then_reload,
    state::AppState,
};

/// Sum of `quantity × price` over the cart; zero for an empty or absent cart.
pub fn compute_total(items: Option<&[CartItem]>) -> Decimal {
    items
        .unwrap_or_default()
        .iter()
        .map(|item| Decimal::from(item.quantity) * item.product.price)
        .sum()
}

pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

fn cart_view(cart: Option<Cart>) -> CartView {
    let total = compute_total(cart.as_ref().map(|c| c.cart_items.as_slice()));
    let (cart_id, items) = match cart {
        Some(cart) => (Some(cart.id), cart.cart_items),
        None => (None, Vec::new()),
    };
    CartView {
        cart_id,
        items,
        total,
        total_display: format_amount(total),
    }
}

async fn load_cart_view(state: &AppState, customer: &Customer) -> AppResult<CartView> {
    let cart = state.gateway.get_cart(customer).await?;
    Ok(cart_view(cart))
}

pub async fn get_cart(state: &AppState, customer: &Customer) -> AppResult<ApiResponse<CartView>> {
    let view = load_cart_view(state, customer).await?;
    let meta = Meta::total(view.items.len());
    Ok(ApiResponse::success("OK", view, Some(meta)))
}

pub async fn add_to_cart(
    state: &AppState,
    customer: &Customer,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let quantity = payload.quantity.unwrap_or(1);
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }
    if payload.product_id.trim().is_empty() {
        return Err(AppError::BadRequest("product_id is required".to_string()));
    }

    let view = mutate_then_reload(
        state
            .gateway
            .add_item_to_cart(customer, &payload.product_id, quantity),
        || load_cart_view(state, customer),
    )
    .await?;

    audit::record(
        customer,
        "cart_update",
        Some("cart_items"),
        Some(serde_json::json!({ "product_id": payload.product_id, "quantity": quantity })),
    );

    let meta = Meta::total(view.items.len());
    Ok(ApiResponse::success("Added to cart", view, Some(meta)))
}

pub async fn remove_from_cart(
    state: &AppState,
    customer: &Customer,
    cart_item_id: &str,
) -> AppResult<ApiResponse<CartView>> {
    let view = mutate_then_reload(
        async {
            match state.gateway.remove_cart_item(customer, cart_item_id).await? {
                true => Ok::<_, AppError>(()),
                false => Err(AppError::mutation(
                    "removeCartItem",
                    format!("cart item {cart_item_id} was not removed"),
                )),
            }
        },
        || load_cart_view(state, customer),
    )
    .await?;

    audit::record(
        customer,
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "cart_item_id": cart_item_id })),
    );

    let meta = Meta::total(view.items.len());
    Ok(ApiResponse::success("Removed from cart", view, Some(meta)))
}
