use crate::{
    audit,
    dto::orders::{
        CreatedOrderView, GeneratedPayment, Navigation, OrderDetail, OrderList, OrderSummary,
        PaymentBadge, PaymentLine,
    },
    error::{AppError, AppResult},
    middleware::auth::Customer,
    models::{Order, OrderStatus, PaymentIntent, PaymentStatus},
    response::{ApiResponse, Meta},
    services::reconcile::mutate_then_reload,
    state::AppState,
    tracker::{OrderAction, is_allowed, order_actions, payment_path},
};

/// Reads one order, mapping an absent order to `NotFound`.
pub async fn load_order(state: &AppState, customer: &Customer, order_id: &str) -> AppResult<Order> {
    state
        .gateway
        .get_order_by_id(customer, order_id)
        .await?
        .ok_or(AppError::NotFound)
}

fn payment_line(payment: &PaymentIntent) -> PaymentLine {
    let badge = match payment.stripe_status {
        PaymentStatus::Succeeded => PaymentBadge::Succeeded,
        _ => PaymentBadge::Attention,
    };
    PaymentLine {
        id: payment.id.clone(),
        status: payment.stripe_status.to_string(),
        badge,
        amount: payment.stripe_amount,
        currency: payment.stripe_currency.clone(),
        created_at: payment.created_at,
    }
}

pub fn order_detail(order: &Order) -> OrderDetail {
    OrderDetail {
        id: order.id.clone(),
        status: order.order_status,
        total: order.total,
        created_at: order.created_at,
        updated_at: order.updated_at,
        items: order.order_items.clone(),
        payments: order.payments.iter().map(payment_line).collect(),
        actions: order_actions(order, None),
    }
}

async fn load_order_detail(
    state: &AppState,
    customer: &Customer,
    order_id: &str,
) -> AppResult<OrderDetail> {
    let order = load_order(state, customer, order_id).await?;
    Ok(order_detail(&order))
}

pub async fn create_order(
    state: &AppState,
    customer: &Customer,
) -> AppResult<ApiResponse<Navigation<CreatedOrderView>>> {
    let cart = state.gateway.get_cart(customer).await?;
    if cart.is_none_or(|c| c.cart_items.is_empty()) {
        return Err(AppError::mutation("createOrder", "cart is empty"));
    }

    let created = state.gateway.create_order(customer).await?;
    if created.order_id.is_empty() {
        return Err(AppError::mutation(
            "createOrder",
            "gateway returned no order id",
        ));
    }

    audit::record(
        customer,
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": created.order_id })),
    );

    let data = Navigation {
        location: payment_path(&created.order_id, None),
        view: CreatedOrderView {
            order_id: created.order_id,
        },
    };
    Ok(ApiResponse::success("Order created", data, Some(Meta::empty())))
}

pub async fn list_orders(
    state: &AppState,
    customer: &Customer,
    selected: Option<&str>,
) -> AppResult<ApiResponse<OrderList>> {
    let orders = state.gateway.get_orders(customer).await?;

    let selected = match selected {
        Some(id) => {
            let found = orders.iter().find(|o| o.id == id).map(order_detail);
            if found.is_none() {
                tracing::debug!(order_id = id, "selected order is not in the list");
            }
            found
        }
        None => None,
    };

    let meta = Meta::total(orders.len());
    let data = OrderList {
        items: orders.iter().map(OrderSummary::from).collect(),
        selected,
    };
    Ok(ApiResponse::success("Ok", data, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    customer: &Customer,
    order_id: &str,
) -> AppResult<ApiResponse<OrderDetail>> {
    let detail = load_order_detail(state, customer, order_id).await?;
    Ok(ApiResponse::success("OK", detail, Some(Meta::empty())))
}

/// Cancels an open order. Only a reported `CANCELED` status counts as success.
pub async fn cancel_order(
    state: &AppState,
    customer: &Customer,
    order_id: &str,
) -> AppResult<ApiResponse<OrderDetail>> {
    let order = load_order(state, customer, order_id).await?;
    if !is_allowed(&order, None, OrderAction::CancelOrder) {
        return Err(AppError::InvalidSelection(format!(
            "order {order_id} cannot be canceled while {}",
            order.order_status
        )));
    }

    let detail = mutate_then_reload(
        async {
            let status = state.gateway.cancel_order(customer, order_id).await?;
            if status != OrderStatus::Canceled {
                tracing::warn!(order_id, %status, "cancelOrder did not cancel the order");
                return Err(AppError::CancellationRejected {
                    order_id: order_id.to_string(),
                    status,
                });
            }
            Ok::<_, AppError>(())
        },
        || load_order_detail(state, customer, order_id),
    )
    .await?;

    audit::record(
        customer,
        "order_cancel",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order_id })),
    );

    Ok(ApiResponse::success(
        "Order canceled",
        detail,
        Some(Meta::empty()),
    ))
}

/// Requests a fresh payment attempt and points the customer at it.
///
/// Only offered when the action table lists `GeneratePaymentIntent` for the
/// order's active attempt.
pub async fn generate_new_payment_intent(
    state: &AppState,
    customer: &Customer,
    order_id: &str,
) -> AppResult<ApiResponse<Navigation<GeneratedPayment>>> {
    const OP: &str = "generateNewPaymentIntent";

    let order = load_order(state, customer, order_id).await?;
    if !is_allowed(&order, None, OrderAction::GeneratePaymentIntent) {
        return Err(AppError::InvalidSelection(format!(
            "order {order_id} does not accept a new payment attempt while {}",
            order.order_status
        )));
    }

    let payment = state
        .gateway
        .generate_new_payment_intent(customer, order_id)
        .await?;
    if payment.id.is_empty() {
        return Err(AppError::mutation(OP, "gateway returned no payment id"));
    }
    if order
        .payment(&payment.id)
        .is_some_and(|existing| existing.stripe_status.is_terminal())
    {
        tracing::warn!(order_id, payment_id = %payment.id, "gateway returned a consumed attempt");
        return Err(AppError::mutation(
            OP,
            format!("payment {} was already used", payment.id),
        ));
    }

    audit::record(
        customer,
        "payment_generate",
        Some("payments"),
        Some(serde_json::json!({ "order_id": order_id, "payment_id": payment.id })),
    );

    let data = Navigation {
        location: payment_path(order_id, Some(payment.id.as_str())),
        view: GeneratedPayment {
            order_id: order_id.to_string(),
            payment_id: payment.id,
        },
    };
    Ok(ApiResponse::success(
        "Payment attempt created",
        data,
        Some(Meta::empty()),
    ))
}
