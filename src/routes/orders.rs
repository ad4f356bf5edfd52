use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};

use crate::{
    dto::orders::{CreatedOrderView, GeneratedPayment, Navigation, OrderDetail, OrderList},
    error::AppResult,
    middleware::auth::Customer,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/{id}", get(get_order))
        .route("/{id}/cancel", post(cancel_order))
        .route("/{id}/payments", post(generate_payment))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("selected" = Option<String>, Query, description = "Order to show in detail")
    ),
    responses(
        (status = 200, description = "Orders of the customer", body = ApiResponse<OrderList>),
        (status = 502, description = "Gateway query failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    customer: Customer,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &customer, query.selected.as_deref()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    responses(
        (status = 200, description = "Order created from the cart", body = ApiResponse<Navigation<CreatedOrderView>>),
        (status = 422, description = "Cart empty or order rejected"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    customer: Customer,
) -> AppResult<Json<ApiResponse<Navigation<CreatedOrderView>>>> {
    let resp = order_service::create_order(&state, &customer).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with its allowed actions", body = ApiResponse<OrderDetail>),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    customer: Customer,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let resp = order_service::get_order(&state, &customer, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    params(
        ("id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order canceled", body = ApiResponse<OrderDetail>),
        (status = 409, description = "Order not cancelable or cancellation rejected"),
        (status = 422, description = "Gateway rejected the change"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    customer: Customer,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let resp = order_service::cancel_order(&state, &customer, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/payments",
    params(
        ("id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "New payment attempt", body = ApiResponse<Navigation<GeneratedPayment>>),
        (status = 409, description = "Order is closed"),
        (status = 422, description = "Gateway rejected the change"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn generate_payment(
    State(state): State<AppState>,
    customer: Customer,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Navigation<GeneratedPayment>>>> {
    let resp = order_service::generate_new_payment_intent(&state, &customer, &id).await?;
    Ok(Json(resp))
}
