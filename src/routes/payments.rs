use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::{
        orders::Navigation,
        payments::{ConfirmPaymentRequest, PaymentPage, ProcessorRedirect},
    },
    error::AppResult,
    middleware::auth::Customer,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{order_id}", get(payment_page))
        .route(
            "/{order_id}/confirm",
            get(payment_page_for_confirm_id).post(confirm_payment),
        )
        .route("/{order_id}/{payment_id}", get(payment_page_for_attempt))
        .route(
            "/{order_id}/{payment_id}/confirm",
            post(confirm_payment_for_attempt),
        )
        .route("/{order_id}/{payment_id}/cancel", post(cancel_payment))
}

#[utoipa::path(
    get,
    path = "/api/payments/{order_id}",
    params(
        ("order_id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Payment page for the order's first attempt", body = ApiResponse<PaymentPage>),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn payment_page(
    State(state): State<AppState>,
    customer: Customer,
    Path(order_id): Path<String>,
) -> AppResult<Json<ApiResponse<PaymentPage>>> {
    let resp = payment_service::get_payment_page(&state, &customer, &order_id, None).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/{order_id}/{payment_id}",
    params(
        ("order_id" = String, Path, description = "Order ID"),
        ("payment_id" = String, Path, description = "Payment attempt ID; unknown ids fall back to the first attempt")
    ),
    responses(
        (status = 200, description = "Payment page for the requested attempt", body = ApiResponse<PaymentPage>),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn payment_page_for_attempt(
    State(state): State<AppState>,
    customer: Customer,
    Path((order_id, payment_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<PaymentPage>>> {
    let resp =
        payment_service::get_payment_page(&state, &customer, &order_id, Some(payment_id.as_str())).await?;
    Ok(Json(resp))
}

/// The static confirm route owns `/{order_id}/confirm`, so a `GET` for an
/// attempt whose id is literally `confirm` lands here.
pub async fn payment_page_for_confirm_id(
    State(state): State<AppState>,
    customer: Customer,
    Path(order_id): Path<String>,
) -> AppResult<Json<ApiResponse<PaymentPage>>> {
    let resp = payment_service::get_payment_page(&state, &customer, &order_id, Some("confirm")).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/{order_id}/confirm",
    params(
        ("order_id" = String, Path, description = "Order ID")
    ),
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Processor accepted; follow `location`", body = ApiResponse<Navigation<ProcessorRedirect>>),
        (status = 402, description = "Processor declined"),
        (status = 409, description = "No confirmable attempt"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    customer: Customer,
    Path(order_id): Path<String>,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> AppResult<Json<ApiResponse<Navigation<ProcessorRedirect>>>> {
    let resp =
        payment_service::confirm_payment(&state, &customer, &order_id, None, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/{order_id}/{payment_id}/confirm",
    params(
        ("order_id" = String, Path, description = "Order ID"),
        ("payment_id" = String, Path, description = "Payment attempt ID")
    ),
    request_body = ConfirmPaymentRequest,
    responses(
        (status = 200, description = "Processor accepted; follow `location`", body = ApiResponse<Navigation<ProcessorRedirect>>),
        (status = 402, description = "Processor declined"),
        (status = 409, description = "No confirmable attempt"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn confirm_payment_for_attempt(
    State(state): State<AppState>,
    customer: Customer,
    Path((order_id, payment_id)): Path<(String, String)>,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> AppResult<Json<ApiResponse<Navigation<ProcessorRedirect>>>> {
    let resp = payment_service::confirm_payment(
        &state,
        &customer,
        &order_id,
        Some(payment_id.as_str()),
        payload,
    )
    .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/{order_id}/{payment_id}/cancel",
    params(
        ("order_id" = String, Path, description = "Order ID"),
        ("payment_id" = String, Path, description = "Payment attempt ID")
    ),
    responses(
        (status = 200, description = "Attempt canceled; the reloaded payment page", body = ApiResponse<PaymentPage>),
        (status = 409, description = "Attempt not cancelable"),
        (status = 422, description = "Gateway rejected the change"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn cancel_payment(
    State(state): State<AppState>,
    customer: Customer,
    Path((order_id, payment_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<PaymentPage>>> {
    let resp = payment_service::cancel_payment(&state, &customer, &order_id, &payment_id).await?;
    Ok(Json(resp))
}
