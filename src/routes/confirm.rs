use axum::{Json, extract::Query};

use crate::{
    dto::payments::{ConfirmationQuery, ConfirmationView},
    response::ApiResponse,
    services::payment_service,
};

#[utoipa::path(
    get,
    path = "/api/confirm",
    params(
        ("redirect_status" = Option<String>, Query, description = "Status appended by the processor")
    ),
    responses(
        (status = 200, description = "Confirmation message", body = ApiResponse<ConfirmationView>),
    ),
    tag = "Payments"
)]
pub async fn confirmation(Query(query): Query<ConfirmationQuery>) -> Json<ApiResponse<ConfirmationView>> {
    Json(payment_service::confirmation_view(query))
}
