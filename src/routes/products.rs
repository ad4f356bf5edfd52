use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::products::ProductPage,
    error::AppResult,
    middleware::auth::Customer,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_products))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("first" = Option<i64>, Query, description = "Page size, default 10"),
        ("after" = Option<String>, Query, description = "Cursor to continue after"),
        ("trail" = Option<String>, Query, description = "Comma-separated cursors of earlier pages"),
    ),
    responses(
        (status = 200, description = "One page of products", body = ApiResponse<ProductPage>),
        (status = 502, description = "Gateway query failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    customer: Customer,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductPage>>> {
    let resp = product_service::list_products(&state, &customer, query).await?;
    Ok(Json(resp))
}
