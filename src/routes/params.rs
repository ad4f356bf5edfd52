use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductQuery {
    /// Page size, defaults to `PRODUCTS_PAGE_SIZE`.
    pub first: Option<i64>,
    /// Cursor of the last product on the previous page.
    pub after: Option<String>,
    /// Comma-separated `after` cursors of the pages visited before this one.
    pub trail: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub selected: Option<String>,
}
