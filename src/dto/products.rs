use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{PageInfo, Product};

/// Query values that load one page of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageCursor {
    pub first: i64,
    pub after: Option<String>,
    /// `after` cursors of the pages visited before this one, oldest first.
    pub trail: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProductPageLinks {
    pub next: Option<PageCursor>,
    pub previous: Option<PageCursor>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub page_info: PageInfo,
    pub links: ProductPageLinks,
}
