use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::CartItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: String,
    /// Defaults to 1.
    pub quantity: Option<i32>,
}

/// The cart as last read from the gateway, with its derived total.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub cart_id: Option<String>,
    pub items: Vec<CartItem>,
    pub total: Decimal,
    /// `total` formatted with two decimals.
    pub total_display: String,
}
