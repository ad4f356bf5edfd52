use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::{Order, OrderItem, OrderStatus},
    tracker::OrderAction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentBadge {
    Succeeded,
    Attention,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentLine {
    pub id: String,
    pub status: String,
    pub badge: PaymentBadge,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummary {
    pub id: String,
    pub status: OrderStatus,
    pub total: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            status: order.order_status,
            total: order.total,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetail {
    pub id: String,
    pub status: OrderStatus,
    pub total: Decimal,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItem>,
    pub payments: Vec<PaymentLine>,
    /// Actions that may be offered for the order in its current state.
    pub actions: Vec<OrderAction>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderSummary>,
    /// Detail of the order picked with `?selected=`.
    pub selected: Option<OrderDetail>,
}

/// Outcome of an action that moves the customer to another page.
#[derive(Debug, Serialize, ToSchema)]
pub struct Navigation<T> {
    pub location: String,
    pub view: T,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedOrderView {
    pub order_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GeneratedPayment {
    pub order_id: String,
    pub payment_id: String,
}
