//! The remote data gateway.
//!
//! The gateway owns every aggregate the storefront shows. The storefront only
//! talks to it through [`StoreGateway`], constructed once at startup and shared
//! through [`crate::state::AppState`].

use async_trait::async_trait;

use crate::{
    error::AppResult,
    middleware::auth::Customer,
    models::{Cart, CreatedOrder, Order, OrderStatus, PaymentIntent, ProductConnection},
};

pub mod graphql;
pub mod memory;
pub mod queries;

pub use graphql::GraphqlGateway;
pub use memory::InMemoryGateway;

/// Named operations consumed from the gateway.
///
/// Reads fail with [`crate::error::AppError::RemoteQuery`], writes with
/// [`crate::error::AppError::RemoteMutation`].
#[async_trait]
pub trait StoreGateway: Send + Sync {
    async fn get_products(
        &self,
        customer: &Customer,
        first: i64,
        after: Option<&str>,
    ) -> AppResult<ProductConnection>;

    /// `None` when the customer has no cart yet.
    async fn get_cart(&self, customer: &Customer) -> AppResult<Option<Cart>>;

    async fn add_item_to_cart(
        &self,
        customer: &Customer,
        product_id: &str,
        quantity: i32,
    ) -> AppResult<Cart>;

    async fn remove_cart_item(&self, customer: &Customer, cart_item_id: &str) -> AppResult<bool>;

    async fn create_order(&self, customer: &Customer) -> AppResult<CreatedOrder>;

    async fn get_orders(&self, customer: &Customer) -> AppResult<Vec<Order>>;

    /// `None` when the order does not exist for this customer.
    async fn get_order_by_id(&self, customer: &Customer, order_id: &str)
    -> AppResult<Option<Order>>;

    /// Returns the order status the gateway reports after the call.
    async fn cancel_order(&self, customer: &Customer, order_id: &str) -> AppResult<OrderStatus>;

    async fn generate_new_payment_intent(
        &self,
        customer: &Customer,
        order_id: &str,
    ) -> AppResult<PaymentIntent>;

    async fn cancel_payment(&self, customer: &Customer, payment_id: &str) -> AppResult<bool>;
}
