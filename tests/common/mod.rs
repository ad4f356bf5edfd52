#![allow(dead_code)]

use std::sync::Arc;

use rust_decimal::Decimal;
use storefront::{
    config::AppConfig,
    dto::cart::AddToCartRequest,
    gateway::InMemoryGateway,
    middleware::auth::Customer,
    models::Product,
    payment::InMemoryPaymentProcessor,
    services::{cart_service, order_service},
    state::AppState,
};

pub const RETURN_URL: &str = "http://shop.test/api/confirm";

pub fn config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 3000,
        gateway_url: "http://gateway.test/graphql".into(),
        gateway_timeout_secs: 30,
        default_customer_token: None,
        public_url: "http://shop.test".into(),
        payment_processor_url: "http://processor.test".into(),
        payment_publishable_key: "pk_test_storefront".into(),
        products_page_size: 10,
    }
}

pub fn product(id: &str, name: &str, price: Decimal, stock: Option<i32>) -> Product {
    Product {
        id: id.into(),
        name: name.into(),
        description: Some(format!("{name} for testing")),
        price,
        stock,
        is_disabled: Some(false),
        category_id: None,
        images: Vec::new(),
    }
}

pub fn catalog() -> Vec<Product> {
    vec![
        product("p1", "Ferris Mug", Decimal::new(999, 2), Some(10)),
        product("p2", "Crab Sticker", Decimal::new(150, 2), Some(100)),
        product("p3", "Borrow Hoodie", Decimal::new(4500, 2), Some(1)),
    ]
}

pub struct Harness {
    pub state: AppState,
    pub gateway: InMemoryGateway,
    pub processor: InMemoryPaymentProcessor,
    pub customer: Customer,
}

pub fn harness_with(config: AppConfig) -> Harness {
    let gateway = InMemoryGateway::with_products(catalog());
    let processor = InMemoryPaymentProcessor::new();
    let state = AppState::new(config, Arc::new(gateway.clone()), Arc::new(processor.clone()));
    Harness {
        state,
        gateway,
        processor,
        customer: Customer::new("customer-token-123456"),
    }
}

pub fn harness() -> Harness {
    harness_with(config())
}

/// Puts two mugs in the cart and checks out; returns the new order id.
pub async fn place_order(h: &Harness) -> anyhow::Result<String> {
    cart_service::add_to_cart(
        &h.state,
        &h.customer,
        AddToCartRequest {
            product_id: "p1".into(),
            quantity: Some(2),
        },
    )
    .await?;
    let created = order_service::create_order(&h.state, &h.customer).await?;
    let order_id = created.data.map(|nav| nav.view.order_id).unwrap_or_default();
    h.gateway.clear_calls();
    Ok(order_id)
}
