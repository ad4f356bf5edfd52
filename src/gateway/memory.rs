//! In-memory gateway for tests and local runs without a backend.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    gateway::StoreGateway,
    middleware::auth::Customer,
    models::{
        Cart, CartItem, CreatedOrder, Order, OrderItem, OrderStatus, PageInfo, PaymentIntent,
        PaymentStatus, Product, ProductConnection, ProductEdge, ProductSnapshot,
    },
    services::cart_service::compute_total,
};

#[derive(Debug, Default)]
struct InMemoryState {
    products: Vec<Product>,
    cart: Option<Cart>,
    orders: Vec<Order>,
    calls: Vec<String>,
    fail_next_mutation: Option<String>,
    cancel_status_override: Option<OrderStatus>,
    cancel_payment_override: Option<bool>,
    remove_item_override: Option<bool>,
    reuse_last_payment: bool,
}

/// Gateway that keeps every aggregate in process.
///
/// Behaves like the remote backend for the operations the storefront uses,
/// plus knobs for forcing the failure modes the storefront must handle.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let gateway = Self::new();
        gateway.state().products = products;
        gateway
    }

    fn state(&self) -> MutexGuard<'_, InMemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Operation names in the order they reached the gateway.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// The next mutation is rejected with `message`.
    pub fn fail_next_mutation(&self, message: impl Into<String>) {
        self.state().fail_next_mutation = Some(message.into());
    }

    /// `cancelOrder` reports `status` without touching the order.
    pub fn force_cancel_status(&self, status: OrderStatus) {
        self.state().cancel_status_override = Some(status);
    }

    /// `cancelPayment` answers `result` without touching the attempt.
    pub fn force_cancel_payment_result(&self, result: bool) {
        self.state().cancel_payment_override = Some(result);
    }

    /// `removeCartItem` answers `result` without touching the cart.
    pub fn force_remove_item_result(&self, result: bool) {
        self.state().remove_item_override = Some(result);
    }

    /// `generateNewPaymentIntent` hands back the order's latest attempt
    /// instead of creating one.
    pub fn reuse_last_payment_id(&self) {
        self.state().reuse_last_payment = true;
    }

    pub fn set_order_status(&self, order_id: &str, status: OrderStatus) {
        if let Some(order) = self.state().orders.iter_mut().find(|o| o.id == order_id) {
            order.order_status = status;
        }
    }

    pub fn set_payment_status(&self, payment_id: &str, status: PaymentStatus) {
        let mut state = self.state();
        if let Some(payment) = state
            .orders
            .iter_mut()
            .flat_map(|o| o.payments.iter_mut())
            .find(|p| p.id == payment_id)
        {
            payment.stripe_status = status;
            payment.updated_at = Some(Utc::now());
        }
    }

    pub fn order(&self, order_id: &str) -> Option<Order> {
        self.state().orders.iter().find(|o| o.id == order_id).cloned()
    }
}

impl InMemoryState {
    fn record(&mut self, operation: &str) {
        self.calls.push(operation.to_string());
    }

    fn begin_mutation(&mut self, operation: &'static str) -> AppResult<()> {
        self.record(operation);
        match self.fail_next_mutation.take() {
            Some(message) => Err(AppError::mutation(operation, message)),
            None => Ok(()),
        }
    }

    fn order_mut(&mut self, operation: &'static str, order_id: &str) -> AppResult<&mut Order> {
        self.orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| AppError::mutation(operation, format!("order {order_id} not found")))
    }
}

fn new_payment_intent(order: &Order) -> PaymentIntent {
    let now = Utc::now();
    let id = format!("pi_{}", Uuid::new_v4().simple());
    PaymentIntent {
        stripe_client_secret: Some(format!("{id}_secret_{}", Uuid::new_v4().simple())),
        id,
        order_id: Some(order.id.clone()),
        stripe_payment_id: None,
        stripe_status: PaymentStatus::RequiresPaymentMethod,
        stripe_amount: Some(order.total),
        stripe_currency: Some("usd".to_string()),
        stripe_payment_method: None,
        created_at: Some(now),
        updated_at: Some(now),
    }
}

#[async_trait]
impl StoreGateway for InMemoryGateway {
    async fn get_products(
        &self,
        _customer: &Customer,
        first: i64,
        after: Option<&str>,
    ) -> AppResult<ProductConnection> {
        let mut state = self.state();
        state.record("getProducts");

        let start = match after {
            Some(cursor) => state
                .products
                .iter()
                .position(|p| p.id == cursor)
                .map(|idx| idx + 1)
                .ok_or_else(|| AppError::query("getProducts", format!("unknown cursor {cursor}")))?,
            None => 0,
        };
        let first = first.max(0) as usize;
        let edges: Vec<ProductEdge> = state
            .products
            .iter()
            .skip(start)
            .take(first)
            .map(|p| ProductEdge {
                node: p.clone(),
                cursor: Some(p.id.clone()),
            })
            .collect();

        let page_info = PageInfo {
            has_next_page: start + edges.len() < state.products.len(),
            has_previous_page: start > 0,
            start_cursor: edges.first().and_then(|e| e.cursor.clone()),
            end_cursor: edges.last().and_then(|e| e.cursor.clone()),
        };
        Ok(ProductConnection { edges, page_info })
    }

    async fn get_cart(&self, _customer: &Customer) -> AppResult<Option<Cart>> {
        let mut state = self.state();
        state.record("getCart");
        Ok(state.cart.clone())
    }

    async fn add_item_to_cart(
        &self,
        customer: &Customer,
        product_id: &str,
        quantity: i32,
    ) -> AppResult<Cart> {
        const OP: &str = "addItemToCart";
        let mut state = self.state();
        state.begin_mutation(OP)?;

        let product = state
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or_else(|| AppError::mutation(OP, "product not found"))?;
        if product.is_disabled == Some(true) {
            return Err(AppError::mutation(OP, "product is not available"));
        }

        let cart = state.cart.get_or_insert_with(|| Cart {
            id: format!("cart_{}", Uuid::new_v4().simple()),
            user_id: Some(customer.token().to_string()),
            cart_items: Vec::new(),
        });
        let in_cart = cart
            .cart_items
            .iter()
            .find(|i| i.product.id == product_id)
            .map(|i| i.quantity)
            .unwrap_or(0);
        if let Some(stock) = product.stock {
            if in_cart + quantity > stock {
                return Err(AppError::mutation(OP, "out of stock"));
            }
        }

        match cart
            .cart_items
            .iter_mut()
            .find(|i| i.product.id == product_id)
        {
            Some(item) => item.quantity += quantity,
            None => cart.cart_items.push(CartItem {
                id: format!("ci_{}", Uuid::new_v4().simple()),
                quantity,
                product,
            }),
        }
        Ok(cart.clone())
    }

    async fn remove_cart_item(&self, _customer: &Customer, cart_item_id: &str) -> AppResult<bool> {
        const OP: &str = "removeCartItem";
        let mut state = self.state();
        state.begin_mutation(OP)?;
        if let Some(result) = state.remove_item_override {
            return Ok(result);
        }

        let cart = state
            .cart
            .as_mut()
            .ok_or_else(|| AppError::mutation(OP, "cart not found"))?;
        let before = cart.cart_items.len();
        cart.cart_items.retain(|i| i.id != cart_item_id);
        if cart.cart_items.len() == before {
            return Err(AppError::mutation(OP, "cart item not found"));
        }
        Ok(true)
    }

    async fn create_order(&self, customer: &Customer) -> AppResult<CreatedOrder> {
        const OP: &str = "createOrder";
        let mut state = self.state();
        state.begin_mutation(OP)?;

        let items = state
            .cart
            .as_ref()
            .map(|c| c.cart_items.clone())
            .unwrap_or_default();
        if items.is_empty() {
            return Err(AppError::mutation(OP, "cart is empty"));
        }

        let now = Utc::now();
        let order_id = format!("ord_{}", Uuid::new_v4().simple());
        let mut order = Order {
            id: order_id.clone(),
            total: compute_total(Some(&items[..])),
            order_status: OrderStatus::Pending,
            created_at: Some(now),
            updated_at: Some(now),
            user_id: Some(customer.token().to_string()),
            order_items: items
                .iter()
                .map(|item| OrderItem {
                    id: format!("oi_{}", Uuid::new_v4().simple()),
                    product: ProductSnapshot {
                        name: item.product.name.clone(),
                        price: item.product.price,
                        images: item.product.images.clone(),
                    },
                    quantity: item.quantity,
                    order_id: Some(order_id.clone()),
                })
                .collect(),
            payments: Vec::new(),
        };
        let payment = new_payment_intent(&order);
        let client_secret = payment.stripe_client_secret.clone().unwrap_or_default();
        order.payments.push(payment);

        for item in &items {
            if let Some(product) = state.products.iter_mut().find(|p| p.id == item.product.id) {
                if let Some(stock) = product.stock.as_mut() {
                    *stock -= item.quantity;
                }
            }
        }
        if let Some(cart) = state.cart.as_mut() {
            cart.cart_items.clear();
        }
        state.orders.push(order);

        Ok(CreatedOrder {
            order_id,
            client_secret,
        })
    }

    async fn get_orders(&self, _customer: &Customer) -> AppResult<Vec<Order>> {
        let mut state = self.state();
        state.record("getOrders");
        Ok(state.orders.clone())
    }

    async fn get_order_by_id(
        &self,
        _customer: &Customer,
        order_id: &str,
    ) -> AppResult<Option<Order>> {
        let mut state = self.state();
        state.record("getOrderById");
        Ok(state.orders.iter().find(|o| o.id == order_id).cloned())
    }

    async fn cancel_order(&self, _customer: &Customer, order_id: &str) -> AppResult<OrderStatus> {
        const OP: &str = "cancelOrder";
        let mut state = self.state();
        state.begin_mutation(OP)?;

        let forced = state.cancel_status_override;
        let order = state.order_mut(OP, order_id)?;
        if let Some(status) = forced {
            return Ok(status);
        }
        if matches!(order.order_status, OrderStatus::Pending | OrderStatus::Failed) {
            order.order_status = OrderStatus::Canceled;
            order.updated_at = Some(Utc::now());
        }
        Ok(order.order_status)
    }

    async fn generate_new_payment_intent(
        &self,
        _customer: &Customer,
        order_id: &str,
    ) -> AppResult<PaymentIntent> {
        const OP: &str = "generateNewPaymentIntent";
        let mut state = self.state();
        state.begin_mutation(OP)?;

        let reuse = state.reuse_last_payment;
        let order = state.order_mut(OP, order_id)?;
        if order.order_status.is_terminal() {
            return Err(AppError::mutation(
                OP,
                format!("order is {}", order.order_status),
            ));
        }
        if reuse {
            if let Some(last) = order.payments.last() {
                return Ok(last.clone());
            }
        }
        let payment = new_payment_intent(order);
        order.order_status = OrderStatus::Pending;
        order.updated_at = payment.created_at;
        order.payments.push(payment.clone());
        Ok(payment)
    }

    async fn cancel_payment(&self, _customer: &Customer, payment_id: &str) -> AppResult<bool> {
        const OP: &str = "cancelPayment";
        let mut state = self.state();
        state.begin_mutation(OP)?;
        if let Some(result) = state.cancel_payment_override {
            return Ok(result);
        }

        let payment = state
            .orders
            .iter_mut()
            .flat_map(|o| o.payments.iter_mut())
            .find(|p| p.id == payment_id);
        match payment {
            Some(payment) if payment.stripe_status.is_retryable() => {
                payment.stripe_status = PaymentStatus::Other("canceled".to_string());
                payment.updated_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
