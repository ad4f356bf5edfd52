use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::{
    error::{AppError, AppResult},
    gateway::{StoreGateway, queries},
    middleware::auth::Customer,
    models::{Cart, CreatedOrder, Order, OrderStatus, PaymentIntent, ProductConnection},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Query,
    Mutation,
}

#[derive(Debug, Clone, Copy)]
struct Operation {
    name: &'static str,
    kind: Kind,
}

impl Operation {
    const fn query(name: &'static str) -> Self {
        Self {
            name,
            kind: Kind::Query,
        }
    }

    const fn mutation(name: &'static str) -> Self {
        Self {
            name,
            kind: Kind::Mutation,
        }
    }

    fn error(&self, message: impl Into<String>) -> AppError {
        match self.kind {
            Kind::Query => AppError::query(self.name, message),
            Kind::Mutation => AppError::mutation(self.name, message),
        }
    }
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// HTTP client for the GraphQL gateway.
#[derive(Clone)]
pub struct GraphqlGateway {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphqlGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        customer: &Customer,
        op: Operation,
        document: &str,
        variables: Value,
    ) -> AppResult<T> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(customer.token())
            .json(&GraphqlRequest {
                query: document,
                variables,
            })
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(operation = op.name, error = %err, "gateway request failed");
                op.error(err.to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|err| {
            tracing::warn!(operation = op.name, error = %err, "gateway response unreadable");
            op.error(err.to_string())
        })?;

        decode(op, status, &body).inspect_err(|err| {
            tracing::warn!(operation = op.name, status = %status, error = %err, "gateway call failed");
        })
    }
}

fn decode<T: DeserializeOwned>(
    op: Operation,
    status: reqwest::StatusCode,
    body: &[u8],
) -> AppResult<T> {
    let envelope: GraphqlResponse<T> = serde_json::from_slice(body).map_err(|err| {
        if status.is_success() {
            op.error(format!("malformed response: {err}"))
        } else {
            op.error(format!("gateway responded {status}"))
        }
    })?;

    if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
        let message = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(op.error(message));
    }

    envelope
        .data
        .ok_or_else(|| op.error(format!("empty response (status {status})")))
}

fn id_dto(id: &str) -> Value {
    json!({ "id": id })
}

#[derive(Deserialize)]
struct GetProductsData {
    #[serde(rename = "getProducts")]
    get_products: ProductConnection,
}

#[derive(Deserialize)]
struct GetCartData {
    #[serde(rename = "getCart")]
    get_cart: Option<Cart>,
}

#[derive(Deserialize)]
struct AddItemToCartData {
    #[serde(rename = "addItemToCart")]
    add_item_to_cart: Cart,
}

#[derive(Deserialize)]
struct RemoveCartItemData {
    #[serde(rename = "removeCartItem")]
    remove_cart_item: Option<bool>,
}

#[derive(Deserialize)]
struct CreateOrderData {
    #[serde(rename = "createOrder")]
    create_order: CreateOrderPayload,
}

#[derive(Deserialize)]
struct CreateOrderPayload {
    client_secret: String,
    order: OrderRef,
}

#[derive(Deserialize)]
struct OrderRef {
    id: String,
}

#[derive(Deserialize)]
struct GetOrdersData {
    #[serde(rename = "getOrders")]
    get_orders: Option<Vec<Order>>,
}

#[derive(Deserialize)]
struct GetOrderByIdData {
    #[serde(rename = "getOrderById")]
    get_order_by_id: Option<Order>,
}

#[derive(Deserialize)]
struct CancelOrderData {
    #[serde(rename = "cancelOrder")]
    cancel_order: CanceledOrder,
}

#[derive(Deserialize)]
struct CanceledOrder {
    #[serde(rename = "orderStatus")]
    order_status: OrderStatus,
}

#[derive(Deserialize)]
struct GeneratePaymentIntentData {
    #[serde(rename = "generateNewPaymentIntent")]
    generate_new_payment_intent: PaymentIntent,
}

#[derive(Deserialize)]
struct CancelPaymentData {
    #[serde(rename = "cancelPayment")]
    cancel_payment: Option<bool>,
}

#[async_trait]
impl StoreGateway for GraphqlGateway {
    async fn get_products(
        &self,
        customer: &Customer,
        first: i64,
        after: Option<&str>,
    ) -> AppResult<ProductConnection> {
        let data: GetProductsData = self
            .execute(
                customer,
                Operation::query("getProducts"),
                queries::GET_PRODUCTS,
                json!({ "first": first, "after": after }),
            )
            .await?;
        Ok(data.get_products)
    }

    async fn get_cart(&self, customer: &Customer) -> AppResult<Option<Cart>> {
        let data: GetCartData = self
            .execute(
                customer,
                Operation::query("getCart"),
                queries::GET_CART,
                json!({}),
            )
            .await?;
        Ok(data.get_cart)
    }

    async fn add_item_to_cart(
        &self,
        customer: &Customer,
        product_id: &str,
        quantity: i32,
    ) -> AppResult<Cart> {
        let data: AddItemToCartData = self
            .execute(
                customer,
                Operation::mutation("addItemToCart"),
                queries::ADD_ITEM_TO_CART,
                json!({ "input": { "productId": product_id, "quantity": quantity } }),
            )
            .await?;
        Ok(data.add_item_to_cart)
    }

    async fn remove_cart_item(&self, customer: &Customer, cart_item_id: &str) -> AppResult<bool> {
        let data: RemoveCartItemData = self
            .execute(
                customer,
                Operation::mutation("removeCartItem"),
                queries::REMOVE_CART_ITEM,
                json!({ "cartItemIdDto": id_dto(cart_item_id) }),
            )
            .await?;
        Ok(data.remove_cart_item.unwrap_or(false))
    }

    async fn create_order(&self, customer: &Customer) -> AppResult<CreatedOrder> {
        let data: CreateOrderData = self
            .execute(
                customer,
                Operation::mutation("createOrder"),
                queries::CREATE_ORDER,
                json!({}),
            )
            .await?;
        Ok(CreatedOrder {
            order_id: data.create_order.order.id,
            client_secret: data.create_order.client_secret,
        })
    }

    async fn get_orders(&self, customer: &Customer) -> AppResult<Vec<Order>> {
        let data: GetOrdersData = self
            .execute(
                customer,
                Operation::query("getOrders"),
                queries::GET_ORDERS,
                json!({}),
            )
            .await?;
        Ok(data.get_orders.unwrap_or_default())
    }

    async fn get_order_by_id(
        &self,
        customer: &Customer,
        order_id: &str,
    ) -> AppResult<Option<Order>> {
        let data: GetOrderByIdData = self
            .execute(
                customer,
                Operation::query("getOrderById"),
                queries::GET_ORDER_BY_ID,
                json!({ "orderIdDto": id_dto(order_id) }),
            )
            .await?;
        Ok(data.get_order_by_id)
    }

    async fn cancel_order(&self, customer: &Customer, order_id: &str) -> AppResult<OrderStatus> {
        let data: CancelOrderData = self
            .execute(
                customer,
                Operation::mutation("cancelOrder"),
                queries::CANCEL_ORDER,
                json!({ "orderIdDto": id_dto(order_id) }),
            )
            .await?;
        Ok(data.cancel_order.order_status)
    }

    async fn generate_new_payment_intent(
        &self,
        customer: &Customer,
        order_id: &str,
    ) -> AppResult<PaymentIntent> {
        let data: GeneratePaymentIntentData = self
            .execute(
                customer,
                Operation::mutation("generateNewPaymentIntent"),
                queries::GENERATE_NEW_PAYMENT_INTENT,
                json!({ "orderIdDto": id_dto(order_id) }),
            )
            .await?;
        Ok(data.generate_new_payment_intent)
    }

    async fn cancel_payment(&self, customer: &Customer, payment_id: &str) -> AppResult<bool> {
        let data: CancelPaymentData = self
            .execute(
                customer,
                Operation::mutation("cancelPayment"),
                queries::CANCEL_PAYMENT,
                json!({ "paymentIdDto": id_dto(payment_id) }),
            )
            .await?;
        Ok(data.cancel_payment.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use rust_decimal::Decimal;

    use crate::models::PaymentStatus;

    #[test]
    fn decodes_order_payload() {
        let body = br#"{
            "data": {
                "getOrderById": {
                    "id": "o1",
                    "total": 19.98,
                    "orderStatus": "PENDING",
                    "createdAt": "2024-05-01T10:00:00.000Z",
                    "orderItems": [
                        { "id": "i1", "quantity": 2, "product": { "name": "Mug", "price": 9.99, "images": null } }
                    ],
                    "payments": [
                        { "id": "pi_1", "stripeClientSecret": "pi_1_secret_x", "stripeStatus": "payment_intent.payment_failed", "stripeAmount": 19.98, "stripeCurrency": "usd" }
                    ]
                }
            }
        }"#;
        let data: GetOrderByIdData =
            decode(Operation::query("getOrderById"), StatusCode::OK, body).unwrap();
        let order = data.get_order_by_id.unwrap();
        assert_eq!(order.total, Decimal::new(1998, 2));
        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.order_items[0].product.price, Decimal::new(999, 2));
        assert!(order.order_items[0].product.images.is_empty());
        assert_eq!(order.payments[0].stripe_status, PaymentStatus::PaymentFailed);
        assert_eq!(
            order.payments[0].stripe_client_secret.as_deref(),
            Some("pi_1_secret_x")
        );
    }

    #[test]
    fn graphql_errors_on_mutation_become_mutation_errors() {
        let body = br#"{ "data": null, "errors": [ { "message": "Out of stock" }, { "message": "try later" } ] }"#;
        let err = decode::<AddItemToCartData>(
            Operation::mutation("addItemToCart"),
            StatusCode::OK,
            body,
        )
        .err()
        .unwrap();
        match err {
            AppError::RemoteMutation { operation, message } => {
                assert_eq!(operation, "addItemToCart");
                assert_eq!(message, "Out of stock; try later");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_json_failure_on_query_becomes_query_error() {
        let err = decode::<GetCartData>(
            Operation::query("getCart"),
            StatusCode::SERVICE_UNAVAILABLE,
            b"<html>upstream down</html>",
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            AppError::RemoteQuery {
                operation: "getCart",
                ..
            }
        ));
    }

    #[test]
    fn missing_data_is_an_error() {
        let err = decode::<GetCartData>(Operation::query("getCart"), StatusCode::OK, br#"{}"#)
            .err()
            .unwrap();
        assert!(matches!(err, AppError::RemoteQuery { .. }));
    }

    #[test]
    fn null_cart_is_absent() {
        let data: GetCartData = decode(
            Operation::query("getCart"),
            StatusCode::OK,
            br#"{ "data": { "getCart": null } }"#,
        )
        .unwrap();
        assert!(data.get_cart.is_none());
    }

    #[test]
    fn create_order_payload_uses_snake_case_secret() {
        let data: CreateOrderData = decode(
            Operation::mutation("createOrder"),
            StatusCode::OK,
            br#"{ "data": { "createOrder": { "client_secret": "pi_9_secret_z", "order": { "id": "o9" } } } }"#,
        )
        .unwrap();
        assert_eq!(data.create_order.order.id, "o9");
        assert_eq!(data.create_order.client_secret, "pi_9_secret_z");
    }
}
