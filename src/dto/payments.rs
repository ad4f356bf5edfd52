use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{OrderStatus, PaymentIntent},
    tracker::{AttemptSource, InvalidPayment, OrderAction},
};

/// Everything the hosted payment element needs to confirm one attempt.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentForm {
    pub payment_id: String,
    pub client_secret: String,
    pub publishable_key: String,
    pub confirm_path: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentPage {
    pub order_id: String,
    pub order_status: OrderStatus,
    pub total: Decimal,
    pub payment: Option<PaymentIntent>,
    pub source: Option<AttemptSource>,
    /// Present only when the active attempt can be confirmed.
    pub form: Option<PaymentForm>,
    /// Set instead of `form` when confirmation is not possible.
    pub invalid_payment: Option<InvalidPayment>,
    pub actions: Vec<OrderAction>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ConfirmPaymentRequest {
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessorRedirect {
    pub payment_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmationQuery {
    pub redirect_status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmationView {
    pub title: String,
    pub message: String,
    /// Status the processor appended to the return URL, shown as-is.
    pub redirect_status: Option<String>,
}
