//! Order/payment state tracking.
//!
//! Everything here is pure: the functions take an order snapshot freshly
//! loaded from the gateway and decide which payment attempt is active and
//! which actions may be presented for it. Status transitions themselves are
//! owned by the gateway and the processor webhook.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Order, OrderStatus, PaymentIntent, PaymentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    /// Confirm the active attempt again with its current client secret.
    RetryPayment,
    /// Cancel the active attempt.
    CancelPayment,
    /// Ask the gateway for a fresh attempt with a new client secret.
    GeneratePaymentIntent,
    CancelOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttemptSource {
    /// The deep-linked attempt id matched an attempt on the order.
    Requested,
    /// No id was supplied, or it did not match; the first attempt was used.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveAttempt<'a> {
    pub payment: &'a PaymentIntent,
    pub source: AttemptSource,
}

/// Why the confirmation form is withheld for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InvalidPayment {
    NoAttempts,
    OrderClosed {
        status: OrderStatus,
    },
    NotRetryable {
        payment_id: String,
        #[schema(value_type = String)]
        status: PaymentStatus,
    },
    MissingClientSecret {
        payment_id: String,
    },
    /// The attempt is retryable but the order only accepts a new attempt.
    NewAttemptRequired {
        status: OrderStatus,
    },
}

impl std::fmt::Display for InvalidPayment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAttempts => write!(f, "order has no payment attempts"),
            Self::OrderClosed { status } => write!(f, "order is {status}"),
            Self::NotRetryable { payment_id, status } => {
                write!(f, "payment {payment_id} is {status}")
            }
            Self::MissingClientSecret { payment_id } => {
                write!(f, "payment {payment_id} has no client secret")
            }
            Self::NewAttemptRequired { status } => {
                write!(f, "order is {status}, a new payment attempt is required")
            }
        }
    }
}

/// An attempt the customer may confirm right now.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmableAttempt<'a> {
    pub payment: &'a PaymentIntent,
    pub source: AttemptSource,
    pub client_secret: &'a str,
}

/// Picks the attempt shown for an order.
///
/// A requested id wins when it exists on the order; otherwise the first
/// attempt in the order's list is used.
pub fn select_active_attempt<'a>(
    order: &'a Order,
    requested: Option<&str>,
) -> Option<ActiveAttempt<'a>> {
    if let Some(payment) = requested.and_then(|id| order.payment(id)) {
        return Some(ActiveAttempt {
            payment,
            source: AttemptSource::Requested,
        });
    }
    order.payments.first().map(|payment| ActiveAttempt {
        payment,
        source: AttemptSource::Fallback,
    })
}

pub fn allowed_actions(status: OrderStatus, active: Option<&PaymentIntent>) -> Vec<OrderAction> {
    match status {
        OrderStatus::Completed | OrderStatus::Canceled => Vec::new(),
        OrderStatus::Pending => match active {
            Some(payment) if payment.stripe_status.is_retryable() => vec![
                OrderAction::RetryPayment,
                OrderAction::CancelPayment,
                OrderAction::CancelOrder,
            ],
            // A succeeded attempt on a still-pending order is waiting for the
            // webhook; a second charge must not be offered.
            Some(payment) if payment.stripe_status == PaymentStatus::Succeeded => {
                vec![OrderAction::CancelOrder]
            }
            _ => vec![OrderAction::GeneratePaymentIntent, OrderAction::CancelOrder],
        },
        OrderStatus::Failed => vec![OrderAction::GeneratePaymentIntent, OrderAction::CancelOrder],
    }
}

/// Actions for an order, using the attempt picked for `requested`.
pub fn order_actions(order: &Order, requested: Option<&str>) -> Vec<OrderAction> {
    let active = select_active_attempt(order, requested).map(|a| a.payment);
    allowed_actions(order.order_status, active)
}

pub fn is_allowed(order: &Order, requested: Option<&str>, action: OrderAction) -> bool {
    order_actions(order, requested).contains(&action)
}

/// Resolves the attempt the confirmation form may be rendered for.
///
/// The form is only ever produced when the action table offers
/// `RetryPayment` for the selected attempt, so a consumed client secret is
/// never handed out again.
pub fn confirmable_attempt<'a>(
    order: &'a Order,
    requested: Option<&str>,
) -> Result<ConfirmableAttempt<'a>, InvalidPayment> {
    if order.order_status.is_terminal() {
        return Err(InvalidPayment::OrderClosed {
            status: order.order_status,
        });
    }
    let active = select_active_attempt(order, requested).ok_or(InvalidPayment::NoAttempts)?;
    let payment = active.payment;
    if !payment.stripe_status.is_retryable() {
        return Err(InvalidPayment::NotRetryable {
            payment_id: payment.id.clone(),
            status: payment.stripe_status.clone(),
        });
    }
    if !allowed_actions(order.order_status, Some(payment)).contains(&OrderAction::RetryPayment) {
        return Err(InvalidPayment::NewAttemptRequired {
            status: order.order_status,
        });
    }
    let client_secret = payment
        .stripe_client_secret
        .as_deref()
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| InvalidPayment::MissingClientSecret {
            payment_id: payment.id.clone(),
        })?;
    Ok(ConfirmableAttempt {
        payment,
        source: active.source,
        client_secret,
    })
}

pub fn payment_path(order_id: &str, payment_id: Option<&str>) -> String {
    match payment_id {
        Some(payment_id) => format!("/payments/{order_id}/{payment_id}"),
        None => format!("/payments/{order_id}"),
    }
}
