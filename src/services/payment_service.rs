use crate::{
    audit,
    dto::{
        orders::Navigation,
        payments::{
            ConfirmPaymentRequest, ConfirmationQuery, ConfirmationView, PaymentForm, PaymentPage,
            ProcessorRedirect,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::Customer,
    models::Order,
    payment::ConfirmRequest,
    response::{ApiResponse, Meta},
    services::{order_service::load_order, reconcile::mutate_then_reload},
    state::AppState,
    tracker::{
        OrderAction, allowed_actions, confirmable_attempt, is_allowed, payment_path,
        select_active_attempt,
    },
};

/// Builds the payment page for an order snapshot.
///
/// The confirmation form is only filled in when the page's actions include
/// `RetryPayment`; otherwise `invalid_payment` explains why it is missing.
pub fn payment_page(order: &Order, requested: Option<&str>, publishable_key: &str) -> PaymentPage {
    let active = select_active_attempt(order, requested);
    let actions = allowed_actions(order.order_status, active.map(|a| a.payment));

    let (form, invalid_payment) = match confirmable_attempt(order, requested) {
        Ok(attempt) => {
            let form = PaymentForm {
                payment_id: attempt.payment.id.clone(),
                client_secret: attempt.client_secret.to_string(),
                publishable_key: publishable_key.to_string(),
                confirm_path: format!(
                    "{}/confirm",
                    payment_path(&order.id, Some(attempt.payment.id.as_str()))
                ),
            };
            (Some(form), None)
        }
        Err(reason) => (None, Some(reason)),
    };

    PaymentPage {
        order_id: order.id.clone(),
        order_status: order.order_status,
        total: order.total,
        payment: active.map(|a| a.payment.clone()),
        source: active.map(|a| a.source),
        form,
        invalid_payment,
        actions,
    }
}

async fn load_payment_page(
    state: &AppState,
    customer: &Customer,
    order_id: &str,
    payment_id: Option<&str>,
) -> AppResult<PaymentPage> {
    let order = load_order(state, customer, order_id).await?;
    Ok(payment_page(
        &order,
        payment_id,
        &state.config.payment_publishable_key,
    ))
}

pub async fn get_payment_page(
    state: &AppState,
    customer: &Customer,
    order_id: &str,
    payment_id: Option<&str>,
) -> AppResult<ApiResponse<PaymentPage>> {
    let page = load_payment_page(state, customer, order_id, payment_id).await?;
    if let Some(reason) = &page.invalid_payment {
        tracing::debug!(order_id, %reason, "payment form withheld");
    }
    Ok(ApiResponse::success("OK", page, Some(Meta::empty())))
}

/// Hands the active attempt to the processor.
///
/// On success the customer is sent wherever the processor says; the order is
/// not touched locally, its completion arrives through the backend.
pub async fn confirm_payment(
    state: &AppState,
    customer: &Customer,
    order_id: &str,
    payment_id: Option<&str>,
    payload: ConfirmPaymentRequest,
) -> AppResult<ApiResponse<Navigation<ProcessorRedirect>>> {
    let order = load_order(state, customer, order_id).await?;
    let attempt = confirmable_attempt(&order, payment_id)?;
    let return_url = state.config.return_url();

    let outcome = state
        .processor
        .confirm_payment(ConfirmRequest {
            client_secret: attempt.client_secret,
            return_url: &return_url,
            payment_method: payload.payment_method.as_deref(),
        })
        .await
        .map_err(|err| {
            tracing::warn!(order_id, payment_id = %attempt.payment.id, error = %err, "payment confirmation failed");
            AppError::from(err)
        })?;

    audit::record(
        customer,
        "payment_confirm",
        Some("payments"),
        Some(serde_json::json!({ "order_id": order_id, "payment_id": attempt.payment.id })),
    );

    let data = Navigation {
        location: outcome.redirect_to,
        view: ProcessorRedirect {
            payment_id: attempt.payment.id.clone(),
        },
    };
    Ok(ApiResponse::success(
        "Redirecting to payment processor",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn cancel_payment(
    state: &AppState,
    customer: &Customer,
    order_id: &str,
    payment_id: &str,
) -> AppResult<ApiResponse<PaymentPage>> {
    let order = load_order(state, customer, order_id).await?;
    let payment = order.payment(payment_id).ok_or_else(|| {
        AppError::InvalidSelection(format!("payment {payment_id} is not on order {order_id}"))
    })?;
    if !is_allowed(&order, Some(payment_id), OrderAction::CancelPayment) {
        return Err(AppError::InvalidSelection(format!(
            "payment {payment_id} is {} on a {} order and cannot be canceled",
            payment.stripe_status, order.order_status
        )));
    }

    let page = mutate_then_reload(
        async {
            match state.gateway.cancel_payment(customer, payment_id).await? {
                true => Ok::<_, AppError>(()),
                false => Err(AppError::mutation(
                    "cancelPayment",
                    format!("payment {payment_id} was not canceled"),
                )),
            }
        },
        || load_payment_page(state, customer, order_id, Some(payment_id)),
    )
    .await?;

    audit::record(
        customer,
        "payment_cancel",
        Some("payments"),
        Some(serde_json::json!({ "order_id": order_id, "payment_id": payment_id })),
    );

    Ok(ApiResponse::success(
        "Payment canceled",
        page,
        Some(Meta::empty()),
    ))
}

/// Landing page after the processor redirect. Read-only.
pub fn confirmation_view(query: ConfirmationQuery) -> ApiResponse<ConfirmationView> {
    let redirect_status = query.redirect_status.filter(|s| !s.is_empty());
    let (title, message) = match redirect_status.as_deref() {
        Some("failed") => (
            "Payment not completed",
            "The payment processor could not complete the payment. You can retry from the order page.",
        ),
        _ => (
            "Payment submitted",
            "Thank you for your purchase. Your order will be updated as soon as the payment is settled.",
        ),
    };
    let data = ConfirmationView {
        title: title.to_string(),
        message: message.to_string(),
        redirect_status,
    };
    ApiResponse::success("OK", data, Some(Meta::empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::{
        models::{OrderStatus, PaymentIntent, PaymentStatus},
        tracker::{AttemptSource, InvalidPayment},
    };

    fn attempt(id: &str, status: &str) -> PaymentIntent {
        PaymentIntent {
            id: id.into(),
            order_id: Some("o1".into()),
            stripe_payment_id: None,
            stripe_client_secret: Some(format!("{id}_secret_abc")),
            stripe_status: PaymentStatus::from(status),
            stripe_amount: Some(Decimal::new(500, 2)),
            stripe_currency: Some("usd".into()),
            stripe_payment_method: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn order(status: OrderStatus, payments: Vec<PaymentIntent>) -> Order {
        Order {
            id: "o1".into(),
            total: Decimal::new(500, 2),
            order_status: status,
            created_at: None,
            updated_at: None,
            user_id: None,
            order_items: Vec::new(),
            payments,
        }
    }

    #[test]
    fn form_targets_the_requested_attempt() {
        let order = order(
            OrderStatus::Pending,
            vec![
                attempt("pi_1", PaymentStatus::PAYMENT_FAILED),
                attempt("pi_2", PaymentStatus::REQUIRES_PAYMENT_METHOD),
            ],
        );
        let page = payment_page(&order, Some("pi_2"), "pk_test");
        let form = page.form.unwrap();
        assert_eq!(form.payment_id, "pi_2");
        assert_eq!(form.client_secret, "pi_2_secret_abc");
        assert_eq!(form.confirm_path, "/payments/o1/pi_2/confirm");
        assert_eq!(page.source, Some(AttemptSource::Requested));
    }

    #[test]
    fn succeeded_fallback_hides_the_form() {
        let order = order(
            OrderStatus::Pending,
            vec![attempt("pi_1", PaymentStatus::SUCCEEDED)],
        );
        let page = payment_page(&order, Some("pi_missing"), "pk_test");
        assert!(page.form.is_none());
        assert_eq!(page.source, Some(AttemptSource::Fallback));
        assert!(matches!(
            page.invalid_payment,
            Some(InvalidPayment::NotRetryable { .. })
        ));
    }

    #[test]
    fn failed_order_page_offers_only_a_new_attempt() {
        let order = order(
            OrderStatus::Failed,
            vec![attempt("pi_1", PaymentStatus::PAYMENT_FAILED)],
        );
        let page = payment_page(&order, None, "pk_test");
        assert!(page.form.is_none());
        assert_eq!(
            page.invalid_payment,
            Some(InvalidPayment::NewAttemptRequired {
                status: OrderStatus::Failed
            })
        );
        assert_eq!(
            page.actions,
            vec![OrderAction::GeneratePaymentIntent, OrderAction::CancelOrder]
        );
    }

    #[test]
    fn confirmation_view_echoes_redirect_status() {
        let view = confirmation_view(ConfirmationQuery {
            redirect_status: Some("succeeded".into()),
        });
        assert_eq!(view.data.unwrap().redirect_status.as_deref(), Some("succeeded"));
    }

    #[test]
    fn failed_redirect_is_not_reported_as_paid() {
        let view = confirmation_view(ConfirmationQuery {
            redirect_status: Some("failed".into()),
        })
        .data
        .unwrap();
        assert_eq!(view.title, "Payment not completed");
        assert_eq!(view.redirect_status.as_deref(), Some("failed"));
    }
}
