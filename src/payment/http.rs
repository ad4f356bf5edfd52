use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::payment::{ConfirmOutcome, ConfirmRequest, PaymentProcessor, ProcessorError};

/// Client for the processor's publishable-key confirm endpoint.
#[derive(Clone)]
pub struct HttpPaymentProcessor {
    http: reqwest::Client,
    base_url: String,
    publishable_key: String,
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    status: String,
    #[serde(default)]
    next_action: Option<NextAction>,
}

#[derive(Debug, Deserialize)]
struct NextAction {
    #[serde(default)]
    redirect_to_url: Option<RedirectToUrl>,
}

#[derive(Debug, Deserialize)]
struct RedirectToUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl HttpPaymentProcessor {
    pub fn new(
        base_url: impl Into<String>,
        publishable_key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            publishable_key: publishable_key.into(),
        })
    }
}

/// The intent id is the part of the client secret before `_secret_`.
fn intent_id(client_secret: &str) -> Result<&str, ProcessorError> {
    client_secret
        .split_once("_secret_")
        .map(|(id, _)| id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ProcessorError::Unexpected("malformed client secret".to_string()))
}

fn interpret(
    success: bool,
    body: &[u8],
    return_url: &str,
) -> Result<ConfirmOutcome, ProcessorError> {
    if !success {
        let envelope: ErrorEnvelope = serde_json::from_slice(body)
            .map_err(|err| ProcessorError::Unexpected(err.to_string()))?;
        let message = envelope
            .error
            .message
            .or(envelope.error.code)
            .unwrap_or_else(|| "payment was declined".to_string());
        return Err(ProcessorError::Declined(message));
    }

    let intent: IntentResponse = serde_json::from_slice(body)
        .map_err(|err| ProcessorError::Unexpected(err.to_string()))?;
    match intent.status.as_str() {
        "succeeded" | "processing" | "requires_capture" => Ok(ConfirmOutcome {
            redirect_to: return_url.to_string(),
        }),
        "requires_action" => intent
            .next_action
            .and_then(|a| a.redirect_to_url)
            .map(|r| ConfirmOutcome { redirect_to: r.url })
            .ok_or_else(|| {
                ProcessorError::Unexpected("action required without a redirect".to_string())
            }),
        other => Err(ProcessorError::Declined(format!(
            "payment not completed (status {other})"
        ))),
    }
}

#[async_trait]
impl PaymentProcessor for HttpPaymentProcessor {
    async fn confirm_payment(
        &self,
        request: ConfirmRequest<'_>,
    ) -> Result<ConfirmOutcome, ProcessorError> {
        let id = intent_id(request.client_secret)?;
        let url = format!("{}/v1/payment_intents/{}/confirm", self.base_url, id);

        let mut form = vec![
            ("client_secret", request.client_secret),
            ("return_url", request.return_url),
        ];
        if let Some(method) = request.payment_method {
            form.push(("payment_method", method));
        }

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.publishable_key)
            .form(&form)
            .send()
            .await?;
        let success = response.status().is_success();
        let body = response.bytes().await?;

        interpret(success, &body, request.return_url).inspect_err(|err| {
            tracing::warn!(payment_intent = id, error = %err, "payment confirmation rejected");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RETURN_URL: &str = "http://shop.test/confirm";

    #[test]
    fn intent_id_comes_from_client_secret() {
        assert_eq!(intent_id("pi_123_secret_abc").unwrap(), "pi_123");
        assert!(intent_id("not-a-secret").is_err());
        assert!(intent_id("_secret_abc").is_err());
    }

    #[test]
    fn succeeded_intent_redirects_to_return_url() {
        let outcome = interpret(true, br#"{ "id": "pi_1", "status": "succeeded" }"#, RETURN_URL)
            .unwrap();
        assert_eq!(outcome.redirect_to, RETURN_URL);
    }

    #[test]
    fn required_action_redirects_to_processor() {
        let body = br#"{
            "status": "requires_action",
            "next_action": { "type": "redirect_to_url", "redirect_to_url": { "url": "https://hooks.processor.test/3ds", "return_url": "http://shop.test/confirm" } }
        }"#;
        let outcome = interpret(true, body, RETURN_URL).unwrap();
        assert_eq!(outcome.redirect_to, "https://hooks.processor.test/3ds");
    }

    #[test]
    fn processor_error_message_is_passed_through() {
        let body = br#"{ "error": { "type": "card_error", "code": "card_declined", "message": "Your card was declined." } }"#;
        match interpret(false, body, RETURN_URL) {
            Err(ProcessorError::Declined(message)) => assert_eq!(message, "Your card was declined."),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn unfinished_status_is_declined() {
        let err = interpret(
            true,
            br#"{ "status": "requires_payment_method" }"#,
            RETURN_URL,
        )
        .unwrap_err();
        assert!(matches!(err, ProcessorError::Declined(_)));
    }
}
