//! The hosted payment processor.
//!
//! The processor owns the charge state machine. The storefront hands it a
//! client secret and a return URL; on success the processor sends the browser
//! to the return URL itself, so there is no success callback here.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::AppError;

pub mod http;
pub mod memory;

pub use http::HttpPaymentProcessor;
pub use memory::InMemoryPaymentProcessor;

#[derive(Debug, Clone, Copy)]
pub struct ConfirmRequest<'a> {
    pub client_secret: &'a str,
    pub return_url: &'a str,
    /// Payment method collected by the hosted payment element.
    pub payment_method: Option<&'a str>,
}

/// Where the browser goes next once the processor accepted the confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmOutcome {
    pub redirect_to: String,
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("{0}")]
    Declined(String),

    #[error("payment processor unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected processor response: {0}")]
    Unexpected(String),
}

impl From<ProcessorError> for AppError {
    fn from(err: ProcessorError) -> Self {
        AppError::Processor(err.to_string())
    }
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Confirms one attempt. Never retried by the caller.
    async fn confirm_payment(
        &self,
        request: ConfirmRequest<'_>,
    ) -> Result<ConfirmOutcome, ProcessorError>;
}
