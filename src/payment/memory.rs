use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::payment::{ConfirmOutcome, ConfirmRequest, PaymentProcessor, ProcessorError};

#[derive(Debug, Default)]
struct InMemoryProcessorState {
    confirmed: Vec<String>,
    attempts: usize,
    decline_with: Option<String>,
}

/// In-memory processor for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentProcessor {
    state: Arc<Mutex<InMemoryProcessorState>>,
}

impl InMemoryPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, InMemoryProcessorState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every confirmation is declined with `message` until cleared.
    pub fn decline_with(&self, message: Option<&str>) {
        self.state().decline_with = message.map(str::to_string);
    }

    /// Client secrets accepted so far.
    pub fn confirmed(&self) -> Vec<String> {
        self.state().confirmed.clone()
    }

    /// Number of confirm calls, accepted or not.
    pub fn attempts(&self) -> usize {
        self.state().attempts
    }
}

#[async_trait]
impl PaymentProcessor for InMemoryPaymentProcessor {
    async fn confirm_payment(
        &self,
        request: ConfirmRequest<'_>,
    ) -> Result<ConfirmOutcome, ProcessorError> {
        let mut state = self.state();
        state.attempts += 1;
        if let Some(message) = state.decline_with.clone() {
            return Err(ProcessorError::Declined(message));
        }
        state.confirmed.push(request.client_secret.to_string());
        Ok(ConfirmOutcome {
            redirect_to: request.return_url.to_string(),
        })
    }
}
