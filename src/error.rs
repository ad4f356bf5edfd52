use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    models::OrderStatus,
    response::{ApiResponse, Meta},
    tracker::InvalidPayment,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    /// A gateway read failed. Shown as a page-level message.
    #[error("Could not load {operation}: {message}")]
    RemoteQuery {
        operation: &'static str,
        message: String,
    },

    /// A gateway write was rejected. Local state is left as it was.
    #[error("Could not complete {operation}: {message}")]
    RemoteMutation {
        operation: &'static str,
        message: String,
    },

    /// The cancel call went through but the order did not end up canceled.
    #[error("Order {order_id} was not canceled (status {status})")]
    CancellationRejected {
        order_id: String,
        status: OrderStatus,
    },

    /// The processor refused the confirmation; the message is the processor's.
    #[error("Payment was not confirmed: {0}")]
    Processor(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn query(operation: &'static str, message: impl Into<String>) -> Self {
        AppError::RemoteQuery {
            operation,
            message: message.into(),
        }
    }

    pub fn mutation(operation: &'static str, message: impl Into<String>) -> Self {
        AppError::RemoteMutation {
            operation,
            message: message.into(),
        }
    }

    /// True for every failure of a write against the gateway, including a
    /// cancel call whose resulting state was wrong.
    pub fn is_mutation_failure(&self) -> bool {
        matches!(
            self,
            AppError::RemoteMutation { .. } | AppError::CancellationRejected { .. }
        )
    }
}

impl From<InvalidPayment> for AppError {
    fn from(reason: InvalidPayment) -> Self {
        AppError::InvalidSelection(reason.to_string())
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RemoteQuery { .. } => StatusCode::BAD_GATEWAY,
            AppError::RemoteMutation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::CancellationRejected { .. } => StatusCode::CONFLICT,
            AppError::Processor(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::InvalidSelection(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let AppError::Internal(err) = &self {
            tracing::error!(error = ?err, "internal error");
        }

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
