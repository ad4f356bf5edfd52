use axum::{extract::FromRequestParts, http::header};

use crate::{error::AppError, state::AppState};

/// The customer a request acts for, identified by the bearer token that is
/// forwarded to the gateway.
#[derive(Clone)]
pub struct Customer {
    token: String,
}

impl Customer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Customer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Customer").field("token", &"[REDACTED]").finish()
    }
}

fn bearer_token(parts: &axum::http::request::Parts) -> Result<Option<String>, AppError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::BadRequest("Invalid Authorization scheme".into()))?
        .trim();
    if token.is_empty() {
        return Err(AppError::BadRequest("Empty bearer token".into()));
    }
    Ok(Some(token.to_string()))
}

impl FromRequestParts<AppState> for Customer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts)? {
            Some(token) => token,
            None => state
                .config
                .default_customer_token
                .clone()
                .ok_or_else(|| AppError::BadRequest("Missing Authorization header".into()))?,
        };
        Ok(Customer { token })
    }
}
