use serde_json::Value;

use crate::middleware::auth::Customer;

/// Records a customer action on the `storefront::audit` target.
///
/// The token itself is never logged; only a short fingerprint of it.
pub fn record(customer: &Customer, action: &str, resource: Option<&str>, metadata: Option<Value>) {
    let metadata = metadata.unwrap_or(Value::Null);
    tracing::info!(
        target: "storefront::audit",
        customer = %fingerprint(customer.token()),
        action,
        resource = resource.unwrap_or("-"),
        metadata = %metadata,
        "customer action"
    );
}

fn fingerprint(token: &str) -> String {
    let tail: String = token
        .chars()
        .rev()
        .take(6)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{tail}")
}
