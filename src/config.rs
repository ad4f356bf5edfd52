use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gateway_url: String,
    pub gateway_timeout_secs: u64,
    pub default_customer_token: Option<String>,
    pub public_url: String,
    pub payment_processor_url: String,
    pub payment_publishable_key: String,
    pub products_page_size: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let gateway_url =
            env::var("GATEWAY_URL").unwrap_or_else(|_| "http://localhost:3000/graphql".to_string());
        let gateway_timeout_secs = env::var("GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);
        let default_customer_token = env::var("DEFAULT_CUSTOMER_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let public_url = env::var("PUBLIC_URL").unwrap_or_else(|_| format!("http://{host}:{port}"));
        let payment_processor_url = env::var("PAYMENT_PROCESSOR_URL")
            .unwrap_or_else(|_| "https://api.stripe.com".to_string());
        let payment_publishable_key =
            env::var("PAYMENT_PUBLISHABLE_KEY").context("PAYMENT_PUBLISHABLE_KEY is not set")?;
        let products_page_size = env::var("PRODUCTS_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(10)
            .clamp(1, 100);

        Ok(Self {
            host,
            port,
            gateway_url,
            gateway_timeout_secs,
            default_customer_token,
            public_url: public_url.trim_end_matches('/').to_string(),
            payment_processor_url: payment_processor_url.trim_end_matches('/').to_string(),
            payment_publishable_key,
            products_page_size,
        })
    }

    /// Where the processor sends the browser after a successful confirmation.
    pub fn return_url(&self) -> String {
        format!("{}/api/confirm", self.public_url)
    }
}
