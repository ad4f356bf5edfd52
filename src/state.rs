use std::{sync::Arc, time::Duration};

use crate::{
    config::AppConfig,
    gateway::{GraphqlGateway, StoreGateway},
    payment::{HttpPaymentProcessor, PaymentProcessor},
};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn StoreGateway>,
    pub processor: Arc<dyn PaymentProcessor>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Builds the remote clients once; every handler shares them.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.gateway_timeout_secs);
        let gateway = GraphqlGateway::new(config.gateway_url.clone(), timeout)?;
        let processor = HttpPaymentProcessor::new(
            config.payment_processor_url.clone(),
            config.payment_publishable_key.clone(),
            timeout,
        )?;
        Ok(Self::new(config, Arc::new(gateway), Arc::new(processor)))
    }

    pub fn new(
        config: AppConfig,
        gateway: Arc<dyn StoreGateway>,
        processor: Arc<dyn PaymentProcessor>,
    ) -> Self {
        Self {
            gateway,
            processor,
            config: Arc::new(config),
        }
    }
}
