use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Store;
use crate::middleware::rate_limit::RateLimits;
use crate::services::vendors::build_http_client;

/// Shared, read-mostly handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub http: reqwest::Client,
    pub limits: Arc<RateLimits>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, reqwest::Error> {
        let limits = RateLimits::new(&config);
        Ok(Self {
            config: Arc::new(config),
            store,
            http: build_http_client()?,
            limits: Arc::new(limits),
        })
    }
}
