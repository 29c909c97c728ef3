use std::sync::Arc;
use tinylink_service::{Shortener, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<dyn Shortener>,
    pub tokens: Arc<TokenService>,
    /// Public base for building `shortUrl` display values.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        tokens: Arc<TokenService>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            shortener,
            tokens,
            base_url: base_url.into(),
        }
    }
}
