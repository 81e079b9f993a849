use std::sync::Arc;

use crate::background::ImageFetcher;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Reserved for handlers that need runtime settings.
    #[allow(dead_code)]
    pub config: Config,
    /// Source image download. Default: HttpImageFetcher (http(s) + data: URIs).
    pub fetcher: Arc<dyn ImageFetcher>,
}
