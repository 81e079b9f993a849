//! Source image download.
//!
//! One attempt per request: no retries, no fallback image. `data:` URIs are decoded
//! in-process so editor-generated images never leave the service.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch image: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch image: upstream returned status {status}")]
    Status { status: u16 },

    #[error("Invalid data URI: {0}")]
    DataUri(String),
}

/// Resolves an image URL to its encoded bytes.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}

/// Fetches `http(s)` URLs with reqwest and decodes `data:` URIs locally.
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        if let Some(rest) = url.strip_prefix("data:") {
            return decode_data_uri(rest);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!("Fetched {} bytes from {url}", body.len());
        Ok(body)
    }
}

/// Decodes the part of a `data:` URI after the scheme. Only base64 payloads are accepted.
fn decode_data_uri(rest: &str) -> Result<Bytes, FetchError> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| FetchError::DataUri("missing ',' separator".to_string()))?;

    if !meta.ends_with(";base64") {
        return Err(FetchError::DataUri("only base64 payloads are supported".to_string()));
    }

    BASE64_STANDARD
        .decode(payload.trim())
        .map(Bytes::from)
        .map_err(|e| FetchError::DataUri(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_uri() {
        let bytes = decode_data_uri("image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(&bytes[..], b"hello");
    }

    #[test]
    fn test_decode_data_uri_rejects_plain_payload() {
        assert!(matches!(
            decode_data_uri("text/plain,hello"),
            Err(FetchError::DataUri(_))
        ));
        assert!(matches!(decode_data_uri("image/png;base64"), Err(FetchError::DataUri(_))));
    }

    #[tokio::test]
    async fn test_fetcher_handles_data_uri_without_network() {
        let fetcher = HttpImageFetcher::new(Duration::from_secs(1)).unwrap();
        let bytes = fetcher.fetch("data:image/png;base64,AAEC").await.unwrap();
        assert_eq!(&bytes[..], &[0, 1, 2]);
    }

    #[tokio::test]
    async fn test_fetcher_surfaces_invalid_url() {
        let fetcher = HttpImageFetcher::new(Duration::from_secs(1)).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to fetch image"));
    }
}
