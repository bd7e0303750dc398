use anyhow::Context;
use async_trait::async_trait;
use cardex_core::{
    CardId, CardSource, DEFAULT_RAW_URL_TEMPLATE, FetchError, LoadError, Normalizer, parse_pack,
};
use reqwest::Client;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::location::PackLocation;

/// HTTP source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Request timeout (seconds)
    #[serde(default = "SourceConfig::default_timeout")]
    pub timeout: u64,

    /// User-Agent header
    #[serde(default = "SourceConfig::default_user_agent")]
    pub user_agent: String,

    /// Maximum pack or record size (bytes)
    #[serde(default = "SourceConfig::default_max_size")]
    pub max_size: usize,

    /// Per-card upstream URL, `{id}` is substituted
    #[serde(default = "SourceConfig::default_raw_url_template")]
    pub raw_url_template: String,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` from the environment
    #[serde(default = "SourceConfig::default_use_system_proxy")]
    pub use_system_proxy: bool,
}

impl SourceConfig {
    const fn default_timeout() -> u64 {
        30
    }

    fn default_user_agent() -> String {
        format!("cardex/{}", env!("CARGO_PKG_VERSION"))
    }

    const fn default_max_size() -> usize {
        256 * 1024 * 1024 // 256MB
    }

    fn default_raw_url_template() -> String {
        DEFAULT_RAW_URL_TEMPLATE.to_string()
    }

    const fn default_use_system_proxy() -> bool {
        true
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
            user_agent: Self::default_user_agent(),
            max_size: Self::default_max_size(),
            raw_url_template: Self::default_raw_url_template(),
            use_system_proxy: Self::default_use_system_proxy(),
        }
    }
}

/// Transport failure shared by pack loads and record fetches.
enum HttpFailure {
    Transport(String),
    Status { status: u16, reason: String },
    TooLarge { size: usize, max: usize },
}

impl From<HttpFailure> for LoadError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Transport(message) => Self::Transport(message),
            HttpFailure::Status { status, reason } => Self::Status { status, reason },
            HttpFailure::TooLarge { size, max } => Self::TooLarge { size, max },
        }
    }
}

impl From<HttpFailure> for FetchError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Transport(message) => Self::Transport(message),
            HttpFailure::Status { status, reason } => Self::Status { status, reason },
            HttpFailure::TooLarge { size, max } => Self::TooLarge { size, max },
        }
    }
}

/// [`CardSource`] backed by `reqwest` for remote locations and the local
/// filesystem for everything else.
pub struct HttpCardSource {
    client: Client,
    config: SourceConfig,
    normalizer: Normalizer,
}

impl HttpCardSource {
    pub fn new(config: SourceConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone());
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().context("Failed to create HTTP client")?;
        let normalizer = Normalizer::new(config.raw_url_template.clone());

        info!("Creating HttpCardSource");
        Ok(Self {
            client,
            config,
            normalizer,
        })
    }

    /// Normalizer whose raw URLs match the locations this source fetches.
    #[must_use]
    pub const fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Read a pack location verbatim, without interpreting it.
    pub async fn download(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        match PackLocation::parse(location) {
            PackLocation::Remote(url) => Ok(self.get_bytes(url.as_str(), true).await?),
            PackLocation::File(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|source| LoadError::Io { path, source })?;
                self.check_size(bytes.len())?;
                Ok(bytes)
            }
        }
    }

    async fn get_bytes(&self, url: &str, no_cache: bool) -> Result<Vec<u8>, HttpFailure> {
        debug!("GET {}", url);
        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if no_cache {
            request = request.header(CACHE_CONTROL, "no-cache");
        }

        let mut response = request
            .send()
            .await
            .map_err(|e| HttpFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpFailure::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        if let Some(declared) = response.content_length() {
            self.check_size(usize::try_from(declared).unwrap_or(usize::MAX))?;
        }

        // Content-Length is optional; enforce the cap while streaming too.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| HttpFailure::Transport(format!("Failed to read response: {e}")))?
        {
            self.check_size(body.len() + chunk.len())?;
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }

    fn check_size(&self, size: usize) -> Result<(), HttpFailure> {
        if size > self.config.max_size {
            Err(HttpFailure::TooLarge {
                size,
                max: self.config.max_size,
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CardSource for HttpCardSource {
    async fn load_pack(&self, location: &str) -> Result<Vec<Value>, LoadError> {
        let bytes = self.download(location).await?;
        info!("Fetched pack: {} bytes from {}", bytes.len(), location);
        parse_pack(&bytes)
    }

    async fn fetch_raw(&self, id: CardId) -> Result<Value, FetchError> {
        let url = self.normalizer.raw_url(id);
        let bytes = self.get_bytes(&url, false).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_config_default() {
        let config = SourceConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.starts_with("cardex/"));
        assert!(config.raw_url_template.contains("{id}"));
        assert!(config.use_system_proxy);
    }

    #[test]
    fn test_source_config_partial_json() {
        let config: SourceConfig = match serde_json::from_str(r#"{ "timeout": 5 }"#) {
            Ok(config) => config,
            Err(e) => panic!("partial config should parse: {e}"),
        };
        assert_eq!(config.timeout, 5);
        assert_eq!(config.max_size, 256 * 1024 * 1024);
    }

    #[test]
    fn test_http_source_new() {
        let source = HttpCardSource::new(SourceConfig::default());
        assert!(source.is_ok());
    }

    #[test]
    fn test_normalizer_uses_configured_template() {
        let config = SourceConfig {
            raw_url_template: "http://mirror.test/{id}.json".to_string(),
            ..SourceConfig::default()
        };
        let Ok(source) = HttpCardSource::new(config) else {
            panic!("Failed to create HttpCardSource");
        };
        let Some(id) = CardId::new(42) else {
            panic!("non-zero id");
        };
        assert_eq!(source.normalizer().raw_url(id), "http://mirror.test/42.json");
    }
}
