use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

// Transport settings live next to the HTTP source that consumes them
use cardex_source::SourceConfig;

/// Overrides `pack.source_url` for `update-pack`.
pub const SOURCE_URL_ENV: &str = "CARDEX_SOURCE_URL";
/// Overrides `pack.location`.
pub const PACK_ENV: &str = "CARDEX_PACK";
/// Host used in the generated config; never a real source.
pub const PLACEHOLDER_HOST: &str = "YOUR_PROXY_HOST";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub pack: PackConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub remote: SourceConfig,
    #[serde(default)]
    pub update: UpdateConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PackConfig {
    /// Pack to index: an `http(s)://` URL, a `file://` URL or a path
    #[serde(default = "PackConfig::default_location")]
    pub location: String,
    /// Upstream pack that `update-pack` downloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Where `update-pack` writes the downloaded pack
    #[serde(default = "PackConfig::default_out_file")]
    pub out_file: PathBuf,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            location: Self::default_location(),
            source_url: None,
            out_file: Self::default_out_file(),
        }
    }
}

impl PackConfig {
    fn default_location() -> String {
        "data/edisonrulings.json".to_string()
    }

    fn default_out_file() -> PathBuf {
        PathBuf::from("data/edisonrulings.json")
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "SearchConfig::default_limit")]
    pub default_limit: usize,
    #[serde(default)]
    pub include_text: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: Self::default_limit(),
            include_text: false,
        }
    }
}

impl SearchConfig {
    const fn default_limit() -> usize {
        cardex_core::DEFAULT_SEARCH_LIMIT
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UpdateConfig {
    /// Pause (seconds) before each retry of a failed download
    #[serde(default = "UpdateConfig::default_retry_delays")]
    pub retry_delays_secs: Vec<u64>,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            retry_delays_secs: Self::default_retry_delays(),
        }
    }
}

impl UpdateConfig {
    fn default_retry_delays() -> Vec<u64> {
        vec![1, 2, 4]
    }
}

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("cardex"))
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load `~/cardex/config.json` if present, otherwise fall back to the
    /// built-in defaults. Environment overrides are applied either way.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = if config_path.exists() {
            info!("Loaded config from {}", config_path.display());
            Self::load_from(&config_path)?
        } else {
            info!(
                "No config at {}, using defaults (run 'cardex init' to create one)",
                config_path.display()
            );
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `CARDEX_*` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(location) = lookup(PACK_ENV).filter(|v| !v.trim().is_empty()) {
            info!("Pack location overridden by {}", PACK_ENV);
            self.pack.location = location;
        }
        if let Some(url) = lookup(SOURCE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            info!("Pack source overridden by {}", SOURCE_URL_ENV);
            self.pack.source_url = Some(url);
        }
    }

    /// Configured upstream pack URL, unless it is missing or still the
    /// generated placeholder.
    #[must_use]
    pub fn update_source(&self) -> Option<&str> {
        self.pack
            .source_url
            .as_deref()
            .filter(|url| !url.trim().is_empty() && !url.contains(PLACEHOLDER_HOST))
    }

    /// Defaults plus a placeholder source URL, as written by `cardex init`.
    #[must_use]
    pub fn template() -> Self {
        let mut config = Self::default();
        config.pack.source_url = Some(format!("https://{PLACEHOLDER_HOST}/edisonrulings.json"));
        config
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn write_template(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }
        let content = serde_json::to_string_pretty(&Self::template())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        Self::write_template(&config_path)?;

        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Next steps:");
        println!("   1. Set pack.source_url to the upstream pack (or export {SOURCE_URL_ENV})");
        println!("   2. Run 'cardex update-pack' to download it to pack.out_file");
        println!("   3. Run 'cardex search <name>' to query it");
        println!();
        println!("Configuration options:");
        println!("   - pack.location: pack to index (URL or path, or export {PACK_ENV})");
        println!("   - search.default_limit: result cap when --limit is not given");
        println!("   - remote.raw_url_template: per-card refresh URL, {{id}} is substituted");
        println!();
        Ok(())
    }
}
