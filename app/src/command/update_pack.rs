use anyhow::Context;
use cardex_config::{Config, PLACEHOLDER_HOST, SOURCE_URL_ENV};
use cardex_core::parse_pack;
use cardex_source::retry_with_backoff;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use super::init_common_components;

/// Input parameters for the `UpdatePack` command strategy.
#[derive(Debug, Clone)]
pub struct UpdatePackInput {
    pub source: Option<String>,
    pub out: Option<PathBuf>,
}

/// Strategy for downloading the upstream pack to disk.
///
/// The body is written byte-for-byte; it is parsed afterwards only to
/// report how many records it holds.
#[derive(Debug, Clone, Copy)]
pub struct UpdatePackStrategy;

impl super::CommandStrategy for UpdatePackStrategy {
    type Input = UpdatePackInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;
        let source_url = resolve_source(input.source, &common.config)?;
        let out = input
            .out
            .unwrap_or_else(|| common.config.pack.out_file.clone());
        let delays: Vec<Duration> = common
            .config
            .update
            .retry_delays_secs
            .iter()
            .map(|secs| Duration::from_secs(*secs))
            .collect();

        info!("Downloading pack from {}", source_url);
        let bytes = retry_with_backoff(|| common.source.download(&source_url), &delays)
            .await
            .with_context(|| format!("Failed to download pack from {source_url}"))?;

        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&out, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", out.display()))?;

        match parse_pack(&bytes) {
            Ok(records) => info!("Pack holds {} raw records", records.len()),
            Err(e) => warn!("Downloaded file is not a usable pack: {e}"),
        }
        println!("Saved {} bytes to {}", bytes.len(), out.display());
        Ok(())
    }
}

/// `--source` wins over the configured URL (which already includes
/// `CARDEX_SOURCE_URL`). Placeholder URLs are refused rather than fetched.
fn resolve_source(flag: Option<String>, config: &Config) -> anyhow::Result<String> {
    match flag.or_else(|| config.pack.source_url.clone()) {
        Some(url) if !url.trim().is_empty() && !url.contains(PLACEHOLDER_HOST) => Ok(url),
        _ => anyhow::bail!(
            "No pack source configured. Pass --source, export {SOURCE_URL_ENV}, or set pack.source_url in the config"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_config() {
        let mut config = Config::default();
        config.pack.source_url = Some("https://configured.test/pack.json".to_string());

        let url = resolve_source(Some("https://flag.test/pack.json".to_string()), &config);
        assert_eq!(url.ok().as_deref(), Some("https://flag.test/pack.json"));

        let url = resolve_source(None, &config);
        assert_eq!(url.ok().as_deref(), Some("https://configured.test/pack.json"));
    }

    #[test]
    fn missing_or_placeholder_source_is_refused() {
        assert!(resolve_source(None, &Config::default()).is_err());
        assert!(resolve_source(None, &Config::template()).is_err());
        assert!(
            resolve_source(Some(format!("https://{PLACEHOLDER_HOST}/x.json")), &Config::default())
                .is_err()
        );
    }
}
