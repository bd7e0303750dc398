//! Static strategy pattern for CLI commands.
//!
//! Each command is its own strategy type with its own input type, so
//! dispatch in `main` is fully static.

use anyhow::Context;
use cardex_config::Config;
use cardex_source::HttpCardSource;
use tracing::info;

mod info;
mod init;
mod search;
mod serve;
mod show;
mod update_pack;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use search::{SearchInput, SearchStrategy};
pub use serve::{ServeInput, ServeStrategy};
pub use show::{ShowInput, ShowStrategy};
pub use update_pack::{UpdatePackInput, UpdatePackStrategy};
pub use version::VersionStrategy;

/// Contract shared by all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Config plus the HTTP source built from it.
struct Common {
    config: Config,
    source: HttpCardSource,
}

fn init_common_components() -> anyhow::Result<Common> {
    let config = Config::load_or_default()?;
    let source = HttpCardSource::new(config.remote.clone())?;
    Ok(Common { config, source })
}

/// `--pack` wins over `CARDEX_PACK`, which was already folded into the
/// loaded config.
fn pack_location(flag: Option<String>, config: &Config) -> String {
    let location = flag.unwrap_or_else(|| config.pack.location.clone());
    info!("Using pack {}", location);
    location
}

/// Load `location` into a fresh index.
async fn load_index(common: &Common, location: &str) -> anyhow::Result<cardex_core::Index> {
    let normalizer = common.source.normalizer();
    let (index, report) = cardex_core::load_index(&common.source, location, normalizer)
        .await
        .with_context(|| format!("Failed to load pack from {location}"))?;
    info!(
        "Indexed {} cards ({} records, {} rejected)",
        index.len(),
        report.records,
        report.rejected
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_flag_overrides_config() {
        let config = Config::default();
        assert_eq!(
            pack_location(Some("https://cdn.test/pack.json".to_string()), &config),
            "https://cdn.test/pack.json"
        );
        assert_eq!(pack_location(None, &config), "data/edisonrulings.json");
    }
}
