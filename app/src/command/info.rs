use cardex_config::{Config, PACK_ENV, SOURCE_URL_ENV};

/// Strategy for displaying the effective configuration.
///
/// Environment overrides are already applied, so this shows what the other
/// commands will actually use.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config_path = Config::config_path()?;
        let config = Config::load_or_default()?;

        println!("=== cardex Configuration ===\n");

        println!("Config File:");
        println!("  Path: {}", config_path.display());
        println!(
            "  Status: {}",
            if config_path.exists() {
                "found"
            } else {
                "missing (using defaults)"
            }
        );
        println!();

        println!("Pack:");
        println!("  Location: {}", config.pack.location);
        println!("  Out File: {}", config.pack.out_file.display());
        match (config.update_source(), &config.pack.source_url) {
            (Some(url), _) => println!("  Source URL: {url}"),
            (None, Some(url)) => println!("  Source URL: {url} (placeholder, not usable)"),
            (None, None) => println!("  Source URL: (not set)"),
        }
        println!("  Overrides: {PACK_ENV}, {SOURCE_URL_ENV}");
        println!();

        println!("Search:");
        println!("  Default Limit: {}", config.search.default_limit);
        println!("  Include Text: {}", config.search.include_text);
        println!();

        println!("Remote:");
        println!("  Raw URL Template: {}", config.remote.raw_url_template);
        println!("  Timeout: {}s", config.remote.timeout);
        println!("  User Agent: {}", config.remote.user_agent);
        println!("  Max Size: {} bytes", config.remote.max_size);
        println!("  System Proxy: {}", config.remote.use_system_proxy);
        println!();

        println!("Update:");
        println!("  Retry Delays: {:?}s", config.update.retry_delays_secs);

        Ok(())
    }
}
