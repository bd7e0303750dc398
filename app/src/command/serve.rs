use cardex_worker::{Response, WorkerHandle, WorkerSettings, serve};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};

use super::init_common_components;

/// Input parameters for the Serve command strategy.
#[derive(Debug, Clone)]
pub struct ServeInput {
    /// Pack to load before the first request is read
    pub pack: Option<String>,
}

/// Strategy for running the worker behind a JSON-lines stdin/stdout loop.
#[derive(Debug, Clone, Copy)]
pub struct ServeStrategy;

impl super::CommandStrategy for ServeStrategy {
    type Input = ServeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components()?;
        let settings = WorkerSettings {
            normalizer: common.source.normalizer().clone(),
            default_limit: common.config.search.default_limit,
            ..WorkerSettings::default()
        };
        let (handle, worker) = WorkerHandle::spawn(Arc::new(common.source), settings);

        if let Some(pack) = input.pack {
            match handle.init(pack).await {
                Response::Ready { count, elapsed_ms } => {
                    info!("Preloaded {} cards in {}ms", count, elapsed_ms);
                }
                other => warn!("Preload failed: {:?}", other),
            }
        }

        serve(
            handle,
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
        )
        .await?;

        worker.await?;
        Ok(())
    }
}
