#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::FmtSubscriber;

mod command;

use command::{
    CommandStrategy, InfoStrategy, InitStrategy, SearchInput, SearchStrategy, ServeInput,
    ServeStrategy, ShowInput, ShowStrategy, UpdatePackInput, UpdatePackStrategy,
    VersionStrategy,
};

#[derive(Parser)]
#[command(name = "cardex")]
#[command(about = "Card ruling search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search cards by name (optionally by text)
    Search {
        /// Query; every whitespace-separated token must match
        query: String,

        /// Maximum number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Also match card text
        #[arg(short = 't', long)]
        text: bool,

        /// Pack location (URL or path), overrides config and CARDEX_PACK
        #[arg(short = 'p', long)]
        pack: Option<String>,
    },
    /// Show full detail for one card
    Show {
        /// Card id
        id: u64,

        /// Re-fetch the card from upstream before showing it
        #[arg(short = 'r', long)]
        refresh: bool,

        /// Pack location (URL or path), overrides config and CARDEX_PACK
        #[arg(short = 'p', long)]
        pack: Option<String>,
    },
    /// Answer JSON-line requests on stdin/stdout
    Serve {
        /// Load this pack before reading requests
        #[arg(short = 'p', long)]
        pack: Option<String>,
    },
    /// Download the upstream pack to disk
    UpdatePack {
        /// Source URL, overrides config and CARDEX_SOURCE_URL
        #[arg(short = 's', long)]
        source: Option<String>,

        /// Output file, overrides pack.out_file
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },
    /// Initialize configuration
    Init,
    /// Show configuration
    Info,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries command output and the serve protocol
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            limit,
            text,
            pack,
        } => {
            SearchStrategy
                .execute(SearchInput {
                    query,
                    limit,
                    include_text: text,
                    pack,
                })
                .await
        }
        Commands::Show { id, refresh, pack } => {
            ShowStrategy
                .execute(ShowInput { id, refresh, pack })
                .await
        }
        Commands::Serve { pack } => ServeStrategy.execute(ServeInput { pack }).await,
        Commands::UpdatePack { source, out } => {
            UpdatePackStrategy
                .execute(UpdatePackInput { source, out })
                .await
        }
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
