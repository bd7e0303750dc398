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

//! Network and filesystem transport for card packs and raw records.

mod http;
mod location;
pub mod retry;

pub use http::{HttpCardSource, SourceConfig};
pub use location::PackLocation;
pub use retry::retry_with_backoff;
