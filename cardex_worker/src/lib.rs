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

//! Session boundary for the card index.
//!
//! A single worker task owns the index. Callers talk to it through a
//! [`WorkerHandle`] using the [`Request`]/[`Response`] protocol, either
//! in-process or as JSON lines via [`serve`].

mod protocol;
mod serve;
mod worker;

pub use protocol::{IdPayload, InitPayload, Request, Response, SearchPayload};
pub use serve::serve;
pub use worker::{WorkerError, WorkerHandle, WorkerSettings};
