#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! HTTP surface of Turrone Server.
//!
//! Hosts the versioned server endpoints under `/api/turrone/v1/server`:
//! `ping` (liveness), `status` (component health snapshot), and `config`
//! (one-time creation and partial update of the server configuration).

pub mod http;
pub mod models;
mod state;

pub use http::router::ApiServer;
pub use state::ApiState;
