//! Route handlers and router assembly.

pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod ping;
pub mod router;
pub(crate) mod status;

/// Prefix every server endpoint is mounted under.
pub const API_ROOT: &str = "/api/turrone/v1/server";
