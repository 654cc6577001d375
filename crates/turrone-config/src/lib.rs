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

//! File-backed configuration facade for Turrone Server.
//!
//! Layout: `model.rs` (typed configuration document), `schema.rs` (creation
//! and PATCH-document validators), `patch.rs` (replace-merge of validated
//! operations), `store.rs` (on-disk artifact lifecycle), `service.rs`
//! (`ConfigService`, the create/update state machine), `pointer.rs`
//! (RFC 6901 JSON-Pointer helpers).

pub mod error;
pub mod model;
pub mod patch;
pub mod pointer;
pub mod schema;
pub mod service;
pub mod store;

pub use error::{ConfigError, ConfigResult, PersistenceError, SchemaViolation, VALIDATION_CATEGORY};
pub use model::{Configuration, DbConfig};
pub use patch::{PatchOp, PatchOperation, apply_patch};
pub use schema::{ALLOWED_PATCH_PATHS, parse_config, validate_patch_document};
pub use service::ConfigService;
pub use store::ConfigStore;
