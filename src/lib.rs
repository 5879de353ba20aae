//! Versioned migrations for persisted wallet state documents
//!
//! A state document carries a `meta.version` and a `data` tree keyed by
//! controller name. Each migration rewrites part of `data` and stamps the
//! document with its own version; the runner applies them in order.
//!
//! ## Module Structure
//!
//! - `state`: the versioned document
//! - `network`: network label -> chain id table
//! - `migration`: the `Migration` trait, shipped migrations and the runner
//! - `config`: TOML configuration for the binary
//! - `error`: error types

pub mod config;
pub mod error;
pub mod migration;
pub mod network;
pub mod state;

pub use config::MigratorConfig;
pub use error::{MigrationError, Result};
pub use migration::{
    ChainIdTokensMigration, Migration, MigrationOutcome, MigrationRecord, MigrationRunner,
    MigrationVersion,
};
pub use network::NetworkTable;
pub use state::{StateMetadata, VersionedState};
