//! Versioned migrations for persisted state documents
//!
//! Each migration takes the document produced by its predecessor and
//! returns a new document stamped with its own version. Migrations never
//! mutate their input.
//!
//! ```text
//! use state_migrations::{MigrationRunner, NetworkTable};
//!
//! let runner = MigrationRunner::builtin(Arc::new(NetworkTable::default()));
//! let outcome = runner.run_pending(&state, None)?;
//! ```

mod chain_id_tokens;
mod runner;

pub use chain_id_tokens::ChainIdTokensMigration;
pub use runner::{MigrationOutcome, MigrationRecord, MigrationRunner};

use crate::error::Result;
use crate::state::VersionedState;

/// Migration version number
pub type MigrationVersion = u64;

/// Migration trait - implement this for each migration
pub trait Migration: Send + Sync {
    /// Unique version number (must be sequential)
    fn version(&self) -> MigrationVersion;

    /// Human-readable name for this migration
    fn name(&self) -> &str;

    /// Description of what this migration does
    fn description(&self) -> &str {
        ""
    }

    /// Produce the migrated document. The result must carry `self.version()`.
    fn migrate(&self, original: &VersionedState) -> Result<VersionedState>;
}
