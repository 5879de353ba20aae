//! Migration runner - applies registered migrations in version order

use super::{ChainIdTokensMigration, Migration, MigrationVersion};
use crate::error::{MigrationError, Result};
use crate::network::NetworkTable;
use crate::state::VersionedState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Record of an applied migration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub version: MigrationVersion,
    pub name: String,
    pub applied_at: DateTime<Utc>,
    /// Hex SHA-256 of the migrated `data`
    pub checksum: String,
}

/// Result of running pending migrations
#[derive(Clone, Debug)]
pub struct MigrationOutcome {
    pub state: VersionedState,
    pub applied: Vec<MigrationRecord>,
}

impl MigrationOutcome {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Migration runner - manages and executes migrations
#[derive(Default)]
pub struct MigrationRunner {
    migrations: BTreeMap<MigrationVersion, Box<dyn Migration>>,
}

impl MigrationRunner {
    /// Create an empty runner
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with every migration shipped in this crate
    pub fn builtin(networks: Arc<NetworkTable>) -> Self {
        let mut runner = Self::new();
        runner.register(Box::new(ChainIdTokensMigration::new(networks)));
        runner
    }

    /// Register a migration
    pub fn register(&mut self, migration: Box<dyn Migration>) {
        let version = migration.version();
        if self.migrations.contains_key(&version) {
            warn!("Migration version {} already registered, skipping", version);
            return;
        }
        info!(
            description = migration.description(),
            "Registered migration {}: {}",
            version,
            migration.name()
        );
        self.migrations.insert(version, migration);
    }

    /// Highest registered version, 0 when nothing is registered
    pub fn latest_version(&self) -> MigrationVersion {
        self.migrations.keys().next_back().copied().unwrap_or(0)
    }

    /// Versions newer than `current`, ascending
    pub fn pending_migrations(&self, current: MigrationVersion) -> Vec<MigrationVersion> {
        self.migrations
            .range(current.saturating_add(1)..)
            .map(|(version, _)| *version)
            .collect()
    }

    /// Run every pending migration up to and including `target`
    /// (latest when `None`). The input document is never modified.
    pub fn run_pending(
        &self,
        state: &VersionedState,
        target: Option<MigrationVersion>,
    ) -> Result<MigrationOutcome> {
        let current = state.version();
        let target = target.unwrap_or_else(|| self.latest_version());

        if current > self.latest_version() {
            warn!(
                current,
                latest = self.latest_version(),
                "State is newer than every known migration, leaving it untouched"
            );
        }

        let pending: Vec<MigrationVersion> = self
            .pending_migrations(current)
            .into_iter()
            .filter(|&v| v <= target)
            .collect();

        if pending.is_empty() {
            info!("No pending migrations");
            return Ok(MigrationOutcome {
                state: state.clone(),
                applied: Vec::new(),
            });
        }

        info!("Running {} pending migrations", pending.len());
        let mut migrated = state.clone();
        let mut applied = Vec::with_capacity(pending.len());

        for version in pending {
            let Some(migration) = self.migrations.get(&version) else {
                continue;
            };
            info!("Running migration {}: {}", version, migration.name());

            migrated = migration.migrate(&migrated)?;

            if migrated.version() != version {
                return Err(MigrationError::VersionMismatch {
                    expected: version,
                    actual: migrated.version(),
                });
            }

            let record = MigrationRecord {
                version,
                name: migration.name().to_string(),
                applied_at: Utc::now(),
                checksum: Self::calculate_checksum(&migrated)?,
            };
            info!(
                version,
                checksum = %record.checksum,
                "Migration {} completed",
                version
            );
            applied.push(record);
        }

        Ok(MigrationOutcome {
            state: migrated,
            applied,
        })
    }

    /// Calculate checksum of a migrated document's data
    fn calculate_checksum(state: &VersionedState) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(&state.data)?);
        Ok(hex::encode(hasher.finalize()))
    }
}
