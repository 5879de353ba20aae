//! Migrator Configuration
//!
//! Loaded from an optional TOML file:
//!
//! ```toml
//! target_version = 52
//! pretty = true
//!
//! [networks]
//! custom_rpc_marker = "rpc"
//!
//! [networks.chain_ids]
//! mainnet = "0x1"
//! ```

use crate::error::Result;
use crate::migration::MigrationVersion;
use crate::network::NetworkTable;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete migrator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigratorConfig {
    /// Stop after this version (latest when unset)
    pub target_version: Option<MigrationVersion>,
    /// Pretty-print the migrated document
    pub pretty: bool,
    /// Known networks and custom RPC marker
    pub networks: NetworkTable,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            target_version: None,
            pretty: true,
            networks: NetworkTable::default(),
        }
    }
}

impl MigratorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: MigratorConfig = toml::from_str(s)?;
        config.networks.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}
