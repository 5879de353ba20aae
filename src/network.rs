//! Network label to chain id lookup table
//!
//! Older state documents keyed per-account data by a symbolic network label
//! (`mainnet`, `ropsten`, ...) or by a single generic custom RPC marker.
//! The table is built once at startup and shared read-only between
//! migrations.

use crate::error::{MigrationError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MAINNET: &str = "mainnet";
pub const ROPSTEN: &str = "ropsten";
pub const RINKEBY: &str = "rinkeby";
pub const GOERLI: &str = "goerli";
pub const KOVAN: &str = "kovan";

pub const MAINNET_CHAIN_ID: &str = "0x1";
pub const ROPSTEN_CHAIN_ID: &str = "0x3";
pub const RINKEBY_CHAIN_ID: &str = "0x4";
pub const GOERLI_CHAIN_ID: &str = "0x5";
pub const KOVAN_CHAIN_ID: &str = "0x2a";

/// Key under which tokens for any user-added network used to be stored
pub const NETWORK_TYPE_RPC: &str = "rpc";

/// Known networks and the generic custom RPC marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkTable {
    /// Key used for custom RPC networks
    pub custom_rpc_marker: String,
    /// Network label -> chain id, in lookup order
    pub chain_ids: IndexMap<String, String>,
}

impl Default for NetworkTable {
    fn default() -> Self {
        let chain_ids = [
            (MAINNET, MAINNET_CHAIN_ID),
            (ROPSTEN, ROPSTEN_CHAIN_ID),
            (RINKEBY, RINKEBY_CHAIN_ID),
            (GOERLI, GOERLI_CHAIN_ID),
            (KOVAN, KOVAN_CHAIN_ID),
        ]
        .into_iter()
        .map(|(label, id)| (label.to_string(), id.to_string()))
        .collect();

        Self {
            custom_rpc_marker: NETWORK_TYPE_RPC.to_string(),
            chain_ids,
        }
    }
}

impl NetworkTable {
    /// Chain id for a known network label
    pub fn chain_id_for(&self, label: &str) -> Option<&str> {
        self.chain_ids.get(label).map(String::as_str)
    }

    /// Whether `chain_id` belongs to one of the known networks
    pub fn is_known_chain_id(&self, chain_id: &str) -> bool {
        self.chain_ids.values().any(|id| id == chain_id)
    }

    pub fn is_custom_rpc_marker(&self, key: &str) -> bool {
        self.custom_rpc_marker == key
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.chain_ids.keys().map(String::as_str)
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = &str> {
        self.chain_ids.values().map(String::as_str)
    }

    /// Check the table is usable as a one-to-one label/chain id mapping
    pub fn validate(&self) -> Result<()> {
        if self.chain_ids.is_empty() {
            return Err(MigrationError::InvalidConfig(
                "network table is empty".to_string(),
            ));
        }
        if self.custom_rpc_marker.is_empty() {
            return Err(MigrationError::InvalidConfig(
                "custom RPC marker is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for (label, chain_id) in &self.chain_ids {
            if label.is_empty() || chain_id.is_empty() {
                return Err(MigrationError::InvalidConfig(format!(
                    "network '{}' has an empty label or chain id",
                    label
                )));
            }
            if label == &self.custom_rpc_marker {
                return Err(MigrationError::InvalidConfig(format!(
                    "network label '{}' collides with the custom RPC marker",
                    label
                )));
            }
            if !seen.insert(chain_id.as_str()) {
                return Err(MigrationError::InvalidConfig(format!(
                    "chain id {} is assigned to more than one network",
                    chain_id
                )));
            }
        }

        Ok(())
    }
}
