//! Versioned state document
//!
//! The persisted document is `{ "meta": { "version": n, ... }, "data": { ... } }`
//! where `data` maps controller names to opaque controller state.

use crate::error::Result;
use crate::migration::MigrationVersion;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;

/// Document metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateMetadata {
    /// Version of the last migration applied to `data`
    pub version: MigrationVersion,
    /// Fields this crate does not interpret, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A state document tagged with its migration version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedState {
    #[serde(rename = "meta")]
    pub metadata: StateMetadata,
    /// Controller name -> controller state. `null` when absent.
    #[serde(default)]
    pub data: Value,
}

impl VersionedState {
    pub fn new(version: MigrationVersion, data: Value) -> Self {
        Self {
            metadata: StateMetadata {
                version,
                extra: Map::new(),
            },
            data,
        }
    }

    pub fn version(&self) -> MigrationVersion {
        self.metadata.version
    }

    /// State of a single controller, if `data` is an object holding it
    pub fn controller(&self, name: &str) -> Option<&Value> {
        self.data.as_object().and_then(|data| data.get(name))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let s = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(s)
    }
}
