//! Migration 52: key per-account token lists by chain id
//!
//! `accountTokens` and `accountHiddenTokens` used to be keyed by network
//! label, with every user-added network sharing a single custom RPC slot.
//! After this migration each known label is replaced by its chain id, and
//! the custom RPC list is copied into the slot of every saved RPC whose
//! chain id is known, merged with whatever that slot already holds.

use super::{Migration, MigrationVersion};
use crate::error::{MigrationError, Result};
use crate::network::NetworkTable;
use crate::state::VersionedState;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

pub const PREFERENCES_CONTROLLER: &str = "PreferencesController";
pub const ACCOUNT_TOKENS: &str = "accountTokens";
pub const ACCOUNT_HIDDEN_TOKENS: &str = "accountHiddenTokens";
pub const FREQUENT_RPC_LIST_DETAIL: &str = "frequentRpcListDetail";

/// Rekeys token lists from network labels to chain ids
pub struct ChainIdTokensMigration {
    networks: Arc<NetworkTable>,
}

impl ChainIdTokensMigration {
    pub const VERSION: MigrationVersion = 52;

    pub fn new(networks: Arc<NetworkTable>) -> Self {
        Self { networks }
    }

    fn transform_state(&self, data: &mut Value) -> Result<()> {
        let Some(preferences) = data
            .as_object_mut()
            .and_then(|controllers| controllers.get_mut(PREFERENCES_CONTROLLER))
            .and_then(Value::as_object_mut)
        else {
            return Ok(());
        };

        // Only needed when an account has a custom RPC list, so a bad
        // frequentRpcListDetail is reported lazily.
        let rpc_chain_ids = self.saved_rpc_chain_ids(preferences.get(FREQUENT_RPC_LIST_DETAIL));

        for field in [ACCOUNT_TOKENS, ACCOUNT_HIDDEN_TOKENS] {
            let Some(slot) = preferences.get_mut(field) else {
                continue;
            };
            match &*slot {
                Value::Object(accounts) if !accounts.is_empty() => {}
                Value::Object(_) | Value::Null => continue,
                other => return Err(MigrationError::unexpected_type(field, "an object", other)),
            }
            let Value::Object(accounts) = std::mem::take(slot) else {
                continue;
            };
            *slot = Value::Object(self.rekey_accounts(field, accounts, &rpc_chain_ids)?);
        }

        Ok(())
    }

    /// Known chain ids of the saved RPC entries, in list order
    fn saved_rpc_chain_ids(&self, details: Option<&Value>) -> Result<Vec<String>> {
        match details {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(details)) => Ok(details
                .iter()
                .filter_map(|detail| detail.get("chainId").and_then(Value::as_str))
                .filter(|chain_id| self.networks.is_known_chain_id(chain_id))
                .map(str::to_string)
                .collect()),
            Some(other) => Err(MigrationError::unexpected_type(
                FREQUENT_RPC_LIST_DETAIL,
                "an array",
                other,
            )),
        }
    }

    fn rekey_accounts(
        &self,
        field: &str,
        accounts: Map<String, Value>,
        rpc_chain_ids: &Result<Vec<String>>,
    ) -> Result<Map<String, Value>> {
        let mut rekeyed = Map::new();

        for (account, networks) in accounts {
            let networks = match networks {
                Value::Object(networks) => networks,
                other => {
                    return Err(MigrationError::unexpected_type(
                        &format!("{}.{}", field, account),
                        "an object",
                        &other,
                    ))
                }
            };
            let by_chain_id = self.rekey_account(field, &account, networks, rpc_chain_ids)?;
            debug!(
                field,
                account = %account,
                slots = by_chain_id.len(),
                "Rekeyed account tokens by chain id"
            );
            rekeyed.insert(account, Value::Object(by_chain_id));
        }

        Ok(rekeyed)
    }

    fn rekey_account(
        &self,
        field: &str,
        account: &str,
        networks: Map<String, Value>,
        rpc_chain_ids: &Result<Vec<String>>,
    ) -> Result<Map<String, Value>> {
        let mut by_chain_id = Map::new();
        let mut custom_rpc = None;

        for (key, tokens) in networks {
            if self.networks.is_custom_rpc_marker(&key) {
                custom_rpc = Some(tokens);
            } else if let Some(chain_id) = self.networks.chain_id_for(&key) {
                by_chain_id.insert(chain_id.to_string(), tokens);
            } else if self.networks.is_known_chain_id(&key) {
                // Already migrated; a label for the same chain wins.
                by_chain_id.entry(key).or_insert(tokens);
            } else {
                debug!(field, account, key = %key, "Dropping tokens under unknown network key");
            }
        }

        let custom_tokens = match custom_rpc {
            None | Some(Value::Null) => return Ok(by_chain_id),
            Some(Value::Array(tokens)) => tokens,
            Some(other) => {
                return Err(MigrationError::unexpected_type(
                    &format!("{}.{}.{}", field, account, self.networks.custom_rpc_marker),
                    "an array",
                    &other,
                ))
            }
        };

        let chain_ids = rpc_chain_ids.as_ref().map_err(Clone::clone)?;
        if chain_ids.is_empty() {
            debug!(field, account, "No saved RPC matches a known chain, dropping custom RPC tokens");
        }

        for chain_id in chain_ids {
            match by_chain_id.get_mut(chain_id) {
                Some(Value::Array(existing)) => {
                    let merged =
                        unique_by_address(existing.drain(..).chain(custom_tokens.iter().cloned()));
                    *existing = merged;
                }
                _ => {
                    by_chain_id.insert(chain_id.clone(), Value::Array(custom_tokens.clone()));
                }
            }
        }

        Ok(by_chain_id)
    }
}

/// Keep the first token seen for each `address`
fn unique_by_address(tokens: impl IntoIterator<Item = Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|token| seen.insert(token.get("address").map(Value::to_string)))
        .collect()
}

impl Migration for ChainIdTokensMigration {
    fn version(&self) -> MigrationVersion {
        Self::VERSION
    }

    fn name(&self) -> &str {
        "chain_id_tokens"
    }

    fn description(&self) -> &str {
        "Key account tokens by chain id instead of network label"
    }

    fn migrate(&self, original: &VersionedState) -> Result<VersionedState> {
        let mut state = original.clone();
        state.metadata.version = Self::VERSION;
        self.transform_state(&mut state.data)?;
        Ok(state)
    }
}
