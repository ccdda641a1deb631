//! Engine configuration

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use types::ids::ClientId;

/// Static engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Clients exempt from funds checks and reservations (internal
    /// market makers whose balances are managed elsewhere)
    pub trusted_clients: HashSet<ClientId>,
    /// Include orders cancelled by a batch's cancel-previous phase in
    /// that batch's report
    pub report_cancelled_in_batch: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trusted_clients: HashSet::new(),
            report_cancelled_in_batch: true,
        }
    }
}

impl EngineConfig {
    pub fn is_trusted(&self, client: &ClientId) -> bool {
        self.trusted_clients.contains(client)
    }
}
