//! Node registry: known REST endpoints, at most one active per network.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use cosign_client::{HealthCheckRecord, HealthTarget, NodeMetadata};
use cosign_types::{ConnectionQuality, NetworkType, NodeId, NodeStatus, Timestamp};

use crate::error::RegistryError;
use crate::presets::PRESET_NODES;
use crate::validation::{
    compute_node_id, evaluate_quality, normalize_url, quality_priority, status_priority,
    validate_node_url,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeId,
    pub url: String,
    pub network: NetworkType,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub memo: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub last_used_at: Option<Timestamp>,
    /// Seeded from the built-in list rather than entered by the operator.
    #[serde(default)]
    pub preset: bool,
    #[serde(default)]
    pub metadata: NodeMetadata,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
    #[serde(default)]
    pub last_checked_at: Option<Timestamp>,
    #[serde(default)]
    pub last_error: Option<String>,
}

impl NodeRecord {
    pub fn quality(&self) -> ConnectionQuality {
        evaluate_quality(self.response_time_ms)
    }

    pub fn health_target(&self) -> HealthTarget {
        HealthTarget::new(self.id.clone(), self.url.clone())
    }
}

#[derive(Debug, Clone)]
pub struct AddNodeParams {
    pub url: String,
    pub network: NetworkType,
    pub memo: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateNodeParams {
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    pub network: Option<NetworkType>,
    pub active_only: bool,
    /// Case-insensitive substring over memo, URL and friendly name.
    pub search: Option<String>,
}

impl NodeFilter {
    fn matches(&self, record: &NodeRecord) -> bool {
        if self.network.is_some_and(|n| n != record.network) {
            return false;
        }
        if self.active_only && !record.active {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                record.memo.to_lowercase().contains(&needle)
                    || record.url.contains(&needle)
                    || record
                        .metadata
                        .friendly_name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Presentation order: status, then quality, then latency, then URL.
fn presentation_order(a: &NodeRecord, b: &NodeRecord) -> Ordering {
    status_priority(a.status)
        .cmp(&status_priority(b.status))
        .then_with(|| quality_priority(a.quality()).cmp(&quality_priority(b.quality())))
        .then_with(|| match (a.response_time_ms, b.response_time_ms) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.url.cmp(&b.url))
}

#[derive(Debug, Clone)]
pub struct NodeRegistry {
    records: Vec<NodeRecord>,
    current_network: NetworkType,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new(NetworkType::Mainnet)
    }
}

impl NodeRegistry {
    pub fn new(current_network: NetworkType) -> Self {
        Self {
            records: Vec::new(),
            current_network,
        }
    }

    /// Rebuild from persisted records, dropping duplicate ids and clearing
    /// extra active flags per network.
    pub fn from_records(records: Vec<NodeRecord>, current_network: NetworkType) -> Self {
        let mut registry = Self::new(current_network);
        for mut record in records {
            if registry.get(&record.id).is_some() {
                tracing::warn!(node = %record.id, "dropping duplicate persisted node");
                continue;
            }
            if record.active && registry.active_for(record.network).is_some() {
                tracing::warn!(node = %record.id, "clearing extra active flag");
                record.active = false;
            }
            registry.records.push(record);
        }
        registry
    }

    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &NodeId) -> Option<&NodeRecord> {
        self.records.iter().find(|r| r.id == *id)
    }

    pub fn current_network(&self) -> NetworkType {
        self.current_network
    }

    pub fn active_for(&self, network: NetworkType) -> Option<&NodeRecord> {
        self.records.iter().find(|r| r.active && r.network == network)
    }

    /// Active node of the current network.
    pub fn active(&self) -> Option<&NodeRecord> {
        self.active_for(self.current_network)
    }

    pub fn add(&mut self, params: AddNodeParams, now: Timestamp) -> Result<&NodeRecord, RegistryError> {
        self.insert(params, false, now)
    }

    fn insert(&mut self, params: AddNodeParams, preset: bool, now: Timestamp) -> Result<&NodeRecord, RegistryError> {
        validate_node_url(&params.url)?;
        let url = normalize_url(&params.url);
        let id = compute_node_id(&url, params.network);
        if self.get(&id).is_some() {
            return Err(RegistryError::DuplicateNode {
                url,
                network: params.network,
            });
        }
        if params.active {
            self.deactivate_network(params.network);
        }

        tracing::info!(node = %id, %url, network = %params.network, preset, "node added");
        self.records.push(NodeRecord {
            id,
            url,
            network: params.network,
            active: params.active,
            memo: params.memo.trim().to_string(),
            created_at: now,
            last_used_at: None,
            preset,
            metadata: NodeMetadata::default(),
            status: NodeStatus::Unknown,
            response_time_ms: None,
            last_checked_at: None,
            last_error: None,
        });
        let last = self.records.len() - 1;
        Ok(&self.records[last])
    }

    pub fn update(
        &mut self,
        id: &NodeId,
        params: UpdateNodeParams,
        now: Timestamp,
    ) -> Result<&NodeRecord, RegistryError> {
        let record = self.get_mut(id)?;
        if let Some(memo) = params.memo {
            record.memo = memo.trim().to_string();
        }
        record.last_used_at = Some(now);
        Ok(record)
    }

    /// Remove a node. If it was active its network is left without one.
    pub fn remove(&mut self, id: &NodeId) -> Result<NodeRecord, RegistryError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == *id)
            .ok_or_else(|| RegistryError::NodeNotFound(id.clone()))?;
        let removed = self.records.remove(index);
        tracing::info!(node = %id, url = %removed.url, was_active = removed.active, "node removed");
        Ok(removed)
    }

    /// Activate `id`, deactivating only the other nodes of its network.
    pub fn set_active(&mut self, id: &NodeId, now: Timestamp) -> Result<&NodeRecord, RegistryError> {
        let network = self.get_mut(id)?.network;
        self.deactivate_network(network);
        let record = self.get_mut(id)?;
        record.active = true;
        record.last_used_at = Some(now);
        tracing::info!(node = %id, %network, "node activated");
        Ok(record)
    }

    pub fn list(&self, filter: &NodeFilter) -> Vec<&NodeRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Nodes of `network` (all networks if `None`) in presentation order.
    pub fn sorted(&self, network: Option<NetworkType>) -> Vec<&NodeRecord> {
        let mut nodes = self.list(&NodeFilter {
            network,
            ..Default::default()
        });
        nodes.sort_by(|a, b| presentation_order(a, b));
        nodes
    }

    pub fn health_targets(&self, network: Option<NetworkType>) -> Vec<HealthTarget> {
        self.records
            .iter()
            .filter(|r| network.map_or(true, |n| n == r.network))
            .map(NodeRecord::health_target)
            .collect()
    }

    /// Make `network` current. If it has no active node, the best online node
    /// of that network is activated; offline and unchecked nodes never are.
    pub fn switch_active_network(&mut self, network: NetworkType, now: Timestamp) -> Option<&NodeRecord> {
        if self.current_network != network {
            tracing::info!(from = %self.current_network, to = %network, "switching network");
        }
        self.current_network = network;

        if self.active_for(network).is_none() {
            let candidate = self
                .sorted(Some(network))
                .into_iter()
                .find(|r| r.status == NodeStatus::Online)
                .map(|r| r.id.clone());
            if let Some(id) = candidate {
                // The id was just read from the registry.
                let _ = self.set_active(&id, now);
            }
        }
        self.active_for(network)
    }

    /// Seed the built-in endpoints unless a preset node is already present.
    ///
    /// The first preset of a network is activated only when that network has
    /// no active node yet. Returns the number of nodes added.
    pub fn bootstrap_presets(&mut self, now: Timestamp) -> usize {
        if self.records.iter().any(|r| r.preset) {
            return 0;
        }

        let mut added = 0;
        for preset in PRESET_NODES {
            let activate = self.active_for(preset.network).is_none();
            let params = AddNodeParams {
                url: preset.url.to_string(),
                network: preset.network,
                memo: preset.memo.to_string(),
                active: activate,
            };
            match self.insert(params, true, now).map(|_| ()) {
                Ok(_) => added += 1,
                Err(RegistryError::DuplicateNode { .. }) => {
                    // Operator already added this endpoint; adopt it as a preset.
                    let id = compute_node_id(preset.url, preset.network);
                    if let Ok(record) = self.get_mut(&id) {
                        record.preset = true;
                    }
                    if activate {
                        // The id was just found as a duplicate.
                        let _ = self.set_active(&id, now);
                    }
                }
                Err(e) => tracing::warn!(url = preset.url, error = %e, "skipping preset"),
            }
        }
        tracing::info!(added, "preset nodes bootstrapped");
        added
    }

    /// Merge a health-check outcome into its node.
    ///
    /// Offline results keep the previously discovered metadata.
    pub fn apply_health(&mut self, check: &HealthCheckRecord) -> Result<(), RegistryError> {
        let record = self.get_mut(&check.node_id)?;
        record.status = check.status;
        record.response_time_ms = check.response_time_ms;
        record.last_checked_at = Some(check.checked_at);
        record.last_error = check.error.clone();
        if let Some(metadata) = &check.metadata {
            record.metadata = metadata.clone();
        }
        Ok(())
    }

    fn get_mut(&mut self, id: &NodeId) -> Result<&mut NodeRecord, RegistryError> {
        self.records
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| RegistryError::NodeNotFound(id.clone()))
    }

    fn deactivate_network(&mut self, network: NetworkType) {
        for record in self.records.iter_mut().filter(|r| r.network == network) {
            record.active = false;
        }
    }
}
