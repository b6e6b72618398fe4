//! Injectable application state: both registries plus the selected network.
//!
//! Components receive an [`AppState`] explicitly; there are no globals, so
//! tests build isolated instances.

use std::time::Duration;

use cosign_client::{HealthCheckRecord, HttpTransport, NodeClient};
use cosign_registry::{
    validate_node_url, AddNodeParams, AddressRecord, AddressRegistry, NodeRecord, NodeRegistry,
};
use cosign_store::{KvStore, ADDRESSES_KEY, NETWORK_KEY, NODES_KEY};
use cosign_types::{NetworkType, NodeId, Timestamp};

use crate::signing::{ActiveNode, SigningContext};
use crate::CoreError;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub addresses: AddressRegistry,
    pub nodes: NodeRegistry,
}

impl AppState {
    pub fn new(network: NetworkType) -> Self {
        Self {
            addresses: AddressRegistry::new(),
            nodes: NodeRegistry::new(network),
        }
    }

    /// Load persisted state. Missing keys load as empty registries on
    /// `default_network`.
    pub fn load(store: &impl KvStore, default_network: NetworkType) -> Result<Self, CoreError> {
        let addresses: Vec<AddressRecord> = store.get_json(ADDRESSES_KEY)?.unwrap_or_default();
        let nodes: Vec<NodeRecord> = store.get_json(NODES_KEY)?.unwrap_or_default();
        let network: NetworkType = store.get_json(NETWORK_KEY)?.unwrap_or(default_network);

        tracing::debug!(
            addresses = addresses.len(),
            nodes = nodes.len(),
            %network,
            "state loaded"
        );
        Ok(Self {
            addresses: AddressRegistry::from_records(addresses),
            nodes: NodeRegistry::from_records(nodes, network),
        })
    }

    pub fn save(&self, store: &impl KvStore) -> Result<(), CoreError> {
        store.put_json(ADDRESSES_KEY, &self.addresses.records())?;
        store.put_json(NODES_KEY, &self.nodes.records())?;
        store.put_json(NETWORK_KEY, &self.nodes.current_network())?;
        Ok(())
    }

    pub fn network(&self) -> NetworkType {
        self.nodes.current_network()
    }

    /// Active address and the active node of the current network.
    pub fn signing_context(&self) -> SigningContext {
        SigningContext {
            active_address: self.addresses.active().map(|r| r.address.clone()),
            active_node: self.nodes.active().map(|n| ActiveNode {
                id: n.id.clone(),
                url: n.url.clone(),
                network: n.network,
            }),
        }
    }

    /// Health-check the nodes of `network` (all if `None`) and record the
    /// outcomes as checked at `now`.
    pub async fn refresh_health<T: HttpTransport>(
        &mut self,
        client: &NodeClient<T>,
        network: Option<NetworkType>,
        timeout: Duration,
        now: Timestamp,
    ) -> Vec<HealthCheckRecord> {
        let targets = self.nodes.health_targets(network);
        let records = client.batch_health_check(&targets, timeout, now).await;
        for record in &records {
            if let Err(e) = self.nodes.apply_health(record) {
                tracing::warn!(node = %record.node_id, error = %e, "health result for unknown node");
            }
        }
        records
    }

    /// Validate `url`, ask it which network it serves, then register it
    /// under that network.
    pub async fn add_detected_node<T: HttpTransport>(
        &mut self,
        client: &NodeClient<T>,
        url: &str,
        memo: &str,
        active: bool,
        timeout: Duration,
        now: Timestamp,
    ) -> Result<NodeId, CoreError> {
        validate_node_url(url).map_err(cosign_registry::RegistryError::from)?;
        let (network, info) = client.detect_network(url, timeout).await?;
        let record = self.nodes.add(
            AddNodeParams {
                url: url.to_string(),
                network,
                memo: memo.to_string(),
                active,
            },
            now,
        )?;
        let id = record.id.clone();
        tracing::info!(node = %id, %network, friendly_name = ?info.friendly_name, "node detected and added");
        Ok(id)
    }
}
