//! Node discovery and health checking.

use std::time::{Duration, Instant};

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use cosign_types::{NetworkType, NodeId, NodeStatus, Timestamp};

use crate::client::NodeClient;
use crate::dto::NodeInfo;
use crate::error::ApiError;
use crate::transport::HttpTransport;

/// Metadata reported by `/node/info`, kept on the node record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    pub version: Option<u64>,
    pub public_key: Option<String>,
    pub network_generation_hash_seed: Option<String>,
    pub network_identifier: Option<u64>,
    pub roles: Option<u64>,
    pub host: Option<String>,
    pub friendly_name: Option<String>,
}

impl From<&NodeInfo> for NodeMetadata {
    fn from(info: &NodeInfo) -> Self {
        Self {
            version: info.version,
            public_key: info.public_key.clone(),
            network_generation_hash_seed: info.network_generation_hash_seed.clone(),
            network_identifier: Some(info.network_identifier),
            roles: info.roles,
            host: info.host.clone(),
            friendly_name: info.friendly_name.clone(),
        }
    }
}

/// One node to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthTarget {
    pub node_id: NodeId,
    pub url: String,
}

impl HealthTarget {
    pub fn new(node_id: NodeId, url: impl Into<String>) -> Self {
        Self {
            node_id,
            url: url.into(),
        }
    }
}

/// Outcome of a single health check. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckRecord {
    pub node_id: NodeId,
    pub status: NodeStatus,
    pub response_time_ms: Option<u64>,
    pub checked_at: Timestamp,
    pub error: Option<String>,
    pub metadata: Option<NodeMetadata>,
}

impl HealthCheckRecord {
    pub fn is_online(&self) -> bool {
        self.status == NodeStatus::Online
    }
}

impl<T: HttpTransport> NodeClient<T> {
    /// Ask a candidate endpoint which network it serves.
    ///
    /// Identifiers outside the known table are [`ApiError::UnsupportedNetwork`].
    pub async fn detect_network(
        &self,
        node_url: &str,
        timeout: Duration,
    ) -> Result<(NetworkType, NodeInfo), ApiError> {
        let info = self.node_info(node_url, timeout).await?;
        let network = NetworkType::from_identifier(info.network_identifier)
            .ok_or(ApiError::UnsupportedNetwork(info.network_identifier))?;
        tracing::debug!(url = node_url, %network, "network detected");
        Ok((network, info))
    }

    /// Probe one node. Always returns a record, stamped `checked_at`.
    pub async fn health_check(
        &self,
        target: &HealthTarget,
        timeout: Duration,
        checked_at: Timestamp,
    ) -> HealthCheckRecord {
        let started = Instant::now();
        let result = self.node_info(&target.url, timeout).await;

        match result {
            Ok(info) => HealthCheckRecord {
                node_id: target.node_id.clone(),
                status: NodeStatus::Online,
                response_time_ms: Some(started.elapsed().as_millis() as u64),
                checked_at,
                error: None,
                metadata: Some(NodeMetadata::from(&info)),
            },
            Err(e) => {
                tracing::warn!(node = %target.node_id, url = %target.url, error = %e, "health check failed");
                HealthCheckRecord {
                    node_id: target.node_id.clone(),
                    status: NodeStatus::Offline,
                    response_time_ms: None,
                    checked_at,
                    error: Some(e.to_string()),
                    metadata: None,
                }
            }
        }
    }

    /// Check every target concurrently. The output is index-aligned with
    /// `targets`.
    pub async fn batch_health_check(
        &self,
        targets: &[HealthTarget],
        timeout: Duration,
        checked_at: Timestamp,
    ) -> Vec<HealthCheckRecord> {
        let records =
            join_all(targets.iter().map(|t| self.health_check(t, timeout, checked_at))).await;
        let online = records.iter().filter(|r| r.is_online()).count();
        tracing::info!(total = records.len(), online, "batch health check complete");
        records
    }
}
