//! REST client for a Symbol-compatible node.
//!
//! - [`HttpTransport`] is the I/O seam; [`ReqwestTransport`] is the real one
//! - [`NodeClient`] bounds every call by a timeout and classifies HTTP statuses
//! - Discovery: [`NodeClient::detect_network`], [`NodeClient::health_check`],
//!   [`NodeClient::batch_health_check`]
//! - Pending transactions: [`NodeClient::fetch_pending`]
//! - Announce: [`NodeClient::announce_cosignature`]

pub mod client;
pub mod discovery;
pub mod dto;
pub mod error;
pub mod transactions;
pub mod transport;

pub use client::{NodeClient, DEFAULT_TIMEOUT};
pub use discovery::{HealthCheckRecord, HealthTarget, NodeMetadata};
pub use dto::NodeInfo;
pub use error::ApiError;
pub use transactions::{
    DisplayTransaction, FetchParams, SortOrder, TransactionPage, AGGREGATE_BONDED_TYPE,
};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
