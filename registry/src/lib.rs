//! Registries of account addresses and node endpoints.
//!
//! - [`AddressRegistry`]: normalized, unique addresses; at most one active overall
//! - [`NodeRegistry`]: validated https endpoints; at most one active per network,
//!   health metadata, preset bootstrap and network switching
//! - [`validation`]: the pure checks both registries rely on

pub mod address;
pub mod error;
pub mod node;
pub mod presets;
pub mod validation;

pub use address::{AddAddressParams, AddressFilter, AddressRecord, AddressRegistry, UpdateAddressParams};
pub use error::{RegistryError, ValidationError};
pub use node::{AddNodeParams, NodeFilter, NodeRecord, NodeRegistry, UpdateNodeParams};
pub use presets::{PresetNode, PRESET_NODES};
pub use validation::{
    compute_node_id, evaluate_quality, normalize_url, quality_priority, status_priority,
    validate_address_format, validate_node_url,
};
