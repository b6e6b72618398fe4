//! Cosigner core.
//!
//! - [`CosignerConfig`]: TOML configuration with serde defaults
//! - [`AppState`]: the address and node registries, persisted through any
//!   [`cosign_store::KvStore`]
//! - [`SigningOrchestrator`]: the cosigning state machine

pub mod app;
pub mod config;
pub mod error;
pub mod signing;

pub use app::AppState;
pub use config::CosignerConfig;
pub use error::CoreError;
pub use signing::{
    ActiveNode, Requirement, SigningContext, SigningError, SigningOrchestrator, SigningState,
    SigningStatus,
};
