//! Signing orchestrator.
//!
//! A single state machine sequences one cosigning attempt at a time:
//!
//! ```text
//! idle ──► signing ──► announcing ──► success
//!   │         │             │
//!   └─────────┴─────────────┴──────► error
//! ```
//!
//! `success` and `error` are terminal until [`SigningOrchestrator::reset`]
//! (or the start of the next attempt) returns the machine to `idle`.
//!
//! The private key arrives as a [`Zeroizing`] string and is consumed by the
//! synchronous signing step; it is wiped before the announce request is sent.
//! Every attempt carries a generation number so that a reset, or a dropped
//! attempt, can never be overwritten by a late completion.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use thiserror::Error;
use zeroize::Zeroizing;

use cosign_client::{ApiError, HttpTransport, NodeClient};
use cosign_crypto::{derive_address, derive_public_key, sign_cosignature, CryptoError};
use cosign_types::{
    Address, DetachedCosignature, ErrorKind, NetworkType, NodeId, PrivateKey, Timestamp, TxHash,
};
use cosign_utils::{Clock, SystemClock};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SigningStatus {
    #[default]
    Idle,
    Signing,
    Announcing,
    Success,
    Error,
}

impl SigningStatus {
    /// An attempt holds the signing slot.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Signing | Self::Announcing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// Snapshot of the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningState {
    pub transaction_hash: Option<TxHash>,
    pub status: SigningStatus,
    pub cosignature: Option<DetachedCosignature>,
    /// Address of the key used, on the active node's network.
    pub signer_address: Option<Address>,
    pub error: Option<String>,
    pub success_message: Option<String>,
    pub last_updated: Timestamp,
}

impl SigningState {
    fn idle(now: Timestamp) -> Self {
        Self {
            last_updated: now,
            ..Self::default()
        }
    }

    /// Human-readable description of the current status.
    pub fn progress_message(&self) -> String {
        match self.status {
            SigningStatus::Idle => "Ready to sign".to_string(),
            SigningStatus::Signing => "Signing transaction...".to_string(),
            SigningStatus::Announcing => "Announcing cosignature to the network...".to_string(),
            SigningStatus::Success => self
                .success_message
                .clone()
                .unwrap_or_else(|| "Cosignature announced".to_string()),
            SigningStatus::Error => self
                .error
                .clone()
                .unwrap_or_else(|| "Signing failed".to_string()),
        }
    }
}

/// Something the orchestrator needs before it can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    ActiveAddress,
    ActiveNode,
    /// No other attempt may be signing or announcing.
    IdleSigner,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ActiveAddress => "an active address",
            Self::ActiveNode => "an active node",
            Self::IdleSigner => "no signing already in progress",
        })
    }
}

fn describe_missing(missing: &[Requirement]) -> String {
    let list: Vec<String> = missing.iter().map(ToString::to_string).collect();
    format!("missing requirements: {}", list.join(", "))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    #[error("a signing operation is already in progress")]
    Busy,

    #[error("{}", describe_missing(.0))]
    MissingRequirements(Vec<Requirement>),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("invalid network: {0}")]
    InvalidNetwork(String),

    #[error("signing failed: {0}")]
    Crypto(CryptoError),

    #[error("announce failed: {0}")]
    Announce(ApiError),

    #[error("signing aborted")]
    Aborted,
}

impl SigningError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Busy | Self::Aborted => ErrorKind::Conflict,
            Self::MissingRequirements(_) | Self::InvalidKey(_) | Self::InvalidHash(_) => {
                ErrorKind::Validation
            }
            Self::InvalidNetwork(_) | Self::Crypto(_) => ErrorKind::Crypto,
            Self::Announce(e) => e.kind(),
        }
    }
}

/// Active node as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNode {
    pub id: NodeId,
    pub url: String,
    pub network: NetworkType,
}

/// Selection the orchestrator signs against, captured by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningContext {
    pub active_address: Option<Address>,
    pub active_node: Option<ActiveNode>,
}

impl SigningContext {
    pub fn missing_requirements(&self) -> Vec<Requirement> {
        let mut missing = Vec::new();
        if self.active_address.is_none() {
            missing.push(Requirement::ActiveAddress);
        }
        if self.active_node.is_none() {
            missing.push(Requirement::ActiveNode);
        }
        missing
    }
}

/// Drives cosigning attempts. Holds the process-wide [`SigningState`].
pub struct SigningOrchestrator<C = SystemClock> {
    state: Mutex<SigningState>,
    generation: AtomicU64,
    clock: C,
}

impl SigningOrchestrator<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for SigningOrchestrator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SigningOrchestrator<C> {
    pub fn with_clock(clock: C) -> Self {
        let now = clock.now();
        Self {
            state: Mutex::new(SigningState::idle(now)),
            generation: AtomicU64::new(0),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SigningState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SigningState {
        self.lock().clone()
    }

    pub fn status(&self) -> SigningStatus {
        self.lock().status
    }

    pub fn progress_message(&self) -> String {
        self.lock().progress_message()
    }

    /// Requirements not met for a new attempt against `ctx`.
    pub fn missing_requirements(&self, ctx: &SigningContext) -> Vec<Requirement> {
        let mut missing = ctx.missing_requirements();
        if self.status().is_in_flight() {
            missing.push(Requirement::IdleSigner);
        }
        missing
    }

    /// Return to `idle`, abandoning any in-flight attempt.
    pub fn reset(&self) {
        let mut state = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        if state.status.is_in_flight() {
            tracing::info!("in-flight signing attempt abandoned by reset");
        }
        *state = SigningState::idle(self.clock.now());
    }

    /// Cosign `hash` with `private_key` and announce it to the active node.
    ///
    /// Returns the announced cosignature. On failure the error is also left
    /// in [`SigningOrchestrator::state`], together with the cosignature if
    /// one was produced. A concurrent call is refused with
    /// [`SigningError::Busy`] and does not touch the running attempt.
    pub async fn sign<T: HttpTransport>(
        &self,
        client: &NodeClient<T>,
        ctx: &SigningContext,
        private_key: Zeroizing<String>,
        hash: &str,
    ) -> Result<DetachedCosignature, SigningError> {
        let (mut attempt, address, node) = match self.begin(ctx, hash) {
            Ok(started) => started,
            Err(e) => {
                drop(private_key);
                return Err(e);
            }
        };

        let cosignature = match produce(&address, node.network, private_key, hash) {
            Ok((cosignature, signer)) => {
                tracing::info!(signer = %signer, parent_hash = %cosignature.parent_hash, "cosignature produced");
                attempt.announcing(cosignature.clone(), signer);
                cosignature
            }
            Err(e) => return Err(attempt.fail(e)),
        };

        match client.announce_cosignature(&node.url, &cosignature).await {
            Ok(()) => {
                let message = format!(
                    "Cosignature for {} announced via {}",
                    cosignature.parent_hash, node.url
                );
                tracing::info!(node = %node.id, parent_hash = %cosignature.parent_hash, "cosignature announced");
                attempt.succeed(message);
                Ok(cosignature)
            }
            Err(e) => {
                tracing::warn!(node = %node.id, error = %e, "cosignature announce failed");
                Err(attempt.fail(SigningError::Announce(e)))
            }
        }
    }

    /// Check preconditions and enter `signing`.
    fn begin(
        &self,
        ctx: &SigningContext,
        hash: &str,
    ) -> Result<(Attempt<'_, C>, Address, ActiveNode), SigningError> {
        let mut state = self.lock();
        if state.status.is_in_flight() {
            tracing::warn!("signing refused: another attempt is in progress");
            return Err(SigningError::Busy);
        }

        let now = self.clock.now();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = SigningState::idle(now);
        state.transaction_hash = TxHash::from_hex(hash).ok();

        let (address, node) = match (&ctx.active_address, &ctx.active_node) {
            (Some(address), Some(node)) => (address.clone(), node.clone()),
            _ => {
                let err = SigningError::MissingRequirements(ctx.missing_requirements());
                state.status = SigningStatus::Error;
                state.error = Some(err.to_string());
                tracing::warn!(error = %err, "signing refused");
                return Err(err);
            }
        };

        state.status = SigningStatus::Signing;
        tracing::info!(%address, node = %node.id, "signing started");
        drop(state);

        let attempt = Attempt {
            orchestrator: self,
            generation,
            finished: false,
        };
        Ok((attempt, address, node))
    }
}

/// Validate inputs and sign. Consumes the key; it is wiped on return.
fn produce(
    address: &Address,
    network: NetworkType,
    private_key: Zeroizing<String>,
    hash: &str,
) -> Result<(DetachedCosignature, Address), SigningError> {
    let key = PrivateKey::from_hex(&private_key).map_err(|e| SigningError::InvalidKey(e.to_string()))?;
    drop(private_key);

    let parent_hash = TxHash::from_hex(hash).map_err(|e| SigningError::InvalidHash(e.to_string()))?;

    if address.network() != Some(network) {
        return Err(SigningError::InvalidNetwork(format!(
            "address {address} does not belong to {network}"
        )));
    }

    let signer = derive_address(&derive_public_key(&key), network);
    let cosignature = sign_cosignature(&key, &parent_hash).map_err(|e| match e {
        CryptoError::WeakKey => SigningError::InvalidKey(e.to_string()),
        CryptoError::ZeroHash => SigningError::InvalidHash(e.to_string()),
        other => SigningError::Crypto(other),
    })?;
    Ok((cosignature, signer))
}

/// Handle on one in-flight attempt. Updates apply only while the attempt's
/// generation is current. Dropping an unfinished attempt records an abort.
struct Attempt<'a, C: Clock> {
    orchestrator: &'a SigningOrchestrator<C>,
    generation: u64,
    finished: bool,
}

impl<C: Clock> Attempt<'_, C> {
    fn update(&self, apply: impl FnOnce(&mut SigningState)) {
        let mut state = self.orchestrator.lock();
        if self.orchestrator.generation.load(Ordering::SeqCst) != self.generation {
            tracing::debug!(generation = self.generation, "stale signing attempt ignored");
            return;
        }
        apply(&mut *state);
        state.last_updated = self.orchestrator.clock.now();
    }

    fn announcing(&mut self, cosignature: DetachedCosignature, signer: Address) {
        self.update(|state| {
            state.status = SigningStatus::Announcing;
            state.cosignature = Some(cosignature);
            state.signer_address = Some(signer);
        });
    }

    fn succeed(&mut self, message: String) {
        self.finished = true;
        self.update(|state| {
            state.status = SigningStatus::Success;
            state.success_message = Some(message);
        });
    }

    fn fail(&mut self, error: SigningError) -> SigningError {
        self.finished = true;
        let message = error.to_string();
        self.update(|state| {
            state.status = SigningStatus::Error;
            state.error = Some(message);
        });
        error
    }
}

impl<C: Clock> Drop for Attempt<'_, C> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.update(|state| {
            if state.status.is_in_flight() {
                tracing::warn!("signing attempt dropped before completion");
                state.status = SigningStatus::Error;
                state.error = Some(SigningError::Aborted.to_string());
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "575DBB3062267EFF57C970A336EBBC8FBCFE12C5BD3ED7BC11EB0481D7704CED";
    const TESTNET_ADDR: &str = "TATNE7Q5BITMUTRRN6IB4I7FLSDRDWZA37JGO5Q";

    fn hash() -> String {
        "AB".repeat(32)
    }

    fn address() -> Address {
        Address::parse(TESTNET_ADDR).unwrap()
    }

    #[test]
    fn produce_signs_and_reports_signer() {
        let (cosig, signer) =
            produce(&address(), NetworkType::Testnet, Zeroizing::new(KEY.into()), &hash()).unwrap();
        assert_eq!(signer, address());
        assert_eq!(cosig.parent_hash, TxHash::new([0xAB; 32]));
        assert_eq!(cosig.version, 0);
    }

    #[test]
    fn produce_classifies_failures() {
        let bad_key = produce(&address(), NetworkType::Testnet, Zeroizing::new("12".into()), &hash());
        assert!(matches!(bad_key, Err(SigningError::InvalidKey(_))));

        let zero_key = produce(
            &address(),
            NetworkType::Testnet,
            Zeroizing::new("00".repeat(32)),
            &hash(),
        );
        assert!(matches!(zero_key, Err(SigningError::InvalidKey(_))));

        let bad_hash = produce(&address(), NetworkType::Testnet, Zeroizing::new(KEY.into()), "XYZ");
        assert!(matches!(bad_hash, Err(SigningError::InvalidHash(_))));

        let zero_hash = produce(
            &address(),
            NetworkType::Testnet,
            Zeroizing::new(KEY.into()),
            &"00".repeat(32),
        );
        assert!(matches!(zero_hash, Err(SigningError::InvalidHash(_))));

        let wrong_net = produce(&address(), NetworkType::Mainnet, Zeroizing::new(KEY.into()), &hash());
        assert!(matches!(wrong_net, Err(SigningError::InvalidNetwork(_))));
    }

    #[test]
    fn progress_messages() {
        let mut state = SigningState::default();
        assert_eq!(state.progress_message(), "Ready to sign");
        state.status = SigningStatus::Error;
        assert_eq!(state.progress_message(), "Signing failed");
        state.error = Some("invalid private key".into());
        assert_eq!(state.progress_message(), "invalid private key");
    }

    #[test]
    fn missing_requirements_message() {
        let err = SigningError::MissingRequirements(vec![Requirement::ActiveAddress, Requirement::ActiveNode]);
        assert_eq!(
            err.to_string(),
            "missing requirements: an active address, an active node"
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn reset_returns_to_idle() {
        let orchestrator = SigningOrchestrator::new();
        {
            let mut state = orchestrator.lock();
            state.status = SigningStatus::Error;
            state.error = Some("x".into());
        }
        orchestrator.reset();
        let state = orchestrator.state();
        assert_eq!(state.status, SigningStatus::Idle);
        assert_eq!(state.error, None);
    }
}
