//! Cosignature production and verification.

use cosign_types::{DetachedCosignature, PrivateKey, PublicKey, Signature, TxHash};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

use crate::error::CryptoError;

/// Version field of every cosignature produced here.
pub const COSIGNATURE_VERSION: u64 = 0;

/// Cosign `parent_hash` with `private_key`.
///
/// The signature covers the 32 raw hash bytes. The result is verified against
/// the derived public key before it is returned.
pub fn sign_cosignature(
    private_key: &PrivateKey,
    parent_hash: &TxHash,
) -> Result<DetachedCosignature, CryptoError> {
    if private_key.0 == [0u8; 32] {
        return Err(CryptoError::WeakKey);
    }
    if parent_hash.is_zero() {
        return Err(CryptoError::ZeroHash);
    }

    let signing_key = SigningKey::from_bytes(&private_key.0);
    let signature = Signature(signing_key.sign(parent_hash.as_bytes()).to_bytes());
    let signer_public_key = PublicKey(signing_key.verifying_key().to_bytes());
    drop(signing_key);

    let cosignature = DetachedCosignature {
        parent_hash: *parent_hash,
        signature,
        signer_public_key,
        version: COSIGNATURE_VERSION,
    };
    if !verify_cosignature(&cosignature) {
        return Err(CryptoError::SelfVerification);
    }
    Ok(cosignature)
}

/// Verify a cosignature against its own signer key and parent hash.
///
/// Returns `false` for malformed keys as well as bad signatures.
pub fn verify_cosignature(cosignature: &DetachedCosignature) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(cosignature.signer_public_key.as_bytes())
    else {
        return false;
    };
    let dalek_sig = ed25519_dalek::Signature::from_bytes(cosignature.signature.as_bytes());
    verifying_key
        .verify(cosignature.parent_hash.as_bytes(), &dalek_sig)
        .is_ok()
}
