//! Ed25519 public key derivation.

use cosign_types::{PrivateKey, PublicKey};
use ed25519_dalek::SigningKey;

/// Derive the public key from a private key.
pub fn derive_public_key(private: &PrivateKey) -> PublicKey {
    let signing_key = SigningKey::from_bytes(&private.0);
    PublicKey(signing_key.verifying_key().to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_public_key(&PrivateKey([42u8; 32]));
        let b = derive_public_key(&PrivateKey([42u8; 32]));
        assert_eq!(a, b);
    }

    #[test]
    fn different_keys_differ() {
        let a = derive_public_key(&PrivateKey([1u8; 32]));
        let b = derive_public_key(&PrivateKey([2u8; 32]));
        assert_ne!(a, b);
    }

    #[test]
    fn rfc8032_test_vector_1() {
        let mut seed = [0u8; 32];
        let hex = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
        for (i, byte) in seed.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).unwrap();
        }
        let public = derive_public_key(&PrivateKey(seed));
        assert_eq!(
            public.to_hex(),
            "D75A980182B10AB7D54BFED3C964073A0EE172F3DAA62325AF021A68F707511A"
        );
    }
}
