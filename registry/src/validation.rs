//! Pure validation helpers shared by both registries.

use cosign_crypto::blake2b_256_multi;
use cosign_types::{Address, ConnectionQuality, NetworkType, NodeId, NodeStatus};
use url::Url;

use crate::error::ValidationError;

/// Ports a node REST gateway may listen on.
pub const ALLOWED_PORTS: [u16; 2] = [3000, 3001];

const FORBIDDEN_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Bytes of the Blake2b digest kept in a node id.
const NODE_ID_BYTES: usize = 16;

/// Normalize an address (strip hyphens, uppercase) and check its format.
pub fn validate_address_format(input: &str) -> Result<Address, ValidationError> {
    Ok(Address::parse(input)?)
}

/// Check that `input` is an https URL on an allowed port and a non-local host.
pub fn validate_node_url(input: &str) -> Result<Url, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }

    let url = Url::parse(input).map_err(|e| ValidationError::UnparsableUrl(e.to_string()))?;

    if url.scheme() != "https" {
        return Err(ValidationError::Scheme(url.scheme().to_string()));
    }
    if let Some(port) = url.port() {
        if !ALLOWED_PORTS.contains(&port) {
            return Err(ValidationError::Port(port));
        }
    }
    match url.host_str() {
        None | Some("") => return Err(ValidationError::Host(String::new())),
        Some(host) if FORBIDDEN_HOSTS.contains(&host) => {
            return Err(ValidationError::Host(host.to_string()))
        }
        Some(_) => {}
    }

    Ok(url)
}

/// Lowercase and strip every trailing slash.
pub fn normalize_url(input: &str) -> String {
    input.trim().to_lowercase().trim_end_matches('/').to_string()
}

/// Deterministic id for `(url, network)`. Equivalent URLs give equal ids.
pub fn compute_node_id(url: &str, network: NetworkType) -> NodeId {
    let normalized = normalize_url(url);
    let digest = blake2b_256_multi(&[
        network.as_str().as_bytes(),
        b"|",
        normalized.as_bytes(),
    ]);
    NodeId::new(hex::encode(&digest[..NODE_ID_BYTES]))
}

pub fn evaluate_quality(response_time_ms: Option<u64>) -> ConnectionQuality {
    ConnectionQuality::from_response_time(response_time_ms)
}

pub fn status_priority(status: NodeStatus) -> u8 {
    status.priority()
}

pub fn quality_priority(quality: ConnectionQuality) -> u8 {
    quality.priority()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_url_rules() {
        assert!(validate_node_url("https://example.com:3001").is_ok());
        assert!(validate_node_url("https://example.com:3000/").is_ok());
        assert!(validate_node_url("https://example.com").is_ok());

        assert_eq!(validate_node_url(""), Err(ValidationError::EmptyUrl));
        assert_eq!(validate_node_url("   "), Err(ValidationError::EmptyUrl));
        assert!(matches!(
            validate_node_url("not a url"),
            Err(ValidationError::UnparsableUrl(_))
        ));
        assert_eq!(
            validate_node_url("http://example.com:3001"),
            Err(ValidationError::Scheme("http".into()))
        );
        assert_eq!(
            validate_node_url("https://example.com:8080"),
            Err(ValidationError::Port(8080))
        );
        assert_eq!(
            validate_node_url("https://localhost:3001"),
            Err(ValidationError::Host("localhost".into()))
        );
        assert_eq!(
            validate_node_url("https://127.0.0.1:3001"),
            Err(ValidationError::Host("127.0.0.1".into()))
        );
    }

    #[test]
    fn normalize_strips_repeated_slashes() {
        assert_eq!(
            normalize_url("HTTPS://Node.Example:3001///"),
            "https://node.example:3001"
        );
    }

    #[test]
    fn node_id_is_stable_across_spellings() {
        let a = compute_node_id("https://node.example:3001", NetworkType::Mainnet);
        let b = compute_node_id("HTTPS://NODE.EXAMPLE:3001//", NetworkType::Mainnet);
        let c = compute_node_id("https://node.example:3001", NetworkType::Testnet);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), NODE_ID_BYTES * 2);
    }

    #[test]
    fn quality_table() {
        assert_eq!(evaluate_quality(Some(50)), ConnectionQuality::Excellent);
        assert_eq!(evaluate_quality(Some(300)), ConnectionQuality::Good);
        assert_eq!(evaluate_quality(Some(1000)), ConnectionQuality::Fair);
        assert_eq!(evaluate_quality(Some(3000)), ConnectionQuality::Poor);
        assert_eq!(evaluate_quality(None), ConnectionQuality::Unknown);
    }

    #[test]
    fn address_validation_normalizes() {
        let addr = validate_address_format("tatne7-q5bitm-utrrn6-ib4i7f-lsdrdw-za37jg-o5q").unwrap();
        assert_eq!(addr.as_str(), "TATNE7Q5BITMUTRRN6IB4I7FLSDRDWZA37JGO5Q");
        assert!(validate_address_format("TATNE7").is_err());
    }
}
