//! REST response shapes and the validators that run before any field access.

use cosign_types::serde_util::u64_lenient;
use cosign_types::{PublicKey, TxHash};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// Body of `GET /node/info`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    #[serde(deserialize_with = "u64_lenient")]
    pub network_identifier: u64,
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub network_generation_hash_seed: Option<String>,
    #[serde(default)]
    pub roles: Option<u64>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub friendly_name: Option<String>,
}

impl NodeInfo {
    /// Parse a `/node/info` body. `networkIdentifier` is the only required field.
    pub fn parse(body: &str) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ApiError::MalformedResponse(format!("node info is not JSON: {e}")))?;
        if !value.is_object() {
            return Err(ApiError::MalformedResponse(
                "node info is not an object".to_string(),
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| ApiError::MalformedResponse(format!("node info: {e}")))
    }
}

/// Render a packed node version (`0xMMmmppbb`) as `M.m.p.b`.
pub fn format_node_version(version: u64) -> String {
    let v = version as u32;
    format!(
        "{}.{}.{}.{}",
        (v >> 24) & 0xFF,
        (v >> 16) & 0xFF,
        (v >> 8) & 0xFF,
        v & 0xFF
    )
}

/// Check the envelope of `GET /transactions/partial`: an array `data` and a
/// `pagination` object with numeric `pageNumber` and `pageSize`.
pub fn validate_page_shape(value: &Value) -> Result<(), ApiError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ApiError::MalformedResponse("response is not an object".to_string()))?;

    if !obj.get("data").is_some_and(Value::is_array) {
        return Err(ApiError::MalformedResponse(
            "`data` is missing or not an array".to_string(),
        ));
    }

    let pagination = obj
        .get("pagination")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ApiError::MalformedResponse("`pagination` is missing or not an object".to_string())
        })?;
    for field in ["pageNumber", "pageSize"] {
        if !pagination.get(field).is_some_and(Value::is_number) {
            return Err(ApiError::MalformedResponse(format!(
                "`pagination.{field}` is missing or not a number"
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPagination {
    pub page_number: u32,
    pub page_size: u32,
}

/// One entry of the partial-transaction `data` array.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPartialItem {
    #[serde(default)]
    pub id: String,
    pub meta: RawMeta,
    pub transaction: RawAggregate,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawMeta {
    pub hash: TxHash,
    #[serde(default, deserialize_with = "u64_lenient")]
    pub height: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawAggregate {
    pub signer_public_key: PublicKey,
    #[serde(deserialize_with = "u64_lenient")]
    pub deadline: u64,
    #[serde(default)]
    pub cosignatures: Vec<RawCosignature>,
    #[serde(default)]
    pub transactions: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCosignature {
    pub signer_public_key: PublicKey,
}
