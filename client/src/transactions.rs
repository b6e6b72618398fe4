//! Pending multisig transaction fetcher.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use cosign_crypto::derive_address;
use cosign_types::{Address, Deadline, NetworkType, PublicKey, Timestamp, TxHash};

use crate::client::{base_url, classify_partial_status, NodeClient};
use crate::dto::{validate_page_shape, RawPagination, RawPartialItem};
use crate::error::ApiError;
use crate::transport::HttpTransport;

/// Transaction type code of an aggregate bonded transaction.
pub const AGGREGATE_BONDED_TYPE: u16 = 16961;

pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query for `GET /transactions/partial`.
///
/// `address` is raw user input; it is validated before any request goes out.
/// `network` selects the address prefix and genesis epoch used when mapping
/// the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchParams {
    pub node_url: String,
    pub address: String,
    pub network: NetworkType,
    pub transaction_type: u16,
    pub page_size: u32,
    pub page_number: u32,
    pub order: SortOrder,
}

impl FetchParams {
    pub fn new(node_url: impl Into<String>, address: impl Into<String>, network: NetworkType) -> Self {
        Self {
            node_url: node_url.into(),
            address: address.into(),
            network,
            transaction_type: AGGREGATE_BONDED_TYPE,
            page_size: DEFAULT_PAGE_SIZE,
            page_number: 1,
            order: SortOrder::Desc,
        }
    }
}

/// A pending aggregate transaction, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayTransaction {
    pub id: String,
    pub hash: TxHash,
    pub height: u64,
    pub signer_public_key: PublicKey,
    pub signer_address: Address,
    pub deadline: Deadline,
    pub created_at: Timestamp,
    pub cosignature_count: usize,
    pub cosigner_public_keys: Vec<PublicKey>,
    pub cosigner_addresses: Vec<Address>,
    pub inner_transaction_count: usize,
}

impl DisplayTransaction {
    fn from_raw(item: RawPartialItem, network: NetworkType) -> Self {
        let tx = item.transaction;
        let cosigner_public_keys: Vec<PublicKey> =
            tx.cosignatures.iter().map(|c| c.signer_public_key).collect();
        let cosigner_addresses = cosigner_public_keys
            .iter()
            .map(|pk| derive_address(pk, network))
            .collect();
        let deadline = Deadline::new(tx.deadline);

        Self {
            id: item.id,
            hash: item.meta.hash,
            height: item.meta.height,
            signer_public_key: tx.signer_public_key,
            signer_address: derive_address(&tx.signer_public_key, network),
            deadline,
            created_at: deadline.to_timestamp(network),
            cosignature_count: cosigner_public_keys.len(),
            cosigner_public_keys,
            cosigner_addresses,
            inner_transaction_count: tx.transactions.len(),
        }
    }

    /// Whether `address` initiated this transaction or has already cosigned it.
    pub fn is_signed_by(&self, address: &Address) -> bool {
        self.signer_address == *address || self.cosigner_addresses.contains(address)
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.created_at <= now
    }
}

/// One page of pending transactions with the pagination the node echoed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub transactions: Vec<DisplayTransaction>,
    pub page_number: u32,
    pub page_size: u32,
}

fn partial_url(base: &str, address: &Address, params: &FetchParams) -> Result<String, ApiError> {
    let endpoint = format!("{base}/transactions/partial");
    let url = url::Url::parse_with_params(
        &endpoint,
        &[
            ("type", params.transaction_type.to_string()),
            ("address", address.as_str().to_string()),
            ("pageSize", params.page_size.to_string()),
            ("pageNumber", params.page_number.to_string()),
            ("order", params.order.as_str().to_string()),
        ],
    )
    .map_err(|e| ApiError::InvalidUrl(format!("{endpoint}: {e}")))?;
    Ok(url.into())
}

/// Validate the envelope, then map every item.
pub(crate) fn parse_page(body: &str, network: NetworkType) -> Result<TransactionPage, ApiError> {
    let mut value: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::MalformedResponse(format!("response is not JSON: {e}")))?;
    validate_page_shape(&value)?;

    let pagination: RawPagination = serde_json::from_value(value["pagination"].take())
        .map_err(|e| ApiError::MalformedResponse(format!("pagination: {e}")))?;

    let items = match value["data"].take() {
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    let transactions = items
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            serde_json::from_value::<RawPartialItem>(raw)
                .map(|item| DisplayTransaction::from_raw(item, network))
                .map_err(|e| ApiError::MalformedResponse(format!("data[{index}]: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TransactionPage {
        transactions,
        page_number: pagination.page_number,
        page_size: pagination.page_size,
    })
}

impl<T: HttpTransport> NodeClient<T> {
    /// Fetch one page of partial (awaiting cosignature) transactions for an
    /// address.
    pub async fn fetch_pending_page(&self, params: &FetchParams) -> Result<TransactionPage, ApiError> {
        if params.node_url.trim().is_empty() {
            return Err(ApiError::MissingParameter("node_url"));
        }
        if params.address.trim().is_empty() {
            return Err(ApiError::MissingParameter("address"));
        }
        let address = Address::parse(&params.address)?;
        let url = partial_url(base_url(&params.node_url)?, &address, params)?;

        let response = self.get(&url, self.timeout()).await?;
        classify_partial_status(response.status)?;

        let page = parse_page(&response.body, params.network)?;
        tracing::debug!(
            %address,
            count = page.transactions.len(),
            page = page.page_number,
            "fetched pending transactions"
        );
        Ok(page)
    }

    pub async fn fetch_pending(&self, params: &FetchParams) -> Result<Vec<DisplayTransaction>, ApiError> {
        self.fetch_pending_page(params).await.map(|page| page.transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SIGNER: &str = "2E834140FD66CF87B254A693A2C7862C819217B676D3943267156625E816EC6F";

    fn page_body(items: Vec<Value>) -> String {
        json!({"data": items, "pagination": {"pageNumber": 1, "pageSize": 100}}).to_string()
    }

    fn item(deadline: &str, cosigners: &[&str]) -> Value {
        json!({
            "id": "65F0",
            "meta": {"hash": "AB".repeat(32), "height": "0"},
            "transaction": {
                "signerPublicKey": SIGNER,
                "deadline": deadline,
                "cosignatures": cosigners
                    .iter()
                    .map(|pk| json!({"signerPublicKey": pk, "version": "0"}))
                    .collect::<Vec<_>>(),
                "transactions": [{}, {}]
            }
        })
    }

    #[test]
    fn maps_items_with_network_epoch() {
        let body = page_body(vec![item("1000", &[])]);
        let page = parse_page(&body, NetworkType::Testnet).unwrap();
        assert_eq!(page.page_size, 100);

        let tx = &page.transactions[0];
        assert_eq!(tx.hash, TxHash::new([0xAB; 32]));
        assert_eq!(tx.signer_address.as_str(), "TATNE7Q5BITMUTRRN6IB4I7FLSDRDWZA37JGO5Q");
        assert_eq!(tx.deadline, Deadline::new(1000));
        assert_eq!(tx.created_at.as_millis(), 1_667_250_467_000 + 1000);
        assert_eq!(tx.cosignature_count, 0);
        assert_eq!(tx.inner_transaction_count, 2);
    }

    #[test]
    fn cosigners_are_resolved_to_addresses() {
        let body = page_body(vec![item("1", &[SIGNER])]);
        let page = parse_page(&body, NetworkType::Mainnet).unwrap();
        let tx = &page.transactions[0];
        assert_eq!(tx.cosignature_count, 1);
        assert_eq!(
            tx.cosigner_addresses[0].as_str(),
            "NATNE7Q5BITMUTRRN6IB4I7FLSDRDWZA34SQ33Y"
        );
        assert!(tx.is_signed_by(&tx.cosigner_addresses[0]));
    }

    #[test]
    fn bad_item_reports_index() {
        let body = page_body(vec![item("1", &[]), json!({"meta": {}})]);
        match parse_page(&body, NetworkType::Mainnet) {
            Err(ApiError::MalformedResponse(msg)) => assert!(msg.starts_with("data[1]")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn query_string_is_encoded() {
        let address = Address::parse("TATNE7Q5BITMUTRRN6IB4I7FLSDRDWZA37JGO5Q").unwrap();
        let params = FetchParams::new("https://n.example:3001", address.as_str(), NetworkType::Testnet);
        let url = partial_url("https://n.example:3001", &address, &params).unwrap();
        assert_eq!(
            url,
            "https://n.example:3001/transactions/partial?type=16961&address=TATNE7Q5BITMUTRRN6IB4I7FLSDRDWZA37JGO5Q&pageSize=100&pageNumber=1&order=desc"
        );
    }

    #[test]
    fn defaults() {
        let params = FetchParams::new("u", "a", NetworkType::Mainnet);
        assert_eq!(params.transaction_type, 16961);
        assert_eq!(params.page_size, 100);
        assert_eq!(params.page_number, 1);
        assert_eq!(params.order, SortOrder::Desc);
    }
}
