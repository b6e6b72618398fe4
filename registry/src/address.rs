//! Address registry: known account identities, at most one active.

use serde::{Deserialize, Serialize};

use cosign_types::{Address, PublicKey, Timestamp};

use crate::error::RegistryError;
use crate::validation::validate_address_format;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub address: Address,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub active: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub last_used_at: Option<Timestamp>,
    #[serde(default)]
    pub public_key: Option<PublicKey>,
    #[serde(default)]
    pub balance: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct AddAddressParams {
    pub address: String,
    pub memo: String,
    pub active: bool,
}

/// Fields to merge into an existing record. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAddressParams {
    pub memo: Option<String>,
    pub public_key: Option<PublicKey>,
    pub balance: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct AddressFilter {
    pub active_only: bool,
    /// Case-insensitive substring over memo and address.
    pub search: Option<String>,
}

impl AddressFilter {
    fn matches(&self, record: &AddressRecord) -> bool {
        if self.active_only && !record.active {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                record.memo.to_lowercase().contains(&needle)
                    || record.address.as_str().to_lowercase().contains(&needle)
            }
        }
    }
}

/// Insertion-ordered address set.
///
/// The `active` flag is registry-wide: activating one address deactivates
/// every other one regardless of network.
#[derive(Debug, Clone, Default)]
pub struct AddressRegistry {
    records: Vec<AddressRecord>,
}

impl AddressRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records. Duplicates are dropped and only the
    /// first active record stays active.
    pub fn from_records(records: Vec<AddressRecord>) -> Self {
        let mut registry = Self::new();
        let mut seen_active = false;
        for mut record in records {
            if registry.get(&record.address).is_some() {
                tracing::warn!(address = %record.address, "dropping duplicate persisted address");
                continue;
            }
            if record.active {
                if seen_active {
                    tracing::warn!(address = %record.address, "clearing extra active flag");
                    record.active = false;
                }
                seen_active = true;
            }
            registry.records.push(record);
        }
        registry
    }

    pub fn records(&self) -> &[AddressRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, address: &Address) -> Option<&AddressRecord> {
        self.records.iter().find(|r| r.address == *address)
    }

    pub fn active(&self) -> Option<&AddressRecord> {
        self.records.iter().find(|r| r.active)
    }

    pub fn add(&mut self, params: AddAddressParams, now: Timestamp) -> Result<&AddressRecord, RegistryError> {
        let address = validate_address_format(&params.address)?;
        if self.get(&address).is_some() {
            return Err(RegistryError::DuplicateAddress(address));
        }
        if params.active {
            self.deactivate_all();
        }

        tracing::info!(%address, active = params.active, "address added");
        self.records.push(AddressRecord {
            address,
            memo: params.memo.trim().to_string(),
            active: params.active,
            created_at: now,
            last_used_at: None,
            public_key: None,
            balance: None,
        });
        let last = self.records.len() - 1;
        Ok(&self.records[last])
    }

    pub fn update(
        &mut self,
        address: &Address,
        params: UpdateAddressParams,
        now: Timestamp,
    ) -> Result<&AddressRecord, RegistryError> {
        let record = self.get_mut(address)?;
        if let Some(memo) = params.memo {
            record.memo = memo.trim().to_string();
        }
        if let Some(public_key) = params.public_key {
            record.public_key = Some(public_key);
        }
        if let Some(balance) = params.balance {
            record.balance = Some(balance);
        }
        record.last_used_at = Some(now);
        Ok(record)
    }

    /// Remove a record. Removing the active address leaves none active.
    pub fn remove(&mut self, address: &Address) -> Result<AddressRecord, RegistryError> {
        let index = self
            .records
            .iter()
            .position(|r| r.address == *address)
            .ok_or_else(|| RegistryError::AddressNotFound(address.clone()))?;
        tracing::info!(%address, "address removed");
        Ok(self.records.remove(index))
    }

    pub fn set_active(&mut self, address: &Address, now: Timestamp) -> Result<&AddressRecord, RegistryError> {
        // Check first so an unknown address leaves the flags untouched.
        self.get_mut(address)?;
        self.deactivate_all();
        let record = self.get_mut(address)?;
        record.active = true;
        record.last_used_at = Some(now);
        tracing::info!(%address, "address activated");
        Ok(record)
    }

    pub fn list(&self, filter: &AddressFilter) -> Vec<&AddressRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    fn get_mut(&mut self, address: &Address) -> Result<&mut AddressRecord, RegistryError> {
        self.records
            .iter_mut()
            .find(|r| r.address == *address)
            .ok_or_else(|| RegistryError::AddressNotFound(address.clone()))
    }

    fn deactivate_all(&mut self) {
        for record in &mut self.records {
            record.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosign_types::ErrorKind;

    const A: &str = "TATNE7Q5BITMUTRRN6IB4I7FLSDRDWZA37JGO5Q";
    const B: &str = "NATNE7Q5BITMUTRRN6IB4I7FLSDRDWZA34SQ33Y";

    fn params(address: &str, active: bool) -> AddAddressParams {
        AddAddressParams {
            address: address.to_string(),
            memo: String::new(),
            active,
        }
    }

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    fn active_count(r: &AddressRegistry) -> usize {
        r.records().iter().filter(|r| r.active).count()
    }

    #[test]
    fn duplicate_add_conflicts() {
        let mut reg = AddressRegistry::new();
        reg.add(params(A, false), Timestamp::from_millis(1)).unwrap();
        let err = reg
            .add(params(&A.to_lowercase(), false), Timestamp::from_millis(2))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn invalid_address_rejected() {
        let mut reg = AddressRegistry::new();
        let err = reg.add(params("NOPE", false), Timestamp::EPOCH).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(reg.is_empty());
    }

    #[test]
    fn active_is_exclusive_across_networks() {
        let mut reg = AddressRegistry::new();
        reg.add(params(A, true), Timestamp::from_millis(1)).unwrap();
        reg.add(params(B, true), Timestamp::from_millis(2)).unwrap();
        assert_eq!(active_count(&reg), 1);
        assert_eq!(reg.active().unwrap().address, addr(B));

        reg.set_active(&addr(A), Timestamp::from_millis(3)).unwrap();
        assert_eq!(active_count(&reg), 1);
        let active = reg.active().unwrap();
        assert_eq!(active.address, addr(A));
        assert_eq!(active.last_used_at, Some(Timestamp::from_millis(3)));
    }

    #[test]
    fn set_active_unknown_leaves_state() {
        let mut reg = AddressRegistry::new();
        reg.add(params(A, true), Timestamp::EPOCH).unwrap();
        let err = reg.set_active(&addr(B), Timestamp::EPOCH).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(reg.active().unwrap().address, addr(A));
    }

    #[test]
    fn removing_active_does_not_promote() {
        let mut reg = AddressRegistry::new();
        reg.add(params(A, false), Timestamp::EPOCH).unwrap();
        reg.add(params(B, true), Timestamp::EPOCH).unwrap();
        reg.remove(&addr(B)).unwrap();
        assert!(reg.active().is_none());
        assert_eq!(
            reg.remove(&addr(B)).unwrap_err(),
            RegistryError::AddressNotFound(addr(B))
        );
    }

    #[test]
    fn update_merges_and_touches() {
        let mut reg = AddressRegistry::new();
        reg.add(
            AddAddressParams {
                address: A.into(),
                memo: "treasury".into(),
                active: false,
            },
            Timestamp::EPOCH,
        )
        .unwrap();
        let rec = reg
            .update(
                &addr(A),
                UpdateAddressParams {
                    balance: Some(42),
                    ..Default::default()
                },
                Timestamp::from_millis(9),
            )
            .unwrap();
        assert_eq!(rec.memo, "treasury");
        assert_eq!(rec.balance, Some(42));
        assert_eq!(rec.last_used_at, Some(Timestamp::from_millis(9)));
    }

    #[test]
    fn list_filters() {
        let mut reg = AddressRegistry::new();
        reg.add(
            AddAddressParams {
                address: A.into(),
                memo: "Cold wallet".into(),
                active: false,
            },
            Timestamp::EPOCH,
        )
        .unwrap();
        reg.add(params(B, true), Timestamp::EPOCH).unwrap();

        assert_eq!(reg.list(&AddressFilter::default()).len(), 2);
        let active = reg.list(&AddressFilter {
            active_only: true,
            ..Default::default()
        });
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].address, addr(B));

        let found = reg.list(&AddressFilter {
            search: Some("cold".into()),
            ..Default::default()
        });
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].address, addr(A));

        let by_addr = reg.list(&AddressFilter {
            search: Some("34sq".into()),
            ..Default::default()
        });
        assert_eq!(by_addr[0].address, addr(B));
    }

    #[test]
    fn from_records_repairs_invariants() {
        let rec = |s: &str, active| AddressRecord {
            address: addr(s),
            memo: String::new(),
            active,
            created_at: Timestamp::EPOCH,
            last_used_at: None,
            public_key: None,
            balance: None,
        };
        let reg = AddressRegistry::from_records(vec![rec(A, true), rec(B, true), rec(A, false)]);
        assert_eq!(reg.len(), 2);
        assert_eq!(active_count(&reg), 1);
        assert_eq!(reg.active().unwrap().address, addr(A));
    }
}
