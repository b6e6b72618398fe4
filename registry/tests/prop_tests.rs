use proptest::prelude::*;

use cosign_registry::{
    compute_node_id, AddAddressParams, AddNodeParams, AddressRegistry, NodeRegistry,
};
use cosign_types::{Address, NetworkType, NodeId, Timestamp};

const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

fn address() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(ALPHABET.chars().collect::<Vec<_>>()), 39)
        .prop_map(|chars| chars.into_iter().collect())
}

fn network() -> impl Strategy<Value = NetworkType> {
    prop::sample::select(NetworkType::ALL.to_vec())
}

#[derive(Debug, Clone)]
enum AddressOp {
    Add(usize, bool),
    Activate(usize),
    Remove(usize),
}

#[derive(Debug, Clone)]
enum NodeOp {
    Add(usize, NetworkType, bool),
    Activate(usize, NetworkType),
    Remove(usize, NetworkType),
}

fn address_op() -> impl Strategy<Value = AddressOp> {
    prop_oneof![
        (0usize..6, any::<bool>()).prop_map(|(i, a)| AddressOp::Add(i, a)),
        (0usize..6).prop_map(AddressOp::Activate),
        (0usize..6).prop_map(AddressOp::Remove),
    ]
}

fn node_op() -> impl Strategy<Value = NodeOp> {
    prop_oneof![
        (0usize..5, network(), any::<bool>()).prop_map(|(i, n, a)| NodeOp::Add(i, n, a)),
        (0usize..5, network()).prop_map(|(i, n)| NodeOp::Activate(i, n)),
        (0usize..5, network()).prop_map(|(i, n)| NodeOp::Remove(i, n)),
    ]
}

fn node_url(i: usize) -> String {
    format!("https://node{i}.example:3001")
}

proptest! {
    /// Any sequence of operations leaves at most one active address and no
    /// duplicate keys.
    #[test]
    fn address_registry_invariants(
        pool in prop::collection::vec(address(), 6),
        ops in prop::collection::vec(address_op(), 1..40),
    ) {
        let mut reg = AddressRegistry::new();
        for (step, op) in ops.into_iter().enumerate() {
            let now = Timestamp::from_millis(step as u64);
            match op {
                AddressOp::Add(i, active) => {
                    let _ = reg.add(AddAddressParams { address: pool[i].clone(), memo: String::new(), active }, now);
                }
                AddressOp::Activate(i) => {
                    let _ = reg.set_active(&Address::parse(&pool[i]).unwrap(), now);
                }
                AddressOp::Remove(i) => {
                    let _ = reg.remove(&Address::parse(&pool[i]).unwrap());
                }
            }
            let active = reg.records().iter().filter(|r| r.active).count();
            prop_assert!(active <= 1);

            let mut keys: Vec<_> = reg.records().iter().map(|r| r.address.clone()).collect();
            let total = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), total);
        }
    }

    /// Adding the same normalized address twice always conflicts.
    #[test]
    fn second_add_conflicts(addr in address(), lower in any::<bool>()) {
        let mut reg = AddressRegistry::new();
        reg.add(AddAddressParams { address: addr.clone(), ..Default::default() }, Timestamp::EPOCH).unwrap();
        let again = if lower { addr.to_lowercase() } else { addr };
        let second = reg.add(AddAddressParams { address: again, ..Default::default() }, Timestamp::EPOCH);
        prop_assert!(second.is_err());
        prop_assert_eq!(reg.len(), 1);
    }

    /// Any sequence of node operations leaves at most one active node per network.
    #[test]
    fn node_registry_invariants(ops in prop::collection::vec(node_op(), 1..40)) {
        let mut reg = NodeRegistry::default();
        for (step, op) in ops.into_iter().enumerate() {
            let now = Timestamp::from_millis(step as u64);
            match op {
                NodeOp::Add(i, network, active) => {
                    let _ = reg.add(AddNodeParams { url: node_url(i), network, memo: String::new(), active }, now);
                }
                NodeOp::Activate(i, network) => {
                    let _ = reg.set_active(&compute_node_id(&node_url(i), network), now);
                }
                NodeOp::Remove(i, network) => {
                    let _ = reg.remove(&compute_node_id(&node_url(i), network));
                }
            }
            for network in NetworkType::ALL {
                let active = reg.records().iter().filter(|r| r.active && r.network == network).count();
                prop_assert!(active <= 1);
            }
            let mut ids: Vec<NodeId> = reg.records().iter().map(|r| r.id.clone()).collect();
            let total = ids.len();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), total);
        }
    }

    /// Node ids ignore case and trailing slashes.
    #[test]
    fn node_id_normalization(host in "[a-z]{1,12}", slashes in 0usize..4, net in network()) {
        let plain = format!("https://{host}.example:3001");
        let spelled = format!("{}{}", plain.to_uppercase(), "/".repeat(slashes));
        prop_assert_eq!(compute_node_id(&plain, net), compute_node_id(&spelled, net));
    }
}
