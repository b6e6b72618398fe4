//! Built-in public endpoints used to seed an empty node registry.
//!
//! The first entry of each network becomes that network's active node.

use cosign_types::NetworkType;

pub struct PresetNode {
    pub url: &'static str,
    pub network: NetworkType,
    pub memo: &'static str,
}

pub const PRESET_NODES: &[PresetNode] = &[
    PresetNode {
        url: "https://symbol-mikun.net:3001",
        network: NetworkType::Mainnet,
        memo: "mikun",
    },
    PresetNode {
        url: "https://sym-main-01.opening-line.jp:3001",
        network: NetworkType::Mainnet,
        memo: "opening-line 01",
    },
    PresetNode {
        url: "https://sym-main-03.opening-line.jp:3001",
        network: NetworkType::Mainnet,
        memo: "opening-line 03",
    },
    PresetNode {
        url: "https://sym-test-01.opening-line.jp:3001",
        network: NetworkType::Testnet,
        memo: "opening-line test 01",
    },
    PresetNode {
        url: "https://sym-test-03.opening-line.jp:3001",
        network: NetworkType::Testnet,
        memo: "opening-line test 03",
    },
    PresetNode {
        url: "https://001-sai-dual.symboltest.net:3001",
        network: NetworkType::Testnet,
        memo: "sai dual 001",
    },
];

pub fn presets_for(network: NetworkType) -> impl Iterator<Item = &'static PresetNode> {
    PRESET_NODES.iter().filter(move |p| p.network == network)
}
