//! Registry of known chain identifiers.
//!
//! Chain IDs are bound into the signing payload of replay-protected
//! transactions (EIP-155). The registry only maps identifiers to names for
//! display purposes; it never influences encoding.

use std::{collections::HashMap, sync::OnceLock};

pub use txcore_primitives::ChainId;

/// Signals pre-EIP-155 signing without replay protection. Not recommended.
pub const ANY: ChainId = 0x0;
/// Ethereum mainnet chain ID
pub const HOMESTEAD: ChainId = 0x1;
/// Morden chain ID
pub const MORDEN: ChainId = 0x2;
/// Ropsten chain ID
pub const ROPSTEN: ChainId = 0x3;
/// Rinkeby chain ID
pub const RINKEBY: ChainId = 0x4;
/// Chain ID used by private development networks
pub const PRIVATE: ChainId = 0xf;
/// Kovan chain ID
pub const KOVAN: ChainId = 0x2a;
/// BNB Smart Chain mainnet chain ID
pub const BSC_MAINNET: ChainId = 0x38;
/// BNB Smart Chain testnet chain ID
pub const BSC_TESTNET: ChainId = 0x61;
/// Huobi ECO Chain mainnet chain ID
pub const HECO_MAINNET: ChainId = 0x80;
/// Huobi ECO Chain testnet chain ID
pub const HECO_TESTNET: ChainId = 0xff;
/// Polygon mainnet chain ID
pub const POLYGON_MAINNET: ChainId = 0x89;
/// Polygon Mumbai testnet chain ID
pub const POLYGON_TESTNET: ChainId = 80_001;

const HARMONY_MAINNET_BASE: ChainId = 1_666_600_000;
const HARMONY_TESTNET_BASE: ChainId = 1_666_700_000;
const HARMONY_SHARD_COUNT: u32 = 4;

/// Harmony mainnet, shard 0
pub const HARMONY_SHARD0_MAINNET: ChainId = HARMONY_MAINNET_BASE;
/// Harmony testnet, shard 0
pub const HARMONY_SHARD0_TESTNET: ChainId = HARMONY_TESTNET_BASE;
/// Harmony mainnet, shard 1
pub const HARMONY_SHARD1_MAINNET: ChainId = HARMONY_MAINNET_BASE + 1;
/// Harmony testnet, shard 1
pub const HARMONY_SHARD1_TESTNET: ChainId = HARMONY_TESTNET_BASE + 1;
/// Harmony mainnet, shard 2
pub const HARMONY_SHARD2_MAINNET: ChainId = HARMONY_MAINNET_BASE + 2;
/// Harmony testnet, shard 2
pub const HARMONY_SHARD2_TESTNET: ChainId = HARMONY_TESTNET_BASE + 2;
/// Harmony mainnet, shard 3
pub const HARMONY_SHARD3_MAINNET: ChainId = HARMONY_MAINNET_BASE + 3;
/// Harmony testnet, shard 3
pub const HARMONY_SHARD3_TESTNET: ChainId = HARMONY_TESTNET_BASE + 3;

/// The network family a chain belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Network {
    Ethereum,
    BinanceSmartChain,
    Heco,
    Polygon,
    Harmony,
    Private,
}

/// Static description of a known chain.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ChainInfo {
    /// The chain's identifier
    pub chain_id: ChainId,
    /// Stable, human-readable name
    pub name: &'static str,
    /// The network family
    pub network: Network,
    /// Whether the chain is a test network
    pub is_testnet: bool,
    /// The shard encoded in the chain ID, for sharded networks
    pub shard: Option<u32>,
}

const fn chain(
    chain_id: ChainId,
    name: &'static str,
    network: Network,
    is_testnet: bool,
) -> ChainInfo {
    ChainInfo {
        chain_id,
        name,
        network,
        is_testnet,
        shard: None,
    }
}

const fn harmony(chain_id: ChainId, name: &'static str, is_testnet: bool, shard: u32) -> ChainInfo {
    ChainInfo {
        chain_id,
        name,
        network: Network::Harmony,
        is_testnet,
        shard: Some(shard),
    }
}

const KNOWN_CHAINS: &[ChainInfo] = &[
    chain(HOMESTEAD, "homestead", Network::Ethereum, false),
    chain(MORDEN, "morden", Network::Ethereum, true),
    chain(ROPSTEN, "ropsten", Network::Ethereum, true),
    chain(RINKEBY, "rinkeby", Network::Ethereum, true),
    chain(KOVAN, "kovan", Network::Ethereum, true),
    chain(PRIVATE, "private", Network::Private, true),
    chain(BSC_MAINNET, "bsc", Network::BinanceSmartChain, false),
    chain(BSC_TESTNET, "bsc-testnet", Network::BinanceSmartChain, true),
    chain(HECO_MAINNET, "heco", Network::Heco, false),
    chain(HECO_TESTNET, "heco-testnet", Network::Heco, true),
    chain(POLYGON_MAINNET, "polygon", Network::Polygon, false),
    chain(POLYGON_TESTNET, "polygon-mumbai", Network::Polygon, true),
    harmony(HARMONY_SHARD0_MAINNET, "harmony-shard0", false, 0),
    harmony(HARMONY_SHARD0_TESTNET, "harmony-shard0-testnet", true, 0),
    harmony(HARMONY_SHARD1_MAINNET, "harmony-shard1", false, 1),
    harmony(HARMONY_SHARD1_TESTNET, "harmony-shard1-testnet", true, 1),
    harmony(HARMONY_SHARD2_MAINNET, "harmony-shard2", false, 2),
    harmony(HARMONY_SHARD2_TESTNET, "harmony-shard2-testnet", true, 2),
    harmony(HARMONY_SHARD3_MAINNET, "harmony-shard3", false, 3),
    harmony(HARMONY_SHARD3_TESTNET, "harmony-shard3-testnet", true, 3),
];

fn chains_by_id() -> &'static HashMap<ChainId, &'static ChainInfo> {
    static CHAINS: OnceLock<HashMap<ChainId, &'static ChainInfo>> = OnceLock::new();

    CHAINS.get_or_init(|| {
        KNOWN_CHAINS
            .iter()
            .map(|info| (info.chain_id, info))
            .collect()
    })
}

/// Returns the description of the provided chain ID, if it is known.
pub fn chain_info(chain_id: ChainId) -> Option<&'static ChainInfo> {
    chains_by_id().get(&chain_id).copied()
}

/// Returns the human-readable name of the provided chain ID, if it is known.
///
/// [`ANY`] is not a network and has no name.
pub fn chain_name(chain_id: ChainId) -> Option<&'static str> {
    chain_info(chain_id).map(|info| info.name)
}

/// Looks up a chain ID by its name. The comparison is case-insensitive.
pub fn chain_id_by_name(name: &str) -> Option<ChainId> {
    KNOWN_CHAINS
        .iter()
        .find(|info| info.name.eq_ignore_ascii_case(name))
        .map(|info| info.chain_id)
}

/// Returns the shard number that Harmony encodes in its chain IDs.
pub fn harmony_shard(chain_id: ChainId) -> Option<u32> {
    chain_info(chain_id)
        .filter(|info| info.network == Network::Harmony)
        .and_then(|info| info.shard)
}

/// Returns the Harmony chain ID of the provided shard.
pub fn harmony_chain_id(shard: u32, is_testnet: bool) -> Option<ChainId> {
    if shard >= HARMONY_SHARD_COUNT {
        return None;
    }

    let base = if is_testnet {
        HARMONY_TESTNET_BASE
    } else {
        HARMONY_MAINNET_BASE
    };

    Some(base + ChainId::from(shard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_chain_names() {
        assert_eq!(chain_name(HOMESTEAD), Some("homestead"));
        assert_eq!(chain_name(KOVAN), Some("kovan"));
        assert_eq!(chain_name(POLYGON_TESTNET), Some("polygon-mumbai"));
        assert_eq!(chain_name(HARMONY_SHARD2_TESTNET), Some("harmony-shard2-testnet"));
    }

    #[test]
    fn unknown_chain_has_no_name() {
        assert_eq!(chain_name(ANY), None);
        assert_eq!(chain_name(0xdead_beef), None);
        assert_eq!(chain_name(HARMONY_MAINNET_BASE + 4), None);
    }

    #[test]
    fn identifiers_are_unique() {
        assert_eq!(chains_by_id().len(), KNOWN_CHAINS.len());
    }

    #[test]
    fn name_lookup_is_inverse() {
        for info in KNOWN_CHAINS {
            assert_eq!(chain_id_by_name(info.name), Some(info.chain_id));
        }

        assert_eq!(chain_id_by_name("Homestead"), Some(HOMESTEAD));
        assert_eq!(chain_id_by_name("unknown"), None);
    }

    #[test]
    fn harmony_shards() {
        assert_eq!(harmony_shard(HARMONY_SHARD0_MAINNET), Some(0));
        assert_eq!(harmony_shard(HARMONY_SHARD3_TESTNET), Some(3));
        assert_eq!(harmony_shard(HOMESTEAD), None);

        assert_eq!(harmony_chain_id(1, false), Some(HARMONY_SHARD1_MAINNET));
        assert_eq!(harmony_chain_id(2, true), Some(HARMONY_SHARD2_TESTNET));
        assert_eq!(harmony_chain_id(4, false), None);
    }

    #[test]
    fn concurrent_readers_share_table() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| chain_name(BSC_MAINNET)))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some("bsc"));
        }
    }
}
