//! Built-in networks
//!
//! Mainnet is defined on its own. Testnet is the template for testnet4,
//! scalenet and regtest: each copies every testnet field and overrides
//! only the ones listed in its constructor.

use crate::checkpoints::{ForkCheckpoint, VerificationCheckpoint};
use crate::consensus::{DaaAnchor, DaaParams};
use crate::network::{
    DefaultPorts, ExtKeyHeaders, NetworkKind, NetworkParams, NetworkParamsBuilder,
    STANDARD_KEY_PURPOSE,
};
use crate::servers::{resources, PeerDirectoryLoader, TRANSPORT_SSL, TRANSPORT_TCP};
use crate::units::BaseUnits;
use crate::Result;
use std::sync::Arc;

/// The five supported networks, each built once
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    mainnet: Arc<NetworkParams>,
    testnet: Arc<NetworkParams>,
    testnet4: Arc<NetworkParams>,
    scalenet: Arc<NetworkParams>,
    regtest: Arc<NetworkParams>,
}

impl NetworkRegistry {
    /// Build every network, reading peer directories through `loader`
    pub fn build(loader: &PeerDirectoryLoader) -> Result<Self> {
        let testnet = testnet(loader)?;
        let registry = Self {
            mainnet: Arc::new(mainnet(loader)?),
            testnet4: Arc::new(testnet4(&testnet, loader)?),
            scalenet: Arc::new(scalenet(&testnet, loader)?),
            regtest: Arc::new(regtest(&testnet, loader)?),
            testnet: Arc::new(testnet),
        };
        tracing::debug!("Network registry built ({:?})", loader);
        Ok(registry)
    }

    /// Build every network with the peer directories bundled in the crate
    pub fn builtin() -> Result<Self> {
        Self::build(&PeerDirectoryLoader::Bundled)
    }

    /// Parameters of one network
    pub fn get(&self, kind: NetworkKind) -> &Arc<NetworkParams> {
        match kind {
            NetworkKind::Mainnet => &self.mainnet,
            NetworkKind::Testnet => &self.testnet,
            NetworkKind::Testnet4 => &self.testnet4,
            NetworkKind::Scalenet => &self.scalenet,
            NetworkKind::Regtest => &self.regtest,
        }
    }

    /// Parameters of a network by name
    pub fn by_name(&self, name: &str) -> Result<&Arc<NetworkParams>> {
        let kind: NetworkKind = name.parse()?;
        Ok(self.get(kind))
    }

    /// All networks, mainnet first
    pub fn iter(&self) -> impl Iterator<Item = &Arc<NetworkParams>> {
        NetworkKind::ALL.into_iter().map(move |kind| self.get(kind))
    }

    /// Which registered network this exact instance is.
    ///
    /// Identity, not equality: a structurally identical copy built
    /// elsewhere is not registered.
    pub fn kind_of(&self, params: &Arc<NetworkParams>) -> Option<NetworkKind> {
        let kind = params.kind();
        Arc::ptr_eq(self.get(kind), params).then_some(kind)
    }

    /// Pairs of networks sharing a standard extended key version.
    ///
    /// A key serialized for one network of a pair would decode as valid on
    /// the other. The test chains share testnet's tprv/tpub versions.
    pub fn extended_key_header_collisions(&self) -> Vec<(NetworkKind, NetworkKind)> {
        let networks: Vec<_> = self.iter().collect();
        let mut collisions = Vec::new();
        for (i, a) in networks.iter().enumerate() {
            for b in &networks[i + 1..] {
                if a.standard_xprv_header() == b.standard_xprv_header()
                    || a.standard_xpub_header() == b.standard_xpub_header()
                {
                    collisions.push((a.kind(), b.kind()));
                }
            }
        }
        collisions
    }
}

fn key_headers(version: u32) -> ExtKeyHeaders {
    ExtKeyHeaders::from([(STANDARD_KEY_PURPOSE.to_string(), version)])
}

fn ports(tcp: u16, ssl: u16) -> DefaultPorts {
    DefaultPorts::from([
        (TRANSPORT_TCP.to_string(), tcp),
        (TRANSPORT_SSL.to_string(), ssl),
    ])
}

fn units(table: &[(&str, u8)]) -> BaseUnits {
    table
        .iter()
        .map(|(name, dp)| (name.to_string(), *dp))
        .collect()
}

// Anchor block shared by the mainnet-derived test chains
const ANCHOR_BITS: u32 = 453_224_288;
const ANCHOR_PREV_TIME: u64 = 1_657_404_650;

fn mainnet(loader: &PeerDirectoryLoader) -> Result<NetworkParams> {
    NetworkParamsBuilder::new()
        .kind(NetworkKind::Mainnet)
        .title("Electron Radiant")
        .testnet(false)
        .regtest(false)
        .wif_prefix(0x80)
        .addrtype_p2pkh(0)
        .addrtype_p2sh(5)
        .cashaddr_prefix("radaddr")
        .rpa_prefix("paycode")
        .headers_url("http://bitcoincash.com/files/blockchain_headers")
        .genesis("0000000065d8ed5d8be28d6876b3ffb660ac2a6c0ca59e437e1f7a6f4e003fb4")
        .fork_checkpoint(ForkCheckpoint::new(
            478_559,
            "000000000000000000651ef99cb9fcbe0dadde1d424bd9f15ff20136191a5eec",
        ))
        // Nov 13 2017 HF, last block mined on the old DAA
        .cw144_height(504_031)
        .verification_checkpoint(Some(VerificationCheckpoint::new(
            18_144,
            "6cafe6844c6f42085778412ce6415e810cbfb030a505ba9731e29bde72097421",
        )))
        .daa(DaaParams::mainnet(Some(DaaAnchor {
            height: 18_206,
            bits: ANCHOR_BITS,
            prev_time: ANCHOR_PREV_TIME,
        })))
        .xprv_headers(key_headers(0x0488_ade4))
        .xpub_headers(key_headers(0x0488_b21e))
        .default_ports(ports(50001, 50002))
        .default_servers(loader.load(resources::MAINNET))
        .base_units(units(&[("RXD", 8), ("mRXD", 5), ("photons", 0)]))
        .default_unit("RXD")
        .build()
}

fn testnet(loader: &PeerDirectoryLoader) -> Result<NetworkParams> {
    NetworkParamsBuilder::new()
        .kind(NetworkKind::Testnet)
        .title("Electron Radiant Testnet")
        .testnet(true)
        .regtest(false)
        .wif_prefix(0xef)
        .addrtype_p2pkh(111)
        .addrtype_p2sh(196)
        .cashaddr_prefix("bchtest")
        .rpa_prefix("paycodetest")
        .headers_url("http://bitcoincash.com/files/testnet_headers")
        .genesis("000000000933ea01ad0ee984209779baaec3ced90fa3f408719526f8d77f4943")
        .fork_checkpoint(ForkCheckpoint::new(
            1_155_876,
            "00000000000e38fef93ed9582a7df43815d5c2ba9fd37ef70c9a0ea4a285b8f5",
        ))
        .cw144_height(1_188_697)
        .verification_checkpoint(Some(VerificationCheckpoint::new(
            32_000,
            "b09cbd1d549118c26c8be8734beba50714847b29f78f29f4c03393ffb62e6c2a",
        )))
        .daa(DaaParams::testnet(Some(DaaAnchor {
            height: 33_000,
            bits: ANCHOR_BITS,
            prev_time: ANCHOR_PREV_TIME,
        })))
        .xprv_headers(key_headers(0x0435_8394))
        .xpub_headers(key_headers(0x0435_87cf))
        .default_ports(ports(51001, 51002))
        .default_servers(loader.load(resources::TESTNET))
        .base_units(units(&[("tRXD", 8), ("mtRXD", 5), ("tbits", 2)]))
        .default_unit("tRXD")
        .build()
}

fn testnet4(template: &NetworkParams, loader: &PeerDirectoryLoader) -> Result<NetworkParams> {
    NetworkParamsBuilder::from_template(template)
        .kind(NetworkKind::Testnet4)
        .genesis("000000001dd410c49a788668ce26751718cc797474d3152a5fc073dd44fd9f7b")
        .title("Electron Cash Testnet4")
        .headers_url("http://bitcoincash.com/files/testnet4_headers")
        .default_servers(loader.load(resources::TESTNET4))
        .default_ports(ports(62001, 62002))
        .fork_checkpoint(ForkCheckpoint::new(
            6,
            "00000000d71b9b1f7e13b0c9b218a12df6526c1bcd1b667764b8693ae9a413cb",
        ))
        .cw144_height(3000)
        .verification_checkpoint(Some(VerificationCheckpoint::new(
            68_611,
            "e4cd956daecf2a1d2894954bb479f09e6d2d488e470ed59e1af6a329170597d6",
        )))
        .daa(DaaParams::testnet(Some(DaaAnchor {
            height: 16_844,
            bits: ANCHOR_BITS,
            prev_time: ANCHOR_PREV_TIME,
        })))
        .build()
}

fn scalenet(template: &NetworkParams, loader: &PeerDirectoryLoader) -> Result<NetworkParams> {
    NetworkParamsBuilder::from_template(template)
        .kind(NetworkKind::Scalenet)
        .genesis("00000000e6453dc2dfe1ffa19023f86002eb11dbb8e87d0291a4599f0430be52")
        .title("Electron Cash Scalenet")
        .base_units(units(&[("sRXD", 8), ("msRXD", 5), ("sbits", 2)]))
        // Shipped as the testnet unit; not in scalenet's own table
        .default_unit("tRXD")
        .headers_url("http://bitcoincash.com/files/scalenet_headers")
        .default_servers(loader.load(resources::SCALENET))
        .default_ports(ports(63001, 63002))
        .fork_checkpoint(ForkCheckpoint::new(
            6,
            "000000000e16730d293050fc5fe5b0978b858f5d9d91192a5ca2793902493597",
        ))
        .cw144_height(3000)
        .verification_checkpoint(Some(VerificationCheckpoint::new(
            2016,
            "41eb32849a353fcb408c8b25e84578c714dbdc5ee774d0fbe25e85755250df6a",
        )))
        // Mainnet half-life; the anchor lies after the checkpoint and is
        // computed by the header verifier
        .daa(DaaParams::mainnet(None))
        .build()
}

fn regtest(template: &NetworkParams, loader: &PeerDirectoryLoader) -> Result<NetworkParams> {
    let genesis = "000000002008a2f4a76b850a838ae084994c200dc2fd354f73102298fe063a91";
    NetworkParamsBuilder::from_template(template)
        .kind(NetworkKind::Regtest)
        .genesis(genesis)
        .title("Electron Radiant Regtest")
        .cashaddr_prefix("radreg")
        .regtest(true)
        .fork_checkpoint(ForkCheckpoint::at_genesis(genesis))
        .verification_checkpoint(Some(VerificationCheckpoint::height_only(100)))
        .daa(DaaParams::testnet(None))
        .default_servers(loader.load(resources::REGTEST))
        .build()
}

/// Label used in log lines and errors
pub(crate) fn describe(params: &NetworkParams) -> String {
    format!("{} ({})", params.title(), params.kind())
}
