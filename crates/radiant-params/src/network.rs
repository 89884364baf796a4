//! Radiant network definitions

use crate::checkpoints::{ForkCheckpoint, VerificationCheckpoint};
use crate::consensus::{
    DaaParams, LEGACY_POW_RETARGET_BLOCKS, LEGACY_POW_TARGET_INTERVAL, LEGACY_POW_TARGET_TIMESPAN,
};
use crate::servers::{ServerMap, TRANSPORT_SSL, TRANSPORT_TCP};
use crate::units::BaseUnits;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Derivation purpose → BIP32 extended key version
pub type ExtKeyHeaders = BTreeMap<String, u32>;

/// Transport tag → default port
pub type DefaultPorts = BTreeMap<String, u16>;

/// Label of the plain BIP32 derivation purpose (xprv/xpub, tprv/tpub)
pub const STANDARD_KEY_PURPOSE: &str = "standard";

/// Network type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    /// Mainnet
    Mainnet,
    /// Testnet (template for the other test chains)
    Testnet,
    /// Testnet4
    Testnet4,
    /// Scalenet
    Scalenet,
    /// Regtest (local development)
    Regtest,
}

impl NetworkKind {
    /// Every supported network, mainnet first
    pub const ALL: [NetworkKind; 5] = [
        NetworkKind::Mainnet,
        NetworkKind::Testnet,
        NetworkKind::Testnet4,
        NetworkKind::Scalenet,
        NetworkKind::Regtest,
    ];

    /// Short lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            NetworkKind::Mainnet => "mainnet",
            NetworkKind::Testnet => "testnet",
            NetworkKind::Testnet4 => "testnet4",
            NetworkKind::Scalenet => "scalenet",
            NetworkKind::Regtest => "regtest",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkKind::Mainnet),
            "testnet" | "test" => Ok(NetworkKind::Testnet),
            "testnet4" => Ok(NetworkKind::Testnet4),
            "scalenet" => Ok(NetworkKind::Scalenet),
            "regtest" => Ok(NetworkKind::Regtest),
            _ => Err(Error::UnknownNetwork(s.to_string())),
        }
    }
}

/// Complete, immutable constant set of one network.
///
/// Instances only come out of [`NetworkParamsBuilder::build`], which
/// checks the set for internal consistency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkParams {
    kind: NetworkKind,
    title: String,
    testnet: bool,
    regtest: bool,
    wif_prefix: u8,
    addrtype_p2pkh: u8,
    addrtype_p2sh: u8,
    cashaddr_prefix: String,
    rpa_prefix: String,
    headers_url: String,
    genesis: String,
    fork_checkpoint: ForkCheckpoint,
    cw144_height: u32,
    verification_checkpoint: Option<VerificationCheckpoint>,
    daa: DaaParams,
    xprv_headers: ExtKeyHeaders,
    xpub_headers: ExtKeyHeaders,
    default_ports: DefaultPorts,
    default_servers: ServerMap,
    base_units: BaseUnits,
    default_unit: String,
}

impl NetworkParams {
    /// Which network this is
    pub fn kind(&self) -> NetworkKind {
        self.kind
    }

    /// Human-readable name
    pub fn title(&self) -> &str {
        &self.title
    }

    /// True for every test chain, regtest included
    pub fn is_testnet(&self) -> bool {
        self.testnet
    }

    /// True only for regtest
    pub fn is_regtest(&self) -> bool {
        self.regtest
    }

    /// WIF private key version byte
    pub fn wif_prefix(&self) -> u8 {
        self.wif_prefix
    }

    /// P2PKH address version byte
    pub fn addrtype_p2pkh(&self) -> u8 {
        self.addrtype_p2pkh
    }

    /// P2SH address version byte
    pub fn addrtype_p2sh(&self) -> u8 {
        self.addrtype_p2sh
    }

    /// CashAddr human-readable prefix
    pub fn cashaddr_prefix(&self) -> &str {
        &self.cashaddr_prefix
    }

    /// Reusable payment address (paycode) prefix
    pub fn rpa_prefix(&self) -> &str {
        &self.rpa_prefix
    }

    /// Bulk headers download URL. Not fetched by the client anymore.
    pub fn headers_url(&self) -> &str {
        &self.headers_url
    }

    /// Genesis block hash (hex)
    pub fn genesis(&self) -> &str {
        &self.genesis
    }

    /// Chain split checkpoint
    pub fn fork_checkpoint(&self) -> &ForkCheckpoint {
        &self.fork_checkpoint
    }

    /// Height of the last block mined under the legacy (CW-144) DAA
    pub fn cw144_height(&self) -> u32 {
        self.cw144_height
    }

    /// Header-chain verification checkpoint
    pub fn verification_checkpoint(&self) -> Option<&VerificationCheckpoint> {
        self.verification_checkpoint.as_ref()
    }

    /// Settings for the ASERT DAA
    pub fn daa(&self) -> &DaaParams {
        &self.daa
    }

    /// Legacy retarget timespan in seconds
    pub fn legacy_pow_target_timespan(&self) -> u32 {
        LEGACY_POW_TARGET_TIMESPAN
    }

    /// Legacy target block interval in seconds
    pub fn legacy_pow_target_interval(&self) -> u32 {
        LEGACY_POW_TARGET_INTERVAL
    }

    /// Blocks between legacy retargets
    pub fn legacy_pow_retarget_blocks(&self) -> u32 {
        LEGACY_POW_RETARGET_BLOCKS
    }

    /// Extended private key versions
    pub fn xprv_headers(&self) -> &ExtKeyHeaders {
        &self.xprv_headers
    }

    /// Extended public key versions
    pub fn xpub_headers(&self) -> &ExtKeyHeaders {
        &self.xpub_headers
    }

    /// Version of a standard extended private key
    pub fn standard_xprv_header(&self) -> u32 {
        // presence is checked by the builder
        self.xprv_headers
            .get(STANDARD_KEY_PURPOSE)
            .copied()
            .unwrap_or_default()
    }

    /// Version of a standard extended public key
    pub fn standard_xpub_header(&self) -> u32 {
        self.xpub_headers
            .get(STANDARD_KEY_PURPOSE)
            .copied()
            .unwrap_or_default()
    }

    /// Default port per transport tag
    pub fn default_ports(&self) -> &DefaultPorts {
        &self.default_ports
    }

    /// Default port for one transport tag
    pub fn default_port(&self, transport: &str) -> Option<u16> {
        self.default_ports.get(transport).copied()
    }

    /// Bundled peer directory
    pub fn default_servers(&self) -> &ServerMap {
        &self.default_servers
    }

    /// Display units and their decimal shift
    pub fn base_units(&self) -> &BaseUnits {
        &self.base_units
    }

    /// Default display unit label
    pub fn default_unit(&self) -> &str {
        &self.default_unit
    }

    /// Whether `default_unit` is one of this network's own units.
    ///
    /// Scalenet ships with the testnet default unit while carrying its own
    /// unit table, so this is false there.
    pub fn default_unit_is_listed(&self) -> bool {
        self.base_units.contains_key(&self.default_unit)
    }
}

/// Builder for [`NetworkParams`].
///
/// Start from [`NetworkParamsBuilder::new`] for a network defined from
/// scratch, or from [`NetworkParamsBuilder::from_template`] to copy every
/// field of an existing network and override the ones that differ.
#[derive(Debug, Clone, Default)]
pub struct NetworkParamsBuilder {
    kind: Option<NetworkKind>,
    title: Option<String>,
    testnet: Option<bool>,
    regtest: Option<bool>,
    wif_prefix: Option<u8>,
    addrtype_p2pkh: Option<u8>,
    addrtype_p2sh: Option<u8>,
    cashaddr_prefix: Option<String>,
    rpa_prefix: Option<String>,
    headers_url: Option<String>,
    genesis: Option<String>,
    fork_checkpoint: Option<ForkCheckpoint>,
    cw144_height: Option<u32>,
    verification_checkpoint: Option<Option<VerificationCheckpoint>>,
    daa: Option<DaaParams>,
    xprv_headers: Option<ExtKeyHeaders>,
    xpub_headers: Option<ExtKeyHeaders>,
    default_ports: Option<DefaultPorts>,
    default_servers: Option<ServerMap>,
    base_units: Option<BaseUnits>,
    default_unit: Option<String>,
}

macro_rules! setters {
    ($($(#[$doc:meta])* $name:ident: $ty:ty),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(mut self, $name: $ty) -> Self {
                self.$name = Some($name);
                self
            }
        )*
    };
}

impl NetworkParamsBuilder {
    /// Empty builder; every field must be set before `build`
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder holding a full copy of `template`
    pub fn from_template(template: &NetworkParams) -> Self {
        let t = template.clone();
        Self {
            kind: Some(t.kind),
            title: Some(t.title),
            testnet: Some(t.testnet),
            regtest: Some(t.regtest),
            wif_prefix: Some(t.wif_prefix),
            addrtype_p2pkh: Some(t.addrtype_p2pkh),
            addrtype_p2sh: Some(t.addrtype_p2sh),
            cashaddr_prefix: Some(t.cashaddr_prefix),
            rpa_prefix: Some(t.rpa_prefix),
            headers_url: Some(t.headers_url),
            genesis: Some(t.genesis),
            fork_checkpoint: Some(t.fork_checkpoint),
            cw144_height: Some(t.cw144_height),
            verification_checkpoint: Some(t.verification_checkpoint),
            daa: Some(t.daa),
            xprv_headers: Some(t.xprv_headers),
            xpub_headers: Some(t.xpub_headers),
            default_ports: Some(t.default_ports),
            default_servers: Some(t.default_servers),
            base_units: Some(t.base_units),
            default_unit: Some(t.default_unit),
        }
    }

    setters! {
        /// Set the network kind
        kind: NetworkKind,
        /// Set the testnet flag
        testnet: bool,
        /// Set the regtest flag
        regtest: bool,
        /// Set the WIF version byte
        wif_prefix: u8,
        /// Set the P2PKH version byte
        addrtype_p2pkh: u8,
        /// Set the P2SH version byte
        addrtype_p2sh: u8,
        /// Set the fork checkpoint
        fork_checkpoint: ForkCheckpoint,
        /// Set the CW-144 height
        cw144_height: u32,
        /// Set the verification checkpoint
        verification_checkpoint: Option<VerificationCheckpoint>,
        /// Set the DAA settings
        daa: DaaParams,
        /// Set the extended private key versions
        xprv_headers: ExtKeyHeaders,
        /// Set the extended public key versions
        xpub_headers: ExtKeyHeaders,
        /// Set the default ports
        default_ports: DefaultPorts,
        /// Set the peer directory
        default_servers: ServerMap,
        /// Set the display unit table
        base_units: BaseUnits,
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the CashAddr prefix
    pub fn cashaddr_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cashaddr_prefix = Some(prefix.into());
        self
    }

    /// Set the paycode prefix
    pub fn rpa_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.rpa_prefix = Some(prefix.into());
        self
    }

    /// Set the headers URL
    pub fn headers_url(mut self, url: impl Into<String>) -> Self {
        self.headers_url = Some(url.into());
        self
    }

    /// Set the genesis hash
    pub fn genesis(mut self, genesis: impl Into<String>) -> Self {
        self.genesis = Some(genesis.into());
        self
    }

    /// Set the default display unit
    pub fn default_unit(mut self, unit: impl Into<String>) -> Self {
        self.default_unit = Some(unit.into());
        self
    }

    /// Check every field and produce the parameter set
    pub fn build(self) -> Result<NetworkParams> {
        let params = NetworkParams {
            kind: self.kind.ok_or(Error::MissingField("kind"))?,
            title: self.title.ok_or(Error::MissingField("title"))?,
            testnet: self.testnet.ok_or(Error::MissingField("testnet"))?,
            regtest: self.regtest.ok_or(Error::MissingField("regtest"))?,
            wif_prefix: self.wif_prefix.ok_or(Error::MissingField("wif_prefix"))?,
            addrtype_p2pkh: self
                .addrtype_p2pkh
                .ok_or(Error::MissingField("addrtype_p2pkh"))?,
            addrtype_p2sh: self
                .addrtype_p2sh
                .ok_or(Error::MissingField("addrtype_p2sh"))?,
            cashaddr_prefix: self
                .cashaddr_prefix
                .ok_or(Error::MissingField("cashaddr_prefix"))?,
            rpa_prefix: self.rpa_prefix.ok_or(Error::MissingField("rpa_prefix"))?,
            headers_url: self.headers_url.ok_or(Error::MissingField("headers_url"))?,
            genesis: self.genesis.ok_or(Error::MissingField("genesis"))?,
            fork_checkpoint: self
                .fork_checkpoint
                .ok_or(Error::MissingField("fork_checkpoint"))?,
            cw144_height: self.cw144_height.ok_or(Error::MissingField("cw144_height"))?,
            verification_checkpoint: self
                .verification_checkpoint
                .ok_or(Error::MissingField("verification_checkpoint"))?,
            daa: self.daa.ok_or(Error::MissingField("daa"))?,
            xprv_headers: self.xprv_headers.ok_or(Error::MissingField("xprv_headers"))?,
            xpub_headers: self.xpub_headers.ok_or(Error::MissingField("xpub_headers"))?,
            default_ports: self
                .default_ports
                .ok_or(Error::MissingField("default_ports"))?,
            default_servers: self
                .default_servers
                .ok_or(Error::MissingField("default_servers"))?,
            base_units: self.base_units.ok_or(Error::MissingField("base_units"))?,
            default_unit: self.default_unit.ok_or(Error::MissingField("default_unit"))?,
        };
        params.validate()?;
        Ok(params)
    }
}

impl NetworkParams {
    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Error::InvalidParams {
            network: self.title.clone(),
            reason,
        };

        if self.title.trim().is_empty() {
            return Err(invalid("title is empty".to_string()));
        }
        if self.regtest && !self.testnet {
            return Err(invalid("regtest network must also be a testnet".to_string()));
        }
        if self.addrtype_p2pkh == self.addrtype_p2sh {
            return Err(invalid(format!(
                "P2PKH and P2SH share version byte {}",
                self.addrtype_p2pkh
            )));
        }
        if self.cashaddr_prefix.is_empty() || self.rpa_prefix.is_empty() {
            return Err(invalid("address prefixes must be non-empty".to_string()));
        }
        if self.cashaddr_prefix == self.rpa_prefix {
            return Err(invalid(format!(
                "cashaddr and paycode both use prefix {}",
                self.cashaddr_prefix
            )));
        }

        check_hash(&self.genesis).map_err(|e| invalid(format!("genesis: {}", e)))?;
        check_hash(&self.fork_checkpoint.hash)
            .map_err(|e| invalid(format!("fork checkpoint: {}", e)))?;
        if self.fork_checkpoint.height == 0 && self.fork_checkpoint.hash != self.genesis {
            return Err(invalid(
                "fork checkpoint at height 0 must be the genesis block".to_string(),
            ));
        }
        if let Some(root) = self
            .verification_checkpoint
            .as_ref()
            .and_then(|cp| cp.merkle_root.as_deref())
        {
            check_hash(root).map_err(|e| invalid(format!("verification root: {}", e)))?;
        }
        if let Some(anchor) = &self.daa.anchor {
            if anchor.height == 0 {
                return Err(invalid("DAA anchor height must be positive".to_string()));
            }
        }

        if !self.xprv_headers.contains_key(STANDARD_KEY_PURPOSE)
            || !self.xpub_headers.contains_key(STANDARD_KEY_PURPOSE)
        {
            return Err(invalid("missing standard extended key header".to_string()));
        }
        for transport in [TRANSPORT_TCP, TRANSPORT_SSL] {
            if !self.default_ports.contains_key(transport) {
                return Err(invalid(format!("no default port for transport {}", transport)));
            }
        }
        if self.base_units.is_empty() {
            return Err(invalid("unit table is empty".to_string()));
        }
        if !self.default_unit_is_listed() {
            tracing::warn!(
                "{}: default unit {} is not in its unit table {:?}",
                self.title,
                self.default_unit,
                self.base_units.keys().collect::<Vec<_>>()
            );
        }

        Ok(())
    }
}

fn check_hash(value: &str) -> std::result::Result<(), String> {
    let bytes = hex::decode(value).map_err(|e| format!("{} is not hex ({})", value, e))?;
    if bytes.len() != 32 {
        return Err(format!("{} is {} bytes, expected 32", value, bytes.len()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::DaaAnchor;

    const GENESIS: &str = "0000000065d8ed5d8be28d6876b3ffb660ac2a6c0ca59e437e1f7a6f4e003fb4";

    fn sample() -> NetworkParamsBuilder {
        NetworkParamsBuilder::new()
            .kind(NetworkKind::Mainnet)
            .title("Sample")
            .testnet(false)
            .regtest(false)
            .wif_prefix(0x80)
            .addrtype_p2pkh(0)
            .addrtype_p2sh(5)
            .cashaddr_prefix("radaddr")
            .rpa_prefix("paycode")
            .headers_url("")
            .genesis(GENESIS)
            .fork_checkpoint(ForkCheckpoint::at_genesis(GENESIS))
            .cw144_height(0)
            .verification_checkpoint(None)
            .daa(DaaParams::mainnet(None))
            .xprv_headers(BTreeMap::from([(STANDARD_KEY_PURPOSE.to_string(), 0x0488ade4)]))
            .xpub_headers(BTreeMap::from([(STANDARD_KEY_PURPOSE.to_string(), 0x0488b21e)]))
            .default_ports(BTreeMap::from([
                (TRANSPORT_TCP.to_string(), 50001),
                (TRANSPORT_SSL.to_string(), 50002),
            ]))
            .default_servers(ServerMap::new())
            .base_units(BTreeMap::from([("RXD".to_string(), 8)]))
            .default_unit("RXD")
    }

    fn reason(err: Error) -> String {
        match err {
            Error::InvalidParams { reason, .. } => reason,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_complete() {
        let params = sample().build().unwrap();
        assert_eq!(params.kind(), NetworkKind::Mainnet);
        assert_eq!(params.standard_xprv_header(), 0x0488ade4);
        assert_eq!(params.default_port("s"), Some(50002));
        assert_eq!(params.legacy_pow_retarget_blocks(), 2016);
        assert!(params.default_unit_is_listed());
    }

    #[test]
    fn test_missing_field() {
        let mut builder = sample();
        builder.genesis = None;
        assert!(matches!(builder.build(), Err(Error::MissingField("genesis"))));

        assert!(matches!(
            NetworkParamsBuilder::new().build(),
            Err(Error::MissingField("kind"))
        ));
    }

    #[test]
    fn test_template_copy_is_verbatim() {
        let base = sample().build().unwrap();
        let copy = NetworkParamsBuilder::from_template(&base).build().unwrap();
        assert_eq!(copy, base);

        let overridden = NetworkParamsBuilder::from_template(&base)
            .title("Other")
            .build()
            .unwrap();
        assert_eq!(overridden.title(), "Other");
        assert_eq!(overridden.genesis(), base.genesis());
    }

    #[test]
    fn test_regtest_requires_testnet() {
        let err = sample().regtest(true).build().unwrap_err();
        assert!(reason(err).contains("testnet"));
    }

    #[test]
    fn test_address_bytes_must_differ() {
        let err = sample().addrtype_p2sh(0).build().unwrap_err();
        assert!(reason(err).contains("P2PKH"));
    }

    #[test]
    fn test_genesis_must_be_32_byte_hex() {
        assert!(sample().genesis("abcd").build().is_err());
        assert!(sample().genesis("zz".repeat(32)).build().is_err());
    }

    #[test]
    fn test_fork_at_height_zero_must_be_genesis() {
        let other = "000000000933ea01ad0ee984209779baaec3ced90fa3f408719526f8d77f4943";
        let err = sample()
            .fork_checkpoint(ForkCheckpoint::new(0, other))
            .build()
            .unwrap_err();
        assert!(reason(err).contains("genesis"));
    }

    #[test]
    fn test_anchor_height_positive() {
        let anchor = DaaAnchor {
            height: 0,
            bits: 453224288,
            prev_time: 1657404650,
        };
        assert!(sample().daa(DaaParams::mainnet(Some(anchor))).build().is_err());
    }

    #[test]
    fn test_requires_standard_headers_and_ports() {
        assert!(sample().xprv_headers(ExtKeyHeaders::new()).build().is_err());
        assert!(sample()
            .default_ports(BTreeMap::from([(TRANSPORT_TCP.to_string(), 50001)]))
            .build()
            .is_err());
    }

    #[test]
    fn test_unlisted_default_unit_is_kept() {
        let params = sample().default_unit("tRXD").build().unwrap();
        assert_eq!(params.default_unit(), "tRXD");
        assert!(!params.default_unit_is_listed());
    }

    #[test]
    fn test_network_kind_names() {
        for kind in NetworkKind::ALL {
            assert_eq!(kind.name().parse::<NetworkKind>().unwrap(), kind);
        }
        assert_eq!("MAIN".parse::<NetworkKind>().unwrap(), NetworkKind::Mainnet);
        assert!(matches!(
            "signet".parse::<NetworkKind>(),
            Err(Error::UnknownNetwork(_))
        ));
    }
}
