//! Read-only constants view for older call sites
//!
//! Plugins written against the flat `NetworkConstants` object keep working
//! through [`LegacyConstants`]. Every read goes to the network that is
//! active at the time of the call; writes are always refused. New code
//! should use [`crate::selector::active`] instead.

use crate::consensus::DaaParams;
use crate::network::{DefaultPorts, ExtKeyHeaders, NetworkParams};
use crate::selector::{self, NetworkSelector};
use crate::servers::ServerMap;
use crate::units::BaseUnits;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Fields exposed by the legacy constants object, under their legacy names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum LegacyField {
    Title,
    Testnet,
    Regtest,
    WifPrefix,
    AddrtypeP2pkh,
    AddrtypeP2sh,
    CashaddrPrefix,
    RpaPrefix,
    HeadersUrl,
    Genesis,
    ForkBlockHeight,
    ForkBlockHash,
    Cw144Height,
    VerificationBlockHeight,
    VerificationBlockMerkleRoot,
    AsertDaa,
    LegacyPowTargetTimespan,
    LegacyPowTargetInterval,
    LegacyPowRetargetBlocks,
    XprvHeaders,
    XpubHeaders,
    DefaultPorts,
    DefaultServers,
    BaseUnits,
    DefaultUnit,
}

impl LegacyField {
    /// Every field, in declaration order
    pub const ALL: [LegacyField; 25] = [
        LegacyField::Title,
        LegacyField::Testnet,
        LegacyField::Regtest,
        LegacyField::WifPrefix,
        LegacyField::AddrtypeP2pkh,
        LegacyField::AddrtypeP2sh,
        LegacyField::CashaddrPrefix,
        LegacyField::RpaPrefix,
        LegacyField::HeadersUrl,
        LegacyField::Genesis,
        LegacyField::ForkBlockHeight,
        LegacyField::ForkBlockHash,
        LegacyField::Cw144Height,
        LegacyField::VerificationBlockHeight,
        LegacyField::VerificationBlockMerkleRoot,
        LegacyField::AsertDaa,
        LegacyField::LegacyPowTargetTimespan,
        LegacyField::LegacyPowTargetInterval,
        LegacyField::LegacyPowRetargetBlocks,
        LegacyField::XprvHeaders,
        LegacyField::XpubHeaders,
        LegacyField::DefaultPorts,
        LegacyField::DefaultServers,
        LegacyField::BaseUnits,
        LegacyField::DefaultUnit,
    ];

    /// Legacy attribute name
    pub const fn name(self) -> &'static str {
        match self {
            LegacyField::Title => "TITLE",
            LegacyField::Testnet => "TESTNET",
            LegacyField::Regtest => "REGTEST",
            LegacyField::WifPrefix => "WIF_PREFIX",
            LegacyField::AddrtypeP2pkh => "ADDRTYPE_P2PKH",
            LegacyField::AddrtypeP2sh => "ADDRTYPE_P2SH",
            LegacyField::CashaddrPrefix => "CASHADDR_PREFIX",
            LegacyField::RpaPrefix => "RPA_PREFIX",
            LegacyField::HeadersUrl => "HEADERS_URL",
            LegacyField::Genesis => "GENESIS",
            LegacyField::ForkBlockHeight => "BITCOIN_CASH_FORK_BLOCK_HEIGHT",
            LegacyField::ForkBlockHash => "BITCOIN_CASH_FORK_BLOCK_HASH",
            LegacyField::Cw144Height => "CW144_HEIGHT",
            LegacyField::VerificationBlockHeight => "VERIFICATION_BLOCK_HEIGHT",
            LegacyField::VerificationBlockMerkleRoot => "VERIFICATION_BLOCK_MERKLE_ROOT",
            LegacyField::AsertDaa => "asert_daa",
            LegacyField::LegacyPowTargetTimespan => "LEGACY_POW_TARGET_TIMESPAN",
            LegacyField::LegacyPowTargetInterval => "LEGACY_POW_TARGET_INTERVAL",
            LegacyField::LegacyPowRetargetBlocks => "LEGACY_POW_RETARGET_BLOCKS",
            LegacyField::XprvHeaders => "XPRV_HEADERS",
            LegacyField::XpubHeaders => "XPUB_HEADERS",
            LegacyField::DefaultPorts => "DEFAULT_PORTS",
            LegacyField::DefaultServers => "DEFAULT_SERVERS",
            LegacyField::BaseUnits => "BASE_UNITS",
            LegacyField::DefaultUnit => "DEFAULT_UNIT",
        }
    }
}

impl fmt::Display for LegacyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LegacyField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LegacyField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// Value of a legacy field
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum LegacyValue {
    /// Optional field that is unset on this network
    None,
    Bool(bool),
    Int(u64),
    Text(String),
    KeyHeaders(ExtKeyHeaders),
    Ports(DefaultPorts),
    Servers(ServerMap),
    Units(BaseUnits),
    Daa(DaaParams),
}

/// Flat constants view over the active network.
///
/// Holds no copy of any parameter: each accessor asks the selector for the
/// active network when called.
#[derive(Debug, Clone, Copy)]
pub struct LegacyConstants<'a> {
    selector: &'a NetworkSelector,
}

impl LegacyConstants<'static> {
    /// View over the process-wide selector
    pub fn global() -> Self {
        Self::new(selector::global())
    }
}

impl<'a> LegacyConstants<'a> {
    /// View over `selector`
    pub fn new(selector: &'a NetworkSelector) -> Self {
        Self { selector }
    }

    fn net(&self) -> Arc<NetworkParams> {
        self.selector.active()
    }

    /// TITLE
    pub fn title(&self) -> String {
        self.net().title().to_string()
    }

    /// TESTNET
    pub fn testnet(&self) -> bool {
        self.net().is_testnet()
    }

    /// REGTEST
    pub fn regtest(&self) -> bool {
        self.net().is_regtest()
    }

    /// WIF_PREFIX
    pub fn wif_prefix(&self) -> u8 {
        self.net().wif_prefix()
    }

    /// ADDRTYPE_P2PKH
    pub fn addrtype_p2pkh(&self) -> u8 {
        self.net().addrtype_p2pkh()
    }

    /// ADDRTYPE_P2SH
    pub fn addrtype_p2sh(&self) -> u8 {
        self.net().addrtype_p2sh()
    }

    /// CASHADDR_PREFIX
    pub fn cashaddr_prefix(&self) -> String {
        self.net().cashaddr_prefix().to_string()
    }

    /// RPA_PREFIX
    pub fn rpa_prefix(&self) -> String {
        self.net().rpa_prefix().to_string()
    }

    /// HEADERS_URL
    pub fn headers_url(&self) -> String {
        self.net().headers_url().to_string()
    }

    /// GENESIS
    pub fn genesis(&self) -> String {
        self.net().genesis().to_string()
    }

    /// BITCOIN_CASH_FORK_BLOCK_HEIGHT
    pub fn fork_block_height(&self) -> u32 {
        self.net().fork_checkpoint().height
    }

    /// BITCOIN_CASH_FORK_BLOCK_HASH
    pub fn fork_block_hash(&self) -> String {
        self.net().fork_checkpoint().hash.clone()
    }

    /// CW144_HEIGHT
    pub fn cw144_height(&self) -> u32 {
        self.net().cw144_height()
    }

    /// VERIFICATION_BLOCK_HEIGHT
    pub fn verification_block_height(&self) -> Option<u32> {
        self.net().verification_checkpoint().map(|cp| cp.height)
    }

    /// VERIFICATION_BLOCK_MERKLE_ROOT
    pub fn verification_block_merkle_root(&self) -> Option<String> {
        self.net()
            .verification_checkpoint()
            .and_then(|cp| cp.merkle_root.clone())
    }

    /// asert_daa
    pub fn asert_daa(&self) -> DaaParams {
        *self.net().daa()
    }

    /// LEGACY_POW_TARGET_TIMESPAN
    pub fn legacy_pow_target_timespan(&self) -> u32 {
        self.net().legacy_pow_target_timespan()
    }

    /// LEGACY_POW_TARGET_INTERVAL
    pub fn legacy_pow_target_interval(&self) -> u32 {
        self.net().legacy_pow_target_interval()
    }

    /// LEGACY_POW_RETARGET_BLOCKS
    pub fn legacy_pow_retarget_blocks(&self) -> u32 {
        self.net().legacy_pow_retarget_blocks()
    }

    /// XPRV_HEADERS
    pub fn xprv_headers(&self) -> ExtKeyHeaders {
        self.net().xprv_headers().clone()
    }

    /// XPUB_HEADERS
    pub fn xpub_headers(&self) -> ExtKeyHeaders {
        self.net().xpub_headers().clone()
    }

    /// DEFAULT_PORTS
    pub fn default_ports(&self) -> DefaultPorts {
        self.net().default_ports().clone()
    }

    /// DEFAULT_SERVERS
    pub fn default_servers(&self) -> ServerMap {
        self.net().default_servers().clone()
    }

    /// BASE_UNITS
    pub fn base_units(&self) -> BaseUnits {
        self.net().base_units().clone()
    }

    /// DEFAULT_UNIT
    pub fn default_unit(&self) -> String {
        self.net().default_unit().to_string()
    }

    /// Read a field
    pub fn get(&self, field: LegacyField) -> LegacyValue {
        let opt_int = |v: Option<u32>| v.map_or(LegacyValue::None, |v| LegacyValue::Int(v.into()));
        match field {
            LegacyField::Title => LegacyValue::Text(self.title()),
            LegacyField::Testnet => LegacyValue::Bool(self.testnet()),
            LegacyField::Regtest => LegacyValue::Bool(self.regtest()),
            LegacyField::WifPrefix => LegacyValue::Int(self.wif_prefix().into()),
            LegacyField::AddrtypeP2pkh => LegacyValue::Int(self.addrtype_p2pkh().into()),
            LegacyField::AddrtypeP2sh => LegacyValue::Int(self.addrtype_p2sh().into()),
            LegacyField::CashaddrPrefix => LegacyValue::Text(self.cashaddr_prefix()),
            LegacyField::RpaPrefix => LegacyValue::Text(self.rpa_prefix()),
            LegacyField::HeadersUrl => LegacyValue::Text(self.headers_url()),
            LegacyField::Genesis => LegacyValue::Text(self.genesis()),
            LegacyField::ForkBlockHeight => LegacyValue::Int(self.fork_block_height().into()),
            LegacyField::ForkBlockHash => LegacyValue::Text(self.fork_block_hash()),
            LegacyField::Cw144Height => LegacyValue::Int(self.cw144_height().into()),
            LegacyField::VerificationBlockHeight => opt_int(self.verification_block_height()),
            LegacyField::VerificationBlockMerkleRoot => self
                .verification_block_merkle_root()
                .map_or(LegacyValue::None, LegacyValue::Text),
            LegacyField::AsertDaa => LegacyValue::Daa(self.asert_daa()),
            LegacyField::LegacyPowTargetTimespan => {
                LegacyValue::Int(self.legacy_pow_target_timespan().into())
            }
            LegacyField::LegacyPowTargetInterval => {
                LegacyValue::Int(self.legacy_pow_target_interval().into())
            }
            LegacyField::LegacyPowRetargetBlocks => {
                LegacyValue::Int(self.legacy_pow_retarget_blocks().into())
            }
            LegacyField::XprvHeaders => LegacyValue::KeyHeaders(self.xprv_headers()),
            LegacyField::XpubHeaders => LegacyValue::KeyHeaders(self.xpub_headers()),
            LegacyField::DefaultPorts => LegacyValue::Ports(self.default_ports()),
            LegacyField::DefaultServers => LegacyValue::Servers(self.default_servers()),
            LegacyField::BaseUnits => LegacyValue::Units(self.base_units()),
            LegacyField::DefaultUnit => LegacyValue::Text(self.default_unit()),
        }
    }

    /// Read a field by its legacy attribute name
    pub fn get_by_name(&self, name: &str) -> Result<LegacyValue> {
        Ok(self.get(name.parse()?))
    }

    /// Writes are not supported; always fails with
    /// [`Error::ImmutableConstants`]
    pub fn set(&self, name: &str, value: impl fmt::Debug) -> Result<()> {
        Err(Error::ImmutableConstants {
            name: name.to_string(),
            value: format!("{:?}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NetworkRegistry;

    fn selector() -> NetworkSelector {
        NetworkSelector::new(NetworkRegistry::builtin().unwrap())
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in LegacyField::ALL {
            assert_eq!(field.name().parse::<LegacyField>().unwrap(), field);
        }
        assert!(matches!(
            "MAX_MONEY".parse::<LegacyField>(),
            Err(Error::UnknownField(_))
        ));
    }

    #[test]
    fn test_reads_track_active_network() {
        let selector = selector();
        let constants = LegacyConstants::new(&selector);
        assert_eq!(constants.addrtype_p2pkh(), 0);
        assert_eq!(constants.default_unit(), "RXD");

        selector.select_testnet();
        assert_eq!(constants.addrtype_p2pkh(), 111);
        assert_eq!(constants.default_unit(), "tRXD");
        assert_eq!(
            constants.get_by_name("ADDRTYPE_P2SH").unwrap(),
            LegacyValue::Int(196)
        );
    }

    #[test]
    fn test_get_matches_accessors() {
        let selector = selector();
        let constants = LegacyConstants::new(&selector);
        for kind in crate::NetworkKind::ALL {
            selector.select(kind);
            let net = selector.active();
            assert_eq!(
                constants.get(LegacyField::Genesis),
                LegacyValue::Text(net.genesis().to_string())
            );
            assert_eq!(
                constants.get(LegacyField::WifPrefix),
                LegacyValue::Int(net.wif_prefix().into())
            );
            assert_eq!(
                constants.get(LegacyField::BaseUnits),
                LegacyValue::Units(net.base_units().clone())
            );
        }
    }

    #[test]
    fn test_regtest_optional_root() {
        let selector = selector();
        selector.select_regtest();
        let constants = LegacyConstants::new(&selector);
        assert_eq!(constants.verification_block_height(), Some(100));
        assert_eq!(
            constants.get(LegacyField::VerificationBlockMerkleRoot),
            LegacyValue::None
        );
    }

    #[test]
    fn test_writes_rejected() {
        let selector = selector();
        let constants = LegacyConstants::new(&selector);
        let err = constants.set("ADDRTYPE_P2PKH", 42).unwrap_err();
        assert!(matches!(err, Error::ImmutableConstants { ref name, .. } if name == "ADDRTYPE_P2PKH"));
        assert_eq!(
            err.to_string(),
            "NetworkConstants does not support setting attributes! (ADDRTYPE_P2PKH=42)"
        );
        assert_eq!(constants.addrtype_p2pkh(), 0);
    }
}
