//! Consensus constants handed to the header verifier

use serde::{Deserialize, Serialize};

/// Legacy (pre-fork) proof-of-work target timespan: two weeks
pub const LEGACY_POW_TARGET_TIMESPAN: u32 = 14 * 24 * 60 * 60;

/// Legacy proof-of-work target block interval: ten minutes
pub const LEGACY_POW_TARGET_INTERVAL: u32 = 10 * 60;

/// Blocks between legacy retargets (2016)
pub const LEGACY_POW_RETARGET_BLOCKS: u32 = LEGACY_POW_TARGET_TIMESPAN / LEGACY_POW_TARGET_INTERVAL;

/// Starting point for the ASERT difficulty adjustment.
///
/// Headers after a verification checkpoint are skipped, so any network
/// whose checkpoint lies after the anchor must pin the anchor here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaaAnchor {
    /// Anchor block height
    pub height: u32,
    /// Compact target bits of the anchor block
    pub bits: u32,
    /// Timestamp of the anchor block's parent (Unix epoch)
    pub prev_time: u64,
}

/// Settings for the external ASERT DAA component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaaParams {
    /// Use the testnet half-life
    pub is_testnet: bool,
    /// Anchor block, `None` when the verifier must compute it
    pub anchor: Option<DaaAnchor>,
}

impl DaaParams {
    /// Mainnet-mode DAA
    pub const fn mainnet(anchor: Option<DaaAnchor>) -> Self {
        Self {
            is_testnet: false,
            anchor,
        }
    }

    /// Testnet-mode DAA
    pub const fn testnet(anchor: Option<DaaAnchor>) -> Self {
        Self {
            is_testnet: true,
            anchor,
        }
    }
}
