//! Blockchain checkpoints trusted without validating back to genesis

use serde::{Deserialize, Serialize};

/// Block at which the chain split from its parent chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkCheckpoint {
    /// Block height
    pub height: u32,
    /// Block hash (hex)
    pub hash: String,
}

impl ForkCheckpoint {
    /// Create a fork checkpoint
    pub fn new(height: u32, hash: impl Into<String>) -> Self {
        Self {
            height,
            hash: hash.into(),
        }
    }

    /// Fork at genesis, as on chains that never had a parent
    pub fn at_genesis(genesis: &str) -> Self {
        Self::new(0, genesis)
    }
}

/// Header-chain checkpoint used for trust-on-first-use verification.
///
/// The merkle root is not the root of the block itself but of all block
/// headers up to and including `height`, as reported by a trusted
/// ElectrumX server (`blockchain.block.header` with a checkpoint height).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCheckpoint {
    /// Block height
    pub height: u32,
    /// Merkle root of all headers up to `height` (hex)
    pub merkle_root: Option<String>,
}

impl VerificationCheckpoint {
    /// Create a verification checkpoint with a known headers root
    pub fn new(height: u32, merkle_root: impl Into<String>) -> Self {
        Self {
            height,
            merkle_root: Some(merkle_root.into()),
        }
    }

    /// Checkpoint height without a known root (regtest chains are rebuilt
    /// from scratch, so no root can be pinned)
    pub fn height_only(height: u32) -> Self {
        Self {
            height,
            merkle_root: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fork_at_genesis() {
        let genesis = "000000002008a2f4a76b850a838ae084994c200dc2fd354f73102298fe063a91";
        let cp = ForkCheckpoint::at_genesis(genesis);
        assert_eq!(cp.height, 0);
        assert_eq!(cp.hash, genesis);
    }

    #[test]
    fn test_height_only_checkpoint() {
        let cp = VerificationCheckpoint::height_only(100);
        assert_eq!(cp.height, 100);
        assert!(cp.merkle_root.is_none());
    }
}
