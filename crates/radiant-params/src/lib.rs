//! Radiant network parameters and constants
//!
//! This crate provides the per-network constant sets (address and key
//! version bytes, checkpoints, DAA anchors, peer directories, display
//! units) for the wallet, plus the process-wide selection of the active
//! network.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checkpoints;
pub mod compat;
pub mod config;
pub mod consensus;
pub mod network;
pub mod registry;
pub mod selector;
pub mod servers;
pub mod units;

pub use checkpoints::{ForkCheckpoint, VerificationCheckpoint};
pub use compat::{LegacyConstants, LegacyField, LegacyValue};
pub use config::NetworkConfig;
pub use consensus::{DaaAnchor, DaaParams};
pub use network::{NetworkKind, NetworkParams, NetworkParamsBuilder};
pub use registry::NetworkRegistry;
pub use selector::NetworkSelector;
pub use servers::{PeerDirectoryError, PeerDirectoryLoader, ServerMap};
pub use units::{BaseUnits, DisplayUnits, UnitSnapshot};

/// Error types for parameter operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required field was never set on a parameter builder
    #[error("Missing network parameter: {0}")]
    MissingField(&'static str),

    /// A parameter set violates one of its consistency rules
    #[error("Invalid parameters for {network}: {reason}")]
    InvalidParams {
        /// Title of the offending network
        network: String,
        /// Which rule was broken
        reason: String,
    },

    /// No network is registered under this name
    #[error("Invalid network: {0}")]
    UnknownNetwork(String),

    /// The parameter set is not one of the registry's instances
    #[error("Network {0} is not registered with this selector")]
    UnregisteredNetwork(String),

    /// The process-wide selector was already initialized
    #[error("Active network selector is already installed")]
    SelectorAlreadyInstalled,

    /// Write attempted through the legacy constants view
    #[error("NetworkConstants does not support setting attributes! ({name}={value})")]
    ImmutableConstants {
        /// Field the caller tried to set
        name: String,
        /// Value the caller tried to store
        value: String,
    },

    /// Legacy field name not known
    #[error("NetworkConstants has no attribute {0}")]
    UnknownField(String),

    /// Unit label not present in the active unit table
    #[error("Unknown base unit: {0}")]
    UnknownBaseUnit(String),

    /// No unit with this decimal point in the active unit table
    #[error("No base unit with decimal point {0}")]
    UnknownDecimalPoint(u8),

    /// Startup configuration could not be parsed
    #[error("Invalid network config: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;
