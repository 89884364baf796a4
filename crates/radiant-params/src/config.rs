//! Startup network configuration

use crate::network::NetworkKind;
use crate::registry::NetworkRegistry;
use crate::selector::NetworkSelector;
use crate::servers::PeerDirectoryLoader;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which network to start on and where its peer lists come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Network active at startup
    pub network: NetworkKind,
    /// Directory holding `servers*.json` overrides; bundled lists if unset
    pub peer_directory: Option<PathBuf>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network: NetworkKind::Mainnet,
            peer_directory: None,
        }
    }
}

impl NetworkConfig {
    /// Parse configuration JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Read configuration JSON from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize configuration
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Peer directory source for this configuration
    pub fn peer_loader(&self) -> PeerDirectoryLoader {
        match &self.peer_directory {
            Some(dir) => PeerDirectoryLoader::Directory(dir.clone()),
            None => PeerDirectoryLoader::Bundled,
        }
    }

    /// Build the registry and a selector with the configured network active
    pub fn into_selector(self) -> Result<NetworkSelector> {
        let registry = NetworkRegistry::build(&self.peer_loader())?;
        Ok(NetworkSelector::with_initial(registry, self.network))
    }
}
