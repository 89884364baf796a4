//! Default peer directories
//!
//! Each network ships a JSON list of ElectrumX servers. Loading is fail
//! open: a missing or corrupt list yields an empty directory so the
//! network parameters can still be built.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Host → transport tag → port
pub type ServerMap = BTreeMap<String, BTreeMap<String, u16>>;

/// Plaintext TCP transport tag
pub const TRANSPORT_TCP: &str = "t";

/// TLS transport tag
pub const TRANSPORT_SSL: &str = "s";

/// Peer directory resource of each network
pub mod resources {
    /// Mainnet servers
    pub const MAINNET: &str = "servers.json";
    /// Testnet servers
    pub const TESTNET: &str = "servers_testnet.json";
    /// Testnet4 servers
    pub const TESTNET4: &str = "servers_testnet4.json";
    /// Scalenet servers
    pub const SCALENET: &str = "servers_scalenet.json";
    /// Regtest servers
    pub const REGTEST: &str = "servers_regtest.json";
}

// Server metadata carried in Electrum server lists, not transports
const METADATA_KEYS: [&str; 2] = ["pruning", "version"];

const BUNDLED: [(&str, &str); 5] = [
    (resources::MAINNET, include_str!("../resources/servers.json")),
    (resources::TESTNET, include_str!("../resources/servers_testnet.json")),
    (resources::TESTNET4, include_str!("../resources/servers_testnet4.json")),
    (resources::SCALENET, include_str!("../resources/servers_scalenet.json")),
    (resources::REGTEST, include_str!("../resources/servers_regtest.json")),
];

/// Why a peer directory could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum PeerDirectoryError {
    /// Resource does not exist
    #[error("Peer directory {0} not found")]
    Absent(String),

    /// Resource exists but could not be read
    #[error("Failed to read peer directory {resource}: {source}")]
    Unreadable {
        /// Resource name
        resource: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Resource content is not a valid server list
    #[error("Malformed peer directory {resource}: {reason}")]
    Malformed {
        /// Resource name
        resource: String,
        /// Parse failure
        reason: String,
    },
}

/// Where peer directories are read from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PeerDirectoryLoader {
    /// Lists compiled into the crate
    #[default]
    Bundled,
    /// Lists read from files in this directory
    Directory(PathBuf),
}

impl PeerDirectoryLoader {
    /// Load a peer directory, or an empty one if it is missing or malformed
    pub fn load(&self, resource: &str) -> ServerMap {
        match self.try_load(resource) {
            Ok(servers) => {
                tracing::debug!("Loaded {} servers from {}", servers.len(), resource);
                servers
            }
            Err(PeerDirectoryError::Absent(_)) => {
                tracing::warn!("Peer directory {} is absent, using no default servers", resource);
                ServerMap::new()
            }
            Err(e) => {
                tracing::warn!("{}; using no default servers", e);
                ServerMap::new()
            }
        }
    }

    /// Load a peer directory, reporting why it failed
    pub fn try_load(&self, resource: &str) -> Result<ServerMap, PeerDirectoryError> {
        let raw = self.fetch(resource)?;
        parse_servers(resource, &raw)
    }

    fn fetch(&self, resource: &str) -> Result<String, PeerDirectoryError> {
        match self {
            PeerDirectoryLoader::Bundled => BUNDLED
                .iter()
                .find(|(name, _)| *name == resource)
                .map(|(_, contents)| contents.to_string())
                .ok_or_else(|| PeerDirectoryError::Absent(resource.to_string())),
            PeerDirectoryLoader::Directory(dir) => {
                std::fs::read_to_string(dir.join(resource)).map_err(|source| {
                    if source.kind() == std::io::ErrorKind::NotFound {
                        PeerDirectoryError::Absent(resource.to_string())
                    } else {
                        PeerDirectoryError::Unreadable {
                            resource: resource.to_string(),
                            source,
                        }
                    }
                })
            }
        }
    }
}

fn parse_servers(resource: &str, raw: &str) -> Result<ServerMap, PeerDirectoryError> {
    let malformed = |reason: String| PeerDirectoryError::Malformed {
        resource: resource.to_string(),
        reason,
    };

    let hosts: BTreeMap<String, BTreeMap<String, Value>> =
        serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;

    let mut servers = ServerMap::new();
    for (host, entries) in hosts {
        let mut ports = BTreeMap::new();
        for (tag, value) in entries {
            if METADATA_KEYS.contains(&tag.as_str()) {
                continue;
            }
            let port = parse_port(&value)
                .ok_or_else(|| malformed(format!("{} has invalid {} port {}", host, tag, value)))?;
            ports.insert(tag, port);
        }
        servers.insert(host, ports);
    }
    Ok(servers)
}

fn parse_port(value: &Value) -> Option<u16> {
    let port = match value {
        Value::String(s) => s.parse::<u16>().ok()?,
        Value::Number(n) => u16::try_from(n.as_u64()?).ok()?,
        _ => return None,
    };
    (port != 0).then_some(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_lists_parse() {
        let loader = PeerDirectoryLoader::Bundled;
        for (name, _) in BUNDLED {
            assert!(loader.try_load(name).is_ok(), "{} should parse", name);
        }
        assert!(loader.load(resources::MAINNET).is_empty());
        assert!(loader.load(resources::REGTEST).contains_key("127.0.0.1"));
    }

    #[test]
    fn test_bundled_absent() {
        let loader = PeerDirectoryLoader::Bundled;
        assert!(matches!(
            loader.try_load("servers_signet.json"),
            Err(PeerDirectoryError::Absent(_))
        ));
        assert!(loader.load("servers_signet.json").is_empty());
    }

    #[test]
    fn test_parse_string_and_number_ports() {
        let raw = r#"{
            "electrum.example.org": {"pruning": "-", "s": "50002", "t": 50001, "version": "1.4"}
        }"#;
        let servers = parse_servers("test", raw).unwrap();
        let ports = &servers["electrum.example.org"];
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[TRANSPORT_SSL], 50002);
        assert_eq!(ports[TRANSPORT_TCP], 50001);
    }

    #[test]
    fn test_bad_port_rejects_whole_list() {
        let raw = r#"{
            "good.example.org": {"s": "50002"},
            "bad.example.org": {"s": "not-a-port"}
        }"#;
        assert!(matches!(
            parse_servers("test", raw),
            Err(PeerDirectoryError::Malformed { .. })
        ));
        assert!(parse_servers("test", r#"{"h": {"t": 70000}}"#).is_err());
        assert!(parse_servers("test", r#"{"h": {"t": "0"}}"#).is_err());
    }

    #[test]
    fn test_not_json() {
        assert!(parse_servers("test", "{ truncated").is_err());
        assert!(parse_servers("test", "[1, 2, 3]").is_err());
    }
}
