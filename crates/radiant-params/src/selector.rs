//! Active network selection
//!
//! One network is active at a time. The selector is written once at
//! startup (or by a test harness) and read everywhere else; a switch swaps
//! the active `Arc` and recomputes the display units under a single write
//! lock, so readers see either the old network or the new one.
//!
//! An `Arc<NetworkParams>` fetched before a switch keeps pointing at the
//! old network. Call [`NetworkSelector::active`] for each use instead of
//! caching the result. The same holds across calls: `active()` followed by
//! `units()` can straddle a switch. Use [`NetworkSelector::snapshot`] when
//! the network and its display units must agree.

use crate::network::{NetworkKind, NetworkParams};
use crate::registry::{describe, NetworkRegistry};
use crate::units::{DisplayUnits, UnitSnapshot};
use crate::{Error, Result};
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

/// Holder of the active network
#[derive(Debug)]
pub struct NetworkSelector {
    registry: NetworkRegistry,
    active: RwLock<Arc<NetworkParams>>,
    units: DisplayUnits,
}

impl NetworkSelector {
    /// Selector over `registry` with mainnet active
    pub fn new(registry: NetworkRegistry) -> Self {
        Self::with_initial(registry, NetworkKind::Mainnet)
    }

    /// Selector over `registry` with `initial` active
    pub fn with_initial(registry: NetworkRegistry, initial: NetworkKind) -> Self {
        let active = Arc::clone(registry.get(initial));
        let units = DisplayUnits::new();
        units.recalc(active.base_units(), active.default_unit());
        Self {
            registry,
            active: RwLock::new(active),
            units,
        }
    }

    /// Networks this selector can switch between
    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    /// Display unit state of the active network, read-only
    pub fn units(&self) -> &DisplayUnits {
        &self.units
    }

    /// Currently active network
    pub fn active(&self) -> Arc<NetworkParams> {
        self.active.read().clone()
    }

    /// Active network together with its display units.
    ///
    /// Both are read under the active-network read lock, which a switch
    /// holds exclusively while it recomputes the units.
    pub fn snapshot(&self) -> (Arc<NetworkParams>, UnitSnapshot) {
        let active = self.active.read();
        (active.clone(), self.units.snapshot())
    }

    /// Make `params` the active network and recompute the display units.
    ///
    /// `params` must be one of this selector's registry instances; anything
    /// else is a configuration error and leaves the active network as is.
    pub fn set_active(&self, params: &Arc<NetworkParams>) -> Result<()> {
        if self.registry.kind_of(params).is_none() {
            return Err(Error::UnregisteredNetwork(describe(params)));
        }
        self.activate(Arc::clone(params));
        Ok(())
    }

    /// Activate a registered network
    pub fn select(&self, kind: NetworkKind) {
        self.activate(Arc::clone(self.registry.get(kind)));
    }

    fn activate(&self, params: Arc<NetworkParams>) {
        let mut active = self.active.write();
        self.units.recalc(params.base_units(), params.default_unit());
        *active = params;
        tracing::info!("Active network set to {}", describe(&active));
    }

    /// Activate a registered network by name
    pub fn select_by_name(&self, name: &str) -> Result<()> {
        let kind: NetworkKind = name.parse()?;
        self.select(kind);
        Ok(())
    }

    /// Activate mainnet
    pub fn select_main(&self) {
        self.select(NetworkKind::Mainnet);
    }

    /// Activate testnet
    pub fn select_testnet(&self) {
        self.select(NetworkKind::Testnet);
    }

    /// Activate testnet4
    pub fn select_testnet4(&self) {
        self.select(NetworkKind::Testnet4);
    }

    /// Activate scalenet
    pub fn select_scalenet(&self) {
        self.select(NetworkKind::Scalenet);
    }

    /// Activate regtest
    pub fn select_regtest(&self) {
        self.select(NetworkKind::Regtest);
    }
}

static GLOBAL_SELECTOR: OnceLock<NetworkSelector> = OnceLock::new();

/// Process-wide selector, built from the bundled networks on first use
pub fn global() -> &'static NetworkSelector {
    GLOBAL_SELECTOR.get_or_init(|| {
        let registry =
            NetworkRegistry::builtin().expect("built-in network parameters are valid");
        NetworkSelector::new(registry)
    })
}

/// Install the process-wide selector, typically built from startup config.
///
/// Must run before anything calls [`global`].
pub fn install(selector: NetworkSelector) -> Result<&'static NetworkSelector> {
    let initial = selector.active();
    GLOBAL_SELECTOR
        .set(selector)
        .map_err(|_| Error::SelectorAlreadyInstalled)?;
    tracing::info!("Network selector installed, active network {}", describe(&initial));
    Ok(global())
}

/// Active network of the process-wide selector
pub fn active() -> Arc<NetworkParams> {
    global().active()
}

/// Activate mainnet process-wide
pub fn select_main() {
    global().select_main();
}

/// Activate testnet process-wide
pub fn select_testnet() {
    global().select_testnet();
}

/// Activate testnet4 process-wide
pub fn select_testnet4() {
    global().select_testnet4();
}

/// Activate scalenet process-wide
pub fn select_scalenet() {
    global().select_scalenet();
}

/// Activate regtest process-wide
pub fn select_regtest() {
    global().select_regtest();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> NetworkSelector {
        NetworkSelector::new(NetworkRegistry::builtin().unwrap())
    }

    #[test]
    fn test_initial_mainnet() {
        let selector = selector();
        assert_eq!(selector.active().kind(), NetworkKind::Mainnet);
        assert_eq!(selector.units().default_unit(), "RXD");
    }

    #[test]
    fn test_switch_recomputes_units() {
        let selector = selector();
        selector.select_testnet();
        assert_eq!(selector.active().kind(), NetworkKind::Testnet);
        assert_eq!(selector.units().default_unit(), "tRXD");
        assert_eq!(selector.units().default_decimal_point(), Some(8));
    }

    #[test]
    fn test_round_trip_restores_instance() {
        let selector = selector();
        let main = selector.active();
        selector.select_testnet();
        selector.select_main();
        let again = selector.active();
        assert!(Arc::ptr_eq(&main, &again));
        assert_eq!(selector.units().base_units(), *main.base_units());
    }

    #[test]
    fn test_unregistered_rejected() {
        let selector = selector();
        let foreign = Arc::clone(NetworkRegistry::builtin().unwrap().get(NetworkKind::Regtest));
        let err = selector.set_active(&foreign).unwrap_err();
        assert!(matches!(err, Error::UnregisteredNetwork(_)));
        assert_eq!(selector.active().kind(), NetworkKind::Mainnet);
        assert_eq!(selector.units().default_unit(), "RXD");
    }

    #[test]
    fn test_select_by_name() {
        let selector = selector();
        selector.select_by_name("regtest").unwrap();
        assert!(selector.active().is_regtest());
        assert!(selector.select_by_name("nonet").is_err());
        assert!(selector.active().is_regtest());
    }

    #[test]
    fn test_snapshot_matches_active() {
        let selector = selector();
        for kind in NetworkKind::ALL {
            selector.select(kind);
            let (net, units) = selector.snapshot();
            assert_eq!(net.kind(), kind);
            assert_eq!(units.base_units, *net.base_units());
            assert_eq!(units.default_unit, net.default_unit());
        }
    }

    #[test]
    fn test_stale_capture_keeps_old_network() {
        let selector = selector();
        let captured = selector.active();
        selector.select_scalenet();
        assert_eq!(captured.kind(), NetworkKind::Mainnet);
        assert_eq!(selector.active().kind(), NetworkKind::Scalenet);
    }
}
