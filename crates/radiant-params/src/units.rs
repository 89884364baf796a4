//! Display unit table driven by the active network

use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Unit label → decimal shift from the base (photon) amount
pub type BaseUnits = BTreeMap<String, u8>;

#[derive(Debug, Clone, Default)]
struct UnitTable {
    base_units: BaseUnits,
    default_unit: String,
    by_decimal_point: BTreeMap<u8, String>,
}

/// Unit table and default unit captured together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSnapshot {
    /// Unit table
    pub base_units: BaseUnits,
    /// Default unit label
    pub default_unit: String,
}

/// Currency display state the wallet formats amounts with.
///
/// Owned by a [`NetworkSelector`](crate::NetworkSelector) and recomputed
/// only when it switches networks. Read-only outside this crate:
///
/// ```compile_fail
/// use radiant_params::{NetworkRegistry, NetworkSelector};
///
/// let selector = NetworkSelector::new(NetworkRegistry::builtin().unwrap());
/// selector.units().recalc(&Default::default(), "XYZ");
/// ```
#[derive(Debug)]
pub struct DisplayUnits {
    table: RwLock<UnitTable>,
}

impl DisplayUnits {
    /// Empty table; populated by the first `recalc`
    pub(crate) fn new() -> Self {
        Self {
            table: RwLock::new(UnitTable::default()),
        }
    }

    /// Replace the unit table and default unit
    pub(crate) fn recalc(&self, base_units: &BaseUnits, default_unit: &str) {
        let by_decimal_point = base_units
            .iter()
            .map(|(name, dp)| (*dp, name.clone()))
            .collect();
        *self.table.write() = UnitTable {
            base_units: base_units.clone(),
            default_unit: default_unit.to_string(),
            by_decimal_point,
        };
        tracing::debug!("Display units recalculated, default unit {}", default_unit);
    }

    /// Unit table and default unit, read under one lock
    pub fn snapshot(&self) -> UnitSnapshot {
        let table = self.table.read();
        UnitSnapshot {
            base_units: table.base_units.clone(),
            default_unit: table.default_unit.clone(),
        }
    }

    /// Current unit table
    pub fn base_units(&self) -> BaseUnits {
        self.table.read().base_units.clone()
    }

    /// Current default unit label
    pub fn default_unit(&self) -> String {
        self.table.read().default_unit.clone()
    }

    /// Decimal shift of the default unit, if the default unit is in the table
    pub fn default_decimal_point(&self) -> Option<u8> {
        let table = self.table.read();
        table.base_units.get(&table.default_unit).copied()
    }

    /// Decimal shift for a unit label
    pub fn decimal_point(&self, unit: &str) -> Result<u8> {
        self.table
            .read()
            .base_units
            .get(unit)
            .copied()
            .ok_or_else(|| Error::UnknownBaseUnit(unit.to_string()))
    }

    /// Unit label for a decimal shift
    pub fn unit_name(&self, decimal_point: u8) -> Result<String> {
        self.table
            .read()
            .by_decimal_point
            .get(&decimal_point)
            .cloned()
            .ok_or(Error::UnknownDecimalPoint(decimal_point))
    }

    /// Unit labels ordered from the largest unit to the smallest
    pub fn units_by_precision(&self) -> Vec<String> {
        self.table
            .read()
            .by_decimal_point
            .values()
            .rev()
            .cloned()
            .collect()
    }
}
