use crate::config::{CoolingFactorOverride, CoolingThermalFactors};
use crate::equipment::EquipmentType;
use crate::errors::ChpDefaultsError;
use crate::reference_table::CapacityTable;
use crate::size_class::{SizeClass, SizeClasses};
use crate::statistics::masked_mean;
use serde::Serialize;
use statrs::statistics::Statistics;

/// A thermal quantity given separately for hot water and steam use of the recovered heat.
///
/// Serialized as a `[hot_water, steam]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(into = "[f64; 2]")]
pub struct PerMode {
    pub hot_water: f64,
    pub steam: f64,
}

impl PerMode {
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            hot_water: f(self.hot_water),
            steam: f(self.steam),
        }
    }
}

impl From<PerMode> for [f64; 2] {
    fn from(value: PerMode) -> Self {
        [value.hot_water, value.steam]
    }
}

/// Mean of a table column over the rows that fall in the size class, ignoring missing values.
/// NaN when the class selects no values.
pub fn class_mean(table: &CapacityTable, equipment_type: EquipmentType, class: &SizeClass) -> f64 {
    masked_mean(
        &table.values_for(equipment_type),
        &class.row_mask(table.capacities()),
    )
}

/// Ensures the table holds a value at every bound of every size class, so that cost curve
/// endpoints can be read off it.
pub fn check_boundary_rows(
    table: &CapacityTable,
    size_classes: &SizeClasses,
) -> Result<(), ChpDefaultsError> {
    cost_curve_endpoints(table, size_classes).map(|_| ())
}

/// The table values at exactly the lower and upper bound of each size class.
pub fn cost_curve_endpoints(
    table: &CapacityTable,
    size_classes: &SizeClasses,
) -> Result<Vec<[f64; 2]>, ChpDefaultsError> {
    let equipment_type = size_classes.equipment_type();

    size_classes
        .iter()
        .enumerate()
        .map(|(class_index, class)| -> Result<_, ChpDefaultsError> {
            let value_at = |capacity_kw: f64| {
                table
                    .value_at(equipment_type, capacity_kw)
                    .ok_or_else(|| ChpDefaultsError::MissingBoundaryRow {
                        table: table.name().to_string(),
                        equipment_type,
                        class_index,
                        capacity_kw,
                    })
            };

            Ok([value_at(class.lower_kw)?, value_at(class.upper_kw)?])
        })
        .collect()
}

/// Back-calculates heat recovery efficiency from full-load thermal and electrical efficiency.
pub fn heat_recovery_effic(thermal_effic: f64, elec_effic: f64) -> f64 {
    thermal_effic / (1. - elec_effic)
}

/// Half-load efficiency as emitted: the full-load value, unchanged.
pub fn half_load_effic(full_load_effic: f64) -> f64 {
    full_load_effic
}

pub fn min_allowable_kw(class: &SizeClass, min_allowable_fraction: f64) -> f64 {
    class.lower_kw * min_allowable_fraction
}

/// The cooling thermal factor for each size class of an equipment type.
pub fn cooling_thermal_factors(
    factors: &CoolingThermalFactors,
    equipment_type: EquipmentType,
    class_count: usize,
) -> Vec<f64> {
    let base = |class_index: usize| match factors.overrides.get(&(equipment_type, class_index)) {
        Some(CoolingFactorOverride::Fixed(value)) => *value,
        _ => factors
            .per_class
            .get(&(equipment_type, class_index))
            .or_else(|| factors.per_equipment_type.get(&equipment_type))
            .copied()
            .unwrap_or(f64::NAN),
    };

    (0..class_count)
        .map(
            |class_index| match factors.overrides.get(&(equipment_type, class_index)) {
                Some(CoolingFactorOverride::MeanOfClassesFrom(first)) => {
                    (*first..class_count).map(&base).collect::<Vec<_>>().mean()
                }
                _ => base(class_index),
            },
        )
        .collect()
}
