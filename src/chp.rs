use crate::config::{
    ChpConfig, ClassIndependentConstants, CoolingThermalFactors, PrimeMoverConfig, CAPEX_FILE,
    ELEC_EFFIC_FILE, OPEX_FILE, THERM_EFFIC_HOT_WATER_FILE, THERM_EFFIC_STEAM_FILE,
};
use crate::equipment::EquipmentType;
use crate::errors::ChpDefaultsError;
use crate::reducer::{
    check_boundary_rows, class_mean, cooling_thermal_factors, cost_curve_endpoints,
    half_load_effic, heat_recovery_effic, min_allowable_kw, PerMode,
};
use crate::reference_table::CapacityTable;
use crate::size_class::SizeClasses;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// The combined CHP defaults, keyed by prime mover.
pub type ChpDefaults = IndexMap<EquipmentType, PrimeMoverDefaults>;

/// The reference tables the CHP defaults are reduced from.
#[derive(Clone, Debug)]
pub struct ChpTables {
    /// Installed cost in $/kW
    pub capex: CapacityTable,
    /// O&M cost in $/hr
    pub opex_per_hr: CapacityTable,
    pub elec_effic: CapacityTable,
    pub therm_effic_hot_water: CapacityTable,
    pub therm_effic_steam: CapacityTable,
}

impl ChpTables {
    pub fn load(input_dir: &Path) -> Result<Self, ChpDefaultsError> {
        let load = |file_name: &str| {
            let path = input_dir.join(file_name);
            debug!("loading reference table {}", path.display());
            CapacityTable::from_path(&path)
        };

        Ok(Self {
            capex: load(CAPEX_FILE)?,
            opex_per_hr: load(OPEX_FILE)?,
            elec_effic: load(ELEC_EFFIC_FILE)?,
            therm_effic_hot_water: load(THERM_EFFIC_HOT_WATER_FILE)?,
            therm_effic_steam: load(THERM_EFFIC_STEAM_FILE)?,
        })
    }
}

/// All default parameters for one prime mover. Every sequence has one entry per size class.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrimeMoverDefaults {
    #[serde(flatten)]
    pub size_class_data: SizeClassData,
    #[serde(flatten)]
    pub class_independent_data: ClassIndependentData,
}

/// Parameters reduced from the reference tables for each size class.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SizeClassData {
    pub installed_cost_us_dollars_per_kw: Vec<[f64; 2]>,
    pub tech_size_for_cost_curve: Vec<[f64; 2]>,
    pub om_cost_us_dollars_per_kw: Vec<f64>,
    pub om_cost_us_dollars_per_kwh: Vec<f64>,
    pub om_cost_us_dollars_per_hr_per_kw_rated: Vec<f64>,
    pub elec_effic_full_load: Vec<f64>,
    pub elec_effic_half_load: Vec<f64>,
    pub thermal_effic_full_load: Vec<PerMode>,
    pub thermal_effic_half_load: Vec<PerMode>,
    pub heat_recovery_effic_full_load: Vec<PerMode>,
    pub min_allowable_kw: Vec<f64>,
    pub cooling_thermal_factor: Vec<f64>,
}

/// The class-independent constants, repeated once per size class.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassIndependentData {
    pub min_kw: Vec<f64>,
    pub max_kw: Vec<f64>,
    pub min_turn_down_pct: Vec<f64>,
    pub max_derate_factor: Vec<f64>,
    #[serde(rename = "derate_start_temp_degF")]
    pub derate_start_temp_deg_f: Vec<f64>,
    #[serde(rename = "derate_slope_pct_per_degF")]
    pub derate_slope_pct_per_deg_f: Vec<f64>,
}

impl ClassIndependentData {
    pub fn broadcast(constants: &ClassIndependentConstants, size_classes: &SizeClasses) -> Self {
        Self {
            min_kw: size_classes.broadcast(constants.min_kw),
            max_kw: size_classes.broadcast(constants.max_kw),
            min_turn_down_pct: size_classes.broadcast(constants.min_turn_down_pct),
            max_derate_factor: size_classes.broadcast(constants.max_derate_factor),
            derate_start_temp_deg_f: size_classes.broadcast(constants.derate_start_temp_deg_f),
            derate_slope_pct_per_deg_f: size_classes
                .broadcast(constants.derate_slope_pct_per_deg_f),
        }
    }
}

impl SizeClassData {
    fn reduce(
        equipment_type: EquipmentType,
        prime_mover: &PrimeMoverConfig,
        cooling_factors: &CoolingThermalFactors,
        tables: &ChpTables,
        opex_per_kwh: &CapacityTable,
    ) -> Result<Self, ChpDefaultsError> {
        let size_classes = &prime_mover.size_classes;

        let class_means = |table: &CapacityTable| -> Vec<f64> {
            size_classes
                .iter()
                .enumerate()
                .map(|(class_index, class)| {
                    let mean = class_mean(table, equipment_type, class);
                    if mean.is_nan() {
                        warn!(
                            "No {} values for {equipment_type} in size class {class_index} ({} to {} kW)",
                            table.name(),
                            class.lower_kw,
                            class.upper_kw
                        );
                    }
                    mean
                })
                .collect()
        };

        let installed_cost_us_dollars_per_kw = cost_curve_endpoints(&tables.capex, size_classes)?;
        let om_cost_us_dollars_per_kwh = class_means(opex_per_kwh);
        let elec_effic_full_load = class_means(&tables.elec_effic);
        let thermal_effic_full_load = class_means(&tables.therm_effic_hot_water)
            .into_iter()
            .zip(class_means(&tables.therm_effic_steam))
            .map(|(hot_water, steam)| PerMode { hot_water, steam })
            .collect::<Vec<_>>();

        let heat_recovery_effic_full_load = thermal_effic_full_load
            .iter()
            .zip(&elec_effic_full_load)
            .map(|(thermal_effic, &elec_effic)| {
                thermal_effic.map(|thermal_effic| heat_recovery_effic(thermal_effic, elec_effic))
            })
            .collect();

        Ok(Self {
            installed_cost_us_dollars_per_kw,
            tech_size_for_cost_curve: size_classes.iter().map(|class| class.bounds()).collect(),
            om_cost_us_dollars_per_kw: size_classes.broadcast(0.),
            om_cost_us_dollars_per_kwh,
            om_cost_us_dollars_per_hr_per_kw_rated: size_classes.broadcast(0.),
            elec_effic_half_load: elec_effic_full_load
                .iter()
                .copied()
                .map(half_load_effic)
                .collect(),
            elec_effic_full_load,
            thermal_effic_half_load: thermal_effic_full_load
                .iter()
                .map(|thermal_effic| thermal_effic.map(half_load_effic))
                .collect(),
            thermal_effic_full_load,
            heat_recovery_effic_full_load,
            min_allowable_kw: size_classes
                .iter()
                .map(|class| min_allowable_kw(class, prime_mover.min_allowable_fraction))
                .collect(),
            cooling_thermal_factor: cooling_thermal_factors(
                cooling_factors,
                equipment_type,
                size_classes.len(),
            ),
        })
    }
}

/// Reduces the reference tables to per-size-class defaults for every configured prime mover and
/// merges in the class-independent constants.
#[instrument(skip_all)]
pub fn build_chp_defaults(
    config: &ChpConfig,
    tables: &ChpTables,
) -> Result<ChpDefaults, ChpDefaultsError> {
    let opex_per_kwh = tables
        .opex_per_hr
        .divide_by_index(format!("{} per kW rated", tables.opex_per_hr.name()));

    // every boundary row must be present before anything is derived from the tables
    for prime_mover in config.prime_movers.values() {
        check_boundary_rows(&tables.capex, &prime_mover.size_classes)?;
    }

    config
        .prime_movers
        .iter()
        .map(|(&equipment_type, prime_mover)| -> Result<_, ChpDefaultsError> {
            info!(
                "building defaults for {equipment_type} over {} size classes",
                prime_mover.size_classes.len()
            );
            let defaults = PrimeMoverDefaults {
                size_class_data: SizeClassData::reduce(
                    equipment_type,
                    prime_mover,
                    &config.cooling_thermal_factors,
                    tables,
                    &opex_per_kwh,
                )?,
                class_independent_data: ClassIndependentData::broadcast(
                    &prime_mover.constants,
                    &prime_mover.size_classes,
                ),
            };
            Ok((equipment_type, defaults))
        })
        .collect()
}
