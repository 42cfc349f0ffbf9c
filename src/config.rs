use crate::equipment::EquipmentType;
use crate::errors::InvalidSizeClassesError;
use crate::size_class::{SizeClass, SizeClasses};
use indexmap::IndexMap;
use serde::Serialize;

pub const CAPEX_FILE: &str = "CHP_CapEx_FactSheets.csv";
pub const OPEX_FILE: &str = "CHP_OpEx_Hourly.csv";
pub const ELEC_EFFIC_FILE: &str = "CHP_EfficFullLoad_FactSheets_All.csv";
pub const THERM_EFFIC_HOT_WATER_FILE: &str = "CHP_ThermEfficFullLoad_FactSheets_All.csv";
pub const THERM_EFFIC_STEAM_FILE: &str = "CHP_ThermEfficFullLoad_Steam_FactSheets_All.csv";
pub const STEAM_TURBINE_FILE: &str = "steam_turbine_defaults.csv";

pub const CHP_OUTPUT_KEY: &str = "chp_default_data";
pub const STEAM_TURBINE_OUTPUT_KEY: &str = "steam_turbine_default_data";

/// Everything the CHP builder needs besides the reference tables themselves.
#[derive(Clone, Debug)]
pub struct ChpConfig {
    pub prime_movers: IndexMap<EquipmentType, PrimeMoverConfig>,
    pub cooling_thermal_factors: CoolingThermalFactors,
}

#[derive(Clone, Debug)]
pub struct PrimeMoverConfig {
    pub size_classes: SizeClasses,
    /// Fraction of the lower bound of a size class assigned to the minimum allowable size
    pub min_allowable_fraction: f64,
    pub half_load: HalfLoadFractions,
    pub constants: ClassIndependentConstants,
}

/// Ratios for deriving half-load performance from full-load performance.
///
/// These are carried for reference but are not applied: half-load efficiencies are emitted equal to
/// their full-load values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HalfLoadFractions {
    pub elec_effic: f64,
    pub heat_recovery_effic: f64,
}

/// Parameters that do not vary with size class.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ClassIndependentConstants {
    pub min_kw: f64,
    pub max_kw: f64,
    pub min_turn_down_pct: f64,
    pub max_derate_factor: f64,
    #[serde(rename = "derate_start_temp_degF")]
    pub derate_start_temp_deg_f: f64,
    #[serde(rename = "derate_slope_pct_per_degF")]
    pub derate_slope_pct_per_deg_f: f64,
}

/// How the cooling thermal factor for one size class is worked out, in order of precedence:
/// an override for the (equipment type, class index), else a per-class entry, else the constant for
/// the equipment type.
#[derive(Clone, Debug, Default)]
pub struct CoolingThermalFactors {
    pub per_equipment_type: IndexMap<EquipmentType, f64>,
    pub per_class: IndexMap<(EquipmentType, usize), f64>,
    pub overrides: IndexMap<(EquipmentType, usize), CoolingFactorOverride>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CoolingFactorOverride {
    Fixed(f64),
    /// The mean of the resolved factors of every class from the given index onwards
    MeanOfClassesFrom(usize),
}

#[derive(Clone, Debug)]
pub struct SteamTurbineConfig {
    pub min_kw: f64,
    pub max_kw: f64,
    pub min_turn_down_pct: f64,
}

impl Default for SteamTurbineConfig {
    fn default() -> Self {
        Self {
            min_kw: 0.,
            max_kw: 25000.,
            min_turn_down_pct: 0.25,
        }
    }
}

impl ChpConfig {
    /// The reference configuration used to produce the published defaults.
    pub fn reference() -> Result<Self, InvalidSizeClassesError> {
        let prime_movers = [
            (
                EquipmentType::RecipEngine,
                vec![
                    (30., 9300.),
                    (30., 100.),
                    (100., 630.),
                    (630., 1140.),
                    (1140., 3300.),
                    (3300., 9300.),
                ],
                0.5,
                HalfLoadFractions {
                    elec_effic: 0.9,
                    heat_recovery_effic: 1.0,
                },
                ClassIndependentConstants {
                    min_kw: 0.,
                    max_kw: 10000.,
                    min_turn_down_pct: 0.5,
                    max_derate_factor: 1.0,
                    derate_start_temp_deg_f: 95.,
                    derate_slope_pct_per_deg_f: 0.008,
                },
            ),
            (
                EquipmentType::MicroTurbine,
                vec![(30., 950.), (30., 60.), (60., 190.), (190., 950.)],
                0.7,
                HalfLoadFractions {
                    elec_effic: 0.8,
                    heat_recovery_effic: 1.0,
                },
                ClassIndependentConstants {
                    min_kw: 0.,
                    max_kw: 1000.,
                    min_turn_down_pct: 0.3,
                    max_derate_factor: 1.0,
                    derate_start_temp_deg_f: 59.,
                    derate_slope_pct_per_deg_f: 0.012,
                },
            ),
            (
                EquipmentType::CombustionTurbine,
                vec![
                    (950., 20000.),
                    (950., 1800.),
                    (1800., 3300.),
                    (3300., 5400.),
                    (5400., 7500.),
                    (7500., 14000.),
                    (14000., 20000.),
                ],
                1.0,
                HalfLoadFractions {
                    elec_effic: 0.8,
                    heat_recovery_effic: 1.0,
                },
                ClassIndependentConstants {
                    min_kw: 0.,
                    max_kw: 20000.,
                    min_turn_down_pct: 0.5,
                    max_derate_factor: 1.1,
                    derate_start_temp_deg_f: 59.,
                    derate_slope_pct_per_deg_f: 0.012,
                },
            ),
            (
                EquipmentType::FuelCell,
                vec![(30., 9300.), (30., 320.), (320., 1400.), (1400., 9300.)],
                0.5,
                HalfLoadFractions {
                    elec_effic: 0.9,
                    heat_recovery_effic: 1.0,
                },
                ClassIndependentConstants {
                    min_kw: 0.,
                    max_kw: 5000.,
                    min_turn_down_pct: 0.3,
                    max_derate_factor: 1.0,
                    derate_start_temp_deg_f: 59.,
                    derate_slope_pct_per_deg_f: 0.008,
                },
            ),
        ]
        .into_iter()
        .map(
            |(equipment_type, bounds, min_allowable_fraction, half_load, constants)| {
                prime_mover_config(
                    equipment_type,
                    bounds,
                    min_allowable_fraction,
                    half_load,
                    constants,
                )
            },
        )
        .collect::<Result<IndexMap<_, _>, _>>()?;

        Ok(Self {
            prime_movers,
            cooling_thermal_factors: CoolingThermalFactors::reference(),
        })
    }
}

fn prime_mover_config(
    equipment_type: EquipmentType,
    bounds: Vec<(f64, f64)>,
    min_allowable_fraction: f64,
    half_load: HalfLoadFractions,
    constants: ClassIndependentConstants,
) -> Result<(EquipmentType, PrimeMoverConfig), InvalidSizeClassesError> {
    let size_classes = SizeClasses::new(
        equipment_type,
        bounds
            .into_iter()
            .map(|(lower, upper)| SizeClass::new(lower, upper))
            .collect(),
    )?;

    Ok((
        equipment_type,
        PrimeMoverConfig {
            size_classes,
            min_allowable_fraction,
            half_load,
            constants,
        },
    ))
}

impl CoolingThermalFactors {
    pub fn reference() -> Self {
        use EquipmentType::*;

        Self {
            per_equipment_type: IndexMap::from([
                (RecipEngine, 0.9),
                (MicroTurbine, 0.9),
                (CombustionTurbine, 0.9),
                (FuelCell, 0.9),
            ]),
            per_class: IndexMap::from([
                ((RecipEngine, 1), 0.85),
                ((RecipEngine, 2), 0.85),
                ((RecipEngine, 3), 0.87),
                ((RecipEngine, 4), 0.88),
                ((RecipEngine, 5), 0.89),
            ]),
            overrides: IndexMap::from([
                // no absorption chilling is assumed for the smallest engines
                ((RecipEngine, 1), CoolingFactorOverride::Fixed(0.0)),
                (
                    (RecipEngine, 0),
                    CoolingFactorOverride::MeanOfClassesFrom(2),
                ),
            ]),
        }
    }
}
