use crate::config::{SteamTurbineConfig, STEAM_TURBINE_FILE};
use crate::equipment::EquipmentType;
use crate::errors::ChpDefaultsError;
use crate::reference_table::ParameterTable;
use indexmap::IndexMap;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// The steam turbine defaults document, which has the single key `steam_turbine`.
pub type SteamTurbineDocument = IndexMap<EquipmentType, SteamTurbineDefaults>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SteamTurbineDefaults {
    /// Parameters read directly from the table, one value per size class
    #[serde(flatten)]
    pub size_class_data: IndexMap<String, Vec<f64>>,
    #[serde(flatten)]
    pub class_independent_data: SteamTurbineClassIndependentData,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SteamTurbineClassIndependentData {
    pub min_kw: Vec<f64>,
    pub max_kw: Vec<f64>,
    pub min_turn_down_pct: Vec<f64>,
}

impl SteamTurbineClassIndependentData {
    const PARAMETER_NAMES: [&'static str; 3] = ["min_kw", "max_kw", "min_turn_down_pct"];

    fn broadcast(config: &SteamTurbineConfig, class_count: usize) -> Self {
        Self {
            min_kw: vec![config.min_kw; class_count],
            max_kw: vec![config.max_kw; class_count],
            min_turn_down_pct: vec![config.min_turn_down_pct; class_count],
        }
    }
}

pub fn load_steam_turbine_table(input_dir: &Path) -> Result<ParameterTable, ChpDefaultsError> {
    let path = input_dir.join(STEAM_TURBINE_FILE);
    debug!("loading reference table {}", path.display());
    ParameterTable::from_path(&path)
}

/// Builds the steam turbine defaults from its combined parameter table. Missing cells become NaN.
#[instrument(skip_all)]
pub fn build_steam_turbine_defaults(
    config: &SteamTurbineConfig,
    table: &ParameterTable,
) -> SteamTurbineDocument {
    let class_count = table.class_count();
    info!("building defaults for steam_turbine over {class_count} size classes");

    let size_class_data = table
        .rows()
        .filter(|(parameter, _)| {
            let is_constant = SteamTurbineClassIndependentData::PARAMETER_NAMES
                .iter()
                .any(|name| name == parameter);
            if is_constant {
                warn!(
                    "{} sets {parameter}, which is replaced by the class-independent constant",
                    table.name()
                );
            }
            !is_constant
        })
        .map(|(parameter, values)| {
            (
                parameter.to_string(),
                values
                    .iter()
                    .map(|value| value.unwrap_or(f64::NAN))
                    .collect(),
            )
        })
        .collect();

    IndexMap::from([(
        EquipmentType::SteamTurbine,
        SteamTurbineDefaults {
            size_class_data,
            class_independent_data: SteamTurbineClassIndependentData::broadcast(
                config,
                class_count,
            ),
        },
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    const STEAM_TURBINE_CSV: &str = "\
parameter,0,1,2,3
installed_cost_us_dollars_per_kw,\"1,316\",\"1,960\",\"1,156\",832
om_cost_us_dollars_per_kwh,0.01,0.01,0.01,0.01
electric_produced_to_thermal_consumed_ratio,0.07,0.07,0.08,
max_kw,1,2,3,4
";

    #[fixture]
    fn table() -> ParameterTable {
        ParameterTable::from_reader("steam_turbine_defaults.csv", Cursor::new(STEAM_TURBINE_CSV))
            .unwrap()
    }

    #[rstest]
    fn test_build_steam_turbine_defaults(table: ParameterTable) {
        let document = build_steam_turbine_defaults(&SteamTurbineConfig::default(), &table);
        let defaults = &document[&EquipmentType::SteamTurbine];

        assert_eq!(
            defaults.size_class_data["installed_cost_us_dollars_per_kw"],
            vec![1316., 1960., 1156., 832.]
        );
        assert!(
            defaults.size_class_data["electric_produced_to_thermal_consumed_ratio"][3].is_nan()
        );
        assert_eq!(
            defaults.class_independent_data,
            SteamTurbineClassIndependentData {
                min_kw: vec![0.; 4],
                max_kw: vec![25000.; 4],
                min_turn_down_pct: vec![0.25; 4],
            }
        );
    }

    #[rstest]
    fn test_constants_replace_table_rows(table: ParameterTable) {
        let document = build_steam_turbine_defaults(&SteamTurbineConfig::default(), &table);
        let json = serde_json::to_value(&document).unwrap();
        let steam_turbine = json["steam_turbine"].as_object().unwrap();

        assert_eq!(
            steam_turbine.keys().collect::<Vec<_>>(),
            vec![
                "installed_cost_us_dollars_per_kw",
                "om_cost_us_dollars_per_kwh",
                "electric_produced_to_thermal_consumed_ratio",
                "min_kw",
                "max_kw",
                "min_turn_down_pct",
            ]
        );
        assert_eq!(json["steam_turbine"]["max_kw"][0], 25000.0);
        for values in steam_turbine.values() {
            assert_eq!(values.as_array().unwrap().len(), 4);
        }
    }
}
