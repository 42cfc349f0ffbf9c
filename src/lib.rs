pub mod chp;
pub mod config;
pub mod equipment;
pub mod errors;
pub mod output;
pub mod reducer;
pub mod reference_table;
pub mod size_class;
mod statistics;
pub mod steam_turbine;

use crate::chp::{build_chp_defaults, ChpDefaults, ChpTables};
use crate::config::{ChpConfig, SteamTurbineConfig, CHP_OUTPUT_KEY, STEAM_TURBINE_OUTPUT_KEY};
use crate::output::{write_document, Output};
use crate::steam_turbine::{
    build_steam_turbine_defaults, load_steam_turbine_table, SteamTurbineDocument,
};
use std::path::Path;

/// Loads the CHP reference tables from the input directory, builds the defaults for every
/// configured prime mover and writes them out as `chp_default_data`.
pub fn run_chp_defaults(
    input_dir: &Path,
    config: &ChpConfig,
    output: impl Output,
) -> anyhow::Result<ChpDefaults> {
    let tables = ChpTables::load(input_dir)?;
    let defaults = build_chp_defaults(config, &tables)?;
    write_document(&output, CHP_OUTPUT_KEY, &defaults)?;

    Ok(defaults)
}

/// Loads the steam turbine table from the input directory, builds its defaults and writes them
/// out as `steam_turbine_default_data`.
pub fn run_steam_turbine_defaults(
    input_dir: &Path,
    config: &SteamTurbineConfig,
    output: impl Output,
) -> anyhow::Result<SteamTurbineDocument> {
    let table = load_steam_turbine_table(input_dir)?;
    let document = build_steam_turbine_defaults(config, &table);
    write_document(&output, STEAM_TURBINE_OUTPUT_KEY, &document)?;

    Ok(document)
}
