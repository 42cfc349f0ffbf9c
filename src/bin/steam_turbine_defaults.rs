use chp_defaults::config::SteamTurbineConfig;
use chp_defaults::output::FileOutput;
use chp_defaults::run_steam_turbine_defaults;
use std::env;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt::fmt()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing subscriber failed");

    let working_dir = env::current_dir()?;

    let document = run_steam_turbine_defaults(
        &working_dir,
        &SteamTurbineConfig::default(),
        FileOutput::json(working_dir.clone()),
    )?;

    for (equipment_type, defaults) in &document {
        info!(
            "wrote {} size class parameters for {equipment_type}",
            defaults.size_class_data.len()
        );
    }

    Ok(())
}
