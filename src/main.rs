extern crate chp_defaults;

use chp_defaults::config::ChpConfig;
use chp_defaults::output::FileOutput;
use chp_defaults::run_chp_defaults;
use std::env;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt::fmt()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting tracing subscriber failed");

    let working_dir = env::current_dir()?;
    let config = ChpConfig::reference()?;

    let defaults = run_chp_defaults(
        &working_dir,
        &config,
        FileOutput::json(working_dir.clone()),
    )?;

    info!("wrote defaults for {} prime movers", defaults.len());

    Ok(())
}
