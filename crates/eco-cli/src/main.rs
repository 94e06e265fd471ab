//! Interactive shell for the ecosystem simulation.

mod shell;
mod telemetry;

use anyhow::{Context, Result};
use eco_core::CliConfig;
use eco_world::Environment;
use std::io;
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let config = load_config()?;
    let env = Environment::from_config(config.ecosystem)
        .context("Failed to build the environment from configuration")?;

    info!(
        environment = env.name(),
        organisms = env.organisms().len(),
        "Starting ecosystem shell"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = shell::Shell::new(env, config.max_batch_days, stdin.lock(), stdout.lock());
    shell.run()?;

    let env = shell.into_environment();
    info!(
        day = env.day_count(),
        alive = env.get_population_count().total_live(),
        "Session ended"
    );
    Ok(())
}

/// Configuration from the JSON file named by the first argument or
/// `ECO_CONFIG`; defaults when neither is given.
fn load_config() -> Result<CliConfig> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("ECO_CONFIG").map(PathBuf::from));

    let Some(path) = path else {
        return Ok(CliConfig::default());
    };

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: CliConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    info!(path = %path.display(), "Loaded configuration");
    Ok(config)
}
