//! Engine configuration loading and logging setup.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use schedule_engine::EngineConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const DEFAULT_CONFIG_FILE: &str = "schedule2cal.toml";
pub const ENV_PREFIX: &str = "SCHEDULE2CAL";

/// Load [`EngineConfig`] from a TOML file and `SCHEDULE2CAL_*` environment
/// variables, environment winning. Nested keys use `__`
/// (`SCHEDULE2CAL_MISSING_FINAL__MODE=fixed_window`).
///
/// An explicit `path` must exist; the default file is optional.
///
/// ## Errors
/// Returns an error if the file cannot be read or a value has the wrong type.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    let (file, required) = match path {
        Some(path) => (path, true),
        None => (DEFAULT_CONFIG_FILE, false),
    };

    let config: EngineConfig = Config::builder()
        .add_source(File::with_name(file).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Failed to load configuration from {}", file))?
        .try_deserialize()
        .context("Invalid configuration")?;

    tracing::debug!(
        timezone = %config.timezone,
        reference_year = ?config.reference_year,
        "configuration loaded"
    );
    Ok(config)
}

/// Install a stderr subscriber. `RUST_LOG` overrides `level`.
pub fn init_tracing(json: bool, level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}
