use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG: &str = "beans";
const ENV_PREFIX: &str = "BEANS";
const ENV_SEPARATOR: &str = "__";

/// Custom error type for config loading.
#[beans_derive::beans_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration structure from a file layered with environment overrides.
///
/// 1. **Base File**: settings from `path` (defaults to `beans` in the working directory,
///    in any format the `config` crate recognises from the extension).
/// 2. **Environment Overrides**: variables prefixed with `BEANS__`, with nested keys separated
///    by double underscores (e.g., `BEANS__CHANGE__REVERT_ON_VETO` maps to `change.revert_on_veto`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing, unreadable, or does not match `T`.
///
/// # Example
/// ```rust,no_run
/// use beans_kernel::config::load_config;
/// use beans_kernel::domain::config::BeansConfig;
///
/// let cfg: BeansConfig = load_config(Some("config/beans.toml")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load(path, Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
}

/// Same as [`load_config`], reading overrides from `env` instead of the process environment.
///
/// Keys keep their `BEANS__` prefixed form, exactly as they would appear as variables.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with_env<T>(
    path: Option<impl AsRef<Path>>,
    env: Map<String, String>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load(path, Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR).source(Some(env)))
}

fn load<T>(path: Option<impl AsRef<Path>>, env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG), |p| p.as_ref().to_path_buf());

    info!("Loading config from {}", effective_path.display());

    let config = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(env)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
