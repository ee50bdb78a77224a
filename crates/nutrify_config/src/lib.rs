use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::Path;
pub mod env_vars;
pub mod models;
pub use models::*;

use env_vars::{apply_deployment_overrides, CONFIG_SEPARATOR, DEFAULT_PREFIX};

/// Loads the application configuration from files and the process environment.
///
/// Sources, lowest precedence first:
/// 1. built-in defaults
/// 2. `config/default.*` and `config/{RUN_ENV}.*` (both optional, dir overridable via `CONFIG_DIR`)
/// 3. `NUTRIFY__SECTION__KEY` variables
/// 4. the flat deployment variables (`STRIPE_SECRET_KEY`, `PRICE_BASIC`, ...)
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    build_config(Path::new(&config_dir), &run_env, |name| env::var(name).ok())
}

/// Builds the configuration with an explicit deployment-variable lookup.
pub fn build_config<F>(config_dir: &Path, run_env: &str, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let default_path = config_dir.join("default");
    let env_path = config_dir.join(run_env);

    tracing::debug!("config: default_path: {}", default_path.display());
    tracing::debug!("config: env_path: {}", env_path.display());

    let builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("cors.allow_origin", "*")?
        .set_default("stripe.api_base", "https://api.stripe.com")?
        .set_default("stripe.api_version", "2024-06-20")?
        .set_default("stripe.timeout_secs", 30)?
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(DEFAULT_PREFIX)
                .prefix_separator(CONFIG_SEPARATOR)
                .separator(CONFIG_SEPARATOR),
        );

    let builder = apply_deployment_overrides(builder, lookup)?;

    builder.build()?.try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is `DOTENV_OVERRIDE` if set, otherwise the first command line
/// argument when it starts with `.env`, otherwise `.env`. Loading happens once
/// per process; a missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = std::env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
