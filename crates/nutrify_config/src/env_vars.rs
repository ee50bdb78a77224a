//! Environment variable handling for the Nutrify application.
//!
//! Two naming patterns are understood:
//!
//! * structured variables such as `NUTRIFY__STRIPE__PRICE_BASIC`, picked up by
//!   the `config` crate's environment source, and
//! * the flat deployment variables (`STRIPE_SECRET_KEY`, `PRICE_BASIC`, ...)
//!   that hosting platforms set for the checkout function. These win over
//!   everything else.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

/// The default prefix for structured configuration environment variables
pub const DEFAULT_PREFIX: &str = "NUTRIFY";

/// The separator for structured configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Flat deployment variables and the config path each one overrides.
pub const DEPLOYMENT_ENV_VARS: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("ALLOW_ORIGIN", "cors.allow_origin"),
    ("STRIPE_SECRET_KEY", "stripe.secret_key"),
    ("PRICE_BASIC", "stripe.price_basic"),
    ("PRICE_ADVANCED", "stripe.price_advanced"),
    ("SUCCESS_URL", "stripe.success_url"),
    ("CANCEL_URL", "stripe.cancel_url"),
];

/// Check if a path is a secret path
///
/// Paths containing "secret", "key", "password" or "token" are considered secret
/// and are never echoed into logs.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("key")
        || path_lower.contains("password")
        || path_lower.contains("token")
}

/// Apply the flat deployment variables as overrides on a config builder.
///
/// `lookup` resolves a variable name to its value; pass `|name| std::env::var(name).ok()`
/// in production. Empty values are treated as unset.
pub fn apply_deployment_overrides<F>(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: F,
) -> Result<ConfigBuilder<DefaultState>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for (name, path) in DEPLOYMENT_ENV_VARS {
        let value = lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(v) = &value {
            if is_secret_path(path) {
                tracing::debug!("config override {} <- {} (secret)", path, name);
            } else {
                tracing::debug!("config override {} <- {} = {}", path, name, v);
            }
        }
        builder = builder.set_override_option(*path, value)?;
    }
    Ok(builder)
}
