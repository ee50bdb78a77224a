// --- File: crates/nutrify_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::fmt;

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- CORS Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins, `*` for any.
    pub allow_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
        }
    }
}

// --- Stripe Config ---
// Secret key is read from STRIPE_SECRET_KEY and never serialized.
#[derive(Deserialize, Serialize, Clone)]
pub struct StripeConfig {
    #[serde(default, skip_serializing)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub price_basic: Option<String>,
    #[serde(default)]
    pub price_advanced: Option<String>,
    #[serde(default)]
    pub success_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
    pub api_base: String,
    pub api_version: String,
    pub timeout_secs: u64,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            price_basic: None,
            price_advanced: None,
            success_url: None,
            cancel_url: None,
            api_base: "https://api.stripe.com".to_string(),
            api_version: "2024-06-20".to_string(),
            timeout_secs: 30,
        }
    }
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("price_basic", &self.price_basic)
            .field("price_advanced", &self.price_advanced)
            .field("success_url", &self.success_url)
            .field("cancel_url", &self.cancel_url)
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub stripe: StripeConfig,
}
