// --- File: crates/nutrify_stripe/src/error.rs ---
use nutrify_common::{config_error, external_service_error, validation_error, NutrifyError};
use thiserror::Error;

/// Message returned to clients whenever the secret key is unusable.
pub const KEY_MISCONFIGURED_MESSAGE: &str = "Server Stripe key misconfigured";

/// Message returned to clients when the body is not valid JSON.
pub const INVALID_BODY_MESSAGE: &str = "Invalid JSON body";

/// Stripe-specific error types.
#[derive(Error, Debug)]
pub enum StripeError {
    /// STRIPE_SECRET_KEY is not configured
    #[error("Stripe secret key is not configured")]
    MissingSecretKey,

    /// STRIPE_SECRET_KEY does not look like a secret key; holds a redacted rendering
    #[error("Stripe secret key is malformed: {0}")]
    MalformedSecretKey(String),

    /// The request body is not valid JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The request body could not be read (e.g. over the size limit)
    #[error("Request body rejected: {0}")]
    BodyRejected(String),

    /// Error occurred during a Stripe API request
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Stripe API
    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Stripe API response
    #[error("Failed to parse Stripe API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Stripe created the session but returned no redirect URL
    #[error("Stripe response missing checkout URL")]
    MissingCheckoutUrl,
}

impl StripeError {
    /// True for failures of the call to Stripe itself.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            StripeError::RequestError(_)
                | StripeError::ApiError { .. }
                | StripeError::ParseError(_)
                | StripeError::MissingCheckoutUrl
        )
    }
}

/// Convert StripeError to NutrifyError
impl From<StripeError> for NutrifyError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::MissingSecretKey | StripeError::MalformedSecretKey(_) => {
                config_error(KEY_MISCONFIGURED_MESSAGE, err)
            }
            StripeError::InvalidBody(_) => validation_error(INVALID_BODY_MESSAGE),
            StripeError::BodyRejected(reason) => validation_error(reason),
            StripeError::ApiError { message, .. } => external_service_error("Stripe", message),
            StripeError::RequestError(e) => external_service_error("Stripe", e),
            StripeError::ParseError(e) => {
                external_service_error("Stripe", format!("Unexpected response from Stripe: {}", e))
            }
            StripeError::MissingCheckoutUrl => external_service_error("Stripe", err),
        }
    }
}
