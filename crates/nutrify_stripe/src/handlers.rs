// --- File: crates/nutrify_stripe/src/handlers.rs ---
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::{Json, Response},
};
use nutrify_common::{logging::log_error, map_json_error, NutrifyError};
use nutrify_config::AppConfig;
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::StripeError;
use crate::logic::{create_checkout_session, validate_secret_key, CreateCheckoutSessionResponse};
use crate::service::CheckoutProvider;

// --- State for Stripe Handlers ---
#[derive(Clone)]
pub struct StripeState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn CheckoutProvider>,
}

/// Axum handler to create a Stripe Checkout Session for the posted intake form.
///
/// The raw body is taken so that a missing `Content-Type` or an empty body is
/// not rejected before the key check runs. A body axum refuses to buffer
/// (over the size limit) is still answered with a JSON error.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/create-checkout-session", // Path relative to /api
    request_body = crate::logic::IntakeForm,
    responses(
        (status = 200, description = "Stripe Checkout Session created", body = CreateCheckoutSessionResponse),
        (status = 400, description = "Stripe rejected the request or the body is not JSON", body = crate::doc::ErrorBody),
        (status = 405, description = "Method not allowed", body = crate::doc::ErrorBody),
        (status = 500, description = "Server Stripe key misconfigured", body = crate::doc::ErrorBody)
    ),
    tag = "Checkout"
))]
pub async fn create_checkout_session_handler(
    State(state): State<Arc<StripeState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<CreateCheckoutSessionResponse>, Response> {
    let result = match &body {
        Ok(bytes) => {
            create_checkout_session(state.provider.as_ref(), &state.config.stripe, bytes).await
        }
        Err(rejection) => validate_secret_key(state.config.stripe.secret_key.as_deref())
            .and_then(|_| {
                Err::<CreateCheckoutSessionResponse, _>(StripeError::BodyRejected(
                    rejection.body_text(),
                ))
            }),
    };

    if let Err(err) = &result {
        if err.is_provider_error() {
            log_error(err, "Stripe error");
        } else {
            match err {
                StripeError::MissingSecretKey => {
                    error!("STRIPE_SECRET_KEY is not set");
                }
                StripeError::MalformedSecretKey(redacted) => {
                    error!("Bad STRIPE_SECRET_KEY: {}", redacted);
                }
                other => {
                    warn!("Rejected checkout request body: {}", other);
                }
            }
        }
    }

    map_json_error(result, NutrifyError::from)
}
