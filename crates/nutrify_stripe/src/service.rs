// --- File: crates/nutrify_stripe/src/service.rs ---
use nutrify_common::{create_client, BoxFuture};
use nutrify_config::StripeConfig;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::StripeError;
use crate::logic::CheckoutSessionParams;

/// A created checkout session.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Creates hosted checkout sessions.
///
/// The handler holds this as `Arc<dyn CheckoutProvider>`; tests inject a stub.
pub trait CheckoutProvider: Send + Sync {
    fn create_checkout_session<'a>(
        &'a self,
        secret_key: &'a str,
        params: &'a CheckoutSessionParams,
    ) -> BoxFuture<'a, CheckoutSession, StripeError>;
}

// Shape of the create-session reply; `url` is null for embedded sessions.
#[derive(Deserialize, Debug)]
struct StripeCheckoutSessionApiResponse {
    pub id: String,
    pub url: Option<String>,
}

/// [`CheckoutProvider`] backed by the Stripe REST API.
pub struct StripeCheckoutProvider {
    client: Client,
    api_base: String,
    api_version: String,
}

impl StripeCheckoutProvider {
    /// Builds the provider and its HTTP client from config.
    pub fn new(config: &StripeConfig) -> Result<Self, StripeError> {
        let client = create_client(config.timeout_secs, false)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &StripeConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        }
    }

    async fn post_checkout_session(
        &self,
        secret_key: &str,
        params: &CheckoutSessionParams,
    ) -> Result<CheckoutSession, StripeError> {
        let api_url = format!("{}/v1/checkout/sessions", self.api_base);
        info!("[Stripe Service] Sending request to Stripe API: {}", api_url);

        let response = self
            .client
            .post(&api_url)
            .basic_auth(secret_key, None::<&str>)
            .header("Stripe-Version", &self.api_version)
            .form(&params.to_form_params())
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        info!("[Stripe Service] Stripe API response status: {}", status);

        if status.is_success() {
            let stripe_response: StripeCheckoutSessionApiResponse =
                serde_json::from_str(&body_text)?;
            match stripe_response.url {
                Some(url) => Ok(CheckoutSession {
                    id: stripe_response.id,
                    url,
                }),
                None => {
                    error!(
                        "[Stripe Service] Stripe response missing checkout session URL for {}",
                        stripe_response.id
                    );
                    Err(StripeError::MissingCheckoutUrl)
                }
            }
        } else {
            let error_message = stripe_error_message(&body_text);
            error!(
                "[Stripe Service] Stripe API request failed with HTTP status: {}. Message: {}",
                status, error_message
            );
            Err(StripeError::ApiError {
                status_code: status.as_u16(),
                message: error_message,
            })
        }
    }
}

impl CheckoutProvider for StripeCheckoutProvider {
    fn create_checkout_session<'a>(
        &'a self,
        secret_key: &'a str,
        params: &'a CheckoutSessionParams,
    ) -> BoxFuture<'a, CheckoutSession, StripeError> {
        Box::pin(self.post_checkout_session(secret_key, params))
    }
}

/// Pulls `error.message` out of a Stripe error body, falling back to the raw body.
fn stripe_error_message(body_text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body_text) {
        Ok(json_body) => json_body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or(body_text)
            .to_string(),
        Err(_) => body_text.to_string(),
    }
}
