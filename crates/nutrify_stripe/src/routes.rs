// --- File: crates/nutrify_stripe/src/routes.rs ---

use crate::handlers::{create_checkout_session_handler, StripeState};
use crate::service::CheckoutProvider;
use axum::{middleware, routing::post, Router};
use nutrify_common::{cors_middleware, method_not_allowed, CorsPolicy};
use nutrify_config::AppConfig;
use std::sync::Arc;

/// Creates a router containing the checkout endpoint.
///
/// CORS is applied per route, so pre-flight, 405 and error responses all carry
/// the allow-origin headers.
pub fn routes(config: Arc<AppConfig>, provider: Arc<dyn CheckoutProvider>) -> Router {
    let cors_policy = Arc::new(CorsPolicy::from_config(&config.cors));
    let stripe_state = Arc::new(StripeState { config, provider });

    Router::new()
        .route(
            "/create-checkout-session",
            post(create_checkout_session_handler).fallback(method_not_allowed),
        )
        .route_layer(middleware::from_fn_with_state(cors_policy, cors_middleware))
        .with_state(stripe_state)
}
