// --- File: crates/nutrify_stripe/src/doc.rs ---
#![cfg(feature = "openapi")]
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::logic::{CreateCheckoutSessionResponse, IntakeForm};

/// Body of every non-2xx response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "No such price: 'price_123'")]
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::create_checkout_session_handler),
    components(schemas(IntakeForm, CreateCheckoutSessionResponse, ErrorBody)),
    tags(
        (name = "Checkout", description = "Stripe subscription checkout for intake forms")
    )
)]
pub struct StripeApiDoc;
