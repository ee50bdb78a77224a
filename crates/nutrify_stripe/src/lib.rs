// --- File: crates/nutrify_stripe/src/lib.rs ---

pub mod doc;
pub mod error;
pub mod handlers;
#[cfg(test)]
mod handlers_proptest;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod routes;
pub mod service;

// Re-export for main backend
pub use error::StripeError;
pub use handlers::StripeState;
pub use logic::{CreateCheckoutSessionResponse, IntakeForm}; // For OpenAPI
pub use routes::routes;
pub use service::{CheckoutProvider, CheckoutSession, StripeCheckoutProvider};
