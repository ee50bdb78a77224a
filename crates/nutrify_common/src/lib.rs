// --- File: crates/nutrify_common/src/lib.rs ---
//! Shared building blocks for the Nutrify crates: error handling, HTTP
//! responses and client, CORS, logging.

// Declare modules within this crate
pub mod cors;      // CORS policy and middleware
pub mod error;     // Error handling
pub mod http;      // HTTP utilities
pub mod logging;   // Logging utilities
pub mod services;  // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    NutrifyError,
    HttpStatusCode,
    config_error,
    validation_error,
    external_service_error,
};

// Re-export HTTP utilities for easier access
pub use http::{
    IntoHttpResponse,
    map_json_error,
    method_not_allowed,
    client::create_client,
};

pub use cors::{cors_middleware, CorsPolicy};
pub use services::BoxFuture;
