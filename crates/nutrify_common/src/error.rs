// --- File: crates/nutrify_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for every request-level failure in Nutrify.
///
/// Each integration crate converts its own error into this type with
/// `From<SpecificError> for NutrifyError`; the HTTP layer then renders it as
/// `{"error": "<client message>"}` with the matching status code.
#[derive(Error, Debug)]
pub enum NutrifyError {
    /// Missing or malformed server-side configuration.
    ///
    /// `message` is safe to show to clients, `detail` is for the logs only.
    #[error("Configuration error: {message} ({detail})")]
    ConfigError { message: String, detail: String },

    /// The HTTP method is not served by this endpoint.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The request body could not be understood.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// An upstream service rejected the call or could not be reached.
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },
}

impl NutrifyError {
    /// The message returned to the client in the `error` field.
    pub fn client_message(&self) -> String {
        match self {
            NutrifyError::ConfigError { message, .. } => message.clone(),
            NutrifyError::MethodNotAllowed => "Method not allowed".to_string(),
            NutrifyError::ValidationError(msg) => msg.clone(),
            NutrifyError::ExternalServiceError { message, .. } => message.clone(),
        }
    }
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for NutrifyError {
    fn status_code(&self) -> u16 {
        match self {
            NutrifyError::ConfigError { .. } => 500,
            NutrifyError::MethodNotAllowed => 405,
            NutrifyError::ValidationError(_) => 400,
            // Provider rejections are reported as a bad request, not a gateway error.
            NutrifyError::ExternalServiceError { .. } => 400,
        }
    }
}

// Utility functions for error handling
pub fn config_error<M: fmt::Display, D: fmt::Display>(message: M, detail: D) -> NutrifyError {
    NutrifyError::ConfigError {
        message: message.to_string(),
        detail: detail.to_string(),
    }
}

pub fn validation_error<T: fmt::Display>(message: T) -> NutrifyError {
    NutrifyError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> NutrifyError {
    NutrifyError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
