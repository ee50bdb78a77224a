//! Origin-echoing CORS policy for browser-facing endpoints.
//!
//! The allow-list comes from `cors.allow_origin` (`ALLOW_ORIGIN`), a comma
//! separated list where `*` admits any origin. An admitted origin is echoed
//! back verbatim so credentialed requests work; anything else receives the
//! first configured origin. Pre-flight requests never reach the handler.

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use nutrify_config::CorsConfig;
use std::sync::Arc;

const WILDCARD: &str = "*";
const ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl CorsPolicy {
    /// Parses a comma separated allow-list. Blank entries are dropped.
    pub fn parse(allow_origin: &str) -> Self {
        let allowed_origins = allow_origin
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
        Self { allowed_origins }
    }

    pub fn from_config(config: &CorsConfig) -> Self {
        Self::parse(&config.allow_origin)
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// The value for `Access-Control-Allow-Origin` given the request's `Origin`.
    pub fn allow_origin_for(&self, request_origin: Option<&str>) -> String {
        let wildcard = self.allowed_origins.iter().any(|o| o == WILDCARD);

        if let Some(origin) = request_origin {
            if wildcard || self.allowed_origins.iter().any(|o| o == origin) {
                return origin.to_string();
            }
        }

        self.allowed_origins
            .first()
            .cloned()
            .unwrap_or_else(|| WILDCARD.to_string())
    }

    /// Writes the CORS headers onto a response.
    pub fn apply_headers(&self, headers: &mut HeaderMap, allow_origin: &str) {
        let allow_origin = HeaderValue::from_str(allow_origin)
            .unwrap_or_else(|_| HeaderValue::from_static(WILDCARD));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        headers.append(VARY, HeaderValue::from_static("Origin"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
    }
}

/// Axum middleware applying [`CorsPolicy`] to every response of the wrapped routes.
///
/// `OPTIONS` is answered here with `200` and an empty body.
///
/// ```ignore
/// router.route_layer(middleware::from_fn_with_state(policy, cors_middleware))
/// ```
pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let request_origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let allow_origin = policy.allow_origin_for(request_origin.as_deref());

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    policy.apply_headers(response.headers_mut(), &allow_origin);
    response
}
