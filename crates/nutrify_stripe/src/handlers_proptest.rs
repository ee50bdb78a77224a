#[cfg(test)]
mod tests {
    use crate::error::StripeError;
    use crate::logic::CheckoutSessionParams;
    use crate::routes::routes;
    use crate::service::{CheckoutProvider, CheckoutSession};
    use axum::{
        body::Body,
        http::{Method, Request as HttpRequest, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use nutrify_common::BoxFuture;
    use nutrify_config::{AppConfig, CorsConfig, ServerConfig, StripeConfig};
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    const ENDPOINT: &str = "/create-checkout-session";

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl CheckoutProvider for CountingProvider {
        fn create_checkout_session<'a>(
            &'a self,
            _secret_key: &'a str,
            _params: &'a CheckoutSessionParams,
        ) -> BoxFuture<'a, CheckoutSession, StripeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async {
                Ok(CheckoutSession {
                    id: "cs_test_abc".to_string(),
                    url: "https://pay.example/abc".to_string(),
                })
            })
        }
    }

    fn app_config(secret_key: Option<String>, allow_origin: String) -> Arc<AppConfig> {
        Arc::new(AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            cors: CorsConfig { allow_origin },
            stripe: StripeConfig {
                secret_key,
                price_basic: Some("price_basic_001".to_string()),
                ..StripeConfig::default()
            },
        })
    }

    fn send(
        config: Arc<AppConfig>,
        provider: Arc<CountingProvider>,
        request: HttpRequest<Body>,
    ) -> (Response, Vec<u8>) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let response = routes(config, provider).oneshot(request).await.unwrap();
            let (parts, body) = response.into_parts();
            let bytes = body.collect().await.unwrap().to_bytes().to_vec();
            (Response::from_parts(parts, Body::empty()), bytes)
        })
    }

    fn arb_secret_key() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            "sk_(test|live)_[A-Za-z0-9]{1,24}".prop_map(Some),
            ".{0,24}".prop_map(Some),
        ]
    }

    fn arb_allow_origin() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("*".to_string()),
            Just(String::new()),
            prop::collection::vec("https://[a-z]{1,10}\\.com", 1..4).prop_map(|o| o.join(",")),
        ]
    }

    fn arb_origin() -> impl Strategy<Value = Option<String>> {
        prop::option::of("https?://[a-z]{1,10}\\.(com|org|io)")
    }

    fn arb_other_method() -> impl Strategy<Value = Method> {
        prop_oneof![
            Just(Method::GET),
            Just(Method::PUT),
            Just(Method::DELETE),
            Just(Method::PATCH),
            Just(Method::HEAD),
            Just(Method::TRACE),
            "[A-Z]{1,12}".prop_filter_map("POST and OPTIONS are served", |name| {
                Method::from_bytes(name.as_bytes()).ok()
            }),
        ]
        .prop_filter("POST and OPTIONS are served", |m| {
            *m != Method::POST && *m != Method::OPTIONS
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        // Pre-flight is always an empty 200 and never reaches the provider
        #[test]
        fn test_preflight_always_empty_200(
            secret_key in arb_secret_key(),
            allow_origin in arb_allow_origin(),
            origin in arb_origin(),
            body in prop::collection::vec(any::<u8>(), 0..512),
        ) {
            let provider = Arc::new(CountingProvider::default());
            let mut builder = HttpRequest::builder().method(Method::OPTIONS).uri(ENDPOINT);
            if let Some(origin) = &origin {
                builder = builder.header("origin", origin.as_str());
            }
            let request = builder.body(Body::from(body)).unwrap();

            let (response, bytes) =
                send(app_config(secret_key, allow_origin), provider.clone(), request);

            prop_assert_eq!(response.status(), StatusCode::OK);
            prop_assert!(bytes.is_empty());
            prop_assert!(response.headers().contains_key("access-control-allow-origin"));
            prop_assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        }

        // Every method other than POST and OPTIONS is a 405 with a JSON error
        #[test]
        fn test_other_methods_always_405(
            method in arb_other_method(),
            secret_key in arb_secret_key(),
            body in ".{0,64}",
        ) {
            let provider = Arc::new(CountingProvider::default());
            let request = HttpRequest::builder()
                .method(method.clone())
                .uri(ENDPOINT)
                .body(Body::from(body))
                .unwrap();

            let (response, bytes) =
                send(app_config(secret_key, "*".to_string()), provider.clone(), request);

            prop_assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            prop_assert!(response.headers().contains_key("access-control-allow-origin"));
            // HEAD responses carry no body
            if method != Method::HEAD {
                let body: Value = serde_json::from_slice(&bytes).unwrap();
                prop_assert_eq!(body, json!({ "error": "Method not allowed" }));
            }
            prop_assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        }
    }
}
