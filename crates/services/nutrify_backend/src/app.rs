// File: services/nutrify_backend/src/app.rs
use axum::{routing::get, Router};
use nutrify_config::AppConfig;
use nutrify_stripe::{routes as stripe_routes, CheckoutProvider};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const BANNER: &str = "Welcome to Nutrify API!";

/// Assembles the full application router.
///
/// The checkout endpoint lives at `/api/create-checkout-session`; with the
/// `openapi` feature, Swagger UI is served at `/api/docs`.
pub fn build_app(config: Arc<AppConfig>, provider: Arc<dyn CheckoutProvider>) -> Router {
    let api_router = Router::new()
        .route("/", get(|| async { BANNER }))
        .merge(stripe_routes(config, provider));

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new().nest("/api", api_router);

    #[cfg(feature = "openapi")]
    {
        use nutrify_stripe::doc::StripeApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Nutrify API",
                version = "0.1.0",
                description = "Nutrify Service API Docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Nutrify", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(StripeApiDoc::openapi());
        tracing::info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    app.layer(TraceLayer::new_for_http())
}
