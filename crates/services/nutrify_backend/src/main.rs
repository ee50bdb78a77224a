// File: services/nutrify_backend/src/main.rs
use nutrify_common::logging;
use nutrify_config::{ensure_dotenv_loaded, load_config};
use nutrify_stripe::StripeCheckoutProvider;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // RUST_LOG may come from .env, so load it before the subscriber
    ensure_dotenv_loaded();
    logging::init();
    let config = Arc::new(load_config()?);

    if config.stripe.secret_key.is_none() {
        warn!("STRIPE_SECRET_KEY is not set; checkout requests will fail with 500");
    }
    info!("Loaded configuration: {:?}", config);

    let provider = Arc::new(StripeCheckoutProvider::new(&config.stripe)?);
    let app = app::build_app(config.clone(), provider);

    // Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
