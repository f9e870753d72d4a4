//! # Storefront
//!
//! Checkout relay between the storefront pages and PayPal.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PAYPAL_ENV=sandbox
//! export PAYPAL_CLIENT_ID=...
//! export PAYPAL_CLIENT_SECRET=...
//! export BASE_URL=http://localhost:3000
//!
//! # Run the server
//! storefront
//! ```

use pay_api::{routes, AppConfig, AppState, LogFormat};
use pay_paypal::PayPalConfig;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    init_tracing(config.log_format);

    let paypal = PayPalConfig::from_env()?;
    let state = AppState::from_parts(config, paypal)?;

    let addr = state.config.socket_addr();

    info!("PayPal environment: {}", state.paypal.environment);
    info!("PayPal API: {}", state.paypal.api_base_url);
    info!("Static files: {}", state.config.static_dir.display());
    if !state.paypal.has_credentials() {
        warn!("PAYPAL_CLIENT_ID/PAYPAL_CLIENT_SECRET not set; order calls will fail");
    }

    // Create router
    let app = routes::create_router(state);

    info!("Storefront listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
