use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::power::PowerClient;
use crate::services::LikelihoodService;

/// Running application with its spawned HTTP server task
///
/// Holds the server join handle so callers can await shutdown.
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Application {
    /// Build and initialize the application
    ///
    /// Creates the POWER client and likelihood service, assembles the router
    /// with CORS and request tracing, binds the listener and spawns the server.
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application components");

        let power_client = PowerClient::new(&config);
        let likelihood_service = LikelihoodService::new(power_client);

        let app_state = AppState { likelihood_service };
        let app = create_router(app_state)
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Starting HTTP server on {}", addr);

        let server_handle = tokio::spawn(async move { axum::serve(listener, app).await });

        info!("Application initialized successfully");

        Ok(Self { server_handle })
    }

    /// Run until the server stops (which runs indefinitely unless error)
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
