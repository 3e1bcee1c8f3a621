mod health;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sparkbridge_adapter::{SparkAdapter, SparkTransport, Transport};
use sparkbridge_config::Config;
use tower_http::trace::TraceLayer;

/// Path of the liveness endpoint
pub const HEALTH_PATH: &str = "/health";

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration, talking to Spark over websockets
    ///
    /// # Errors
    ///
    /// Returns an error if the Spark endpoint or timeout cannot be resolved
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let transport = SparkTransport::new(&config.spark)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build the server around an existing transport
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        let listen_address = config.server.listen_address();

        tracing::debug!(
            transport = transport.name(),
            model = %config.adapter.model_name,
            "building adapter"
        );

        for key in config.adapter.overridden_keys() {
            tracing::warn!(key, "adapter.extras overrides a per-request computed parameter");
        }

        let adapter = Arc::new(SparkAdapter::new(config.adapter, transport));

        let app = Router::new()
            .route(HEALTH_PATH, axum::routing::get(health::health_handler))
            .merge(sparkbridge_adapter::adapter_router(adapter))
            .layer(TraceLayer::new_for_http());

        Self {
            router: app,
            listen_address,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
