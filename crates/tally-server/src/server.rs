use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpListener;
use tracing::{error, info};

use tally_ledger::{open_ledger, Ledger};

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::AppState;
use crate::metrics;
use crate::router::build_router;

/// Tally calculation service.
#[derive(Debug)]
pub struct TallyServer {
    config: ServerConfig,
    ledger: Arc<dyn Ledger>,
}

impl TallyServer {
    /// Construct the service, opening the configured storage backend.
    ///
    /// Fails if the backend kind is unrecognized or the file backend could
    /// not load its existing records -- the service must not start with
    /// storage that failed to load.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let ledger = open_ledger(&config.storage_backend, &config.storage_path)?;
        info!(backend = %config.storage_backend, "ledger opened");
        Ok(Self {
            config,
            ledger: Arc::from(ledger),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve requests until SIGINT or SIGTERM, then flush the ledger.
    ///
    /// A persistence failure at shutdown is logged and shutdown of the
    /// remaining resources proceeds.
    pub async fn serve(self) -> ServerResult<()> {
        let handle = metrics::install_recorder()?;
        let state = AppState {
            ledger: Arc::clone(&self.ledger),
            metrics: handle,
            started_at: Instant::now(),
        };
        let app = build_router(state, self.config.request_timeout);

        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("tally listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("saving records before exit");
        match self.ledger.close() {
            Ok(()) => info!("records saved"),
            Err(e) => error!(error = %e, "failed to persist ledger on shutdown"),
        }
        Ok(())
    }
}

/// Resolves on SIGINT (ctrl-c) or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
