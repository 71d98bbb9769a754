use std::net::SocketAddr;

use anyhow::Context;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    decompression::RequestDecompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use crate::{
    config::ServerConfig,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found,
        trace_response_body::trace_response_body,
    },
    route,
    state::ApiState,
    store::BookStore,
};

pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::debug!(config = ?self.config, "Config");

        let store = BookStore::connect(&self.config.database)
            .await
            .context("Failed to connect to database")?;

        store.migrate().await.context("Failed to run migrations")?;

        let state = ApiState::new(self.config.error_verbosity, store.clone());
        let app = app(state, self.config.trace_response_body);

        tracing::info!(addr = %self.config.socket_address, "Starting server");

        let served = serve(self.config.socket_address, app).await;

        store.close().await;
        tracing::info!("Database closed");

        served
    }
}

async fn serve(socket_address: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&socket_address)
        .await
        .context("Bind failed")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server failed")?;

    Ok(())
}

/// Builds the application router around the given state.
pub(crate) fn app(state: ApiState, trace_body: bool) -> Router {
    let mut router = Router::new()
        .merge(route::books::app::app())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            method_not_allowed,
        ));

    if trace_body {
        router = router.layer(middleware::from_fn_with_state(
            state.clone(),
            trace_response_body,
        ));
    }

    router.with_state(state).layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            )
            .layer(RequestDecompressionLayer::new())
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive()),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "Failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }

        tracing::info!("CTRL+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "Failed to install SIGTERM signal handler");
                std::future::pending::<()>().await;
            }
        }

        tracing::info!("SIGTERM received");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
