//! rest-ws server binary.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rest_ws::adapters::auth::JwtSessionValidator;
use rest_ws::adapters::http::{app_router, AppState, PostHandlers};
use rest_ws::adapters::memory::InMemoryPostRepository;
use rest_ws::adapters::websocket::Hub;
use rest_ws::application::{
    CreatePostHandler, DeletePostHandler, GetPostHandler, ListPostsHandler, UpdatePostHandler,
};
use rest_ws::config::AppConfig;
use rest_ws::ports::{EventBroadcaster, PostRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let hub = Hub::start(config.hub.clone());
    let repository: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new());
    let broadcaster: Arc<dyn EventBroadcaster> = Arc::new(hub.clone());

    let posts = PostHandlers::new(
        Arc::new(CreatePostHandler::new(repository.clone(), broadcaster)),
        Arc::new(GetPostHandler::new(repository.clone())),
        Arc::new(ListPostsHandler::new(repository.clone())),
        Arc::new(UpdatePostHandler::new(repository.clone())),
        Arc::new(DeletePostHandler::new(repository)),
    );

    let state = AppState {
        posts,
        validator: Arc::new(JwtSessionValidator::new(&config.auth)),
        hub: hub.clone(),
    };
    let app = app_router(state, &config.server.cors_origins_list());

    let addr = config.server.resolve_addr().await?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "rest-ws listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(hub))
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolves on Ctrl-C or SIGTERM, after the hub has released every client.
async fn shutdown_signal(hub: Hub) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, closing websocket clients");
    hub.shutdown().await;
}
