#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else, clippy::missing_errors_doc)]

use crate::{
    config::{RuntimeConfiguration, StoreConfig},
    data::seed::seed_if_empty,
    error::RosterResult,
    state::RosterState,
    store::{StudentStore, memory::MemoryStudentStore, postgres::PostgresStudentStore},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower_http::{compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod api;
mod config;
mod data;
mod error;
mod form;
mod list_view;
mod maud_conveniences;
mod routes;
mod state;
mod store;

const MAX_BODY_BYTES: usize = 64 * 1024;

async fn open_store(config: &RuntimeConfiguration) -> RosterResult<Arc<dyn StudentStore>> {
    Ok(match config.store() {
        StoreConfig::Postgres(db_config) => {
            let options = PgPoolOptions::new().max_connections(db_config.max_connections());
            Arc::new(PostgresStudentStore::connect(options, db_config).await?)
        }
        StoreConfig::Memory => {
            warn!("Using the in-memory store, nothing will survive a restart");
            Arc::new(MemoryStudentStore::default())
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() {
    //a .env file is optional, the environment may already hold everything
    dotenvy::dotenv().ok();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");

    let config = RuntimeConfiguration::new().expect("unable to create config");
    let store = open_store(&config).await.expect("unable to open store");

    if let Err(e) = seed_if_empty(&*store, config.seed_students()).await {
        error!(?e, "Error seeding students");
    }

    let app = routes::app(RosterState::new(store))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let server_ip = config.server_ip();
    let listener = TcpListener::bind(server_ip)
        .await
        .expect("unable to listen on server ip");

    info!(?server_ip, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("unable to serve app");
}
