use crate::server::ServerState;
use posthouse_db::{
    client::{DbClient, DbError},
    collection::PostCollection,
    memory::MemoryPostCollection,
};
use serde::Deserialize;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};
use thiserror::Error;
use tokio::signal;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod server;

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Error connecting to the database: {0}")]
    Database(#[from] DbError),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StoreKind {
    #[default]
    Mongo,
    Memory,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    #[serde(default = "default_server_address")]
    server_address: IpAddr,
    #[serde(default = "default_server_port")]
    server_port: u16,
    #[serde(default)]
    store: StoreKind,
    #[serde(default = "default_mongodb_uri")]
    mongodb_uri: String,
    #[serde(default = "default_mongodb_database")]
    mongodb_database: String,
}

fn default_server_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_server_port() -> u16 {
    3000
}

fn default_mongodb_uri() -> String {
    "mongodb://localhost:27017".to_owned()
}

fn default_mongodb_database() -> String {
    "posthouse".to_owned()
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "posthouse_api=debug,\
                posthouse_db=debug,\
                tower_http=debug,axum::rejection=trace,mongodb=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

async fn open_posts(env: &Env) -> Result<Arc<dyn PostCollection>, InitError> {
    match env.store {
        StoreKind::Mongo => {
            let client = DbClient::connect(&env.mongodb_uri, &env.mongodb_database).await?;
            Ok(Arc::new(client.posts()))
        }
        StoreKind::Memory => {
            warn!("Using the in-memory store, posts will not survive a restart");
            Ok(Arc::new(MemoryPostCollection::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(%err, "Could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(err) => {
                error!(%err, "Could not listen for SIGTERM");
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

    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let posts = open_posts(&env).await?;
    let app = server::app(ServerState::new(posts));

    let server_address = SocketAddr::new(env.server_address, env.server_port);
    let listener = tokio::net::TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    info!(%server_address, "Server is listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(InitError::TcpServe)?;

    Ok(())
}
