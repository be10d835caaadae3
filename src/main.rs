//! Scoreboard relay binary entrypoint wiring the WebSocket sync channel, SSE and REST routes.

use std::{env, net::SocketAddr};

use anyhow::Context;
use scoreboard_relay::{config::AppConfig, routes, state::AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Listening port when neither `PORT` nor `SERVER_PORT` is set.
const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    info!(teams = config.catalog().len(), "team catalog ready");
    let app = routes::app(AppState::new(config));

    let addr = listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "scoreboard relay listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving relay")?;

    info!("scoreboard relay stopped");
    Ok(())
}

/// Bind on every interface, on `PORT`, then `SERVER_PORT`, then [`DEFAULT_PORT`].
fn listen_addr() -> SocketAddr {
    let port = ["PORT", "SERVER_PORT"]
        .into_iter()
        .find_map(|name| env::var(name).ok()?.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    SocketAddr::from(([0, 0, 0, 0], port))
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("received Ctrl+C"),
            _ = term.recv() => info!("received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
