use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use tokio::signal;

use broadcast_relay::config::Config;
use broadcast_relay::server::{router, AppState};

// ============================================================================
// Logging
// ============================================================================

struct RelayLogger {
    level: LevelFilter,
}

impl Log for RelayLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now();
        let date = timestamp.format("%Y-%m-%d");
        let time = timestamp.format("%H:%M:%S");
        eprintln!(
            "[{date}][{time}][{}][{}] {}",
            record.target(),
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {}
}

fn init_logger() -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(RelayLogger {
        level: LevelFilter::Info,
    }))?;
    log::set_max_level(LevelFilter::Info);
    Ok(())
}

// ============================================================================
// Entry Point
// ============================================================================

fn parse_host(host: &str) -> IpAddr {
    host.parse().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Graceful shutdown signal handler: Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("Shutdown signal received, stopping");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger()?;

    // Credentials are validated for presence here, once, and never re-read.
    let config = Config::from_env()?;
    let address = SocketAddr::new(parse_host(&config.host), config.port);

    let state = AppState::new(config);
    let app = router(state);

    log::info!("Broadcast relay listening on http://{address}");

    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
