//! Docker demo server - HTTP API driving the simulated orchestration scenarios.

mod routes;
mod sse;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dockersim::io::config::{HarnessConfig, load_config};
use dockersim::{Harness, LogCategory, LogType};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "dockersim-server")]
#[command(about = "Browser demo API simulating Docker orchestration scenarios")]
struct Args {
    /// TOML config file (missing file means defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind the server to
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Directory containing the dashboard's static files
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Multiplier for scripted delays (0 runs scenarios instantly)
    #[arg(long)]
    delay_scale: Option<f64>,

    /// Run one scenario at a time instead of letting runs interleave
    #[arg(long)]
    serialize_runs: bool,
}

impl Args {
    /// Load the config file, then apply command-line overrides.
    fn resolve_config(&self) -> anyhow::Result<HarnessConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_config(path)?,
            None => HarnessConfig::default(),
        };
        if let Some(bind) = &self.bind {
            cfg.bind = bind.clone();
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(static_dir) = &self.static_dir {
            cfg.static_dir = static_dir.clone();
        }
        if let Some(scale) = self.delay_scale {
            cfg.delay_scale = scale;
        }
        if self.serialize_runs {
            cfg.serialize_runs = true;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dockersim::logging::init();

    let args = Args::parse();
    let cfg = args.resolve_config()?;

    let harness = Harness::from_config(&cfg);
    let state = AppState::new(harness.clone(), cfg.environment.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = routes::app(state).layer(cors);

    // Serve the dashboard if available
    if cfg.static_dir.exists() {
        info!(static_dir = %cfg.static_dir.display(), "serving static dashboard");
        app = app.fallback_service(
            ServeDir::new(&cfg.static_dir).append_index_html_on_directories(true),
        );
    } else {
        info!(static_dir = %cfg.static_dir.display(), "static directory not found, API-only mode");
    }

    let addr: SocketAddr = format!("{}:{}", cfg.bind, cfg.port)
        .parse()
        .with_context(|| format!("parse bind address {}:{}", cfg.bind, cfg.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(addr = %addr, environment = %cfg.environment, "Docker Demo Server listening");

    harness.log(LogCategory::Orchestration, "Docker Demo Server started", LogType::Success);
    harness.log(LogCategory::Orchestration, "System ready for testing", LogType::Info);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received, shutting down gracefully"),
        _ = terminate => info!("SIGTERM received, shutting down gracefully"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_flags() {
        let args = Args::parse_from(["dockersim-server"]);
        let cfg = args.resolve_config().expect("config");
        assert_eq!(cfg.bind, "0.0.0.0");
        assert_eq!(cfg.delay_scale, 1.0);
        assert!(!cfg.serialize_runs);
    }

    #[test]
    fn flags_override_config_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("dockersim.toml");
        std::fs::write(&path, "port = 4100\ndelay_scale = 0.5\nenvironment = \"staging\"\n")
            .expect("write");

        let args = Args::parse_from([
            "dockersim-server",
            "--config",
            path.to_str().expect("utf8 path"),
            "--port",
            "5200",
            "--serialize-runs",
        ]);
        let cfg = args.resolve_config().expect("config");
        assert_eq!(cfg.port, 5200);
        assert_eq!(cfg.delay_scale, 0.5);
        assert_eq!(cfg.environment, "staging");
        assert!(cfg.serialize_runs);
    }

    #[test]
    fn rejects_negative_delay_scale_flag() {
        let args = Args::parse_from(["dockersim-server", "--delay-scale=-1"]);
        assert!(args.resolve_config().is_err());
    }
}
