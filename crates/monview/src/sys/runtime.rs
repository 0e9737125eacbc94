use super::server::{self, AppState};
use crate::config::{self, Config};
use crate::events::AppEvent;
use anyhow::Context;
use async_channel::Sender;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Serves the page until ctrl-c.
pub fn run(config: Config, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(serve(config, config_path))
}

async fn serve(config: Config, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let address = SocketAddr::new(config.server.address, config.server.port);
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    let url = format!("http://{}/", listener.local_addr()?);
    log::info!("Serving monitor comparison at {}", url);

    if config.server.open_browser {
        open_browser(&url);
    }

    let app = Arc::new(AppState::new(config, config_path.clone()));
    let (tx, rx) = async_channel::bounded(32);
    start_background_services(listener, app.clone(), config_path, tx);

    while let Ok(event) = rx.recv().await {
        match event {
            AppEvent::ConfigReload => app.reload(),
            AppEvent::SweepSessions => {
                let dropped = app.sweep();
                if dropped > 0 {
                    log::info!(
                        "Dropped {} idle sessions, {} left",
                        dropped,
                        app.sessions().len()
                    );
                }
            }
            AppEvent::Shutdown => {
                log::info!("Shutting down");
                break;
            }
        }
    }
    Ok(())
}

fn start_background_services(
    listener: TcpListener,
    app: Arc<AppState>,
    config_path: Option<PathBuf>,
    tx: Sender<AppEvent>,
) {
    tokio::spawn(async move {
        server::run_server(listener, app).await;
    });

    if let Some(path) = config_path {
        let tx = tx.clone();
        tokio::spawn(async move {
            config::run_async_watcher(path, tx).await;
        });
    }

    {
        let tx = tx.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            // the first tick fires at once
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(AppEvent::SweepSessions).await.is_err() {
                    break;
                }
            }
        });
    }

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(AppEvent::Shutdown).await;
            }
            Err(e) => log::error!("Failed to listen for ctrl-c: {}", e),
        }
    });
}

/// Launches the desktop's URL opener and reaps it in the background.
fn open_browser(url: &str) {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    let spawned = tokio::process::Command::new(opener)
        .arg(url)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn();

    match spawned {
        Ok(mut child) => {
            tokio::spawn(async move {
                match child.wait().await {
                    Ok(status) if !status.success() => {
                        log::warn!("{} exited with {}", opener, status)
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("Failed to wait for {}: {}", opener, e),
                }
            });
        }
        Err(e) => log::warn!("Failed to open a browser with {}: {}", opener, e),
    }
}
