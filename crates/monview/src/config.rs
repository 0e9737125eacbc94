use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use monview_geom::{Arrangement, MonitorSpec, Setup};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub open_browser: bool,
    pub session_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5006,
            open_browser: false,
            session_timeout_secs: 1800,
        }
    }
}

/// The setup a new session starts with, and the monitor appended when a
/// setup grows.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorDefaults {
    pub width: f64,
    pub height: f64,
    pub distance: f64,
    pub viewing_distance: f64,
    pub monitor_count: usize,
    pub arrangement: Arrangement,
    pub curve_radius: Option<f64>,
}

impl Default for MonitorDefaults {
    fn default() -> Self {
        Self {
            width: 53.13,
            height: 29.89,
            distance: 60.0,
            viewing_distance: 60.0,
            monitor_count: 2,
            arrangement: Arrangement::Perpendicular,
            curve_radius: None,
        }
    }
}

impl MonitorDefaults {
    pub fn monitor(&self) -> MonitorSpec {
        MonitorSpec::new(self.width, self.distance)
            .with_height(self.height)
            .with_curve_radius(self.curve_radius)
    }

    pub fn setup(&self) -> Setup {
        Setup::new(
            self.arrangement,
            self.viewing_distance,
            vec![self.monitor(); self.monitor_count.max(1)],
        )
    }
}

/// Inclusive range of accepted values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Limits {
    pub width: Bounds,
    pub height: Bounds,
    pub distance: Bounds,
    pub rotation: Bounds,
    pub offset: Bounds,
    pub curve_radius: Bounds,
    /// In inches.
    pub diagonal: Bounds,
    pub max_monitors: usize,
    pub max_setups: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            width: Bounds::new(1.0, 500.0),
            height: Bounds::new(1.0, 300.0),
            distance: Bounds::new(1.0, 1000.0),
            rotation: Bounds::new(-180.0, 180.0),
            offset: Bounds::new(-1000.0, 1000.0),
            curve_radius: Bounds::new(20.0, 10000.0),
            diagonal: Bounds::new(5.0, 200.0),
            max_monitors: 8,
            max_setups: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub samples_per_monitor: usize,
    pub abs_incidence: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 520,
            height: 440,
            samples_per_monitor: 60,
            abs_incidence: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub defaults: MonitorDefaults,
    pub limits: Limits,
    pub plot: PlotConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "monview", "monview").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Layers the embedded defaults, the optional file at `path` and `MONVIEW__*`
/// environment variables.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder().add_source(config::File::from_str(
        DEFAULT_CONFIG,
        config::FileFormat::Toml,
    ));
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    let s = builder
        .add_source(
            config::Environment::with_prefix("MONVIEW")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default(path: Option<&Path>) -> Config {
    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Falling back to built-in configuration: {}", e);
            Config::default()
        }
    }
}

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_match_built_in() {
        let config = load_config(None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let config = load_config(Some(Path::new("/nonexistent/monview/config.toml"))).unwrap();
        assert_eq!(config.server.port, 5006);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("monview-config-{}", std::process::id()));
        fs_err::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs_err::write(
            &path,
            "[server]\nport = 8080\n[defaults]\narrangement = \"Smooth\"\nmonitor_count = 3\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.defaults.arrangement, Arrangement::Smooth);
        assert_eq!(config.defaults.monitor_count, 3);
        assert_eq!(config.limits, Limits::default());

        fs_err::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_default_setup() {
        let setup = MonitorDefaults::default().setup();
        assert_eq!(setup.monitors.len(), 2);
        assert_eq!(setup.arrangement, Arrangement::Perpendicular);
        assert_eq!(setup.monitors[0].width, 53.13);
        assert_eq!(setup.monitors[0].height, 29.89);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = Bounds::new(-180.0, 180.0);
        assert!(bounds.contains(180.0));
        assert!(bounds.contains(-180.0));
        assert!(!bounds.contains(180.5));
        assert!(!bounds.contains(f64::NAN));
    }
}
