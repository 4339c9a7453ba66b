use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domains::robot::WorkspaceBounds;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub robot: RobotConfig,
    pub planner: PlannerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub locations: LocationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-observer backlog before slow push subscribers start skipping updates.
    pub push_buffer: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    pub turn_degrees: i32,
    pub step_units: f64,
    pub settle_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<WorkspaceBounds>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub turn_ms: u64,
    pub forward_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` EnvFilter directive; `RUST_LOG` wins when set.
    pub filter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_log_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Defaults, then the TOML file if present, then `CAMPUS__<SECTION>__<KEY>`
    /// environment variables, then a bare `PORT`.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Config::default())?);
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        let mut loaded: Config = builder
            .add_source(
                config::Environment::with_prefix("CAMPUS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if let Ok(port) = std::env::var("PORT") {
            loaded.server.port = port.parse()?;
        }
        Ok(loaded)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3001,
                push_buffer: 256,
            },
            robot: RobotConfig {
                turn_degrees: 15,
                step_units: 1.0,
                settle_ms: 120,
                bounds: None,
            },
            planner: PlannerConfig {
                turn_ms: 500,
                forward_ms: 800,
            },
            logging: LoggingConfig {
                filter: "info".to_string(),
                domain_log_file: None,
            },
            locations: LocationsConfig::default(),
        }
    }
}
