//! Configuration for the snapshot handler.

use pic_common::Unit;
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::error::{Result, SnapshotError};

/// Configuration for [`SnapshotHandler`](crate::SnapshotHandler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Unit applied by the handler's index/value conversions.
    pub unit: Option<Unit>,

    /// Unit in which [`time`](crate::SnapshotHandler::time) is reported.
    pub time_unit: Option<Unit>,

    /// Log level for [`LogSession`](crate::LogSession) (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            unit: None,
            time_unit: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl HandlerConfig {
    /// Load configuration from environment variables.
    ///
    /// Values that fail to parse are ignored and the default is kept.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), but unparseable values are errors.
    pub fn try_from_env() -> Result<Self> {
        Self::try_from_vars(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup, ignoring bad values.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("SNAPSHOT_UNIT") {
            if let Ok(unit) = val.parse() {
                config.unit = Some(unit);
            }
        }

        if let Some(val) = lookup("SNAPSHOT_TIME_UNIT") {
            if let Ok(unit) = val.parse() {
                config.time_unit = Some(unit);
            }
        }

        if let Some(val) = lookup("SNAPSHOT_LOG_LEVEL") {
            if parse_level(&val).is_some() {
                config.log_level = val.to_lowercase();
            }
        }

        if let Some(val) = lookup("SNAPSHOT_LOG_JSON") {
            config.log_json = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Build from an arbitrary variable lookup, rejecting bad values.
    pub fn try_from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("SNAPSHOT_UNIT") {
            config.unit = Some(parse_unit("SNAPSHOT_UNIT", &val)?);
        }

        if let Some(val) = lookup("SNAPSHOT_TIME_UNIT") {
            config.time_unit = Some(parse_unit("SNAPSHOT_TIME_UNIT", &val)?);
        }

        if let Some(val) = lookup("SNAPSHOT_LOG_LEVEL") {
            config.log_level = val.to_lowercase();
        }

        if let Some(val) = lookup("SNAPSHOT_LOG_JSON") {
            config.log_json = match val.to_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                other => {
                    return Err(SnapshotError::Config(format!(
                        "SNAPSHOT_LOG_JSON must be true/false, got '{}'",
                        other
                    )))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if parse_level(&self.log_level).is_none() {
            return Err(SnapshotError::Config(format!(
                "log_level must be one of trace, debug, info, warn, error; got '{}'",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Tracing level for `log_level`, falling back to INFO.
    pub fn level(&self) -> Level {
        parse_level(&self.log_level).unwrap_or(Level::INFO)
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_time_unit(mut self, unit: Unit) -> Self {
        self.time_unit = Some(unit);
        self
    }
}

fn parse_unit(var: &str, val: &str) -> Result<Unit> {
    val.parse()
        .map_err(|e| SnapshotError::Config(format!("{}: {}", var, e)))
}

fn parse_level(val: &str) -> Option<Level> {
    match val.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}
