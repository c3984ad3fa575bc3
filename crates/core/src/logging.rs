// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging setup
//!
//! Installs a `tracing` subscriber with a stderr layer for warnings and a
//! file layer under an explicit log root. Nothing in the engine calls this;
//! the embedding application decides whether and where to log.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid log config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("invalid log level: {0}")]
    InvalidLevel(String),
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Line format for the log file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
}

/// Where and how much to log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Directory holding the log file
    pub log_root: PathBuf,
    pub file_name: String,
    /// Level written to stderr
    pub console_level: String,
    /// Level written to the file, unless `RUST_LOG` is set
    pub file_level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_root: PathBuf::from("log"),
            file_name: "etl.log".to_string(),
            console_level: "warn".to_string(),
            file_level: "debug".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl LogConfig {
    pub fn new(log_root: impl Into<PathBuf>) -> Self {
        Self {
            log_root: log_root.into(),
            ..Self::default()
        }
    }

    pub fn with_file_name(self, file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..self
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, LogError> {
        Ok(toml::from_str(s)?)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_root.join(&self.file_name)
    }

    pub fn console_filter(&self) -> Result<LevelFilter, LogError> {
        parse_level(&self.console_level)
    }

    pub fn file_filter(&self) -> Result<LevelFilter, LogError> {
        parse_level(&self.file_level)
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, LogError> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| LogError::InvalidLevel(level.to_string()))
}

/// Install the global subscriber described by `config`.
///
/// Keep the returned guard alive for as long as logs should be flushed to
/// the file.
pub fn init_logging(
    config: &LogConfig,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LogError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

    let console_level = config.console_filter()?;
    config.file_filter()?;

    std::fs::create_dir_all(&config.log_root)?;
    let file_appender = tracing_appender::rolling::never(&config.log_root, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.file_level));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(console_level)
            .boxed(),
    );
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
    match config.format {
        LogFormat::Compact => layers.push(file_layer.compact().with_filter(file_filter).boxed()),
        LogFormat::Full => layers.push(file_layer.with_filter(file_filter).boxed()),
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
