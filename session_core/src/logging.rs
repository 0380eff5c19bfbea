//! Structured logging via `tracing`.
//!
//! Initialization is idempotent: the first call installs a compact fmt
//! subscriber, later calls are no-ops. `RUST_LOG` overrides the configured
//! filter when set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    /// Per-target overrides, e.g. `"session_core::ai" = "debug"`.
    pub module_filters: BTreeMap<String, LogLevel>,
    pub show_targets: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            module_filters: BTreeMap::new(),
            show_targets: true,
        }
    }
}

impl LogConfig {
    /// Render as an `EnvFilter` directive string.
    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }
}

pub fn init_tracing(config: &LogConfig) {
    let filter_str = config.to_env_filter_string();
    let show_targets = config.show_targets;
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(show_targets)
            .compact();

        // Another subscriber may already be installed by the host.
        let _ = subscriber.try_init();
    });
}
