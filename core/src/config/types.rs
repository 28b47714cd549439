use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub finalize: FinalizeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "pkgbatch_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Package-manager binary resolved on PATH.
    #[serde(default = "default_package_manager")]
    pub package_manager: String,

    /// Maximum package invocations in flight at once.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
}

fn default_package_manager() -> String {
    "npm".to_string()
}

fn default_max_parallel() -> usize {
    5
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            package_manager: default_package_manager(),
            max_parallel: default_max_parallel(),
        }
    }
}

/// Post-batch command applied once after every package task has settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeConfig {
    #[serde(default = "default_finalize_enabled")]
    pub enabled: bool,

    #[serde(default = "default_finalize_command")]
    pub command: String,

    #[serde(default = "default_finalize_args")]
    pub args: Vec<String>,
}

fn default_finalize_enabled() -> bool {
    true
}

fn default_finalize_command() -> String {
    "wix".to_string()
}

fn default_finalize_args() -> Vec<String> {
    vec!["install".to_string()]
}

impl Default for FinalizeConfig {
    fn default() -> Self {
        Self {
            enabled: default_finalize_enabled(),
            command: default_finalize_command(),
            args: default_finalize_args(),
        }
    }
}
