use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default pkgbatch data directory: ~/.pkgbatch
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".pkgbatch"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.pkgbatch/config.toml (highest)
    let data_dir = get_data_dir()?;
    let user_config = data_dir.join("config.toml");

    // Priority 2: ./pkgbatch.toml (current directory)
    let local_config = Path::new("pkgbatch.toml");

    let mut cfg = if user_config.exists() {
        load_from(&user_config)?
    } else if local_config.exists() {
        load_from(local_config)?
    } else {
        AppConfig::default()
    };

    // Default log file location under the data directory when file logging is on.
    if cfg.logging.file
        && cfg
            .logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .is_none()
    {
        let logs_dir = data_dir.join("logs");
        std::fs::create_dir_all(&logs_dir)?;
        cfg.logging.directory = Some(logs_dir.to_string_lossy().to_string());
    }

    // Environment variable overrides (Priority 0: highest)
    if let Ok(v) = std::env::var("PKGBATCH_PM") {
        if !v.trim().is_empty() {
            cfg.runner.package_manager = v;
        }
    }
    if let Ok(v) = std::env::var("PKGBATCH_MAX_PARALLEL") {
        if let Ok(n) = v.trim().parse::<usize>() {
            cfg.runner.max_parallel = n.max(1);
        }
    }

    Ok(cfg)
}

pub fn load_from(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<AppConfig>(&s)?)
}
