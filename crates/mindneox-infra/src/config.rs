//! Configuration loading: `{data_dir}/config.toml` plus environment overrides.
//!
//! The file is optional and every field has a default. Environment variables
//! win over the file so a one-off run can point at another backend:
//!
//! | Variable | Overrides |
//! |---|---|
//! | `MINDNEOX_API_URL` | `backend.base_url` |
//! | `MINDNEOX_CONVERSATION_LIMIT` | `limiter.conversation_limit` |

use std::path::{Path, PathBuf};

use mindneox_types::config::GlobalConfig;
use tracing::{debug, warn};

pub const API_URL_ENV: &str = "MINDNEOX_API_URL";
pub const CONVERSATION_LIMIT_ENV: &str = "MINDNEOX_CONVERSATION_LIMIT";

/// Path of the config file inside a data directory.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Load the config file, then apply environment overrides.
///
/// A missing, unreadable or malformed file yields the defaults; only the
/// latter two are logged as warnings.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let mut config = read_config_file(&config_path(data_dir)).await;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

async fn read_config_file(path: &Path) -> GlobalConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            return GlobalConfig::default();
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read config file, using defaults");
            return GlobalConfig::default();
        }
    };

    toml::from_str(&content).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "invalid config file, using defaults");
        GlobalConfig::default()
    })
}

/// Apply overrides found through `lookup`. Blank values are ignored and an
/// unparsable limit is logged and skipped.
pub fn apply_env_overrides(config: &mut GlobalConfig, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(url) = lookup(API_URL_ENV) {
        debug!(base_url = %url, "backend URL overridden from environment");
        config.backend.base_url = url.trim().to_string();
    }

    if let Some(raw) = lookup(CONVERSATION_LIMIT_ENV) {
        match raw.trim().parse::<u32>() {
            Ok(limit) => config.limiter.conversation_limit = limit,
            Err(err) => warn!(
                variable = CONVERSATION_LIMIT_ENV,
                value = %raw,
                error = %err,
                "ignoring invalid conversation limit override"
            ),
        }
    }
}
