//! Data directory layout for the Mindneox client.
//!
//! Everything the client keeps locally lives in one directory:
//! ```text
//! {data_dir}/
//!   config.toml          # optional, see crate::config
//!   guest_storage.json   # guest usage counter (FileStorage)
//!   session.json         # signed-in visitor (SessionIdentity)
//! ```
//! One data directory plays the role of one browser profile.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MINDNEOX_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `MINDNEOX_DATA_DIR` environment variable
/// 2. `~/.mindneox` under the user's home directory
/// 3. `.mindneox` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".mindneox");
    }

    PathBuf::from(".mindneox")
}

/// Replace `path` with `contents` via a `.tmp` sibling and a rename, creating
/// parent directories first. Readers see the old file or the new one, never a
/// partial write.
pub fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, path)
}
