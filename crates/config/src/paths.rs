//! Path helpers

use std::path::PathBuf;

/// PAMM data directory (~/.pamm)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .expect("failed to locate home directory")
        .join(".pamm")
}

/// Config file location
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}
