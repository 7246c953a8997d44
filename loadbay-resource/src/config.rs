//! Staging configuration — reads `staging.toml` and falls back to a
//! per-user temp directory when the file is missing or malformed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Staging settings parsed from `staging.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Directory scratch payload files are written under.
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_root() -> PathBuf {
    std::env::temp_dir().join("loadbay")
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

impl StagingConfig {
    /// Loads the config from `~/.loadbay/staging.toml` if it exists.
    pub fn load() -> Self {
        Self::load_from(&dirs_path().join("staging.toml"))
    }

    /// Loads the config from an explicit path. Falls back to the default
    /// root with a warning on read or parse errors.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No staging config at {:?}, using default root", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<StagingFile>(&contents) {
                Ok(file) => {
                    info!("Loaded staging config from {:?}", path);
                    file.into_config()
                }
                Err(e) => {
                    warn!(
                        "Failed to parse staging config {:?}: {}. Using default root.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read staging config {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}

/// Raw TOML structure matching the staging.toml format.
#[derive(Deserialize, Default)]
struct StagingFile {
    #[serde(default)]
    staging: StagingSection,
}

#[derive(Deserialize, Default)]
struct StagingSection {
    root: Option<PathBuf>,
}

impl StagingFile {
    fn into_config(self) -> StagingConfig {
        StagingConfig {
            root: self.staging.root.unwrap_or_else(default_root),
        }
    }
}

/// Resolve the loadbay config directory.
fn dirs_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        Path::new(&home).join(".loadbay")
    } else if let Ok(home) = std::env::var("USERPROFILE") {
        Path::new(&home).join(".loadbay")
    } else {
        PathBuf::from(".loadbay")
    }
}
