//! Configuration loaded from `lineage.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LineageError, LineageResult};
use crate::events::{DEFAULT_EVENT_CAPACITY, MAX_EVENT_CAPACITY};

/// Environment variable that overrides `[log] filter`.
pub const LOG_ENV: &str = "LINEAGE_LOG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    pub events: EventsConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// How many undelivered changes a subscriber may fall behind by.
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory under the root holding the snapshot.
    pub dir: String,
    pub file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: crate::snapshot::STORAGE_DIR.to_string(),
            file: crate::snapshot::SNAPSHOT_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "lineage=info,lineage_core=info".to_string(),
        }
    }
}

impl LineageConfig {
    pub const FILE_NAME: &'static str = "lineage.toml";

    pub fn from_toml(text: &str) -> LineageResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used.
    pub fn validate(&self) -> LineageResult<()> {
        let capacity = self.events.capacity;
        if !(1..=MAX_EVENT_CAPACITY).contains(&capacity) {
            return Err(LineageError::invalid_config(format!(
                "events.capacity must be between 1 and {MAX_EVENT_CAPACITY}, got {capacity}"
            )));
        }
        let file = &self.storage.file;
        if Path::new(file).file_name() != Some(std::ffi::OsStr::new(file)) {
            return Err(LineageError::invalid_config(format!(
                "storage.file must be a plain file name, got {file:?}"
            )));
        }
        Ok(())
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> LineageResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::debug!("Config loaded from: {}", path.display());
        Ok(config)
    }

    /// Load `lineage.toml` from a root directory.
    pub fn discover(root: &Path) -> LineageResult<Self> {
        Self::load(&root.join(Self::FILE_NAME))
    }

    /// Apply `LINEAGE_LOG` if set.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(filter) = std::env::var(LOG_ENV) {
            self.log.filter = filter;
        }
        self
    }

    pub fn storage_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.storage.dir)
    }

    pub fn snapshot_path(&self, root: &Path) -> PathBuf {
        self.storage_dir(root).join(&self.storage.file)
    }
}
