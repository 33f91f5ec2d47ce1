use serde::{Deserialize, Serialize};
use squash_analyzer::migration::manager::MigrationManager;
use squash_types::{Result, SquashError};
use std::path::{Path, PathBuf};
use toml_edit::DocumentMut;
use tracing::debug;

pub const CONFIG_FILE: &str = "squash.toml";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SquashConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_migrations")]
    pub migrations: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Where replayed migrations are moved. Equal to `migrations` means
    /// they stay in place.
    #[serde(default = "default_migrations")]
    pub move_to: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            migrations: default_migrations(),
            output: default_output(),
            move_to: default_migrations(),
        }
    }
}

fn default_migrations() -> PathBuf {
    PathBuf::from("database/migrations")
}

fn default_output() -> PathBuf {
    PathBuf::from("tests/migrations")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Also write the final model as `schema.json` next to the scripts.
    #[serde(default)]
    pub snapshot: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { extension: default_extension(), snapshot: false }
    }
}

fn default_extension() -> String {
    "php".to_string()
}

impl SquashConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SquashConfig = toml::from_str(&content)
            .map_err(|e| SquashError::config(format!("Failed to parse {}: {}", CONFIG_FILE, e)))?;
        Ok(config)
    }

    /// A missing file means defaults; a broken one is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SquashError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Writes every setting into an existing file, keeping its comments
    /// and any keys this config does not know about.
    pub fn update_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = if path.as_ref().exists() {
            std::fs::read_to_string(&path)?
        } else {
            String::new()
        };

        let mut doc = content
            .parse::<DocumentMut>()
            .map_err(|e| SquashError::config(format!("Failed to parse existing {}: {}", CONFIG_FILE, e)))?;

        let new_doc = toml::to_string(self)
            .map_err(|e| SquashError::config(format!("Failed to serialize config: {}", e)))?
            .parse::<DocumentMut>()
            .map_err(|e| SquashError::config(format!("Failed to re-read serialized config: {}", e)))?;

        for (section, item) in new_doc.iter() {
            match (doc.get_mut(section).and_then(|i| i.as_table_like_mut()), item.as_table_like()) {
                (Some(existing), Some(fresh)) => {
                    for (key, value) in fresh.iter() {
                        existing.insert(key, value.clone());
                    }
                }
                _ => {
                    doc.insert(section, item.clone());
                }
            }
        }

        std::fs::write(path, doc.to_string())?;
        Ok(())
    }

    /// Command-line flags win over the file.
    pub fn override_paths(
        &mut self,
        migrations: Option<PathBuf>,
        output: Option<PathBuf>,
        move_to: Option<PathBuf>,
    ) {
        if let Some(migrations) = migrations {
            self.paths.migrations = migrations;
        }
        if let Some(output) = output {
            self.paths.output = output;
        }
        if let Some(move_to) = move_to {
            self.paths.move_to = move_to;
        }
    }

    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.output.snapshot.then(|| self.paths.output.join("schema.json"))
    }

    pub fn manager(&self) -> MigrationManager {
        MigrationManager::new(&self.paths.migrations, &self.paths.output)
            .with_archive(&self.paths.move_to)
            .with_extension(&self.output.extension)
    }
}
