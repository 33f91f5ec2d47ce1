use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Result, Context};
use chrono::{Local, NaiveDate};
use tracing::info;

use super::{script_file_name, MigrationSource, MigrationStore};

/// Filesystem-backed [MigrationStore].
pub struct MigrationManager {
    pub migration_dir: PathBuf,
    pub output_dir: PathBuf,
    pub archive_dir: Option<PathBuf>,
    pub extension: String,
    pub date: NaiveDate,
}

impl MigrationManager {
    pub fn new<P: AsRef<Path>, O: AsRef<Path>>(migration_dir: P, output_dir: O) -> Self {
        Self {
            migration_dir: migration_dir.as_ref().to_path_buf(),
            output_dir: output_dir.as_ref().to_path_buf(),
            archive_dir: None,
            extension: "php".to_string(),
            date: Local::now().date_naive(),
        }
    }

    pub fn with_archive<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.archive_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Archiving into the migration directory itself is a no-op.
    pub fn archives(&self) -> bool {
        matches!(&self.archive_dir, Some(dir) if *dir != self.migration_dir)
    }

    pub fn setup(&self) -> Result<()> {
        let mut dirs = vec![&self.output_dir];
        if let Some(archive) = &self.archive_dir {
            dirs.push(archive);
        }
        for dir in dirs {
            if !dir.exists() {
                info!("Creating output folder {}", dir.display());
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create directory: {:?}", dir))?;
            }
        }
        Ok(())
    }
}

impl MigrationStore for MigrationManager {
    fn list_sources(&self) -> Result<Vec<MigrationSource>> {
        let entries = fs::read_dir(&self.migration_dir)
            .with_context(|| format!("Failed to read migration directory: {:?}", self.migration_dir))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read migration: {:?}", path))?;
            sources.push(MigrationSource { name, text });
        }
        Ok(sources)
    }

    fn archive(&self, name: &str) -> Result<()> {
        let Some(archive_dir) = self.archive_dir.as_ref().filter(|_| self.archives()) else {
            return Ok(());
        };
        let from = self.migration_dir.join(name);
        let to = archive_dir.join(name);
        fs::rename(&from, &to)
            .with_context(|| format!("Failed to move {:?} to {:?}", from, to))?;
        Ok(())
    }

    fn write_script(&self, index: usize, table: &str, content: &str) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(script_file_name(self.date, index, table, &self.extension));
        fs::write(&path, content)
            .with_context(|| format!("Failed to write squashed migration: {:?}", path))?;
        Ok(path)
    }
}
