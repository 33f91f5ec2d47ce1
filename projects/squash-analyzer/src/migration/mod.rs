use std::path::PathBuf;

pub mod manager;

/// One migration file: its chronologically sortable name and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationSource {
    pub name: String,
    pub text: String,
}

impl MigrationSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: text.into() }
    }
}

/// Where migrations come from and where squashed scripts go.
pub trait MigrationStore {
    /// Every migration source in chronological (name-sorted) order.
    fn list_sources(&self) -> anyhow::Result<Vec<MigrationSource>>;

    /// Moves a replayed schema migration out of the active migration path.
    fn archive(&self, name: &str) -> anyhow::Result<()>;

    /// Persists the script for the table at `index` in resolver order.
    fn write_script(&self, index: usize, table: &str, content: &str) -> anyhow::Result<PathBuf>;
}

/// `<date>_<index:06>_squashed_<table>_table.<extension>`
pub fn script_file_name(date: chrono::NaiveDate, index: usize, table: &str, extension: &str) -> String {
    format!(
        "{}_{:06}_squashed_{}_table.{}",
        date.format("%Y_%m_%d"),
        index,
        table,
        extension
    )
}
