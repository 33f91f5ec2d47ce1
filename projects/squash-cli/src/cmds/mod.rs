use clap::Args;
use squash_core::SquashConfig;
use squash_types::Result;
use std::path::{Path, PathBuf};

mod init;
mod plan;
mod squash;

pub use init::InitArgs;
pub use plan::PlanArgs;
pub use squash::SquashArgs;

/// Path flags shared by every command. Each one overrides the config file.
#[derive(Args, Debug, Default)]
pub struct PathArgs {
    /// Folder holding the migrations to squash
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Folder receiving the squashed scripts
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Folder the replayed migrations are moved to
    #[arg(short, long)]
    pub move_to: Option<PathBuf>,
}

impl PathArgs {
    pub fn load(&self, config_path: &Path) -> Result<SquashConfig> {
        let mut config = SquashConfig::load_or_default(config_path)?;
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut SquashConfig) {
        config.override_paths(self.path.clone(), self.output.clone(), self.move_to.clone());
    }
}
