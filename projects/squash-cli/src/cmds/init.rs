use clap::Args;
use squash_core::SquashConfig;
use squash_types::{Result, SquashError};
use std::path::Path;

use super::PathArgs;

#[derive(Args)]
pub struct InitArgs {
    #[command(flatten)]
    pub paths: PathArgs,

    /// File extension of the squashed scripts
    #[arg(long)]
    pub extension: Option<String>,

    /// Merge into an existing file, keeping its comments
    #[arg(long)]
    pub update: bool,
}

impl InitArgs {
    pub fn run(&self, config_path: &Path) -> Result<()> {
        let exists = config_path.exists();
        if exists && !self.update {
            return Err(SquashError::cli(format!(
                "{} already exists, pass --update to merge into it",
                config_path.display()
            )));
        }

        let mut config = SquashConfig::load_or_default(config_path)?;
        self.paths.apply(&mut config);
        if let Some(extension) = &self.extension {
            config.output.extension = extension.clone();
        }

        if exists {
            config.update_file(config_path)?;
            println!("✓ Updated {}", config_path.display());
        } else {
            config.save(config_path)?;
            println!("✓ Created {}", config_path.display());
        }
        Ok(())
    }
}
