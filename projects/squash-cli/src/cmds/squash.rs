use clap::Args;
use squash_core::{SquashOptions, Squasher};
use squash_types::{Result, SquashError};
use std::path::Path;
use tracing::info;

use super::PathArgs;

#[derive(Args)]
pub struct SquashArgs {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Print the scripts instead of writing them; nothing is moved
    #[arg(long)]
    pub dry_run: bool,

    /// Also write schema.json with the final model
    #[arg(long)]
    pub snapshot: bool,
}

impl SquashArgs {
    pub fn run(&self, config_path: &Path) -> Result<()> {
        let mut config = self.paths.load(config_path)?;
        if self.snapshot {
            config.output.snapshot = true;
        }

        let manager = config.manager();
        if !self.dry_run {
            manager.setup().map_err(|e| SquashError::io(format!("{:#}", e)))?;
        }
        info!("Squashing migrations in {}", config.paths.migrations.display());

        let options = SquashOptions {
            dry_run: self.dry_run,
            snapshot: if self.dry_run { None } else { config.snapshot_path() },
        };
        let report = Squasher::new(manager).run(&options)?;

        if self.dry_run {
            for script in &report.scripts {
                println!("// {:06} {}", script.index, script.table);
                println!("{}", script.content);
            }
        } else {
            for path in &report.written {
                println!("✓ Squashed migration written: {}", path.display());
            }
            if !report.archived.is_empty() {
                println!("Moved {} migrations to {}", report.archived.len(), config.paths.move_to.display());
            }
        }

        if !report.plan.diagnostics.is_empty() {
            println!("{} statements were skipped:", report.plan.diagnostics.len());
            for diagnostic in &report.plan.diagnostics {
                println!("  {}", diagnostic);
            }
        }
        Ok(())
    }
}
