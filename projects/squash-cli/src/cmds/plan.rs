use clap::Args;
use squash_core::Squasher;
use squash_types::Result;
use std::path::Path;

use super::PathArgs;

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub paths: PathArgs,
}

impl PlanArgs {
    pub fn run(&self, config_path: &Path) -> Result<()> {
        let config = self.paths.load(config_path)?;
        let plan = Squasher::new(config.manager()).plan()?;

        println!(
            "{} migrations replayed, {} with schema operations",
            plan.source_count,
            plan.schema_sources.len()
        );
        for (index, name) in plan.order.iter().enumerate() {
            let Some(table) = plan.model.table(name) else {
                continue;
            };
            println!(
                "{:>4}  {:<32} {} columns, {} foreign keys",
                index,
                name,
                table.columns.len(),
                table.relationships.len()
            );
        }
        for diagnostic in &plan.diagnostics {
            println!("warning: {}", diagnostic);
        }
        Ok(())
    }
}
