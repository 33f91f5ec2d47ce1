pub mod config;

use squash_analyzer::emit::{EmittedScript, ScriptEmitter};
use squash_analyzer::migration::MigrationStore;
use squash_analyzer::replay::Replayer;
use squash_analyzer::resolve::DependencyResolver;
use squash_schema::SchemaModel;
use squash_types::{Result, SquashError};
use std::path::PathBuf;
use tracing::{debug, info};

pub use config::SquashConfig;

#[derive(Debug, Clone, Default)]
pub struct SquashOptions {
    /// Emit scripts without writing or archiving anything.
    pub dry_run: bool,
    /// Where to write a JSON snapshot of the final model, if anywhere.
    pub snapshot: Option<PathBuf>,
}

/// Replay and resolution results, before anything is written.
#[derive(Debug)]
pub struct SquashPlan {
    pub model: SchemaModel,
    pub order: Vec<String>,
    pub diagnostics: Vec<SquashError>,
    /// Sources that contained schema operations, in replay order.
    pub schema_sources: Vec<String>,
    pub source_count: usize,
}

#[derive(Debug)]
pub struct SquashReport {
    pub plan: SquashPlan,
    pub scripts: Vec<EmittedScript>,
    pub written: Vec<PathBuf>,
    pub archived: Vec<String>,
}

/// Runs the whole pipeline against a [MigrationStore]: replay every source,
/// order the tables, emit one script per table.
pub struct Squasher<S> {
    store: S,
}

impl<S: MigrationStore> Squasher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn plan(&self) -> Result<SquashPlan> {
        let sources = self.store.list_sources().map_err(io_error)?;
        info!("Replaying {} migrations", sources.len());

        let mut replayer = Replayer::new();
        let mut schema_sources = Vec::new();
        for source in &sources {
            if replayer.replay_source(source)? {
                info!("Parsed {}", source.name);
                schema_sources.push(source.name.clone());
            } else {
                debug!(source = %source.name, "no schema operations");
            }
        }

        let diagnostics = replayer.diagnostics().to_vec();
        let model = replayer.into_model();

        info!("Resolving foreign key relationships");
        let order = DependencyResolver::new(&model).resolve()?;

        Ok(SquashPlan {
            model,
            order,
            diagnostics,
            schema_sources,
            source_count: sources.len(),
        })
    }

    pub fn run(&self, options: &SquashOptions) -> Result<SquashReport> {
        let plan = self.plan()?;
        let scripts = ScriptEmitter::new().emit_all(&plan.model, &plan.order);

        let mut report = SquashReport {
            plan,
            scripts,
            written: Vec::new(),
            archived: Vec::new(),
        };
        if options.dry_run {
            return Ok(report);
        }

        for script in &report.scripts {
            let path = self
                .store
                .write_script(script.index, &script.table, &script.content)
                .map_err(io_error)?;
            info!("Squashed {} into {}", script.table, path.display());
            report.written.push(path);
        }

        if let Some(path) = &options.snapshot {
            let json = serde_json::to_string_pretty(&report.plan.model)?;
            std::fs::write(path, json)?;
            info!("Wrote schema snapshot to {}", path.display());
        }

        for name in &report.plan.schema_sources {
            self.store.archive(name).map_err(io_error)?;
            report.archived.push(name.clone());
        }

        Ok(report)
    }
}

fn io_error(err: anyhow::Error) -> SquashError {
    SquashError::io(format!("{:#}", err))
}
