use squash_parser::{normalize, recognize, Argument, CallChain, RawAlteration, Statement, TableVerb};
use squash_schema::{ColumnType, SchemaModel, Table, TableRename};
use squash_types::{Result, SourceLocation, SquashError};
use tracing::{debug, info, warn};

use crate::migration::MigrationSource;

mod column;

pub use column::{altered_column, constrained_key, foreign_key, standard_column};

/// Replays migration sources, in order, into one [SchemaModel].
#[derive(Debug, Default)]
pub struct Replayer {
    model: SchemaModel,
    current_table: Option<String>,
    diagnostics: Vec<SquashError>,
}

impl Replayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    pub fn into_model(self) -> SchemaModel {
        self.model
    }

    /// Recoverable errors met so far, in the order they were reported.
    pub fn diagnostics(&self) -> &[SquashError] {
        &self.diagnostics
    }

    /// Replays the `up` direction of one source. Returns whether the source
    /// contained any schema operation.
    pub fn replay_source(&mut self, source: &MigrationSource) -> Result<bool> {
        debug!(source = %source.name, "replaying migration");
        self.current_table = None;
        let mut saw_schema_operation = false;

        for (index, line) in normalize(&source.text).iter().enumerate() {
            let location = SourceLocation::new(&source.name, index + 1);
            let Some(statement) = recognize(line, self.current_table.is_some(), &location)? else {
                continue;
            };
            match statement {
                Statement::DownBoundary => break,
                Statement::BlockClose => self.current_table = None,
                Statement::SchemaQuery(verb) => debug!(verb = %verb, %location, "ignoring schema query"),
                Statement::RawAlteration(alteration) => {
                    saw_schema_operation = true;
                    self.apply_raw_alteration(&alteration, &location);
                }
                Statement::RenameTable { from, to } => {
                    saw_schema_operation = true;
                    self.rename_table(&from, &to, &location);
                }
                Statement::Table { verb, table } => {
                    saw_schema_operation = true;
                    self.open_table(verb, table);
                }
                Statement::Assignment { property, value } => self.apply_assignment(&property, value),
                Statement::Call(chain) => self.apply_call(&chain, &location)?,
            }
        }

        self.current_table = None;
        Ok(saw_schema_operation)
    }

    fn open_table(&mut self, verb: TableVerb, table: String) {
        match verb {
            TableVerb::Create | TableVerb::Alter => {
                self.model.create_or_alter(&table);
                self.current_table = Some(table);
            }
            TableVerb::Drop => {
                self.current_table = None;
                match self.model.drop_table(&table) {
                    Some((_, orphaned)) => {
                        for (owner, relationship) in orphaned {
                            warn!(
                                table = %owner,
                                column = %relationship.local_column,
                                "dropping foreign key to dropped table {}",
                                table
                            );
                        }
                    }
                    None => debug!(table = %table, "dropping a table that was never created"),
                }
            }
        }
    }

    fn rename_table(&mut self, from: &str, to: &str, location: &SourceLocation) {
        match self.model.rename_table(from, to) {
            TableRename::UnknownTable => {
                report(&mut self.diagnostics, SquashError::unknown_table(from, location.clone()));
                return;
            }
            TableRename::Renamed { replaced: Some(_) } => {
                report(&mut self.diagnostics, SquashError::table_replaced(to, location.clone()));
            }
            TableRename::Renamed { replaced: None } => {}
        }
        if self.current_table.as_deref() == Some(from) {
            self.current_table = Some(to.to_string());
        }
    }

    fn apply_assignment(&mut self, property: &str, value: String) {
        let Some(table) = self.table_mut() else {
            return;
        };
        match property {
            "engine" => table.engine = Some(value),
            "charset" => table.charset = Some(value),
            "collation" => table.collation = Some(value),
            other => debug!(property = other, "ignoring table property"),
        }
    }

    fn apply_raw_alteration(&mut self, alteration: &RawAlteration, location: &SourceLocation) {
        let Some(table) = self.model.table_mut(&alteration.table) else {
            report(
                &mut self.diagnostics,
                SquashError::unknown_table(&alteration.table, location.clone()),
            );
            return;
        };

        let name = alteration.renamed.as_deref().unwrap_or(&alteration.column);
        if alteration.renamed.is_some() && !table.rename_column(&alteration.column, name) {
            debug!(column = %alteration.column, "renamed column did not exist");
        }

        let existing = table.column(name);
        if existing.is_none() {
            report(
                &mut self.diagnostics,
                SquashError::unknown_column(&alteration.table, name, location.clone()),
            );
        }
        let column = altered_column(existing, name, alteration);
        debug!(table = %alteration.table, column = %name, ty = %column.ty, "altering column");
        table.add_column(column);
    }

    fn apply_call(&mut self, chain: &CallChain, location: &SourceLocation) -> Result<()> {
        let Some(head) = chain.head() else {
            return Ok(());
        };
        let Some(table_name) = self.current_table.clone() else {
            return Ok(());
        };
        let table = self.model.create_or_alter(&table_name);

        match head.name.as_str() {
            "primary" => table.primary_key = head.first_string().map(str::to_string),
            "dropPrimary" => table.primary_key = None,
            "unique" => {
                // a second argument is the index name
                match head.args.first().map(Argument::strings).unwrap_or_default().as_slice() {
                    [name] => match table.column_mut(name) {
                        Some(column) => column.unique = true,
                        None => report(
                            &mut self.diagnostics,
                            SquashError::unknown_column(&table_name, *name, location.clone()),
                        ),
                    },
                    // composite unique index
                    _ => report(
                        &mut self.diagnostics,
                        SquashError::unsupported(&head.name, &table_name, location.clone()),
                    ),
                }
            }
            "renameColumn" => {
                let (Some(old), Some(new)) = (head.string_at(0), head.string_at(1)) else {
                    return Err(SquashError::malformed(
                        "renameColumn needs two literal column names",
                        location.clone(),
                    ));
                };
                if !table.rename_column(old, new) {
                    report(
                        &mut self.diagnostics,
                        SquashError::unknown_column(&table_name, old, location.clone()),
                    );
                }
            }
            "dropColumn" | "dropIfExists" => {
                for name in head.strings() {
                    if table.drop_column(name).is_none() {
                        debug!(table = %table_name, column = name, "dropping a column that does not exist");
                    }
                }
            }
            "foreign" => table.add_relationship(foreign_key(chain, location)?),
            "dropForeign" => {
                for name in head.strings() {
                    if table.drop_relationship(name).is_none() {
                        debug!(table = %table_name, foreign = name, "dropping a foreign key that does not exist");
                    }
                }
            }
            "dropTimestamps" => {
                table.drop_column(ColumnType::Timestamps.as_str());
                table.drop_column(ColumnType::NullableTimestamps.as_str());
            }
            "dropTimestampsTz" => {
                table.drop_column(ColumnType::TimestampsTz.as_str());
            }
            "dropSoftDeletes" => {
                table.drop_column(ColumnType::SoftDeletes.as_str());
            }
            "dropSoftDeletesTz" => {
                table.drop_column(ColumnType::SoftDeletesTz.as_str());
            }
            "dropRememberToken" => {
                table.drop_column(ColumnType::RememberToken.as_str());
            }
            "index" | "dropIndex" | "dropUnique" => report(
                &mut self.diagnostics,
                SquashError::unsupported(&head.name, &table_name, location.clone()),
            ),
            name => {
                let Some(ty) = ColumnType::from_call(name) else {
                    return Err(SquashError::unrecognized_call(name, location.clone()));
                };
                let column = standard_column(ty, chain, location)?;
                if chain.find("primary").is_some() {
                    table.primary_key = Some(column.name.clone());
                }
                if let Some(relationship) = constrained_key(&column, chain) {
                    table.add_relationship(relationship);
                }
                table.add_column(column);
            }
        }
        Ok(())
    }

    fn table_mut(&mut self) -> Option<&mut Table> {
        let name = self.current_table.as_deref()?;
        self.model.table_mut(name)
    }
}

/// Replays every source into a fresh model.
pub fn replay_all<'a, I>(sources: I) -> Result<Replayer>
where
    I: IntoIterator<Item = &'a MigrationSource>,
{
    let mut replayer = Replayer::new();
    for source in sources {
        if replayer.replay_source(source)? {
            info!(source = %source.name, "replayed schema migration");
        }
    }
    Ok(replayer)
}

fn report(diagnostics: &mut Vec<SquashError>, error: SquashError) {
    warn!("{}", error);
    diagnostics.push(error);
}
