use itertools::Itertools;
use squash_schema::SchemaModel;
use squash_types::{Result, SquashError, UnresolvedTable};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Orders tables so every foreign table precedes the tables referencing it.
pub struct DependencyResolver<'a> {
    model: &'a SchemaModel,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(model: &'a SchemaModel) -> Self {
        Self { model }
    }

    /// Worklist passes over the model in insertion order. A pass that
    /// resolves nothing means a cycle or a missing foreign table.
    pub fn resolve(&self) -> Result<Vec<String>> {
        let mut order: Vec<String> = Vec::with_capacity(self.model.len());
        let mut resolved: HashSet<&str> = HashSet::with_capacity(self.model.len());
        let mut pending: Vec<&str> = self.model.table_names().collect();
        let mut pass = 0;

        while !pending.is_empty() {
            pass += 1;
            let before = pending.len();
            pending.retain(|&name| {
                let ready = self
                    .model
                    .table(name)
                    .map_or(true, |table| table.dependencies().all(|dep| resolved.contains(dep)));
                if ready {
                    trace!(table = name, pass, "resolved");
                    resolved.insert(name);
                    order.push(name.to_string());
                }
                !ready
            });
            debug!(pass, resolved = before - pending.len(), remaining = pending.len(), "resolver pass");

            if pending.len() == before {
                return Err(SquashError::unresolvable(self.unresolved(&pending, &resolved)));
            }
        }

        Ok(order)
    }

    fn unresolved(&self, pending: &[&str], resolved: &HashSet<&str>) -> Vec<UnresolvedTable> {
        pending
            .iter()
            .filter_map(|&name| self.model.table(name))
            .map(|table| UnresolvedTable {
                table: table.name().to_string(),
                waiting_on: table
                    .dependencies()
                    .filter(|dep| !resolved.contains(dep))
                    .unique()
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }
}
