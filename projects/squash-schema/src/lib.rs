use indexmap::IndexMap;

mod column;

pub use column::{Column, ColumnType};

/// The cumulative schema: table name to [Table], in creation order.
///
/// The key of every entry always equals the name stored on its table;
/// [SchemaModel::rename_table] re-keys both at once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaModel {
    tables: IndexMap<String, Table>,
}

impl SchemaModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Returns the table with this name, creating an empty one if the model
    /// has never seen it.
    pub fn create_or_alter(&mut self, name: &str) -> &mut Table {
        self.tables
            .entry(name.to_string())
            .or_insert_with(|| Table::new(name))
    }

    /// Removes a table. Relationships elsewhere that pointed at it are
    /// removed too and handed back as `(owning table, relationship)`.
    pub fn drop_table(&mut self, name: &str) -> Option<(Table, Vec<(String, Relationship)>)> {
        let table = self.tables.shift_remove(name)?;

        let mut orphaned = Vec::new();
        for other in self.tables.values_mut() {
            let owner = other.name.clone();
            other.relationships.retain(|rel| {
                if rel.foreign_table == name {
                    orphaned.push((owner.clone(), rel.clone()));
                    false
                } else {
                    true
                }
            });
        }

        Some((table, orphaned))
    }

    /// Re-keys `old` as `new`. The renamed table moves to the end of the
    /// creation order and every relationship targeting `old` is pointed at
    /// `new`. A table already named `new` is replaced and handed back.
    pub fn rename_table(&mut self, old: &str, new: &str) -> TableRename {
        let Some(mut table) = self.tables.shift_remove(old) else {
            return TableRename::UnknownTable;
        };
        table.name = new.to_string();
        let replaced = self.tables.shift_remove(new);
        self.tables.insert(new.to_string(), table);

        for table in self.tables.values_mut() {
            for rel in &mut table.relationships {
                if rel.foreign_table == old {
                    rel.foreign_table = new.to_string();
                }
            }
        }
        TableRename::Renamed { replaced }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRename {
    UnknownTable,
    Renamed { replaced: Option<Table> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Table {
    name: String,
    pub engine: Option<String>,
    pub charset: Option<String>,
    pub collation: Option<String>,
    pub primary_key: Option<String>,
    pub columns: IndexMap<String, Column>,
    pub relationships: Vec<Relationship>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            engine: None,
            charset: None,
            collation: None,
            primary_key: None,
            columns: IndexMap::new(),
            relationships: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.get_mut(name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Adds a column, or replaces an existing one of the same name in place.
    pub fn add_column(&mut self, column: Column) {
        self.columns.insert(column.name.clone(), column);
    }

    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        self.columns.shift_remove(name)
    }

    /// Renames a column without moving it. Returns `false` if `old` is unknown.
    pub fn rename_column(&mut self, old: &str, new: &str) -> bool {
        if !self.columns.contains_key(old) {
            return false;
        }
        if old != new {
            self.columns.shift_remove(new);
        }

        let columns = std::mem::take(&mut self.columns);
        self.columns = columns
            .into_iter()
            .map(|(key, mut column)| {
                if key == old {
                    column.name = new.to_string();
                    (new.to_string(), column)
                } else {
                    (key, column)
                }
            })
            .collect();

        if self.primary_key.as_deref() == Some(old) {
            self.primary_key = Some(new.to_string());
        }
        for rel in &mut self.relationships {
            if rel.local_column == old {
                rel.local_column = new.to_string();
            }
        }
        true
    }

    /// Adds a relationship. A relationship on the same local column is replaced.
    pub fn add_relationship(&mut self, relationship: Relationship) {
        match self
            .relationships
            .iter_mut()
            .find(|rel| rel.local_column == relationship.local_column)
        {
            Some(existing) => *existing = relationship,
            None => self.relationships.push(relationship),
        }
    }

    /// Removes the relationship named by its local column or by its
    /// conventional constraint name `<table>_<column>_foreign`.
    pub fn drop_relationship(&mut self, name: &str) -> Option<Relationship> {
        let position = self.relationships.iter().position(|rel| {
            rel.local_column == name || rel.constraint_name(&self.name) == name
        })?;
        Some(self.relationships.remove(position))
    }

    /// Foreign tables this table must be created after. Self references
    /// are left out.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.relationships
            .iter()
            .map(|rel| rel.foreign_table.as_str())
            .filter(move |foreign| *foreign != self.name)
    }
}

/// `local_column` of the owning table references `foreign_column` of
/// `foreign_table`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relationship {
    pub local_column: String,
    pub foreign_column: String,
    pub foreign_table: String,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
}

impl Relationship {
    pub fn new(
        local_column: impl Into<String>,
        foreign_column: impl Into<String>,
        foreign_table: impl Into<String>,
    ) -> Self {
        Self {
            local_column: local_column.into(),
            foreign_column: foreign_column.into(),
            foreign_table: foreign_table.into(),
            on_delete: None,
            on_update: None,
        }
    }

    pub fn constraint_name(&self, table: &str) -> String {
        format!("{}_{}_foreign", table, self.local_column)
    }
}
