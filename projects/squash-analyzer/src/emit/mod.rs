use convert_case::{Case, Casing};
use squash_schema::{Column, Relationship, SchemaModel, Table};
use tracing::debug;

const INDENT: &str = "    ";

/// One generated creation script.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmittedScript {
    /// Position of the table in resolver order.
    pub index: usize,
    pub table: String,
    pub content: String,
}

/// Serializes tables as Laravel migration classes.
#[derive(Debug, Default)]
pub struct ScriptEmitter;

impl ScriptEmitter {
    pub fn new() -> Self {
        Self
    }

    /// One script per name in `order`. Names missing from the model are skipped.
    pub fn emit_all(&self, model: &SchemaModel, order: &[String]) -> Vec<EmittedScript> {
        order
            .iter()
            .filter_map(|name| model.table(name))
            .enumerate()
            .map(|(index, table)| self.emit(index, table))
            .collect()
    }

    pub fn emit(&self, index: usize, table: &Table) -> EmittedScript {
        debug!(table = table.name(), index, "emitting script");
        EmittedScript {
            index,
            table: table.name().to_string(),
            content: self.render(table),
        }
    }

    pub fn class_name(table: &str) -> String {
        format!("squashed_{}_table", table).to_case(Case::Pascal)
    }

    fn render(&self, table: &Table) -> String {
        let name = table.name();
        let body = table_body(table)
            .into_iter()
            .map(|line| format!("{INDENT}{INDENT}{INDENT}{line}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

class {class} extends Migration
{{
    /**
     * Run the migrations.
     *
     * @return void
     */
    public function up()
    {{
        Schema::create('{name}', function (Blueprint $table) {{
{body}
        }});
    }}

    /**
     * Reverse the migrations.
     *
     * @return void
     */
    public function down()
    {{
        Schema::dropIfExists('{name}');
    }}
}}
"#,
            class = Self::class_name(name),
        )
    }
}

/// Statements inside the `Schema::create` closure, without indentation.
fn table_body(table: &Table) -> Vec<String> {
    let mut lines = Vec::new();

    let options = [
        ("engine", &table.engine),
        ("charset", &table.charset),
        ("collation", &table.collation),
    ];
    for (property, value) in options {
        if let Some(value) = value {
            lines.push(format!("$table->{property} = '{value}';"));
        }
    }

    lines.extend(table.columns.values().map(column_statement));

    if let Some(primary) = &table.primary_key {
        let implicit = table.column(primary).is_some_and(|column| column.ty.is_increments());
        if !implicit {
            lines.push(format!("$table->primary('{primary}');"));
        }
    }

    lines.extend(table.relationships.iter().map(foreign_statement));
    lines
}

fn column_statement(column: &Column) -> String {
    let mut statement = if column.is_structural() {
        format!("$table->{}({})", column.ty, column.parameters.as_deref().unwrap_or_default())
    } else {
        match &column.parameters {
            Some(parameters) => format!("$table->{}('{}', {})", column.ty, column.name, parameters),
            None => format!("$table->{}('{}')", column.ty, column.name),
        }
    };

    if column.unsigned {
        statement.push_str("->unsigned()");
    }
    if column.nullable {
        statement.push_str("->nullable()");
    }
    if column.unique {
        statement.push_str("->unique()");
    }
    if let Some(default) = &column.default {
        statement.push_str(&format!("->default({default})"));
    }
    statement.push(';');
    statement
}

fn foreign_statement(relationship: &Relationship) -> String {
    let mut statement = format!(
        "$table->foreign('{}')->references('{}')->on('{}')",
        relationship.local_column, relationship.foreign_column, relationship.foreign_table
    );
    if let Some(action) = &relationship.on_delete {
        statement.push_str(&format!("->onDelete('{action}')"));
    }
    if let Some(action) = &relationship.on_update {
        statement.push_str(&format!("->onUpdate('{action}')"));
    }
    statement.push(';');
    statement
}
