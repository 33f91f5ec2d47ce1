use squash_parser::{Argument, Call, CallChain, RawAlteration};
use squash_schema::{Column, ColumnType, Relationship};
use squash_types::{Result, SourceLocation, SquashError};
use tracing::debug;

/// Modifiers handled by the caller rather than the column itself.
const TABLE_LEVEL_MODIFIERS: &[&str] = &[
    "primary",
    "constrained",
    "references",
    "on",
    "onDelete",
    "onUpdate",
    "cascadeOnDelete",
    "cascadeOnUpdate",
    "nullOnDelete",
    "restrictOnDelete",
    "change",
];

/// Builds a column from `$table-><type>('name', params...)->modifier()...`.
pub fn standard_column(ty: ColumnType, chain: &CallChain, location: &SourceLocation) -> Result<Column> {
    let Some(head) = chain.head() else {
        return Err(SquashError::malformed("empty call chain", location.clone()));
    };

    let mut column = if ty.is_structural() {
        let mut column = Column::structural(ty);
        column.parameters = Some(head.raw_args.clone()).filter(|args| !args.is_empty());
        column
    } else {
        let Some(name) = head.string_at(0).or_else(|| default_name(&head.name)) else {
            return Err(SquashError::malformed(
                format!("`{}` needs a literal column name", head.name),
                location.clone(),
            ));
        };
        let mut column = Column::new(ty, name);
        column.parameters = head.trailing_args.clone();
        column
    };

    for modifier in chain.modifiers() {
        match modifier.name.as_str() {
            "unsigned" => column.unsigned = true,
            "unique" => column.unique = true,
            "nullable" => column.nullable = !is_false(modifier),
            "default" => column.default = Some(modifier.raw_args.clone()),
            name if TABLE_LEVEL_MODIFIERS.contains(&name) => {}
            other => debug!(modifier = other, column = %column.name, "ignoring column modifier"),
        }
    }

    Ok(column)
}

/// Column name of shorthand builders that may be called without one.
fn default_name(call: &str) -> Option<&'static str> {
    match call {
        "id" => Some("id"),
        _ => None,
    }
}

/// `foreign('local')->references('col')->on('table')`, in either order.
pub fn foreign_key(chain: &CallChain, location: &SourceLocation) -> Result<Relationship> {
    let local = chain.head().and_then(Call::first_string);
    let foreign_column = chain.find("references").and_then(Call::first_string);
    let foreign_table = chain.find("on").and_then(Call::first_string);

    let (Some(local), Some(foreign_column), Some(foreign_table)) = (local, foreign_column, foreign_table) else {
        return Err(SquashError::malformed(
            "foreign key needs literal foreign(), references() and on() arguments",
            location.clone(),
        ));
    };

    let mut relationship = Relationship::new(local, foreign_column, foreign_table);
    apply_referential_actions(&mut relationship, chain);
    Ok(relationship)
}

/// `foreignId('user_id')->constrained('users')`. Without an argument the
/// table is the column name minus `_id`, pluralized.
pub fn constrained_key(column: &Column, chain: &CallChain) -> Option<Relationship> {
    let constrained = chain.find("constrained")?;
    let foreign_table = match constrained.string_at(0) {
        Some(table) => table.to_string(),
        None => format!("{}s", column.name.strip_suffix("_id").unwrap_or(&column.name)),
    };
    let foreign_column = constrained.string_at(1).unwrap_or("id");

    let mut relationship = Relationship::new(column.name.clone(), foreign_column, foreign_table);
    apply_referential_actions(&mut relationship, chain);
    Some(relationship)
}

fn apply_referential_actions(relationship: &mut Relationship, chain: &CallChain) {
    for call in chain.modifiers() {
        match call.name.as_str() {
            "onDelete" => relationship.on_delete = call.first_string().map(str::to_string),
            "onUpdate" => relationship.on_update = call.first_string().map(str::to_string),
            "cascadeOnDelete" => relationship.on_delete = Some("cascade".to_string()),
            "cascadeOnUpdate" => relationship.on_update = Some("cascade".to_string()),
            "nullOnDelete" => relationship.on_delete = Some("set null".to_string()),
            "restrictOnDelete" => relationship.on_delete = Some("restrict".to_string()),
            _ => {}
        }
    }
}

/// Applies a raw `MODIFY`/`CHANGE` definition to an existing column, or
/// builds the column if it does not exist yet. Unique, default and
/// position survive; type, nullability, unsignedness and parameters are
/// redefined.
pub fn altered_column(existing: Option<&Column>, name: &str, alteration: &RawAlteration) -> Column {
    let mut ty = ColumnType::from_sql(&alteration.sql_type);
    if alteration.is_auto_increment() {
        ty = ty.auto_incremented();
    }

    let mut column = match existing {
        Some(existing) => existing.clone(),
        None => Column::new(ty.clone(), name),
    };
    column.parameters = if ty.takes_sql_parameters() {
        alteration.parameters.clone()
    } else {
        None
    };
    column.ty = ty;
    column.nullable = alteration.is_nullable();
    column.unsigned = alteration.is_unsigned();
    column
}

fn is_false(call: &Call) -> bool {
    matches!(call.args.first(), Some(Argument::Raw(value)) if value.eq_ignore_ascii_case("false"))
}
