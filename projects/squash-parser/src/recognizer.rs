use crate::chain::{CallChain, ChainParser, Chained};
use crate::lexer::Lexer;
use regex::Regex;
use squash_types::{Result, SourceLocation, SquashError};
use std::sync::LazyLock;

static DOWN_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"function\s+down\s*\(").expect("down boundary pattern"));

static RAW_ALTERATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ALTER\s+TABLE\s+`?([A-Za-z0-9_$.]+)`?\s+(MODIFY|CHANGE)\s+(?:COLUMN\s+)?`?([A-Za-z0-9_$]+)`?(.*)")
        .expect("raw alteration pattern")
});

const SQL_TYPES: &[&str] = &[
    "char", "varchar", "tinyint", "smallint", "mediumint", "int", "integer", "bigint", "float",
    "double", "decimal", "numeric", "real", "bit", "bool", "boolean", "date", "datetime",
    "timestamp", "time", "year", "text", "tinytext", "mediumtext", "longtext", "blob", "tinyblob",
    "mediumblob", "longblob", "binary", "varbinary", "enum", "set", "json",
];

/// One recognized logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Start of the reverse migration; nothing after it is replayed.
    DownBoundary,
    /// The line closes a block, ending the current table context.
    BlockClose,
    RawAlteration(RawAlteration),
    RenameTable { from: String, to: String },
    Table { verb: TableVerb, table: String },
    /// A `Schema::` call that does not change the schema, e.g. `hasTable`.
    SchemaQuery(String),
    /// `$table->engine = 'InnoDB'` and friends.
    Assignment { property: String, value: String },
    Call(CallChain),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableVerb {
    Create,
    Alter,
    Drop,
}

/// `ALTER TABLE t MODIFY|CHANGE COLUMN c type(params) attrs`, as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAlteration {
    pub table: String,
    pub column: String,
    /// New column name of a `CHANGE old new ...` form.
    pub renamed: Option<String>,
    pub sql_type: String,
    pub parameters: Option<String>,
    pub attributes: String,
}

impl RawAlteration {
    pub fn parse(line: &str) -> Option<Self> {
        let captures = RAW_ALTERATION.captures(line)?;
        let table = captures.get(1)?.as_str().to_string();
        let is_change = captures.get(2)?.as_str().eq_ignore_ascii_case("change");
        let column = captures.get(3)?.as_str().to_string();

        let tail = captures.get(4).map_or("", |m| m.as_str());
        let tail = tail.split(['\'', '"', ';']).next().unwrap_or_default();
        let mut rest = tail.trim_start();

        let mut renamed = None;
        if is_change {
            let (word, after) = split_word(rest);
            if !word.is_empty()
                && !is_sql_type(word)
                && !after.starts_with('(')
                && !after.trim().is_empty()
            {
                renamed = Some(word.to_string());
                rest = after.trim_start();
            }
        }

        let (sql_type, after) = split_word(rest);
        if sql_type.is_empty() {
            return None;
        }
        let after = after.trim_start();
        let (parameters, attributes) = match after.strip_prefix('(') {
            Some(inner) => match inner.find(')') {
                Some(end) => (Some(inner[..end].trim().to_string()), &inner[end + 1..]),
                None => (Some(inner.trim().to_string()), ""),
            },
            None => (None, after),
        };

        Some(Self {
            table,
            column,
            renamed,
            sql_type: sql_type.to_string(),
            parameters: parameters.filter(|p| !p.is_empty()),
            attributes: attributes.trim().to_string(),
        })
    }

    pub fn is_nullable(&self) -> bool {
        !self.attributes.to_lowercase().contains("not null")
    }

    pub fn is_auto_increment(&self) -> bool {
        self.attributes.to_lowercase().contains("auto_increment")
    }

    pub fn is_unsigned(&self) -> bool {
        self.attributes.to_lowercase().contains("unsigned")
    }
}

fn split_word(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(text.len());
    (text[..end].trim_matches('`'), &text[end..])
}

fn is_sql_type(word: &str) -> bool {
    let word = word.to_lowercase();
    SQL_TYPES.contains(&word.as_str())
}

/// Classifies one normalized line. Table-block calls are only recognized
/// while `in_table_block` is set.
pub fn recognize(line: &str, in_table_block: bool, location: &SourceLocation) -> Result<Option<Statement>> {
    if DOWN_BOUNDARY.is_match(line) {
        return Ok(Some(Statement::DownBoundary));
    }
    if line.contains('}') {
        return Ok(Some(Statement::BlockClose));
    }
    if let Some(alteration) = RawAlteration::parse(line) {
        return Ok(Some(Statement::RawAlteration(alteration)));
    }

    let tokens = Lexer::new(line).tokenize();
    if let Some(chain) = ChainParser::new(line, &tokens).parse_static("Schema") {
        return table_directive(&chain, location).map(Some);
    }
    if !in_table_block {
        return Ok(None);
    }

    let statement = match ChainParser::new(line, &tokens).parse_instance() {
        Some(Chained::Calls(chain)) => Some(Statement::Call(chain)),
        Some(Chained::Assignment { property, value, .. }) => Some(Statement::Assignment { property, value }),
        None => None,
    };
    Ok(statement)
}

fn table_directive(chain: &CallChain, location: &SourceLocation) -> Result<Statement> {
    let Some(call) = chain
        .calls
        .iter()
        .find(|call| call.name != "connection")
        .or_else(|| chain.calls.last())
    else {
        return Ok(Statement::SchemaQuery(String::new()));
    };

    let verb = match call.name.as_str() {
        "rename" => {
            let (Some(from), Some(to)) = (call.string_at(0), call.string_at(1)) else {
                return Err(SquashError::malformed(
                    "Schema::rename needs two literal table names",
                    location.clone(),
                ));
            };
            return Ok(Statement::RenameTable { from: from.to_string(), to: to.to_string() });
        }
        "create" => TableVerb::Create,
        "table" => TableVerb::Alter,
        "drop" | "dropIfExists" => TableVerb::Drop,
        other => return Ok(Statement::SchemaQuery(other.to_string())),
    };

    match call.string_at(0) {
        Some(table) => Ok(Statement::Table { verb, table: table.to_string() }),
        None => Err(SquashError::malformed(
            format!("Schema::{} needs a literal table name", call.name),
            location.clone(),
        )),
    }
}
