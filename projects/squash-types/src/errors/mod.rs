use std::fmt::{Debug, Formatter};
use std::error::Error;
use std::fmt::Display;

use crate::SourceLocation;

mod display;
mod convert;

/// The result type of this crate.
pub type Result<T> = std::result::Result<T, SquashError>;

/// A boxed error kind, wrapping an [SquashErrorKind].
#[derive(Clone, PartialEq, Eq)]
pub struct SquashError {
    kind: Box<SquashErrorKind>,
}

/// A table the dependency resolver could not place, with the foreign
/// tables it was still waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedTable {
    pub table: String,
    pub waiting_on: Vec<String>,
}

/// The kind of [SquashError].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquashErrorKind {
    /// Reading or writing a migration, script or config file failed.
    IoError { message: String },
    /// `squash.toml` could not be read or written.
    ConfigError { message: String },
    /// Bad command line usage.
    CliError { message: String },
    /// A call the squasher knows about but cannot replay, e.g. `index`.
    UnsupportedOperation { call: String, table: String, location: SourceLocation },
    /// A statement targets a table the model has no record of.
    UnknownTable { table: String, location: SourceLocation },
    /// A statement targets a column missing from its table.
    UnknownColumn { table: String, column: String, location: SourceLocation },
    /// A table rename landed on a name that was already taken.
    TableReplaced { table: String, location: SourceLocation },
    /// A call inside a table block that is not part of the recognized surface.
    UnrecognizedCall { call: String, location: SourceLocation },
    /// A recognized call whose literal arguments are missing or unusable.
    MalformedStatement { message: String, location: SourceLocation },
    /// The resolver made a full pass without placing any table.
    UnresolvableDependencies { unresolved: Vec<UnresolvedTable> },
}

impl SquashError {
    pub fn new(kind: SquashErrorKind) -> Self {
        Self { kind: Box::new(kind) }
    }

    pub fn kind(&self) -> &SquashErrorKind {
        &self.kind
    }

    pub fn io(message: impl Into<String>) -> Self {
        SquashErrorKind::IoError { message: message.into() }.into()
    }

    pub fn config(message: impl Into<String>) -> Self {
        SquashErrorKind::ConfigError { message: message.into() }.into()
    }

    pub fn cli(message: impl Into<String>) -> Self {
        SquashErrorKind::CliError { message: message.into() }.into()
    }

    pub fn unsupported(call: impl Into<String>, table: impl Into<String>, location: SourceLocation) -> Self {
        SquashErrorKind::UnsupportedOperation { call: call.into(), table: table.into(), location }.into()
    }

    pub fn unknown_table(table: impl Into<String>, location: SourceLocation) -> Self {
        SquashErrorKind::UnknownTable { table: table.into(), location }.into()
    }

    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>, location: SourceLocation) -> Self {
        SquashErrorKind::UnknownColumn { table: table.into(), column: column.into(), location }.into()
    }

    pub fn table_replaced(table: impl Into<String>, location: SourceLocation) -> Self {
        SquashErrorKind::TableReplaced { table: table.into(), location }.into()
    }

    pub fn unrecognized_call(call: impl Into<String>, location: SourceLocation) -> Self {
        SquashErrorKind::UnrecognizedCall { call: call.into(), location }.into()
    }

    pub fn malformed(message: impl Into<String>, location: SourceLocation) -> Self {
        SquashErrorKind::MalformedStatement { message: message.into(), location }.into()
    }

    pub fn unresolvable(unresolved: Vec<UnresolvedTable>) -> Self {
        SquashErrorKind::UnresolvableDependencies { unresolved }.into()
    }

    /// Recoverable errors are reported and replay continues; everything
    /// else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            *self.kind,
            SquashErrorKind::UnsupportedOperation { .. }
                | SquashErrorKind::UnknownTable { .. }
                | SquashErrorKind::UnknownColumn { .. }
                | SquashErrorKind::TableReplaced { .. }
        )
    }
}
