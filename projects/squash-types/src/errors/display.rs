use super::*;

impl Error for SquashError {}

impl Debug for SquashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.kind, f)
    }
}

impl Display for SquashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.kind, f)
    }
}

impl Display for UnresolvedTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (depends on {})", self.table, self.waiting_on.join(", "))
    }
}

impl Display for SquashErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SquashErrorKind::IoError { message } => {
                write!(f, "I/O error: {}", message)
            }
            SquashErrorKind::ConfigError { message } => {
                write!(f, "Config error: {}", message)
            }
            SquashErrorKind::CliError { message } => {
                write!(f, "CLI error: {}", message)
            }
            SquashErrorKind::UnsupportedOperation { call, table, location } => {
                write!(f, "Cannot handle `{}` on table {} at {}, skipped", call, table, location)
            }
            SquashErrorKind::UnknownTable { table, location } => {
                write!(f, "Statement at {} references unknown table {}", location, table)
            }
            SquashErrorKind::UnknownColumn { table, column, location } => {
                write!(f, "Statement at {} references non-existent column {}.{}", location, table, column)
            }
            SquashErrorKind::TableReplaced { table, location } => {
                write!(f, "Rename at {} replaced existing table {}", location, table)
            }
            SquashErrorKind::UnrecognizedCall { call, location } => {
                write!(f, "Unknown table operation `{}` at {}", call, location)
            }
            SquashErrorKind::MalformedStatement { message, location } => {
                write!(f, "Malformed statement at {}: {}", location, message)
            }
            SquashErrorKind::UnresolvableDependencies { unresolved } => {
                write!(f, "Cannot resolve foreign key order for: ")?;
                for (i, table) in unresolved.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", table)?;
                }
                Ok(())
            }
        }
    }
}
