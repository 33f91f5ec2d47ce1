use super::*;

impl From<SquashErrorKind> for SquashError {
    fn from(value: SquashErrorKind) -> Self {
        Self { kind: Box::new(value) }
    }
}

impl From<std::io::Error> for SquashError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for SquashError {
    fn from(error: serde_json::Error) -> Self {
        Self::io(format!("JSON error: {}", error))
    }
}
