use serde_json::Value;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DomainError {
    /// A name field received something that is not a string. The message is
    /// the exact diagnostic text callers may want to print.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("no {kind} named {name}")]
    NotFound { kind: &'static str, name: String },

    /// A handle that was not issued by this registry.
    #[error("unknown {kind} handle #{index}")]
    UnknownHandle { kind: &'static str, index: usize },
}

pub type Result<T> = std::result::Result<T, DomainError>;

/// Take the string out of a loosely typed name argument, or fail with `msg`.
pub(crate) fn expect_str(value: Value, msg: impl FnOnce(&Value) -> String) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(DomainError::InvalidArgument(msg(&other))),
    }
}
