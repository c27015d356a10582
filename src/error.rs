//! Error types for entity validation, the record store and the query engine

use std::path::PathBuf;

use thiserror::Error;

/// Result type for store and entity operations
pub type Result<T> = std::result::Result<T, Error>;

/// Raised synchronously when an id or attribute value is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("\"{value}\" is not a valid value for id. Must be a UUIDv4{}", prefix_hint(.prefix))]
    InvalidId {
        value: String,
        prefix: Option<&'static str>,
    },

    #[error("{kind} has no attribute named \"{name}\"")]
    UnknownAttribute { kind: String, name: String },

    #[error("{kind} requires attribute \"{name}\"")]
    MissingAttribute { kind: String, name: String },

    #[error("{found} is not a valid type for {attribute}. Must be {expected}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        found: String,
    },

    #[error("\"{value}\" is not a valid value for {attribute} ({enumeration}). Options are {}", .options.join(", "))]
    InvalidEnumValue {
        attribute: String,
        enumeration: &'static str,
        value: String,
        options: Vec<&'static str>,
    },

    #[error("\"{given}\" does not match the capitalization of {enumeration} option \"{canonical}\"")]
    NonCanonicalCase {
        enumeration: &'static str,
        given: String,
        canonical: &'static str,
    },

    #[error("\"{attribute}\" is managed by the record and cannot be set")]
    Reserved { attribute: String },

    #[error("Record is missing the \"{0}\" field")]
    MissingField(&'static str),
}

fn prefix_hint(prefix: &Option<&'static str>) -> String {
    match prefix {
        Some(p) => format!(" prefixed with \"{}\"", p),
        None => String::new(),
    }
}

/// Raised when query text is structurally malformed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuerySyntaxError {
    #[error("Query must start with \"SELECT \": {0}")]
    MissingSelect(String),

    #[error("Query must contain a \"FROM\" statement: {0}")]
    MissingFrom(String),

    #[error("Empty {clause} list in: {query}")]
    EmptyList { clause: &'static str, query: String },

    #[error("Unrecognized operator in \"{0}\"")]
    UnknownOperator(String),

    #[error("Expected an attribute name at \"{0}\"")]
    ExpectedAttribute(String),

    #[error("Expected a literal value after \"{0}\"")]
    ExpectedLiteral(String),

    #[error("Unterminated string literal at \"{0}\"")]
    UnterminatedString(String),

    #[error("Unbalanced parentheses in \"{0}\"")]
    UnbalancedParens(String),

    #[error("Unexpected \"{0}\" in WHERE clause")]
    UnexpectedToken(String),
}

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Query syntax error: {0}")]
    QuerySyntax(#[from] QuerySyntaxError),

    #[error("Object {id} already exists in {kind}. Save with overwrite to replace it")]
    StoreConflict { kind: String, id: String },

    #[error("No record found for id(s): {}", .ids.join(", "))]
    NotFound { ids: Vec<String> },

    #[error("\"{name}\" is not a known kind{}", suggestion_hint(.suggestion))]
    UnknownKind {
        name: String,
        suggestion: Option<String>,
    },

    #[error("Corrupt record at {path:?}: {reason}")]
    CorruptRecord { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean \"{}\"?)", s),
        None => String::new(),
    }
}

impl Error {
    /// True for errors caused by the caller's input rather than the environment
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::QuerySyntax(_)
                | Error::StoreConflict { .. }
                | Error::NotFound { .. }
                | Error::UnknownKind { .. }
        )
    }
}
