use thiserror::Error;

/// Errors raised by the form API itself.
///
/// Rule failures are not errors: they are reported as an [`ErrorSet`](crate::ErrorSet)
/// attached to the field. The variants below cover misuse of the model (unknown paths,
/// malformed construction) plus the submit/config outcomes.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("duplicate key `{key}` in group `{group}`")]
    DuplicateKey { group: String, key: String },

    #[error("not a field: {0}")]
    NotAField(String),

    #[error("not a list: {0}")]
    NotAList(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("form is invalid: {}", .fields.join(", "))]
    Invalid { fields: Vec<String> },

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, FormError>;
