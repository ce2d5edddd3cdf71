pub mod enums;
pub mod fields;
pub mod document;
pub mod record;

pub use enums::*;
pub use document::*;
pub use record::*;

use thiserror::Error;

/// Schema-level failures: a value that cannot become a typed record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Invalid {field} value: '{value}'")]
    InvalidEnum { field: String, value: String },

    #[error("Field '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },
}

impl SchemaError {
    pub(crate) fn field(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
