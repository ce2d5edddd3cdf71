pub mod client;
pub mod prompt;
pub mod normalize;
pub mod enrich;
pub mod quality;
pub mod orchestrator;
pub mod intake;

pub use client::*;
pub use prompt::*;
pub use normalize::*;
pub use enrich::*;
pub use quality::*;
pub use orchestrator::*;
pub use intake::*;

use thiserror::Error;

use crate::models::SchemaError;

/// Failures of the model provider round trip, independent of the provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Model service is not reachable at {0}")]
    Connection(String),

    #[error("Model request timed out after {0}s")]
    Timeout(u64),

    #[error("Model service rejected the credentials")]
    Unauthorized,

    #[error("Model service rate limit exceeded")]
    RateLimited,

    #[error("Model service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Model service reply could not be read: {0}")]
    InvalidReply(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Either document text or image bytes are required")]
    InsufficientInput,

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Unknown document type in model response: {0}")]
    UnknownDocumentType(String),

    #[error("Field '{field}' failed validation: {reason}")]
    FieldValidation { field: String, reason: String },

    #[error("Model provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Anything that went wrong between sending the document to the model
    /// and holding a typed record. `raw_response` is the model's reply, empty
    /// when the provider call itself failed.
    #[error("Model response could not be interpreted: {source}")]
    ExtractionFailed {
        #[source]
        source: Box<ExtractionError>,
        raw_response: String,
    },
}

impl ExtractionError {
    pub(crate) fn failed(source: ExtractionError, raw_response: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            source: Box::new(source),
            raw_response: raw_response.into(),
        }
    }

    /// Whether submitting the same document again may succeed. Invalid input
    /// will not get better on retry; a model round trip might.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExtractionFailed { .. } | Self::Provider(_))
    }

    /// The model reply that failed to normalize, if one was received.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::ExtractionFailed { raw_response, .. } if !raw_response.is_empty() => {
                Some(raw_response)
            }
            _ => None,
        }
    }
}

impl From<SchemaError> for ExtractionError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::InvalidEnum { value, .. } => Self::UnknownDocumentType(value),
            SchemaError::InvalidField { field, reason } => Self::FieldValidation { field, reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_field_error_maps_to_field_validation() {
        let err: ExtractionError = SchemaError::InvalidField {
            field: "numero_poliza".into(),
            reason: "must not be empty".into(),
        }
        .into();
        assert!(matches!(
            err,
            ExtractionError::FieldValidation { ref field, .. } if field == "numero_poliza"
        ));
    }

    #[test]
    fn extraction_failed_is_retryable_and_keeps_response() {
        let err = ExtractionError::failed(
            ExtractionError::MalformedResponse("expected value".into()),
            "not json",
        );
        assert!(err.is_retryable());
        assert_eq!(err.raw_response(), Some("not json"));
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn insufficient_input_is_not_retryable() {
        assert!(!ExtractionError::InsufficientInput.is_retryable());
        assert_eq!(ExtractionError::InsufficientInput.raw_response(), None);
    }

    #[test]
    fn provider_failure_has_no_raw_response() {
        let err = ExtractionError::failed(ProviderError::Timeout(120).into(), "");
        assert_eq!(err.raw_response(), None);
        assert!(err.to_string().contains("timed out after 120s"));
    }
}
