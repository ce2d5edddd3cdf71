use serde_json::Value;

use super::ExtractionError;
use crate::models::{DocumentPayload, DocumentType, ExtractedDocument};

/// Turn the model's reply into an unscored `ExtractedDocument`.
///
/// The reply must be exactly one JSON object. Only the payload key matching
/// `doc_type` is read; keys for other types are ignored. `raw_text` is the
/// evidence text the model saw (empty for image-only input).
pub fn normalize_model_response(
    response: &str,
    raw_text: &str,
) -> Result<ExtractedDocument, ExtractionError> {
    let value: Value = serde_json::from_str(response)
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

    let object = value.as_object().ok_or_else(|| {
        ExtractionError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        ))
    })?;

    let doc_type = resolve_doc_type(object.get("doc_type"))?;

    for other in DocumentType::all().iter().filter(|t| **t != doc_type) {
        if object.get(other.payload_key()).is_some_and(|v| !v.is_null()) {
            tracing::debug!(
                doc_type = %doc_type,
                ignored_key = other.payload_key(),
                "Ignoring payload for non-matching document type"
            );
        }
    }

    let payload = DocumentPayload::from_json(doc_type, object.get(doc_type.payload_key()))?;

    Ok(ExtractedDocument::new(raw_text, payload))
}

fn resolve_doc_type(value: Option<&Value>) -> Result<DocumentType, ExtractionError> {
    match value {
        Some(Value::String(tag)) => tag
            .parse::<DocumentType>()
            .map_err(|_| ExtractionError::UnknownDocumentType(tag.clone())),
        Some(other) => Err(ExtractionError::UnknownDocumentType(other.to_string())),
        None => Err(ExtractionError::UnknownDocumentType("null".into())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
