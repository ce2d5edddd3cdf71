use chrono::NaiveDate;
use uuid::Uuid;

use super::client::ModelClient;
use super::enrich::enrich_identity_card;
use super::normalize::normalize_model_response;
use super::intake::PreparedInput;
use super::prompt::{build_extraction_request, ImageInput};
use super::quality::evaluate_quality;
use super::ExtractionError;
use crate::models::ExtractedDocument;

/// Turns one document (evidence text, image, or both) into a scored,
/// typed `ExtractedDocument`.
///
/// Stateless apart from the model client, so one extractor can serve
/// concurrent requests.
pub struct DocumentExtractor {
    client: Box<dyn ModelClient + Send + Sync>,
}

impl DocumentExtractor {
    pub fn new(client: Box<dyn ModelClient + Send + Sync>) -> Self {
        Self { client }
    }

    /// Extract and score as of the local calendar date.
    pub fn extract(
        &self,
        raw_text: Option<&str>,
        image_bytes: Option<&[u8]>,
    ) -> Result<ExtractedDocument, ExtractionError> {
        self.extract_on(raw_text, image_bytes, chrono::Local::now().date_naive())
    }

    /// Extract and score with date checks evaluated against `today`.
    ///
    /// Image bytes arrive without a declared type, so their MIME is sniffed.
    pub fn extract_on(
        &self,
        raw_text: Option<&str>,
        image_bytes: Option<&[u8]>,
        today: NaiveDate,
    ) -> Result<ExtractedDocument, ExtractionError> {
        self.run(raw_text, image_bytes.map(ImageInput::sniffed), today)
    }

    /// Extract a routed upload as of the local calendar date.
    pub fn extract_prepared(
        &self,
        input: &PreparedInput<'_>,
    ) -> Result<ExtractedDocument, ExtractionError> {
        self.extract_prepared_on(input, chrono::Local::now().date_naive())
    }

    /// Extract a routed upload, sending images under their validated MIME.
    pub fn extract_prepared_on(
        &self,
        input: &PreparedInput<'_>,
        today: NaiveDate,
    ) -> Result<ExtractedDocument, ExtractionError> {
        self.run(input.raw_text(), input.image(), today)
    }

    fn run(
        &self,
        raw_text: Option<&str>,
        image: Option<ImageInput<'_>>,
        today: NaiveDate,
    ) -> Result<ExtractedDocument, ExtractionError> {
        let raw_text = raw_text.filter(|t| !t.is_empty());
        let image = image.filter(|i| !i.bytes.is_empty());

        let _span = tracing::info_span!(
            "extract_document",
            request_id = %Uuid::new_v4(),
            text_len = raw_text.map_or(0, str::len),
            image_len = image.map_or(0, |i| i.bytes.len()),
        )
        .entered();

        if raw_text.is_none() && image.is_none() {
            return Err(ExtractionError::InsufficientInput);
        }

        let request = build_extraction_request(raw_text, image);

        let response = self.client.complete(&request).map_err(|e| {
            tracing::warn!(error = %e, "Model call failed");
            ExtractionError::failed(e.into(), "")
        })?;

        let document = normalize_model_response(&response, raw_text.unwrap_or_default())
            .map_err(|e| {
                tracing::warn!(
                    error = %e,
                    response_len = response.len(),
                    "Model response could not be normalized"
                );
                ExtractionError::failed(e, response.as_str())
            })?;

        let document = evaluate_quality(enrich_identity_card(document), today);

        tracing::info!(
            doc_type = %document.doc_type(),
            quality_score = document.quality_score(),
            issues = document.issues().len(),
            "Document extracted"
        );

        Ok(document)
    }
}
