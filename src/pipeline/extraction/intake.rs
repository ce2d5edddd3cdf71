//! Routing of already-validated uploads into extractor input.
//!
//! Upload validation and PDF text extraction happen elsewhere; this module
//! only decides, per declared MIME type, whether the pipeline receives
//! evidence text or image bytes. Scanned PDFs without embedded text are
//! rejected rather than sent to OCR.

use thiserror::Error;

use super::prompt::ImageInput;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntakeError {
    #[error("The PDF has no embedded text; scanned PDFs are not processed (upload a digital PDF or an image)")]
    NoEmbeddedText,

    #[error("Unsupported file type '{0}'; use PDF, JPG or PNG")]
    UnsupportedMime(String),

    #[error("PDF text extraction failed: {0}")]
    TextExtraction(String),
}

/// Text pulled out of a PDF, page by page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfText {
    pub pages: Vec<String>,
    /// Pages joined with a blank line.
    pub full_text: String,
    /// True when at least one page has non-whitespace text.
    pub has_text: bool,
}

impl PdfText {
    pub fn from_pages(pages: Vec<String>) -> Self {
        let full_text = pages.join("\n\n");
        let has_text = pages.iter().any(|p| !p.trim().is_empty());
        Self {
            pages,
            full_text,
            has_text,
        }
    }
}

/// PDF text extraction collaborator.
pub trait TextExtractor {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<PdfText, IntakeError>;
}

/// What the extractor is given for one upload.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedInput<'a> {
    Text(String),
    /// Carries the validated MIME type through to the model request.
    Image(ImageInput<'a>),
}

impl<'a> PreparedInput<'a> {
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Image(_) => None,
        }
    }

    pub fn image(&self) -> Option<ImageInput<'a>> {
        match self {
            Self::Image(image) => Some(*image),
            Self::Text(_) => None,
        }
    }

    pub fn image_bytes(&self) -> Option<&'a [u8]> {
        self.image().map(|image| image.bytes)
    }
}

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_PNG: &str = "image/png";
pub const MIME_JPEG: &str = "image/jpeg";

/// Route validated upload bytes by declared MIME type.
pub fn prepare_input<'a>(
    bytes: &'a [u8],
    mime: &str,
    extractor: &dyn TextExtractor,
) -> Result<PreparedInput<'a>, IntakeError> {
    match mime {
        MIME_PDF => {
            let pdf = extractor.extract_text(bytes)?;
            if !pdf.has_text {
                tracing::info!(pages = pdf.pages.len(), "Rejecting PDF without embedded text");
                return Err(IntakeError::NoEmbeddedText);
            }
            Ok(PreparedInput::Text(pdf.full_text))
        }
        MIME_PNG => Ok(PreparedInput::Image(ImageInput::new(bytes, MIME_PNG))),
        MIME_JPEG => Ok(PreparedInput::Image(ImageInput::new(bytes, MIME_JPEG))),
        other => Err(IntakeError::UnsupportedMime(other.to_string())),
    }
}
