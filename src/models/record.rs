use serde::{Deserialize, Serialize};

use super::document::ExtractedDocument;
use super::enums::DocumentType;

/// What the persistence layer stores for each processed document: the
/// columns it filters and sorts on, plus the full record as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_type: DocumentType,
    pub quality_score: f64,
    pub payload_json: String,
}

impl DocumentRecord {
    pub fn from_document(document: &ExtractedDocument) -> Result<Self, serde_json::Error> {
        Ok(Self {
            doc_type: document.doc_type(),
            quality_score: document.quality_score(),
            payload_json: serde_json::to_string(document)?,
        })
    }

    /// Rebuild the full document from the stored JSON.
    pub fn document(&self) -> Result<ExtractedDocument, serde_json::Error> {
        serde_json::from_str(&self.payload_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{DocumentPayload, IdentityCardData};

    #[test]
    fn record_restores_full_document() {
        let mut card = IdentityCardData::new("1098765432").unwrap();
        card.blood_group_rh = Some("A-".into());
        let doc = ExtractedDocument::new("G.S. RH: A-", DocumentPayload::IdentityCard(Some(card)));

        let record = DocumentRecord::from_document(&doc).unwrap();
        assert_eq!(record.doc_type, DocumentType::IdentityCard);
        assert_eq!(record.quality_score, 0.0);
        assert_eq!(record.document().unwrap(), doc);
    }

    #[test]
    fn infinite_height_cannot_be_stored() {
        let mut card = IdentityCardData::new("1098765432").unwrap();
        card.height_m = Some(f64::INFINITY);
        let doc = ExtractedDocument::new("", DocumentPayload::IdentityCard(Some(card)));
        assert!(DocumentRecord::from_document(&doc).is_err());
    }

    #[test]
    fn corrupt_payload_surfaces_error() {
        let record = DocumentRecord {
            doc_type: DocumentType::Contract,
            quality_score: 0.0,
            payload_json: "{".into(),
        };
        assert!(record.document().is_err());
    }
}
