//! Regex backfill of identity-card fields the model left empty.
//!
//! Best effort: a pattern that does not match, or matches text that does not
//! parse, leaves the field unset. Nothing here fails.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{DocumentPayload, ExtractedDocument};

/// "ESTATURA: 1.65 M", "ESTATURA 1,65 M", "ESTATURA - 1.70M".
static HEIGHT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ESTATURA\s*[:\-]?\s*([0-9]+(?:[.,][0-9]+)?)\s*M").unwrap()
});

/// "G.S. RH: O+", "GS RH A-", "G.S.RH: 0+" (OCR reads O as zero).
static BLOOD_GROUP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"G\.?\s*S\.?\s*RH\s*[:\-]?\s*([ABO0][+-])").unwrap()
});

/// Fill height and blood group of an identity card from its evidence text.
///
/// Returns the document unchanged for any other document type or when the
/// card payload is absent. Values the model provided are never overwritten.
pub fn enrich_identity_card(document: ExtractedDocument) -> ExtractedDocument {
    let Some(card) = document.identity_card() else {
        return document;
    };

    let needs_height = card.height_m.is_none();
    let needs_blood_group = card.blood_group_rh.as_deref().map_or(true, str::is_empty);
    if !needs_height && !needs_blood_group {
        return document;
    }

    let text = document.raw_text().to_uppercase();
    let mut card = card.clone();

    if needs_height {
        if let Some(height) = find_height(&text) {
            tracing::debug!(height_m = height, "Height recovered from evidence text");
            card.height_m = Some(height);
        }
    }

    if needs_blood_group {
        if let Some(group) = find_blood_group(&text) {
            tracing::debug!(blood_group = %group, "Blood group recovered from evidence text");
            card.blood_group_rh = Some(group);
        }
    }

    document.with_payload(DocumentPayload::IdentityCard(Some(card)))
}

/// Height in meters from an uppercased text, decimal comma accepted.
pub fn find_height(text: &str) -> Option<f64> {
    let captures = HEIGHT_PATTERN.captures(text)?;
    captures[1].replace(',', ".").parse::<f64>().ok()
}

/// Blood group and Rh from an uppercased text, a leading `0` read as `O`.
pub fn find_blood_group(text: &str) -> Option<String> {
    let captures = BLOOD_GROUP_PATTERN.captures(text)?;
    let raw = &captures[1];
    Some(match raw.strip_prefix('0') {
        Some(rh) => format!("O{rh}"),
        None => raw.to_string(),
    })
}
