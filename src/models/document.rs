use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use super::enums::{DocumentType, IssueKind};
use super::fields::FieldReader;
use super::SchemaError;

// ──────────────────────────────────────────────
// Payload records
// ──────────────────────────────────────────────

/// National identity card (cédula de ciudadanía).
///
/// `number` is private: once constructed it is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct IdentityCardData {
    #[serde(rename = "numero")]
    number: String,
    #[serde(rename = "apellidos")]
    pub surnames: Option<String>,
    #[serde(rename = "nombres")]
    pub given_names: Option<String>,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "lugar_nacimiento")]
    pub birth_place: Option<String>,
    /// Height in meters, e.g. 1.65.
    #[serde(rename = "estatura_m")]
    pub height_m: Option<f64>,
    /// Blood group and Rh factor, e.g. "O+".
    #[serde(rename = "grupo_sanguineo_rh")]
    pub blood_group_rh: Option<String>,
    #[serde(rename = "sexo")]
    pub sex: Option<String>,
    #[serde(rename = "fecha_expedicion")]
    pub issue_date: Option<NaiveDate>,
    #[serde(rename = "lugar_expedicion")]
    pub issue_place: Option<String>,
}

impl IdentityCardData {
    pub fn new(number: &str) -> Result<Self, SchemaError> {
        let number = number.trim();
        if number.is_empty() {
            return Err(SchemaError::field("numero", "must not be empty"));
        }
        Ok(Self {
            number: number.to_string(),
            surnames: None,
            given_names: None,
            birth_date: None,
            birth_place: None,
            height_m: None,
            blood_group_rh: None,
            sex: None,
            issue_date: None,
            issue_place: None,
        })
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

impl TryFrom<Map<String, Value>> for IdentityCardData {
    type Error = SchemaError;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let r = FieldReader::new(&object);
        Ok(Self {
            number: r.required_trimmed("numero")?,
            surnames: r.optional_string("apellidos")?,
            given_names: r.optional_string("nombres")?,
            birth_date: r.optional_date("fecha_nacimiento")?,
            birth_place: r.optional_string("lugar_nacimiento")?,
            height_m: r.optional_f64("estatura_m")?,
            blood_group_rh: r.optional_string("grupo_sanguineo_rh")?,
            sex: r.optional_string("sexo")?,
            issue_date: r.optional_date("fecha_expedicion")?,
            issue_place: r.optional_string("lugar_expedicion")?,
        })
    }
}

/// One coverage line of an insurance certificate, amount kept as printed
/// (e.g. "$2.000.000.000 COP").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageItem {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "monto", default)]
    pub amount: Option<String>,
}

/// Insurance policy certificate (acta de seguro).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct InsuranceCertificateData {
    #[serde(rename = "compania")]
    pub company: Option<String>,
    #[serde(rename = "nit_compania")]
    pub company_nit: Option<String>,
    #[serde(rename = "direccion_compania")]
    pub company_address: Option<String>,
    #[serde(rename = "numero_poliza")]
    policy_number: String,
    #[serde(rename = "ramo")]
    pub line_of_business: Option<String>,
    #[serde(rename = "tomador_asegurado")]
    pub policyholder: Option<String>,
    #[serde(rename = "identificacion")]
    pub identification: Option<String>,
    #[serde(rename = "fecha_emision")]
    pub issue_date: Option<NaiveDate>,
    #[serde(rename = "ciudad_emision")]
    pub issue_city: Option<String>,
    #[serde(rename = "fecha_inicio")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "fecha_fin")]
    pub end_date: Option<NaiveDate>,
    /// In the order the certificate lists them.
    #[serde(rename = "coberturas")]
    pub coverages: Vec<CoverageItem>,
    #[serde(rename = "estado_poliza")]
    pub policy_status: Option<String>,
}

impl InsuranceCertificateData {
    pub fn new(policy_number: &str) -> Result<Self, SchemaError> {
        let policy_number = policy_number.trim();
        if policy_number.is_empty() {
            return Err(SchemaError::field("numero_poliza", "must not be empty"));
        }
        Ok(Self {
            company: None,
            company_nit: None,
            company_address: None,
            policy_number: policy_number.to_string(),
            line_of_business: None,
            policyholder: None,
            identification: None,
            issue_date: None,
            issue_city: None,
            start_date: None,
            end_date: None,
            coverages: Vec::new(),
            policy_status: None,
        })
    }

    pub fn policy_number(&self) -> &str {
        &self.policy_number
    }
}

impl TryFrom<Map<String, Value>> for InsuranceCertificateData {
    type Error = SchemaError;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let r = FieldReader::new(&object);
        let coverages = r
            .object_array("coberturas")?
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let item = FieldReader::new(item);
                Ok(CoverageItem {
                    name: item
                        .optional_string("nombre")?
                        .ok_or_else(|| SchemaError::field(&format!("coberturas[{i}].nombre"), "is required"))?,
                    amount: item.optional_string("monto")?,
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        Ok(Self {
            company: r.optional_string("compania")?,
            company_nit: r.optional_string("nit_compania")?,
            company_address: r.optional_string("direccion_compania")?,
            policy_number: r.required_trimmed("numero_poliza")?,
            line_of_business: r.optional_string("ramo")?,
            policyholder: r.optional_string("tomador_asegurado")?,
            identification: r.optional_string("identificacion")?,
            issue_date: r.optional_date("fecha_emision")?,
            issue_city: r.optional_string("ciudad_emision")?,
            start_date: r.optional_date("fecha_inicio")?,
            end_date: r.optional_date("fecha_fin")?,
            coverages,
            policy_status: r.optional_string("estado_poliza")?,
        })
    }
}

/// Service contract. Every field is optional; an all-null contract is valid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct ContractData {
    #[serde(rename = "numero_contrato")]
    pub contract_number: Option<String>,
    #[serde(rename = "contratante_nombre")]
    pub contracting_party_name: Option<String>,
    #[serde(rename = "contratante_nit")]
    pub contracting_party_nit: Option<String>,
    #[serde(rename = "contratista_nombre")]
    pub contractor_name: Option<String>,
    #[serde(rename = "contratista_identificacion")]
    pub contractor_identification: Option<String>,
    /// Text of the object clause.
    #[serde(rename = "objeto")]
    pub object: Option<String>,
    #[serde(rename = "valor_numerico")]
    pub numeric_value: Option<f64>,
    /// Value as written, e.g. "QUINCE MILLONES DE PESOS ($15.000.000 COP)".
    #[serde(rename = "valor_textual")]
    pub value_text: Option<String>,
    #[serde(rename = "fecha_inicio")]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "fecha_fin")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "duracion_meses")]
    pub duration_months: Option<i64>,
    #[serde(rename = "ciudad_firma")]
    pub signing_city: Option<String>,
    #[serde(rename = "fecha_firma")]
    pub signing_date: Option<NaiveDate>,
    /// Summary of notable clauses (confidentiality, termination, ...).
    #[serde(rename = "clausulas_relevantes")]
    pub relevant_clauses: Option<String>,
}

impl TryFrom<Map<String, Value>> for ContractData {
    type Error = SchemaError;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let r = FieldReader::new(&object);
        Ok(Self {
            contract_number: r.optional_string("numero_contrato")?,
            contracting_party_name: r.optional_string("contratante_nombre")?,
            contracting_party_nit: r.optional_string("contratante_nit")?,
            contractor_name: r.optional_string("contratista_nombre")?,
            contractor_identification: r.optional_string("contratista_identificacion")?,
            object: r.optional_string("objeto")?,
            numeric_value: r.optional_f64("valor_numerico")?,
            value_text: r.optional_string("valor_textual")?,
            start_date: r.optional_date("fecha_inicio")?,
            end_date: r.optional_date("fecha_fin")?,
            duration_months: r.optional_i64("duracion_meses")?,
            signing_city: r.optional_string("ciudad_firma")?,
            signing_date: r.optional_date("fecha_firma")?,
            relevant_clauses: r.optional_string("clausulas_relevantes")?,
        })
    }
}

// ──────────────────────────────────────────────
// Payload union
// ──────────────────────────────────────────────

/// The resolved document type together with its (possibly absent) payload.
///
/// The type tag is the variant itself, so a tag can never point at another
/// type's record. `None` means the model resolved the type but returned no
/// usable payload for it.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentPayload {
    IdentityCard(Option<IdentityCardData>),
    InsuranceCertificate(Option<InsuranceCertificateData>),
    Contract(Option<ContractData>),
}

impl DocumentPayload {
    pub fn doc_type(&self) -> DocumentType {
        match self {
            Self::IdentityCard(_) => DocumentType::IdentityCard,
            Self::InsuranceCertificate(_) => DocumentType::InsuranceCertificate,
            Self::Contract(_) => DocumentType::Contract,
        }
    }

    pub fn is_present(&self) -> bool {
        match self {
            Self::IdentityCard(p) => p.is_some(),
            Self::InsuranceCertificate(p) => p.is_some(),
            Self::Contract(p) => p.is_some(),
        }
    }

    /// Build the payload for `doc_type` from the value found under its key.
    ///
    /// Null, a missing key and an empty object all count as absent.
    pub fn from_json(doc_type: DocumentType, value: Option<&Value>) -> Result<Self, SchemaError> {
        let object = match value {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) if map.is_empty() => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => {
                return Err(SchemaError::field(doc_type.payload_key(), "expected an object"));
            }
        };

        Ok(match doc_type {
            DocumentType::IdentityCard => {
                Self::IdentityCard(object.map(IdentityCardData::try_from).transpose()?)
            }
            DocumentType::InsuranceCertificate => Self::InsuranceCertificate(
                object.map(InsuranceCertificateData::try_from).transpose()?,
            ),
            DocumentType::Contract => {
                Self::Contract(object.map(ContractData::try_from).transpose()?)
            }
        })
    }
}

// ──────────────────────────────────────────────
// Issues and the aggregate
// ──────────────────────────────────────────────

/// A single failed quality check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    #[serde(rename = "field_name")]
    pub field: String,
    #[serde(rename = "issue_type")]
    pub kind: IssueKind,
    pub message: String,
}

/// A normalized, and eventually scored, extraction result.
///
/// Fields are read-only from outside the crate. The normalizer creates it
/// unscored; the quality engine returns a scored replacement.
///
/// Serializing a document that carries a non-finite height or contract value
/// is an error; JSON has no representation for it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "DocumentEnvelope")]
pub struct ExtractedDocument {
    raw_text: String,
    payload: DocumentPayload,
    quality_score: f64,
    issues: Vec<FieldIssue>,
}

impl ExtractedDocument {
    /// Unscored document: quality score 0.0, no issues.
    pub fn new(raw_text: impl Into<String>, payload: DocumentPayload) -> Self {
        Self {
            raw_text: raw_text.into(),
            payload,
            quality_score: 0.0,
            issues: Vec::new(),
        }
    }

    pub fn doc_type(&self) -> DocumentType {
        self.payload.doc_type()
    }

    /// Evidence text the extraction was based on (empty for image-only input).
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn payload(&self) -> &DocumentPayload {
        &self.payload
    }

    pub fn identity_card(&self) -> Option<&IdentityCardData> {
        match &self.payload {
            DocumentPayload::IdentityCard(p) => p.as_ref(),
            _ => None,
        }
    }

    pub fn insurance_certificate(&self) -> Option<&InsuranceCertificateData> {
        match &self.payload {
            DocumentPayload::InsuranceCertificate(p) => p.as_ref(),
            _ => None,
        }
    }

    pub fn contract(&self) -> Option<&ContractData> {
        match &self.payload {
            DocumentPayload::Contract(p) => p.as_ref(),
            _ => None,
        }
    }

    pub fn quality_score(&self) -> f64 {
        self.quality_score
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Same document with a replaced payload; the type tag follows the payload.
    pub(crate) fn with_payload(self, payload: DocumentPayload) -> Self {
        Self { payload, ..self }
    }

    /// Same document carrying the given score and issues.
    pub(crate) fn with_quality(self, quality_score: f64, issues: Vec<FieldIssue>) -> Self {
        Self {
            quality_score: quality_score.clamp(0.0, 1.0),
            issues,
            ..self
        }
    }
}

// ──────────────────────────────────────────────
// Serialized form
// ──────────────────────────────────────────────

/// Serialized envelope: one key per document type, only the matching one
/// populated. Payload values stay untyped until the tag is known.
#[derive(Serialize, Deserialize)]
struct DocumentEnvelope {
    doc_type: DocumentType,
    #[serde(default)]
    raw_text: String,
    #[serde(default)]
    cedula: Option<Value>,
    #[serde(default)]
    acta_seguro: Option<Value>,
    #[serde(default)]
    contrato: Option<Value>,
    #[serde(default)]
    quality_score: f64,
    #[serde(default)]
    issues: Vec<FieldIssue>,
}

fn to_value<T: Serialize>(record: &T) -> Result<Value, SchemaError> {
    serde_json::to_value(record).map_err(|e| SchemaError::field("payload", e.to_string()))
}

fn finite(field: &str, value: Option<f64>) -> Result<(), SchemaError> {
    match value {
        Some(v) if !v.is_finite() => Err(SchemaError::field(field, format!("{v} is not a finite number"))),
        _ => Ok(()),
    }
}

impl DocumentEnvelope {
    fn payload_value(&self, doc_type: DocumentType) -> Option<&Value> {
        match doc_type {
            DocumentType::IdentityCard => self.cedula.as_ref(),
            DocumentType::InsuranceCertificate => self.acta_seguro.as_ref(),
            DocumentType::Contract => self.contrato.as_ref(),
        }
    }

    fn from_document(doc: &ExtractedDocument) -> Result<Self, SchemaError> {
        let (mut cedula, mut acta_seguro, mut contrato) = (None, None, None);
        match &doc.payload {
            DocumentPayload::IdentityCard(Some(card)) => {
                finite("estatura_m", card.height_m)?;
                cedula = Some(to_value(card)?);
            }
            DocumentPayload::InsuranceCertificate(Some(cert)) => {
                acta_seguro = Some(to_value(cert)?);
            }
            DocumentPayload::Contract(Some(contract)) => {
                finite("valor_numerico", contract.numeric_value)?;
                contrato = Some(to_value(contract)?);
            }
            DocumentPayload::IdentityCard(None)
            | DocumentPayload::InsuranceCertificate(None)
            | DocumentPayload::Contract(None) => {}
        }
        Ok(Self {
            doc_type: doc.doc_type(),
            raw_text: doc.raw_text.clone(),
            cedula,
            acta_seguro,
            contrato,
            quality_score: doc.quality_score,
            issues: doc.issues.clone(),
        })
    }
}

impl Serialize for ExtractedDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DocumentEnvelope::from_document(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl TryFrom<DocumentEnvelope> for ExtractedDocument {
    type Error = SchemaError;

    fn try_from(envelope: DocumentEnvelope) -> Result<Self, Self::Error> {
        if !(0.0..=1.0).contains(&envelope.quality_score) {
            return Err(SchemaError::field(
                "quality_score",
                format!("{} is outside [0, 1]", envelope.quality_score),
            ));
        }
        let payload =
            DocumentPayload::from_json(envelope.doc_type, envelope.payload_value(envelope.doc_type))?;
        Ok(Self {
            raw_text: envelope.raw_text,
            payload,
            quality_score: envelope.quality_score,
            issues: envelope.issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn full_identity_card() -> IdentityCardData {
        IdentityCardData {
            surnames: Some("PÉREZ GÓMEZ".into()),
            given_names: Some("ANA MARÍA".into()),
            birth_date: NaiveDate::from_ymd_opt(1990, 3, 14),
            birth_place: Some("BUCARAMANGA (SANTANDER)".into()),
            height_m: Some(1.65),
            blood_group_rh: Some("O+".into()),
            sex: Some("F".into()),
            issue_date: NaiveDate::from_ymd_opt(2008, 4, 2),
            issue_place: Some("BUCARAMANGA".into()),
            ..IdentityCardData::new("1.098.765.432").unwrap()
        }
    }

    #[test]
    fn identity_number_trimmed_on_construction() {
        let card = IdentityCardData::new("  1098765432\n").unwrap();
        assert_eq!(card.number(), "1098765432");
        assert_eq!(card.number().trim(), card.number());
    }

    #[test]
    fn blank_identity_number_rejected() {
        assert!(IdentityCardData::new("   ").is_err());
        let err = IdentityCardData::try_from(object(json!({"numero": ""}))).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { ref field, .. } if field == "numero"));
    }

    #[test]
    fn blank_policy_number_rejected() {
        assert!(InsuranceCertificateData::new("").is_err());
        let err =
            InsuranceCertificateData::try_from(object(json!({"numero_poliza": " "}))).unwrap_err();
        assert!(
            matches!(err, SchemaError::InvalidField { ref field, .. } if field == "numero_poliza")
        );
    }

    #[test]
    fn coverages_keep_source_order() {
        let cert = InsuranceCertificateData::try_from(object(json!({
            "numero_poliza": "POL-001",
            "coberturas": [
                {"nombre": "Muerte accidental", "monto": "$50.000.000 COP"},
                {"nombre": "Gastos médicos", "monto": null},
                {"nombre": "Responsabilidad civil", "monto": "$2.000.000.000 COP"}
            ]
        })))
        .unwrap();
        let names: Vec<&str> = cert.coverages.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Muerte accidental", "Gastos médicos", "Responsabilidad civil"]
        );
        assert_eq!(cert.coverages[1].amount, None);
    }

    #[test]
    fn coverage_without_name_rejected() {
        let err = InsuranceCertificateData::try_from(object(json!({
            "numero_poliza": "POL-001",
            "coberturas": [{"monto": "$1"}]
        })))
        .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidField { ref field, .. } if field == "coberturas[0].nombre"
        ));
    }

    #[test]
    fn all_null_contract_is_valid() {
        let contract = ContractData::try_from(object(json!({
            "numero_contrato": null,
            "valor_numerico": null,
            "fecha_inicio": null
        })))
        .unwrap();
        assert_eq!(contract, ContractData::default());
    }

    #[test]
    fn payload_from_json_treats_empty_object_as_absent() {
        let payload = DocumentPayload::from_json(DocumentType::Contract, Some(&json!({}))).unwrap();
        assert_eq!(payload, DocumentPayload::Contract(None));
        assert!(!payload.is_present());
    }

    #[test]
    fn payload_from_json_rejects_non_object() {
        let err =
            DocumentPayload::from_json(DocumentType::IdentityCard, Some(&json!("1098"))).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { ref field, .. } if field == "cedula"));
    }

    #[test]
    fn doc_type_follows_payload() {
        let doc = ExtractedDocument::new("", DocumentPayload::Contract(None));
        assert_eq!(doc.doc_type(), DocumentType::Contract);
        let doc = doc.with_payload(DocumentPayload::IdentityCard(Some(full_identity_card())));
        assert_eq!(doc.doc_type(), DocumentType::IdentityCard);
        assert!(doc.identity_card().is_some());
        assert!(doc.contract().is_none());
    }

    #[test]
    fn serialized_envelope_has_one_populated_key() {
        let doc = ExtractedDocument::new(
            "REPUBLICA DE COLOMBIA",
            DocumentPayload::IdentityCard(Some(full_identity_card())),
        );
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["doc_type"], "CEDULA");
        assert_eq!(value["cedula"]["numero"], "1.098.765.432");
        assert_eq!(value["cedula"]["fecha_nacimiento"], "1990-03-14");
        assert!(value["acta_seguro"].is_null());
        assert!(value["contrato"].is_null());
        assert_eq!(value["quality_score"], 0.0);
        assert_eq!(value["issues"], json!([]));
    }

    #[test]
    fn serialization_round_trip_is_lossless() {
        let mut cert = InsuranceCertificateData::new("1000-2024-77").unwrap();
        cert.company = Some("SEGUROS BOLÍVAR S.A.".into());
        cert.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        cert.end_date = NaiveDate::from_ymd_opt(2024, 12, 31);
        cert.coverages.push(CoverageItem {
            name: "Incendio".into(),
            amount: Some("$300.000.000 COP".into()),
        });
        let doc = ExtractedDocument::new("POLIZA", DocumentPayload::InsuranceCertificate(Some(cert)))
            .with_quality(
                0.5,
                vec![FieldIssue {
                    field: "insurance.issue_date".into(),
                    kind: IssueKind::InvalidFormat,
                    message: "Issue date is in the future.".into(),
                }],
            );

        let json = serde_json::to_string(&doc).unwrap();
        let restored: ExtractedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, doc);

        let contract = ContractData {
            numeric_value: Some(15_000_000.0),
            duration_months: Some(6),
            ..ContractData::default()
        };
        let doc = ExtractedDocument::new("", DocumentPayload::Contract(Some(contract)));
        let restored: ExtractedDocument =
            serde_json::from_str(&serde_json::to_string(&doc).unwrap()).unwrap();
        assert_eq!(restored, doc);
    }

    #[test]
    fn deserialization_ignores_non_matching_payload_keys() {
        let json = json!({
            "doc_type": "CONTRATO",
            "raw_text": "",
            "cedula": {"numero": ""},
            "contrato": {"numero_contrato": "045-2024"},
            "quality_score": 1.0,
            "issues": []
        });
        let doc: ExtractedDocument = serde_json::from_value(json).unwrap();
        assert_eq!(
            doc.contract().and_then(|c| c.contract_number.as_deref()),
            Some("045-2024")
        );
    }

    #[test]
    fn non_finite_numbers_fail_serialization() {
        let mut card = IdentityCardData::new("1098765432").unwrap();
        card.height_m = Some(f64::INFINITY);
        let doc = ExtractedDocument::new("", DocumentPayload::IdentityCard(Some(card)));
        let err = serde_json::to_string(&doc).unwrap_err();
        assert!(err.to_string().contains("estatura_m"));

        let contract = ContractData {
            numeric_value: Some(f64::NAN),
            ..ContractData::default()
        };
        let doc = ExtractedDocument::new("", DocumentPayload::Contract(Some(contract)));
        assert!(serde_json::to_value(&doc).is_err());
    }

    #[test]
    fn deserialization_rejects_out_of_range_score() {
        let json = json!({"doc_type": "CONTRATO", "quality_score": 1.5});
        assert!(serde_json::from_value::<ExtractedDocument>(json).is_err());
    }
}
