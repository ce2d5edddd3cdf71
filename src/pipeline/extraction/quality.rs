//! Data-quality scoring of normalized documents.
//!
//! Each document type has a fixed, ordered table of rules. A rule either
//! passes, fails (recording one issue), or does not apply to the record and
//! is left out of the tally. The score is passed / applicable.

use chrono::NaiveDate;

use crate::models::{
    ContractData, DocumentPayload, ExtractedDocument, FieldIssue, IdentityCardData,
    InsuranceCertificateData, IssueKind,
};

/// One quality check over a record of type `T`.
struct Rule<T> {
    field: &'static str,
    kind: IssueKind,
    message: &'static str,
    /// `Some(pass)` when the rule applies, `None` when it is skipped.
    check: fn(&T, NaiveDate) -> Option<bool>,
}

const IDENTITY_RULES: &[Rule<IdentityCardData>] = &[
    Rule {
        field: "identity.number",
        kind: IssueKind::Missing,
        message: "Identity card number is empty or missing.",
        check: identity_number_present,
    },
    Rule {
        field: "identity.birth_date",
        kind: IssueKind::InvalidFormat,
        message: "Birth date is in the future.",
        check: birth_date_not_future,
    },
    Rule {
        field: "identity.issue_date",
        kind: IssueKind::InvalidFormat,
        message: "Issue date is in the future.",
        check: identity_issue_date_not_future,
    },
    Rule {
        field: "identity.height_m",
        kind: IssueKind::Missing,
        message: "Height was not detected on the identity card.",
        check: height_present,
    },
    Rule {
        field: "identity.blood_group_rh",
        kind: IssueKind::Missing,
        message: "Blood group and Rh were not detected on the identity card.",
        check: blood_group_present,
    },
];

const INSURANCE_RULES: &[Rule<InsuranceCertificateData>] = &[
    Rule {
        field: "insurance.policy_number",
        kind: IssueKind::Missing,
        message: "Policy number is empty or missing.",
        check: policy_number_present,
    },
    Rule {
        field: "insurance.date_range",
        kind: IssueKind::InvalidFormat,
        message: "Coverage start date is after the end date.",
        check: insurance_range_ordered,
    },
    Rule {
        field: "insurance.issue_date",
        kind: IssueKind::InvalidFormat,
        message: "Issue date is in the future.",
        check: insurance_issue_date_not_future,
    },
];

const CONTRACT_RULES: &[Rule<ContractData>] = &[
    Rule {
        field: "contract.date_range",
        kind: IssueKind::InvalidFormat,
        message: "Contract start date is after the end date.",
        check: contract_range_ordered,
    },
    Rule {
        field: "contract.numeric_value",
        kind: IssueKind::InvalidFormat,
        message: "Contract value must be greater than zero.",
        check: contract_value_positive,
    },
];

// Identity card dates count as passing when absent.
fn identity_number_present(card: &IdentityCardData, _: NaiveDate) -> Option<bool> {
    Some(!card.number().trim().is_empty())
}

fn birth_date_not_future(card: &IdentityCardData, today: NaiveDate) -> Option<bool> {
    Some(card.birth_date.map_or(true, |d| d <= today))
}

fn identity_issue_date_not_future(card: &IdentityCardData, today: NaiveDate) -> Option<bool> {
    Some(card.issue_date.map_or(true, |d| d <= today))
}

fn height_present(card: &IdentityCardData, _: NaiveDate) -> Option<bool> {
    Some(card.height_m.is_some())
}

fn blood_group_present(card: &IdentityCardData, _: NaiveDate) -> Option<bool> {
    Some(card.blood_group_rh.as_deref().is_some_and(|g| !g.trim().is_empty()))
}

fn policy_number_present(cert: &InsuranceCertificateData, _: NaiveDate) -> Option<bool> {
    Some(!cert.policy_number().trim().is_empty())
}

fn insurance_range_ordered(cert: &InsuranceCertificateData, _: NaiveDate) -> Option<bool> {
    range_ordered(cert.start_date, cert.end_date)
}

fn insurance_issue_date_not_future(cert: &InsuranceCertificateData, today: NaiveDate) -> Option<bool> {
    cert.issue_date.map(|d| d <= today)
}

fn contract_range_ordered(contract: &ContractData, _: NaiveDate) -> Option<bool> {
    range_ordered(contract.start_date, contract.end_date)
}

fn contract_value_positive(contract: &ContractData, _: NaiveDate) -> Option<bool> {
    contract.numeric_value.map(|v| v > 0.0)
}

/// Applies only when both ends are known.
fn range_ordered(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<bool> {
    Some(start? <= end?)
}

/// Outcome of running a document's rule table.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    pub passed: usize,
    pub total: usize,
    /// In rule order.
    pub issues: Vec<FieldIssue>,
}

impl QualityReport {
    /// passed / total, or 0.0 when no rule applied.
    pub fn score(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64
        }
    }
}

fn run_rules<T>(rules: &[Rule<T>], record: &T, today: NaiveDate) -> QualityReport {
    let mut report = QualityReport {
        passed: 0,
        total: 0,
        issues: Vec::new(),
    };
    for rule in rules {
        let Some(pass) = (rule.check)(record, today) else {
            continue;
        };
        report.total += 1;
        if pass {
            report.passed += 1;
        } else {
            report.issues.push(FieldIssue {
                field: rule.field.to_string(),
                kind: rule.kind,
                message: rule.message.to_string(),
            });
        }
    }
    report
}

/// Run the rule table for the document's type against its payload.
///
/// An absent payload runs no rules.
pub fn run_quality_checks(document: &ExtractedDocument, today: NaiveDate) -> QualityReport {
    match document.payload() {
        DocumentPayload::IdentityCard(Some(card)) => run_rules(IDENTITY_RULES, card, today),
        DocumentPayload::InsuranceCertificate(Some(cert)) => run_rules(INSURANCE_RULES, cert, today),
        DocumentPayload::Contract(Some(contract)) => run_rules(CONTRACT_RULES, contract, today),
        DocumentPayload::IdentityCard(None)
        | DocumentPayload::InsuranceCertificate(None)
        | DocumentPayload::Contract(None) => QualityReport {
            passed: 0,
            total: 0,
            issues: Vec::new(),
        },
    }
}

/// Score a document as of `today`, returning the scored replacement.
///
/// Never fails: data problems become issues on the returned document.
pub fn evaluate_quality(document: ExtractedDocument, today: NaiveDate) -> ExtractedDocument {
    let report = run_quality_checks(&document, today);
    let score = report.score();

    tracing::debug!(
        doc_type = %document.doc_type(),
        passed = report.passed,
        total = report.total,
        score,
        "Quality checks evaluated"
    );

    document.with_quality(score, report.issues)
}
