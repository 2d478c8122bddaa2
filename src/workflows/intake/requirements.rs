//! Required-document derivation and completion status.
//!
//! Both functions are pure and recomputed on every query; nothing here is cached or
//! persisted.

use serde::Serialize;

use super::domain::{Candidate, DocumentKind, Gender};

/// Checklist every candidate must deliver, in display order.
pub const BASE_DOCUMENTS: [DocumentKind; 13] = [
    DocumentKind::OnlineInterview,
    DocumentKind::Resume,
    DocumentKind::IdentityCard,
    DocumentKind::DigitalWorkCard,
    DocumentKind::CpfRegistrationStatus,
    DocumentKind::BirthOrMarriageCertificate,
    DocumentKind::SchoolTranscript,
    DocumentKind::ProofOfResidence,
    DocumentKind::VaccinationCard,
    DocumentKind::HealthSystemCard,
    DocumentKind::SocialIntegrationNumber,
    DocumentKind::BankStatement,
    DocumentKind::ElectoralClearance,
];

/// Appended when the candidate declares children.
pub const CHILDREN_DOCUMENTS: [DocumentKind; 3] = [
    DocumentKind::ChildrenCpf,
    DocumentKind::ChildrenBirthCertificates,
    DocumentKind::ChildrenVaccinationCards,
];

/// Ordered checklist for the given attributes.
///
/// Only the literal male marker adds the enlistment certificate; any other gender,
/// including free text, yields the base list.
pub fn required_documents(gender: &Gender, has_children: bool) -> Vec<DocumentKind> {
    let mut documents = BASE_DOCUMENTS.to_vec();

    if gender.is_male() {
        documents.push(DocumentKind::MilitaryEnlistment);
    }

    if has_children {
        documents.extend(CHILDREN_DOCUMENTS);
    }

    documents
}

/// Completion metrics derived from a candidate and its checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub percentage: u32,
    pub is_complete: bool,
    pub delivered: usize,
    pub total: usize,
    pub missing: Vec<DocumentKind>,
}

impl StatusSummary {
    pub const fn label(&self) -> &'static str {
        if self.is_complete {
            "COMPLETO"
        } else {
            "INCOMPLETO"
        }
    }
}

/// Compute the status summary for a candidate.
///
/// `delivered` is the size of the delivered set, not its intersection with the
/// checklist, so documents outside the checklist still raise the percentage.
pub fn compute_status(candidate: &Candidate) -> StatusSummary {
    let required = required_documents(&candidate.gender, candidate.has_children);
    let total = required.len();
    let delivered = candidate.documents.len();

    let missing = required
        .into_iter()
        .filter(|kind| !candidate.has_delivered(*kind))
        .collect();

    let percentage = rounded_percentage(delivered, total);

    StatusSummary {
        percentage,
        is_complete: percentage == 100,
        delivered,
        total,
        missing,
    }
}

/// `round(100 * part / whole)` with halves rounded up; zero when `whole` is zero.
fn rounded_percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }

    let part = part as u64;
    let whole = whole as u64;
    let rounded = (200 * part + whole) / (2 * whole);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

impl Candidate {
    pub fn required_documents(&self) -> Vec<DocumentKind> {
        required_documents(&self.gender, self.has_children)
    }

    pub fn status(&self) -> StatusSummary {
        compute_status(self)
    }
}

#[cfg(test)]
pub(crate) fn rounded_percentage_for_tests(part: usize, whole: usize) -> u32 {
    rounded_percentage(part, whole)
}
