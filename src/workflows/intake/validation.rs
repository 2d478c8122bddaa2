use std::collections::BTreeSet;
use std::fmt;

use super::domain::{CandidateDraft, DocumentKind, Gender};

/// A single offending field in a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    MissingName,
    MissingGender,
    UnknownDocument(String),
}

impl FieldIssue {
    pub const fn field(&self) -> &'static str {
        match self {
            FieldIssue::MissingName => "name",
            FieldIssue::MissingGender => "gender",
            FieldIssue::UnknownDocument(_) => "documents",
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::MissingName => f.write_str("name is required"),
            FieldIssue::MissingGender => f.write_str("gender is required"),
            FieldIssue::UnknownDocument(label) => write!(f, "unknown document '{label}'"),
        }
    }
}

/// Draft rejected at the store boundary; lists every offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid candidate: {}", describe(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<_> = self.issues.iter().map(FieldIssue::field).collect();
        fields.dedup();
        fields
    }
}

fn describe(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Draft after validation: trimmed name, parsed gender, known document labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CandidateAttributes {
    pub(crate) name: String,
    pub(crate) gender: Gender,
    pub(crate) has_children: bool,
    pub(crate) documents: BTreeSet<String>,
}

pub(crate) fn validate_draft(draft: CandidateDraft) -> Result<CandidateAttributes, ValidationError> {
    validate_draft_retaining(draft, &BTreeSet::new())
}

/// Like [`validate_draft`], but labels in `retained` pass even when outside the
/// vocabulary. Lets an update carry over labels a restored record already holds.
pub(crate) fn validate_draft_retaining(
    draft: CandidateDraft,
    retained: &BTreeSet<String>,
) -> Result<CandidateAttributes, ValidationError> {
    let mut issues = Vec::new();

    let name = draft.name.trim().to_string();
    if name.is_empty() {
        issues.push(FieldIssue::MissingName);
    }

    let gender = Gender::parse(&draft.gender);
    if gender.is_none() {
        issues.push(FieldIssue::MissingGender);
    }

    issues.extend(
        draft
            .documents
            .iter()
            .filter(|label| {
                DocumentKind::from_label(label).is_none() && !retained.contains(*label)
            })
            .map(|label| FieldIssue::UnknownDocument(label.clone())),
    );

    match gender {
        Some(gender) if issues.is_empty() => Ok(CandidateAttributes {
            name,
            gender,
            has_children: draft.has_children,
            documents: draft.documents,
        }),
        _ => Err(ValidationError { issues }),
    }
}
