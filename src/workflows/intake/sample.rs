use super::domain::{CandidateDraft, DocumentKind};
use super::requirements::{BASE_DOCUMENTS, CHILDREN_DOCUMENTS};

/// Demonstration dataset installed into a fresh store: one complete male candidate,
/// one complete female candidate with children, and one barely started.
pub fn sample_drafts() -> Vec<CandidateDraft> {
    let mut male_complete = BASE_DOCUMENTS.to_vec();
    male_complete.push(DocumentKind::MilitaryEnlistment);

    let female_with_children = BASE_DOCUMENTS.iter().chain(CHILDREN_DOCUMENTS.iter());

    vec![
        CandidateDraft::new("João Silva", "Masculino")
            .with_documents(male_complete.iter().map(|kind| kind.label())),
        CandidateDraft::new("Maria Santos", "Feminino")
            .with_children(true)
            .with_documents(female_with_children.map(|kind| kind.label())),
        CandidateDraft::new("Carlos Oliveira", "Masculino").with_documents([
            DocumentKind::OnlineInterview.label(),
            DocumentKind::Resume.label(),
        ]),
    ]
}
