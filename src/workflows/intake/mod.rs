//! Candidate intake: document checklist derivation, completion status, and the record
//! store that keeps candidates between sessions.
//!
//! Rendering is left to callers. Everything here is synchronous and single-user; the
//! store owns its collection and writes it through a [`CandidateStorage`] backend after
//! every mutation.

pub mod backup;
pub mod domain;
pub mod messaging;
pub mod requirements;
mod sample;
pub mod storage;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use backup::{
    backup_file_name, csv_file_name, parse_backup, to_csv, to_json_backup, write_csv,
    ExportError, FormatError,
};
pub use domain::{Candidate, CandidateDraft, CandidateId, DocumentKind, Gender, UnknownDocument};
pub use messaging::{
    email_link, missing_documents_message, pending_lines, pending_report, whatsapp_link,
    ALL_COMPLETE_MESSAGE, DEFAULT_EMAIL_SUBJECT,
};
pub use requirements::{
    compute_status, required_documents, StatusSummary, BASE_DOCUMENTS, CHILDREN_DOCUMENTS,
};
pub use sample::sample_drafts;
pub use storage::{CandidateStorage, InMemoryStorage, JsonFileStorage, StorageError};
pub use store::{CandidateStore, SeedPolicy, StoreError, StoreStats};
pub use validation::{FieldIssue, ValidationError};
