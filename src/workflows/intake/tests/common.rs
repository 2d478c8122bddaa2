use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::intake::domain::{
    Candidate, CandidateDraft, CandidateId, DocumentKind, Gender,
};
use crate::workflows::intake::storage::{CandidateStorage, InMemoryStorage, StorageError};
use crate::workflows::intake::store::{CandidateStore, SeedPolicy};

pub(super) fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 3, 14, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn candidate(
    id: &str,
    gender: Gender,
    has_children: bool,
    documents: &[DocumentKind],
) -> Candidate {
    Candidate {
        id: CandidateId(id.to_string()),
        name: format!("Candidate {id}"),
        gender,
        has_children,
        documents: documents.iter().map(|kind| kind.label().to_string()).collect(),
        created_at: created_at(),
    }
}

pub(super) fn draft(name: &str, gender: &str) -> CandidateDraft {
    CandidateDraft::new(name, gender)
}

pub(super) fn empty_store() -> (CandidateStore<InMemoryStorage>, Arc<InMemoryStorage>) {
    let storage = Arc::new(InMemoryStorage::default());
    let store = CandidateStore::open(storage.clone(), SeedPolicy::Empty).expect("store opens");
    (store, storage)
}

/// Storage whose writes can be switched off to exercise persistence failures.
#[derive(Default)]
pub(super) struct FlakyStorage {
    inner: InMemoryStorage,
    failing: AtomicBool,
}

impl FlakyStorage {
    pub(super) fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(super) fn saved(&self) -> Option<Vec<Candidate>> {
        self.inner.snapshot()
    }
}

impl CandidateStorage for FlakyStorage {
    fn load(&self) -> Result<Option<Vec<Candidate>>, StorageError> {
        self.inner.load()
    }

    fn save(&self, candidates: &[Candidate]) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        self.inner.save(candidates)
    }
}

/// Storage that always fails to read.
pub(super) struct UnreadableStorage;

impl CandidateStorage for UnreadableStorage {
    fn load(&self) -> Result<Option<Vec<Candidate>>, StorageError> {
        Err(StorageError::Io {
            path: "candidates.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    fn save(&self, _candidates: &[Candidate]) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Storage that reports its contents as unparseable.
pub(super) struct CorruptStorage;

impl CandidateStorage for CorruptStorage {
    fn load(&self) -> Result<Option<Vec<Candidate>>, StorageError> {
        Err(StorageError::Malformed("unexpected end of input".to_string()))
    }

    fn save(&self, _candidates: &[Candidate]) -> Result<(), StorageError> {
        Ok(())
    }
}
