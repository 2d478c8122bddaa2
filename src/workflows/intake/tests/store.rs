use std::sync::Arc;

use super::common::*;
use crate::workflows::intake::backup::{to_json_backup, FormatError};
use crate::workflows::intake::domain::{CandidateDraft, CandidateId, DocumentKind, Gender};
use crate::workflows::intake::storage::{InMemoryStorage, StorageError};
use crate::workflows::intake::store::{
    sequence_after_for_tests, CandidateStore, SeedPolicy, StoreError, StoreStats,
};
use crate::workflows::intake::validation::FieldIssue;

#[test]
fn create_assigns_sequential_ids_and_persists() {
    let (mut store, storage) = empty_store();

    let first = store
        .create(draft("Ana Costa", "Feminino"))
        .expect("first candidate");
    let second = store
        .create(draft("Bruno Lima", "Masculino").with_children(true))
        .expect("second candidate");

    assert_eq!(first.id.as_str(), "cand-000001");
    assert_eq!(second.id.as_str(), "cand-000002");
    assert_eq!(second.gender, Gender::Male);
    assert!(second.has_children);

    let saved = storage.snapshot().expect("collection saved");
    assert_eq!(saved, store.candidates().to_vec());
    assert_eq!(saved.len(), 2);
}

#[test]
fn create_trims_name_and_keeps_free_text_gender() {
    let (mut store, _) = empty_store();
    let candidate = store
        .create(draft("  Ana Costa  ", "Não informado"))
        .expect("candidate created");

    assert_eq!(candidate.name, "Ana Costa");
    assert_eq!(candidate.gender, Gender::Other("Não informado".to_string()));
    assert_eq!(candidate.required_documents().len(), 13);
}

#[test]
fn invalid_draft_aborts_without_write() {
    let (mut store, storage) = empty_store();
    let before = storage.snapshot();

    let err = store
        .create(draft("   ", "").with_documents(["Passaporte"]))
        .expect_err("blank draft rejected");

    match err {
        StoreError::Validation(validation) => {
            assert_eq!(
                validation.issues,
                vec![
                    FieldIssue::MissingName,
                    FieldIssue::MissingGender,
                    FieldIssue::UnknownDocument("Passaporte".to_string()),
                ]
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    assert!(store.candidates().is_empty());
    assert_eq!(storage.snapshot(), before);
}

#[test]
fn update_replaces_attributes_but_keeps_identity() {
    let (mut store, storage) = empty_store();
    let original = store
        .create(draft("Carlos Oliveira", "Masculino"))
        .expect("candidate created");

    let changes = CandidateDraft::from(&original)
        .with_children(true)
        .with_documents([DocumentKind::Resume.label(), DocumentKind::ChildrenCpf.label()]);
    let updated = store.update(&original.id, changes).expect("update succeeds");

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.has_children);
    assert_eq!(updated.documents.len(), 2);
    assert_eq!(updated.status().total, 17);

    let saved = storage.snapshot().expect("saved");
    assert_eq!(saved, vec![updated]);
}

#[test]
fn update_of_unknown_id_is_not_found_and_changes_nothing() {
    let (mut store, storage) = empty_store();
    store
        .create(draft("Ana Costa", "Feminino"))
        .expect("candidate created");
    let before = store.candidates().to_vec();

    let missing = CandidateId("cand-999999".to_string());
    match store.update(&missing, draft("Outra Pessoa", "Feminino")) {
        Err(StoreError::NotFound(id)) => assert_eq!(id, missing),
        other => panic!("expected not found, got {other:?}"),
    }

    assert_eq!(store.candidates(), before.as_slice());
    assert_eq!(storage.snapshot(), Some(before));
}

#[test]
fn update_reports_not_found_before_validation() {
    let (mut store, _) = empty_store();
    let missing = CandidateId("cand-000042".to_string());

    match store.update(&missing, CandidateDraft::default()) {
        Err(StoreError::NotFound(_)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn delete_removes_and_returns_candidate() {
    let (mut store, storage) = empty_store();
    let ana = store.create(draft("Ana", "Feminino")).expect("ana");
    let bruno = store.create(draft("Bruno", "Masculino")).expect("bruno");

    let removed = store.delete(&ana.id).expect("delete succeeds");
    assert_eq!(removed, ana);
    assert!(store.find_by_id(&ana.id).is_none());
    assert_eq!(storage.snapshot(), Some(vec![bruno]));

    match store.delete(&ana.id) {
        Err(StoreError::NotFound(id)) => assert_eq!(id, ana.id),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn list_filters_by_name_case_insensitively_in_insertion_order() {
    let (mut store, _) = empty_store();
    for name in ["Maria Santos", "João Silva", "Ana Maria"] {
        store.create(draft(name, "Feminino")).expect("created");
    }

    let names = |filter| -> Vec<String> {
        store
            .list(filter)
            .into_iter()
            .map(|candidate| candidate.name.clone())
            .collect()
    };

    assert_eq!(names(Some("MARIA")), vec!["Maria Santos", "Ana Maria"]);
    assert_eq!(names(Some("")).len(), 3);
    assert_eq!(names(None).len(), 3);
    assert!(names(Some("Pedro")).is_empty());
}

#[test]
fn stats_and_incomplete_follow_status() {
    let (mut store, _) = empty_store();
    let complete = draft("Ana", "Feminino")
        .with_documents(crate::workflows::intake::BASE_DOCUMENTS.map(DocumentKind::label));
    store.create(complete).expect("complete");
    let partial = store
        .create(draft("Bruno", "Masculino").with_documents(["RG"]))
        .expect("partial");

    assert_eq!(
        store.stats(),
        StoreStats {
            total: 2,
            completed: 1
        }
    );
    let incomplete = store.incomplete();
    assert_eq!(incomplete.len(), 1);
    assert_eq!(incomplete[0].id, partial.id);
}

#[test]
fn failed_save_rolls_back_every_mutation() {
    let storage = Arc::new(FlakyStorage::default());
    let mut store =
        CandidateStore::open(storage.clone(), SeedPolicy::Empty).expect("store opens");
    let ana = store.create(draft("Ana", "Feminino")).expect("ana");
    let before = store.candidates().to_vec();

    storage.fail_writes(true);

    match store.create(draft("Bruno", "Masculino")) {
        Err(StoreError::Persistence(StorageError::Unavailable(_))) => {}
        other => panic!("expected persistence error, got {other:?}"),
    }
    match store.update(&ana.id, draft("Ana Paula", "Feminino")) {
        Err(StoreError::Persistence(_)) => {}
        other => panic!("expected persistence error, got {other:?}"),
    }
    match store.delete(&ana.id) {
        Err(StoreError::Persistence(_)) => {}
        other => panic!("expected persistence error, got {other:?}"),
    }
    match store.reset(SeedPolicy::Sample) {
        Err(StoreError::Persistence(_)) => {}
        other => panic!("expected persistence error, got {other:?}"),
    }

    assert_eq!(store.candidates(), before.as_slice());
    assert_eq!(storage.saved(), Some(before));

    storage.fail_writes(false);
    let bruno = store
        .create(draft("Bruno", "Masculino"))
        .expect("writes recover");
    assert_ne!(bruno.id, ana.id);
}

#[test]
fn open_with_absent_data_installs_sample_candidates() {
    let storage = Arc::new(InMemoryStorage::default());
    let store = CandidateStore::open(storage.clone(), SeedPolicy::Sample).expect("opens");

    assert!(store.was_seeded());
    let names: Vec<_> = store
        .candidates()
        .iter()
        .map(|candidate| candidate.name.as_str())
        .collect();
    assert_eq!(names, vec!["João Silva", "Maria Santos", "Carlos Oliveira"]);
    assert_eq!(store.stats().completed, 2);
    assert_eq!(store.incomplete()[0].name, "Carlos Oliveira");
    // Seeding does not write until flushed.
    assert!(storage.snapshot().is_none());

    store.flush().expect("flush");
    assert_eq!(storage.snapshot().map(|saved| saved.len()), Some(3));
}

#[test]
fn open_with_empty_policy_starts_empty() {
    let (store, storage) = empty_store();
    assert!(!store.was_seeded());
    assert!(store.candidates().is_empty());
    assert!(storage.snapshot().is_none());
}

#[test]
fn open_keeps_stored_candidates_and_continues_sequence() {
    let stored = vec![
        candidate("cand-000007", Gender::Female, false, &[]),
        candidate("legacy-1", Gender::Male, false, &[]),
    ];
    let storage = Arc::new(InMemoryStorage::with_candidates(stored.clone()));
    let mut store = CandidateStore::open(storage, SeedPolicy::Sample).expect("opens");

    assert!(!store.was_seeded());
    assert_eq!(store.candidates(), stored.as_slice());

    let created = store.create(draft("Nova", "Feminino")).expect("created");
    assert_eq!(created.id.as_str(), "cand-000008");
}

#[test]
fn open_with_malformed_data_starts_empty() {
    let store = CandidateStore::open(Arc::new(CorruptStorage), SeedPolicy::Sample)
        .expect("malformed data tolerated");
    assert!(store.candidates().is_empty());
    assert!(!store.was_seeded());
}

#[test]
fn open_with_duplicate_ids_starts_empty() {
    let stored = vec![
        candidate("cand-000001", Gender::Female, false, &[]),
        candidate("cand-000001", Gender::Male, false, &[]),
    ];
    let storage = Arc::new(InMemoryStorage::with_candidates(stored));
    let store = CandidateStore::open(storage, SeedPolicy::Sample).expect("opens");
    assert!(store.candidates().is_empty());
}

#[test]
fn open_propagates_read_failures() {
    match CandidateStore::open(Arc::new(UnreadableStorage), SeedPolicy::Sample) {
        Err(StoreError::Persistence(StorageError::Io { .. })) => {}
        Err(other) => panic!("expected io failure, got {other:?}"),
        Ok(_) => panic!("expected io failure, got an open store"),
    }
}

#[test]
fn restore_replaces_collection_and_advances_sequence() {
    let (mut store, storage) = empty_store();
    store.create(draft("Ana", "Feminino")).expect("ana");

    let backup = vec![
        candidate("cand-000010", Gender::Male, false, &[DocumentKind::Resume]),
        candidate("cand-000011", Gender::Female, true, &[]),
    ];
    let raw = to_json_backup(&backup).expect("serialize backup");

    let count = store.restore(&raw).expect("restore succeeds");
    assert_eq!(count, 2);
    assert_eq!(store.candidates(), backup.as_slice());
    assert_eq!(storage.snapshot(), Some(backup));

    let next = store.create(draft("Bruno", "Masculino")).expect("created");
    assert_eq!(next.id.as_str(), "cand-000012");
}

#[test]
fn restore_with_object_root_is_rejected_and_changes_nothing() {
    let (mut store, storage) = empty_store();
    store.create(draft("Ana", "Feminino")).expect("ana");
    let before = store.candidates().to_vec();

    match store.restore(r#"{"foo": 1}"#) {
        Err(StoreError::Format(FormatError::NotAnArray { found })) => {
            assert_eq!(found, "an object")
        }
        other => panic!("expected format error, got {other:?}"),
    }

    assert_eq!(store.candidates(), before.as_slice());
    assert_eq!(storage.snapshot(), Some(before));
}

#[test]
fn restore_rejects_invalid_json() {
    let (mut store, _) = empty_store();
    match store.restore("[{") {
        Err(StoreError::Format(FormatError::Syntax(_))) => {}
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn reset_reinstalls_samples_or_clears() {
    let (mut store, storage) = empty_store();
    store.create(draft("Ana", "Feminino")).expect("ana");

    store.reset(SeedPolicy::Sample).expect("reset to samples");
    assert_eq!(store.candidates().len(), 3);
    assert_eq!(storage.snapshot().map(|saved| saved.len()), Some(3));
    assert!(store
        .candidates()
        .iter()
        .all(|candidate| candidate.id.as_str() != "cand-000001"));

    store.reset(SeedPolicy::Empty).expect("reset to empty");
    assert!(store.candidates().is_empty());
    assert_eq!(storage.snapshot(), Some(Vec::new()));
}

#[test]
fn sequence_skips_past_the_highest_numbered_id() {
    let candidates = vec![
        candidate("cand-000003", Gender::Female, false, &[]),
        candidate("cand-000120", Gender::Female, false, &[]),
        candidate("cand-abc", Gender::Female, false, &[]),
        candidate("other-999", Gender::Female, false, &[]),
    ];
    assert_eq!(sequence_after_for_tests(&candidates), 121);
    assert_eq!(sequence_after_for_tests(&[]), 1);
}

#[test]
fn exhausted_id_sequence_is_reported_instead_of_wrapping() {
    let (mut store, storage) = empty_store();
    let backup = vec![candidate(
        "cand-18446744073709551614",
        Gender::Female,
        false,
        &[],
    )];
    store
        .restore(&to_json_backup(&backup).expect("serialize backup"))
        .expect("restore succeeds");

    let last = store.create(draft("Ana", "Feminino")).expect("last id available");
    assert_eq!(last.id.as_str(), "cand-18446744073709551615");
    let before = store.candidates().to_vec();

    match store.create(draft("Bruno", "Masculino")) {
        Err(StoreError::IdsExhausted(id)) => assert_eq!(id, last.id),
        other => panic!("expected exhausted ids, got {other:?}"),
    }
    assert_eq!(store.candidates(), before.as_slice());
    assert_eq!(storage.snapshot(), Some(before));
}

#[test]
fn update_keeps_unknown_labels_the_record_already_holds() {
    let mut legacy = candidate(
        "cand-000001",
        Gender::Female,
        false,
        &[DocumentKind::IdentityCard],
    );
    legacy.documents.insert("Passaporte".to_string());
    let storage = Arc::new(InMemoryStorage::with_candidates(vec![legacy.clone()]));
    let mut store = CandidateStore::open(storage, SeedPolicy::Empty).expect("opens");

    let unchanged = store
        .update(&legacy.id, CandidateDraft::from(&legacy))
        .expect("existing labels accepted");
    assert!(unchanged.documents.contains("Passaporte"));

    let with_new_label = CandidateDraft::from(&legacy).with_documents(["Passaporte", "Visto"]);
    match store.update(&legacy.id, with_new_label) {
        Err(StoreError::Validation(err)) => assert_eq!(
            err.issues,
            vec![FieldIssue::UnknownDocument("Visto".to_string())]
        ),
        other => panic!("expected validation error, got {other:?}"),
    }
}
