use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rh_intake::workflows::intake::{
    compute_status, parse_backup, required_documents, to_json_backup, Candidate, CandidateId,
    DocumentKind, Gender, BASE_DOCUMENTS, CHILDREN_DOCUMENTS,
};

fn gender_strategy() -> impl Strategy<Value = Gender> {
    prop_oneof![
        Just(Gender::Male),
        Just(Gender::Female),
        "[A-Za-z]{1,12}".prop_map(Gender::from),
    ]
}

fn documents_strategy() -> impl Strategy<Value = BTreeSet<String>> {
    let known = proptest::sample::select(DocumentKind::ALL.to_vec())
        .prop_map(|kind| kind.label().to_string());
    let label = prop_oneof![4 => known, 1 => "[a-z]{3,10}"];
    proptest::collection::btree_set(label, 0..20)
}

fn candidate(gender: Gender, has_children: bool, documents: BTreeSet<String>) -> Candidate {
    Candidate {
        id: CandidateId("cand-000001".to_string()),
        name: "Ana Costa".to_string(),
        gender,
        has_children,
        documents,
        created_at: Utc
            .with_ymd_and_hms(2025, 1, 15, 8, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

proptest! {
    #[test]
    fn prop_checklist_starts_with_base_documents(
        gender in gender_strategy(),
        has_children in any::<bool>()
    ) {
        let required = required_documents(&gender, has_children);
        prop_assert_eq!(&required[..13], &BASE_DOCUMENTS[..]);

        let expected_len = 13 + usize::from(gender.is_male()) + if has_children { 3 } else { 0 };
        prop_assert_eq!(required.len(), expected_len);
        prop_assert_eq!(
            required.contains(&DocumentKind::MilitaryEnlistment),
            gender == Gender::Male
        );
        if has_children {
            prop_assert_eq!(&required[required.len() - 3..], &CHILDREN_DOCUMENTS[..]);
        }
    }

    #[test]
    fn prop_missing_is_the_undelivered_part_of_the_checklist(
        gender in gender_strategy(),
        has_children in any::<bool>(),
        documents in documents_strategy()
    ) {
        let candidate = candidate(gender, has_children, documents);
        let required = candidate.required_documents();
        let status = compute_status(&candidate);

        prop_assert_eq!(status.total, required.len());
        prop_assert_eq!(status.delivered, candidate.documents.len());
        prop_assert!(status.missing.iter().all(|kind| required.contains(kind)));

        let covered: Vec<_> = required
            .iter()
            .copied()
            .filter(|kind| !status.missing.contains(kind))
            .collect();
        let delivered_required: Vec<_> = required
            .iter()
            .copied()
            .filter(|kind| candidate.documents.contains(kind.label()))
            .collect();
        prop_assert_eq!(covered, delivered_required);

        prop_assert_eq!(status.is_complete, status.percentage == 100);
        prop_assert_eq!(&status, &compute_status(&candidate));
    }

    #[test]
    fn prop_backup_round_trips(
        gender in gender_strategy(),
        has_children in any::<bool>(),
        documents in documents_strategy()
    ) {
        let candidates = vec![candidate(gender, has_children, documents)];
        let raw = to_json_backup(&candidates).expect("serialize");
        prop_assert_eq!(parse_backup(&raw).expect("parse"), candidates);
    }
}
