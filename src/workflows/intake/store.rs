use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::backup::{parse_backup, FormatError};
use super::domain::{Candidate, CandidateDraft, CandidateId};
use super::sample::sample_drafts;
use super::storage::{CandidateStorage, StorageError};
use super::validation::{
    validate_draft, validate_draft_retaining, CandidateAttributes, ValidationError,
};

const ID_PREFIX: &str = "cand-";

/// How to populate a store whose storage holds nothing yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPolicy {
    Sample,
    Empty,
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub total: usize,
    pub completed: usize,
}

/// Error raised by store operations. Every failure leaves the collection untouched.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("candidate '{0}' not found")]
    NotFound(CandidateId),
    #[error("invalid backup: {0}")]
    Format(#[from] FormatError),
    #[error("persistence failed: {0}")]
    Persistence(#[from] StorageError),
    #[error("no candidate ids left after '{0}'")]
    IdsExhausted(CandidateId),
}

/// Ordered candidate collection backed by a persistence collaborator.
///
/// Mutations build the complete next collection, save it, and only then replace the
/// in-memory copy.
pub struct CandidateStore<S> {
    storage: Arc<S>,
    candidates: Vec<Candidate>,
    next_sequence: u64,
    seeded: bool,
}

impl<S> CandidateStore<S>
where
    S: CandidateStorage + 'static,
{
    /// Load the collection once. Absent data is seeded per `seed`; unreadable data is
    /// logged and replaced by an empty collection.
    pub fn open(storage: Arc<S>, seed: SeedPolicy) -> Result<Self, StoreError> {
        let loaded = match storage.load() {
            Ok(Some(candidates)) => match first_duplicate(&candidates) {
                None => Some(candidates),
                Some(id) => {
                    warn!(candidate_id = %id, "stored candidates repeat an id; starting empty");
                    Some(Vec::new())
                }
            },
            Ok(None) => None,
            Err(StorageError::Malformed(reason)) => {
                warn!(%reason, "stored candidates unreadable; starting empty");
                Some(Vec::new())
            }
            Err(err) => return Err(err.into()),
        };

        let mut store = Self {
            storage,
            candidates: Vec::new(),
            next_sequence: 1,
            seeded: false,
        };

        match loaded {
            Some(candidates) => {
                store.next_sequence = sequence_after(&candidates);
                store.candidates = candidates;
            }
            None => {
                store.candidates = store.seed_collection(seed)?;
                store.seeded = seed == SeedPolicy::Sample;
            }
        }

        info!(
            candidates = store.candidates.len(),
            seeded = store.seeded,
            "candidate store opened"
        );
        Ok(store)
    }

    /// Whether `open` installed the sample dataset.
    pub fn was_seeded(&self) -> bool {
        self.seeded
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn create(&mut self, draft: CandidateDraft) -> Result<Candidate, StoreError> {
        let attributes = validate_draft(draft)?;
        let candidate = self.materialize(attributes)?;

        let mut next = self.candidates.clone();
        next.push(candidate.clone());
        self.commit(next)?;

        info!(candidate_id = %candidate.id, "candidate created");
        Ok(candidate)
    }

    /// Replace every attribute except `id` and `created_at`. Unknown document labels the
    /// record already holds are kept; new ones are rejected.
    pub fn update(
        &mut self,
        id: &CandidateId,
        draft: CandidateDraft,
    ) -> Result<Candidate, StoreError> {
        let index = self.position(id)?;
        let existing = &self.candidates[index];
        let attributes = validate_draft_retaining(draft, &existing.documents)?;

        let updated = Candidate {
            id: existing.id.clone(),
            created_at: existing.created_at,
            name: attributes.name,
            gender: attributes.gender,
            has_children: attributes.has_children,
            documents: attributes.documents,
        };

        let mut next = self.candidates.clone();
        next[index] = updated.clone();
        self.commit(next)?;

        info!(candidate_id = %id, "candidate updated");
        Ok(updated)
    }

    /// Remove a candidate; unknown ids are reported rather than ignored.
    pub fn delete(&mut self, id: &CandidateId) -> Result<Candidate, StoreError> {
        let index = self.position(id)?;

        let mut next = self.candidates.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        info!(candidate_id = %id, "candidate deleted");
        Ok(removed)
    }

    pub fn find_by_id(&self, id: &CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|candidate| &candidate.id == id)
    }

    /// Candidates in insertion order, optionally narrowed to names containing
    /// `filter` (case-insensitive). An empty filter keeps everything.
    pub fn list(&self, filter: Option<&str>) -> Vec<&Candidate> {
        let needle = filter
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);

        self.candidates
            .iter()
            .filter(|candidate| match &needle {
                Some(needle) => candidate.name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .collect()
    }

    pub fn incomplete(&self) -> Vec<&Candidate> {
        self.candidates
            .iter()
            .filter(|candidate| !candidate.status().is_complete)
            .collect()
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total: self.candidates.len(),
            completed: self.candidates.len() - self.incomplete().len(),
        }
    }

    /// Replace the whole collection with a JSON backup. Returns the restored count.
    pub fn restore(&mut self, raw: &str) -> Result<usize, StoreError> {
        let restored = parse_backup(raw)?;
        let count = restored.len();
        let sequence = sequence_after(&restored);

        self.commit(restored)?;
        self.next_sequence = self.next_sequence.max(sequence);

        info!(candidates = count, "candidates restored from backup");
        Ok(count)
    }

    /// Discard every candidate and reinstall the seed collection.
    pub fn reset(&mut self, seed: SeedPolicy) -> Result<(), StoreError> {
        let next = self.seed_collection(seed)?;
        self.commit(next)?;
        warn!(candidates = self.candidates.len(), "candidate store reset");
        Ok(())
    }

    /// Write the current collection as-is.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.storage.save(&self.candidates)?;
        debug!(candidates = self.candidates.len(), "candidate store flushed");
        Ok(())
    }

    fn commit(&mut self, next: Vec<Candidate>) -> Result<(), StoreError> {
        self.storage.save(&next)?;
        self.candidates = next;
        Ok(())
    }

    fn position(&self, id: &CandidateId) -> Result<usize, StoreError> {
        self.candidates
            .iter()
            .position(|candidate| &candidate.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn seed_collection(&mut self, seed: SeedPolicy) -> Result<Vec<Candidate>, StoreError> {
        let drafts = match seed {
            SeedPolicy::Sample => sample_drafts(),
            SeedPolicy::Empty => Vec::new(),
        };

        let mut seeded = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let attributes = validate_draft(draft)?;
            seeded.push(self.materialize(attributes)?);
        }
        Ok(seeded)
    }

    fn materialize(&mut self, attributes: CandidateAttributes) -> Result<Candidate, StoreError> {
        Ok(Candidate {
            id: self.allocate_id()?,
            name: attributes.name,
            gender: attributes.gender,
            has_children: attributes.has_children,
            documents: attributes.documents,
            created_at: Utc::now(),
        })
    }

    fn allocate_id(&mut self) -> Result<CandidateId, StoreError> {
        loop {
            let id = CandidateId(format!("{ID_PREFIX}{:06}", self.next_sequence));
            let taken = self.find_by_id(&id).is_some();
            self.next_sequence = match self.next_sequence.checked_add(1) {
                Some(next) => next,
                None if taken => return Err(StoreError::IdsExhausted(id)),
                // Last id handed out; later calls fail on the check above.
                None => self.next_sequence,
            };
            if !taken {
                return Ok(id);
            }
        }
    }
}

/// First sequence number past every `cand-N` id in `candidates`.
fn sequence_after(candidates: &[Candidate]) -> u64 {
    candidates
        .iter()
        .filter_map(|candidate| candidate.id.as_str().strip_prefix(ID_PREFIX))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .map_or(1, |highest| highest.saturating_add(1))
}

fn first_duplicate(candidates: &[Candidate]) -> Option<CandidateId> {
    let mut seen = BTreeSet::new();
    candidates
        .iter()
        .find(|candidate| !seen.insert(&candidate.id))
        .map(|candidate| candidate.id.clone())
}

#[cfg(test)]
pub(crate) fn sequence_after_for_tests(candidates: &[Candidate]) -> u64 {
    sequence_after(candidates)
}
