use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::backup::{parse_backup, to_json_backup};
use super::domain::Candidate;

/// Persistence collaborator. Writes are whole-collection overwrites.
pub trait CandidateStorage: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<Candidate>>, StorageError>;
    fn save(&self, candidates: &[Candidate]) -> Result<(), StorageError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("stored data is malformed: {0}")]
    Malformed(String),
    #[error("unable to serialize candidates: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Snapshot held in memory; clones share the same snapshot.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    snapshot: Arc<Mutex<Option<Vec<Candidate>>>>,
}

impl InMemoryStorage {
    pub fn with_candidates(candidates: Vec<Candidate>) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(Some(candidates))),
        }
    }

    /// Last saved collection, if any.
    pub fn snapshot(&self) -> Option<Vec<Candidate>> {
        self.snapshot
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl CandidateStorage for InMemoryStorage {
    fn load(&self) -> Result<Option<Vec<Candidate>>, StorageError> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|_| StorageError::Unavailable("snapshot mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, candidates: &[Candidate]) -> Result<(), StorageError> {
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|_| StorageError::Unavailable("snapshot mutex poisoned".to_string()))?;
        *guard = Some(candidates.to_vec());
        Ok(())
    }
}

/// Single JSON document on disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "candidates.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CandidateStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Vec<Candidate>>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::io(&self.path, err)),
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        parse_backup(&raw)
            .map(Some)
            .map_err(|err| StorageError::Malformed(err.to_string()))
    }

    fn save(&self, candidates: &[Candidate]) -> Result<(), StorageError> {
        let body = to_json_backup(candidates)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| StorageError::io(parent, err))?;
        }

        let staging = self.staging_path();
        let mut file = fs::File::create(&staging).map_err(|err| StorageError::io(&staging, err))?;
        file.write_all(body.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|err| StorageError::io(&staging, err))?;
        drop(file);

        fs::rename(&staging, &self.path).map_err(|err| StorageError::io(&self.path, err))
    }
}
