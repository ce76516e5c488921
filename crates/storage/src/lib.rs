use directories::ProjectDirs;
use doc_model::AnnotationSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const ANNOTATIONS_SCHEMA_VERSION: u32 = 1;
const ANNOTATIONS_DIR: &str = "annotations";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("invalid submission id {0:?}")]
    InvalidKey(String),
    #[error("unsupported annotation schema version {0}")]
    UnsupportedVersion(u32),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Annotation sets on disk, one JSON file per submission.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnnotationsEnvelope {
    version: u32,
    annotations: AnnotationSet,
}

impl AnnotationStore {
    pub fn from_default_project() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("dev", "ClassroomMarkup", "ClassroomMarkup")
            .ok_or(StorageError::NoDataDirectory)?;

        Ok(Self { root: dirs.data_local_dir().to_path_buf() })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absent submissions load as an empty set.
    pub fn load(&self, submission: &str) -> Result<AnnotationSet, StorageError> {
        let path = self.annotations_path(submission)?;
        if !path.exists() {
            return Ok(AnnotationSet::new());
        }

        let bytes = fs::read(path)?;
        let envelope: AnnotationsEnvelope = serde_json::from_slice(&bytes)?;
        if envelope.version > ANNOTATIONS_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion(envelope.version));
        }

        Ok(envelope.annotations)
    }

    pub fn save(&self, submission: &str, annotations: &AnnotationSet) -> Result<(), StorageError> {
        let path = self.annotations_path(submission)?;
        fs::create_dir_all(self.root.join(ANNOTATIONS_DIR))?;

        let envelope = AnnotationsEnvelope {
            version: ANNOTATIONS_SCHEMA_VERSION,
            annotations: annotations.clone(),
        };

        let bytes = serde_json::to_vec_pretty(&envelope)?;
        fs::write(&path, bytes)?;
        log::info!("saved {} segments to {}", annotations.len(), path.display());
        Ok(())
    }

    /// Returns `true` if something was deleted.
    pub fn remove(&self, submission: &str) -> Result<bool, StorageError> {
        let path = self.annotations_path(submission)?;
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(path)?;
        Ok(true)
    }

    /// Submission ids with stored annotations, sorted.
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        let dir = self.root.join(ANNOTATIONS_DIR);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_owned());
            }
        }

        ids.sort();
        Ok(ids)
    }

    fn annotations_path(&self, submission: &str) -> Result<PathBuf, StorageError> {
        let valid = !submission.is_empty()
            && submission
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
            && !submission.starts_with('.');

        if !valid {
            return Err(StorageError::InvalidKey(submission.to_owned()));
        }

        Ok(self.root.join(ANNOTATIONS_DIR).join(format!("{submission}.json")))
    }
}
