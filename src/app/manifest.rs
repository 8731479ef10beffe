use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to serialize the updated ConfigMap: {source}")]
    FailedToSerialize { source: serde_json::Error },

    #[error("Failed to write manifest to {path}: {source}")]
    FailedToWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The updated ConfigMap on disk, ready for `kubectl apply -f`.
///
/// Unless kept, the file is removed when this value is dropped, whichever
/// way the run ends.
#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
    cleanup: Option<TempPath>,
}

impl Manifest {
    pub fn write(document: &Value, path: &Path, keep: bool) -> Result<Self, ManifestError> {
        let serialized = serde_json::to_vec(document)
            .map_err(|source| ManifestError::FailedToSerialize { source })?;

        std::fs::write(path, serialized).map_err(|source| ManifestError::FailedToWrite {
            path: path.to_path_buf(),
            source,
        })?;
        let cleanup = (!keep).then(|| TempPath::from_path(path));
        log::debug!("wrote manifest to {}", path.display());

        Ok(Manifest {
            path: path.to_path_buf(),
            cleanup,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_kept(&self) -> bool {
        self.cleanup.is_none()
    }
}
