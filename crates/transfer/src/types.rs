use std::path::{Path, PathBuf};

use crate::{TransferError, digest::file_digest};

/// One payload to push: everything the metadata message needs, derived
/// from the source file at construction time and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Source path on the operator machine.
    pub path: PathBuf,
    /// Display name announced to the peer (the file name).
    pub name: String,
    /// Size in bytes at request time.
    pub size: u64,
    /// Optional hex-encoded MD5 content digest.
    pub digest: Option<String>,
}

impl TransferRequest {
    /// Builds a request from a source file.
    ///
    /// Fails if the path is missing or not a regular file. The digest
    /// is computed only when `compute_digest` is set; it requires a
    /// full read of the file.
    pub fn from_path(path: &Path, compute_digest: bool) -> Result<Self, TransferError> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(TransferError::NotAFile(path.display().to_string()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| TransferError::InvalidName(path.display().to_string()))?;

        let digest = if compute_digest {
            Some(file_digest(path)?)
        } else {
            None
        };

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: meta.len(),
            digest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn request_from_file_with_digest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.apk");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"hello world")
            .unwrap();

        let req = TransferRequest::from_path(&path, true).unwrap();
        assert_eq!(req.name, "app.apk");
        assert_eq!(req.size, 11);
        assert_eq!(
            req.digest.as_deref(),
            Some("5eb63bbbe01eeed093cb22bb8f5acdc3")
        );
    }

    #[test]
    fn request_without_digest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.apk");
        std::fs::write(&path, b"x").unwrap();

        let req = TransferRequest::from_path(&path, false).unwrap();
        assert!(req.digest.is_none());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = TransferRequest::from_path(&dir.path().join("nope.apk"), false);
        assert!(matches!(result.unwrap_err(), TransferError::Io(_)));
    }

    #[test]
    fn directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = TransferRequest::from_path(dir.path(), false);
        assert!(matches!(result.unwrap_err(), TransferError::NotAFile(_)));
    }
}
