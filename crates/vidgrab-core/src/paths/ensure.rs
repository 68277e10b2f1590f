//! Directory creation and verification.

use std::fs;
use std::path::Path;

use super::error::PathError;

/// Ensure `path` exists and is a directory, creating it if missing.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), "Created directory");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_nested_directories() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("public").join("downloads");

        ensure_directory(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn existing_directory_is_accepted() {
        let temp = tempdir().unwrap();
        ensure_directory(temp.path()).unwrap();
    }

    #[test]
    fn existing_file_is_rejected() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, b"x").unwrap();

        let err = ensure_directory(&file).unwrap_err();
        assert!(matches!(err, PathError::NotADirectory(_)));
    }
}
