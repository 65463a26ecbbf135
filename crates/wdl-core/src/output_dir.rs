//! Output directory resolution.

use std::path::{Path, PathBuf};

use crate::error::ResolutionError;

/// Returns the current working directory when `dir` is `None`; otherwise
/// checks that `dir` exists and is a directory. Never creates anything.
pub fn resolve_output_dir(dir: Option<&Path>) -> Result<PathBuf, ResolutionError> {
    match dir {
        None => std::env::current_dir().map_err(ResolutionError::CurrentDir),
        Some(dir) => validate_dir(dir).map(|()| dir.to_path_buf()),
    }
}

pub(crate) fn validate_dir(dir: &Path) -> Result<(), ResolutionError> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ResolutionError::NotADirectory(dir.to_path_buf())),
        Err(_) => Err(ResolutionError::NotFound(dir.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve_output_dir(None).unwrap(), cwd);
    }

    #[test]
    fn existing_dir_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_output_dir(Some(dir.path())).unwrap(), dir.path());
    }

    #[test]
    fn file_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("model.bin");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            resolve_output_dir(Some(&file)),
            Err(ResolutionError::NotADirectory(p)) if p == file
        ));
    }

    #[test]
    fn missing_dir_is_not_found_and_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            resolve_output_dir(Some(&missing)),
            Err(ResolutionError::NotFound(_))
        ));
        assert!(!missing.exists());
    }
}
