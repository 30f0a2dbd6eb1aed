//! Two-location resource search.
//!
//! Font and name resources are looked up next to the executable first, then
//! in the current working directory. Selection between resource variants is
//! an external configuration decision; nothing here inspects file contents.

use std::env;
use std::path::PathBuf;

use crate::error::ResourceError;

/// Locates `file_name` in the tool's installation directory, then the
/// current working directory.
///
/// # Errors
///
/// Returns [`ResourceError::NotFound`] naming every probed candidate when
/// the file exists in neither location.
pub fn locate(file_name: &str) -> Result<PathBuf, ResourceError> {
    let mut dirs = Vec::with_capacity(2);
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            dirs.push(dir.to_path_buf());
        }
    }
    if let Ok(cwd) = env::current_dir() {
        dirs.push(cwd);
    }
    locate_in(&dirs, file_name)
}

/// Probes `dirs` in order for `file_name`, returning the first hit.
pub(crate) fn locate_in(dirs: &[PathBuf], file_name: &str) -> Result<PathBuf, ResourceError> {
    let mut searched = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let candidate = dir.join(file_name);
        if candidate.is_file() {
            return Ok(candidate);
        }
        searched.push(candidate);
    }
    Err(ResourceError::NotFound {
        name: file_name.to_owned(),
        searched,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn first_location_wins() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        fs::write(a.path().join("font.txt"), "あ").unwrap();
        fs::write(b.path().join("font.txt"), "い").unwrap();

        let dirs = vec![a.path().to_path_buf(), b.path().to_path_buf()];
        let found = locate_in(&dirs, "font.txt").unwrap();
        assert_eq!(found, a.path().join("font.txt"));
    }

    #[test]
    fn falls_through_to_second_location() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        fs::write(b.path().join("name.txt"), "木村 天澤").unwrap();

        let dirs = vec![a.path().to_path_buf(), b.path().to_path_buf()];
        let found = locate_in(&dirs, "name.txt").unwrap();
        assert_eq!(found, b.path().join("name.txt"));
    }

    #[test]
    fn missing_everywhere_reports_all_candidates() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();

        let dirs = vec![a.path().to_path_buf(), b.path().to_path_buf()];
        let err = locate_in(&dirs, "font.txt").unwrap_err();
        match err {
            ResourceError::NotFound { name, searched } => {
                assert_eq!(name, "font.txt");
                assert_eq!(searched.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
