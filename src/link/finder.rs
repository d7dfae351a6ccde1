//! Locating a real file that can back a requirement.

use std::fs;
use std::path::Path;

use super::requirement::LibraryRequirement;
use crate::error::Result;

/// Result of searching one directory for a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// A file with the same base name and major version.
    Exact(String),
    /// Only a file with the same base name but another version (lenient mode).
    VersionMismatch(String),
    /// Nothing usable.
    NoMatch,
}

impl MatchResult {
    /// The matched file name, if any.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::Exact(name) | Self::VersionMismatch(name) => Some(name),
            Self::NoMatch => None,
        }
    }
}

/// Whether `path` is a symlink whose target does not exist.
pub fn is_dangling(path: &Path) -> bool {
    match fs::symlink_metadata(path) {
        Ok(meta) => meta.file_type().is_symlink() && fs::metadata(path).is_err(),
        Err(_) => false,
    }
}

/// Search `directory` for a file that satisfies `requirement`.
///
/// A versioned match is a name of the form `<base_name><major>.<anything>`,
/// so `libnvinfer.so.8.6.1` satisfies `libnvinfer.so.8`. When
/// `check_version` is false and no versioned match exists, the first name
/// starting with `<base_name>` is accepted instead. Entries are visited in
/// sorted order; dangling symlinks and the requirement's own name are never
/// returned. A missing directory yields [`MatchResult::NoMatch`].
pub fn find_matching_file(
    directory: &Path,
    requirement: &LibraryRequirement,
    check_version: bool,
) -> Result<MatchResult> {
    if !directory.is_dir() {
        return Ok(MatchResult::NoMatch);
    }

    let mut names: Vec<String> = fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name != requirement.name())
        .filter(|name| name.starts_with(requirement.base_name()))
        .collect();
    names.sort();

    let usable = |name: &&String| !is_dangling(&directory.join(name.as_str()));

    if let Some(name) = names
        .iter()
        .filter(|name| is_same_major(name, requirement))
        .find(usable)
    {
        return Ok(MatchResult::Exact(name.clone()));
    }

    if !check_version {
        if let Some(name) = names.iter().find(usable) {
            return Ok(MatchResult::VersionMismatch(name.clone()));
        }
    }

    Ok(MatchResult::NoMatch)
}

fn is_same_major(name: &str, requirement: &LibraryRequirement) -> bool {
    name.strip_prefix(requirement.base_name())
        .and_then(|rest| rest.strip_prefix(requirement.major_version()))
        .is_some_and(|rest| rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn req(name: &str) -> LibraryRequirement {
        LibraryRequirement::parse(name).unwrap()
    }

    fn dir_with(files: &[&str]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for f in files {
            fs::write(temp.path().join(f), b"elf").unwrap();
        }
        temp
    }

    #[test]
    fn finds_full_version_for_major() {
        let temp = dir_with(&["libnvinfer.so.8.6.1", "libnvinfer_plugin.so.8.6.1"]);
        let result = find_matching_file(temp.path(), &req("libnvinfer.so.8"), true).unwrap();
        assert_eq!(result, MatchResult::Exact("libnvinfer.so.8.6.1".into()));
    }

    #[test]
    fn major_must_be_followed_by_dot() {
        let temp = dir_with(&["libnvinfer.so.80.1"]);
        let result = find_matching_file(temp.path(), &req("libnvinfer.so.8"), true).unwrap();
        assert_eq!(result, MatchResult::NoMatch);
    }

    #[test]
    fn strict_mode_rejects_other_versions() {
        let temp = dir_with(&["libnvinfer.so.10.0.1"]);
        let result = find_matching_file(temp.path(), &req("libnvinfer.so.8"), true).unwrap();
        assert_eq!(result, MatchResult::NoMatch);
    }

    #[test]
    fn lenient_mode_accepts_other_versions() {
        let temp = dir_with(&["libnvinfer.so.10.0.1"]);
        let result = find_matching_file(temp.path(), &req("libnvinfer.so.8"), false).unwrap();
        assert_eq!(result, MatchResult::VersionMismatch("libnvinfer.so.10.0.1".into()));
    }

    #[test]
    fn exact_match_preferred_over_earlier_mismatch() {
        let temp = dir_with(&["libnvinfer.so.10.0.1", "libnvinfer.so.8.6.1"]);
        let result = find_matching_file(temp.path(), &req("libnvinfer.so.8"), false).unwrap();
        assert_eq!(result, MatchResult::Exact("libnvinfer.so.8.6.1".into()));
    }

    #[test]
    fn plugin_does_not_match_core_library() {
        let temp = dir_with(&["libnvinfer_plugin.so.8.6.1"]);
        let result = find_matching_file(temp.path(), &req("libnvinfer.so.8"), false).unwrap();
        assert_eq!(result, MatchResult::NoMatch);
    }

    #[test]
    fn own_name_is_never_a_candidate() {
        let temp = dir_with(&["libnvinfer.so.8"]);
        let result = find_matching_file(temp.path(), &req("libnvinfer.so.8"), false).unwrap();
        assert_eq!(result, MatchResult::NoMatch);
    }

    #[cfg(unix)]
    #[test]
    fn skips_dangling_symlinks() {
        let temp = dir_with(&["libnvinfer.so.8.6.1"]);
        std::os::unix::fs::symlink(
            temp.path().join("gone"),
            temp.path().join("libnvinfer.so.8.0.0"),
        )
        .unwrap();

        let result = find_matching_file(temp.path(), &req("libnvinfer.so.8"), true).unwrap();
        assert_eq!(result, MatchResult::Exact("libnvinfer.so.8.6.1".into()));
    }

    #[cfg(unix)]
    #[test]
    fn only_dangling_candidates_is_no_match() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(
            temp.path().join("gone"),
            temp.path().join("libnvinfer.so.8.6.1"),
        )
        .unwrap();

        let result = find_matching_file(temp.path(), &req("libnvinfer.so.8"), false).unwrap();
        assert_eq!(result, MatchResult::NoMatch);
        assert!(is_dangling(&temp.path().join("libnvinfer.so.8.6.1")));
    }

    #[test]
    fn missing_directory_is_no_match() {
        let temp = TempDir::new().unwrap();
        let result =
            find_matching_file(&temp.path().join("nope"), &req("libnvinfer.so.8"), false).unwrap();
        assert_eq!(result, MatchResult::NoMatch);
    }

    #[test]
    fn regular_file_is_not_dangling() {
        let temp = dir_with(&["libnvinfer.so.8.6.1"]);
        assert!(!is_dangling(&temp.path().join("libnvinfer.so.8.6.1")));
        assert!(!is_dangling(&temp.path().join("missing")));
    }
}
