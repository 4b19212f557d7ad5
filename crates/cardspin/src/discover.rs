//! Locate front/back photograph pairs in a directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

const FRONT_SUFFIX: &str = "_front.jpg";
const BACK_SUFFIX: &str = "_back.jpg";

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("failed to read input directory {}: {}", .path.display(), .source)]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A card identifier with its two resolved photograph paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardPair {
    pub id: String,
    pub front: PathBuf,
    pub back: PathBuf,
}

/// Scan `dir` (non-recursive) for `<id>_front.jpg` files with a matching
/// `<id>_back.jpg` next to them, returned sorted by id.
///
/// Only the literal, lower-case `jpg` extension takes part: `.jpeg`, `.JPG`
/// and every other format are skipped. An unpaired front or back file is
/// silently ignored, and an empty result is not an error.
pub fn discover_pairs(dir: &Path) -> Result<Vec<CardPair>, DiscoverError> {
    let read_err = |source| DiscoverError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = HashSet::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        // non-UTF-8 names cannot match the pattern
        if let Ok(name) = entry.file_name().into_string() {
            names.insert(name);
        }
    }

    let mut pairs = Vec::new();
    for name in &names {
        let Some(id) = name.strip_suffix(FRONT_SUFFIX) else {
            continue;
        };
        let back_name = format!("{id}{BACK_SUFFIX}");
        if names.contains(&back_name) {
            pairs.push(CardPair {
                id: id.to_string(),
                front: dir.join(name),
                back: dir.join(back_name),
            });
        } else {
            log::debug!("{name} has no matching back side, skipping");
        }
    }

    pairs.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn finds_and_sorts_pairs() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "zebra_front.jpg");
        touch(dir.path(), "zebra_back.jpg");
        touch(dir.path(), "ace_front.jpg");
        touch(dir.path(), "ace_back.jpg");
        touch(dir.path(), "notes.txt");

        let pairs = discover_pairs(dir.path()).unwrap();
        let ids: Vec<&str> = pairs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["ace", "zebra"]);
        assert_eq!(pairs[0].front, dir.path().join("ace_front.jpg"));
        assert_eq!(pairs[0].back, dir.path().join("ace_back.jpg"));
    }

    #[test]
    fn unpaired_front_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "lonely_front.jpg");
        touch(dir.path(), "other_back.jpg");

        assert!(discover_pairs(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn extension_must_be_exactly_jpg() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a_front.jpeg");
        touch(dir.path(), "a_back.jpeg");
        touch(dir.path(), "b_front.png");
        touch(dir.path(), "b_back.png");

        assert!(discover_pairs(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn ids_may_contain_underscores() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "rare_holo_front.jpg");
        touch(dir.path(), "rare_holo_back.jpg");

        let pairs = discover_pairs(dir.path()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].id, "rare_holo");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("nope");
        assert!(discover_pairs(&gone).is_err());
    }

    #[test]
    fn matching_subdirectory_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("dircard_front.jpg")).unwrap();
        touch(dir.path(), "dircard_back.jpg");

        assert!(discover_pairs(dir.path()).unwrap().is_empty());
    }
}
