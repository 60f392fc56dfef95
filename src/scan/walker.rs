// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Recursive discovery of regular files below a scan root.

use path_clean::PathClean;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::ScanError;

/// Lazily enumerates regular files below a root directory.
///
/// Symlinks below the root are never entered nor reported, only the root itself is
/// resolved. Entries are visited sorted by file name so two walks over an unchanged
/// tree yield the same sequence.
#[derive(Debug)]
pub struct DirectoryWalker {
    root: PathBuf,
}

/// Counts of entries skipped while walking.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkErrors {
    pub(crate) directories: usize,
    pub(crate) entries: usize,
}

impl DirectoryWalker {
    /// Validate the root and prepare a walk.
    ///
    /// # Errors
    /// Returns an error if the root does not exist, is not a directory or cannot be opened.
    pub fn new(root: &Path) -> Result<Self, ScanError> {
        let root = root.to_path_buf().clean();
        fs::read_dir(&root).map_err(|e| ScanError::RootUnreadable {
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Iterate over regular files. Walk errors are logged, counted in `errors` and skipped.
    pub fn files<'a>(&self, errors: &'a mut WalkErrors) -> impl Iterator<Item = PathBuf> + 'a {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() => Some(entry.into_path()),
                Ok(_) => None,
                Err(e) => {
                    Self::report(&e, errors);
                    None
                }
            })
    }

    fn report(error: &walkdir::Error, errors: &mut WalkErrors) {
        let Some(path) = error.path() else {
            errors.entries += 1;
            tracing::debug!(error = %error, "Skipping entry");
            return;
        };
        let is_directory = fs::symlink_metadata(path).is_ok_and(|m| m.is_dir());
        if is_directory {
            errors.directories += 1;
            tracing::warn!(path = %path.display(), error = %error, "Cannot open directory, skipping");
        } else {
            errors.entries += 1;
            tracing::debug!(path = %path.display(), error = %error, "Cannot stat entry, skipping");
        }
    }
}
