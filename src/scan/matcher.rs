// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Matches declared dependency names against the libraries requested on the command line.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatcherError {
    #[error("At least one library must be requested")]
    NoLibraries,
    #[error("Library names must not be empty")]
    EmptyToken,
}

/// A requested library token together with its canonical pattern.
///
/// Canonicalization:
/// - tokens containing `.so` are used verbatim (`libm.so`, `libssl.so.1.0`);
/// - tokens without a `lib` prefix get `lib` prepended and `.so` appended (`pthread` -> `libpthread.so`);
/// - remaining tokens get `.so` appended (`libfoo` -> `libfoo.so`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryPattern {
    token: String,
    pattern: String,
}

impl LibraryPattern {
    #[must_use]
    pub fn canonicalize(token: &str) -> Self {
        let pattern = if token.contains(".so") {
            token.to_string()
        } else if token.starts_with("lib") {
            format!("{token}.so")
        } else {
            format!("lib{token}.so")
        };
        Self {
            token: token.to_string(),
            pattern,
        }
    }

    /// The token as given by the caller.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Unanchored substring match against a declared dependency name.
    #[must_use]
    pub fn matches(&self, dependency: &str) -> bool {
        dependency.contains(self.pattern.as_str())
    }
}

/// Ordered set of canonical patterns, canonicalized once per scan.
#[derive(Debug, Clone)]
pub struct DependencyMatcher {
    patterns: Vec<LibraryPattern>,
}

impl DependencyMatcher {
    /// Canonicalize the requested tokens, preserving caller order.
    ///
    /// # Errors
    /// Returns an error if no tokens are given or a token is empty or blank.
    pub fn new<I, S>(tokens: I) -> Result<Self, MatcherError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = tokens
            .into_iter()
            .map(|token| {
                let token = token.as_ref();
                if token.trim().is_empty() {
                    Err(MatcherError::EmptyToken)
                } else {
                    Ok(LibraryPattern::canonicalize(token))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        if patterns.is_empty() {
            return Err(MatcherError::NoLibraries);
        }
        Ok(Self { patterns })
    }

    #[must_use]
    pub fn patterns(&self) -> &[LibraryPattern] {
        &self.patterns
    }

    /// First requested pattern (in caller order) matching `dependency`.
    ///
    /// An earlier, broader pattern shadows a later, more specific one for the same entry.
    #[must_use]
    pub fn match_dependency(&self, dependency: &str) -> Option<&LibraryPattern> {
        self.patterns.iter().find(|pattern| pattern.matches(dependency))
    }

    /// Resolve every declared dependency entry independently, in declaration order.
    ///
    /// Matched patterns borrow from the matcher only, so they outlive `dependencies`.
    pub fn match_all<'m, 'd>(
        &'m self,
        dependencies: &'d [String],
    ) -> impl Iterator<Item = (&'d str, &'m LibraryPattern)> + use<'m, 'd> {
        dependencies.iter().filter_map(move |dependency| {
            self.match_dependency(dependency)
                .map(|pattern| (dependency.as_str(), pattern))
        })
    }
}
