//! Gitignore-style exclusion using the ignore crate
//!
//! Excluded paths are invisible to the scanner on both sides of the mirror:
//! they are never copied from the source and never deleted from the replica.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::ConfigError;

/// Pattern matcher for file inclusion/exclusion
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    gitignore: Option<Gitignore>,
}

impl PatternMatcher {
    /// Matcher that includes everything
    #[must_use]
    pub const fn new() -> Self {
        Self { gitignore: None }
    }

    /// Build a matcher from exclude patterns and re-include overrides
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if a pattern does not compile.
    pub fn with_patterns(exclude: &[String], include: &[String]) -> Result<Self, ConfigError> {
        if exclude.is_empty() && include.is_empty() {
            return Ok(Self::new());
        }

        let mut builder = GitignoreBuilder::new("");

        for pattern in exclude {
            builder
                .add_line(None, pattern)
                .map_err(|source| ConfigError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;
        }

        // Include patterns are negated ignores
        for pattern in include {
            builder
                .add_line(None, &format!("!{pattern}"))
                .map_err(|source| ConfigError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;
        }

        let gitignore = builder.build().map_err(|source| ConfigError::Pattern {
            pattern: exclude.join(", "),
            source,
        })?;

        Ok(Self {
            gitignore: Some(gitignore),
        })
    }

    /// Check if a root-relative path should be included
    #[must_use]
    pub fn should_include(&self, relative: &Path, is_dir: bool) -> bool {
        self.gitignore
            .as_ref()
            .is_none_or(|gi| !gi.matched(relative, is_dir).is_ignore())
    }

    /// Whether any pattern is configured
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.gitignore.is_none()
    }
}
