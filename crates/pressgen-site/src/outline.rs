//! Versioned sidebar outlines loaded from TOML.
//!
//! An outline file is the hand-authored source of one section's
//! [`NavTree`]. Historically these outlines were duplicated wholesale each
//! time the documentation was restructured, so the file carries a `version`
//! and [`OutlineSet`] keeps every revision addressable side by side.
//!
//! # Outline Files
//!
//! ```toml
//! version = "2019.2"
//!
//! [[entry]]
//! title = "入门"
//! collapsable = false
//! pages = ["hello-world", "runtime-model"]
//!
//! [[entry]]
//! page = "api"
//! ```
//!
//! Entries keep their authored order. The index sentinel is implicit;
//! authoring an empty `page` is rejected.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::nav::{NavEntry, NavGroup, NavTree, PageRef};

/// A versioned sidebar outline.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Outline {
    /// Revision identifier used for [`OutlineSet`] lookups.
    version: String,
    /// Authored entries, in order.
    #[serde(default, rename = "entry")]
    entries: Vec<OutlineEntry>,
}

/// One authored outline entry: a loose page or a titled group.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum OutlineEntry {
    Page {
        page: String,
    },
    Group {
        title: String,
        #[serde(default = "default_collapsable")]
        collapsable: bool,
        pages: Vec<String>,
    },
}

fn default_collapsable() -> bool {
    true
}

/// Outline error.
#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    /// File not found.
    #[error("Outline file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Outline error: {0}")]
    Validation(String),
    /// An outline with the same version is already registered.
    #[error("duplicate outline version: {0}")]
    DuplicateVersion(String),
}

impl Outline {
    /// Load an outline from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist, cannot be parsed, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, OutlineError> {
        if !path.exists() {
            return Err(OutlineError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse an outline from TOML content and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML, an empty version, a group with
    /// an empty title or page list, or an explicit index sentinel.
    pub fn from_toml(content: &str) -> Result<Self, OutlineError> {
        let outline: Self = toml::from_str(content)?;
        outline.validate()?;
        Ok(outline)
    }

    /// The outline's revision identifier.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Build the section's [`NavTree`]: the index sentinel followed by the
    /// authored entries in order.
    ///
    /// Pure function of the outline data; repeated calls yield structurally
    /// identical trees.
    #[must_use]
    pub fn nav_tree(&self) -> NavTree {
        let entries = self
            .entries
            .iter()
            .map(|entry| match entry {
                OutlineEntry::Page { page } => NavEntry::Page(PageRef::new(page.clone())),
                OutlineEntry::Group {
                    title,
                    collapsable,
                    pages,
                } => NavEntry::Group(NavGroup {
                    title: title.clone(),
                    collapsable: *collapsable,
                    children: pages.iter().map(|p| PageRef::new(p.clone())).collect(),
                }),
            })
            .collect();
        NavTree::new(entries)
    }

    /// Validate authored entries.
    ///
    /// Duplicate page references are tolerated (the generator renders them)
    /// but reported through `tracing`.
    fn validate(&self) -> Result<(), OutlineError> {
        if self.version.is_empty() {
            return Err(OutlineError::Validation(
                "outline version cannot be empty".to_owned(),
            ));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for entry in &self.entries {
            match entry {
                OutlineEntry::Page { page } => self.check_page(page, &mut seen)?,
                OutlineEntry::Group { title, pages, .. } => {
                    if title.is_empty() {
                        return Err(OutlineError::Validation(format!(
                            "outline {}: group title cannot be empty",
                            self.version
                        )));
                    }
                    if pages.is_empty() {
                        return Err(OutlineError::Validation(format!(
                            "outline {}: group {title:?} has no pages",
                            self.version
                        )));
                    }
                    for page in pages {
                        self.check_page(page, &mut seen)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Check one page reference: no explicit sentinel, duplicates warned.
    fn check_page<'a>(
        &self,
        page: &'a str,
        seen: &mut HashSet<&'a str>,
    ) -> Result<(), OutlineError> {
        if page.is_empty() {
            return Err(OutlineError::Validation(format!(
                "outline {}: the index sentinel is implicit, empty page entries are not allowed",
                self.version
            )));
        }
        if !seen.insert(page) {
            tracing::warn!(
                version = %self.version,
                page = %page,
                "duplicate page reference in outline"
            );
        }
        Ok(())
    }
}

/// Registry of outlines keyed by version.
///
/// Keeps every documentation revision addressable by version rather than
/// hard-coding one outline per revision.
#[derive(Debug, Default)]
pub struct OutlineSet {
    outlines: HashMap<String, Outline>,
}

impl OutlineSet {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an outline under its version.
    ///
    /// # Errors
    ///
    /// Returns `OutlineError::DuplicateVersion` if the version is taken.
    pub fn insert(&mut self, outline: Outline) -> Result<(), OutlineError> {
        let version = outline.version.clone();
        if self.outlines.contains_key(&version) {
            return Err(OutlineError::DuplicateVersion(version));
        }
        self.outlines.insert(version, outline);
        Ok(())
    }

    /// Look up an outline by version.
    #[must_use]
    pub fn get(&self, version: &str) -> Option<&Outline> {
        self.outlines.get(version)
    }

    /// Number of registered outlines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }
}
