//! Navigation tree data model.
//!
//! A [`NavTree`] is the sidebar structure for one documentation section: an
//! ordered sequence of page links and titled groups, always led by the
//! empty-string sentinel that the generator resolves to the section's index
//! page. Entry order is significant end-to-end; it dictates rendered
//! sidebar order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a content document, as a path relative to the docs root.
///
/// No check is made that the referenced document exists; resolving
/// identifiers to files is the generator's job. The empty string is
/// reserved as the index sentinel and only appears as the head of a
/// [`NavTree`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageRef(String);

impl PageRef {
    /// Create a page reference.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The index sentinel: resolves to the section's root page.
    #[must_use]
    pub fn index() -> Self {
        Self(String::new())
    }

    /// The referenced document path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the index sentinel.
    #[must_use]
    pub fn is_index(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for PageRef {
    fn from(path: &str) -> Self {
        Self(path.to_owned())
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, collapsible grouping of page references within a [`NavTree`].
///
/// Invariant: `children` is non-empty and in authored order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavGroup {
    /// Group title shown as the sidebar heading.
    pub title: String,
    /// Whether the group can be collapsed in the rendered sidebar.
    pub collapsable: bool,
    /// Pages in the group, in authored order.
    pub children: Vec<PageRef>,
}

/// One sidebar entry: a bare page link or a titled group.
///
/// Serializes untagged, matching the generator's heterogeneous sidebar
/// arrays: pages as bare strings, groups as objects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NavEntry {
    /// A loose page link.
    Page(PageRef),
    /// A titled group of pages.
    Group(NavGroup),
}

/// Ordered sidebar structure for one documentation section.
///
/// The first entry is always the index sentinel; [`NavTree::new`] inserts
/// it, so callers pass only the authored entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NavTree(Vec<NavEntry>);

impl NavTree {
    /// Build a tree from authored entries, prepending the index sentinel.
    #[must_use]
    pub fn new(entries: Vec<NavEntry>) -> Self {
        let mut all = Vec::with_capacity(entries.len() + 1);
        all.push(NavEntry::Page(PageRef::index()));
        all.extend(entries);
        Self(all)
    }

    /// All entries, sentinel included.
    #[must_use]
    pub fn entries(&self) -> &[NavEntry] {
        &self.0
    }

    /// Number of entries, sentinel included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A tree is never empty; it always carries the sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}
