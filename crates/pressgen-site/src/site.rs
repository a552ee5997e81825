//! Site configuration assembly and serialization.
//!
//! [`SiteConfig::assemble`] composes loaded site metadata and resolved
//! outlines into the single object the external generator consumes. All
//! inputs are passed explicitly; assembly resolves each declared sidebar
//! section's outline by version, builds its tree, and records it under the
//! section's path prefix in declaration order.
//!
//! Serialization matches the generator's implicit schema: camelCase keys,
//! head tags as `[tag, attrs]` pairs, the sidebar as an object whose key
//! order equals declaration order.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use pressgen_config::{HeadTag, NavLink, SiteMeta};

use crate::nav::NavTree;
use crate::outline::OutlineSet;

/// Error returned when assembly fails.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
    /// A sidebar declaration names an unregistered outline version.
    #[error("no outline registered for sidebar prefix {prefix} (version {version})")]
    UnknownOutline {
        /// Path prefix of the offending declaration.
        prefix: String,
        /// Outline version the declaration asked for.
        version: String,
    },
    /// Two sidebar sections share a path prefix.
    #[error("duplicate sidebar prefix: {0}")]
    DuplicatePrefix(String),
}

/// Sidebar mapping from path prefix to [`NavTree`], in declaration order.
///
/// Serializes as a JSON object whose key order equals insertion order;
/// the generator matches prefixes in that order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sidebar {
    sections: Vec<(String, NavTree)>,
}

impl Sidebar {
    fn insert(&mut self, prefix: String, tree: NavTree) -> Result<(), AssembleError> {
        if self.sections.iter().any(|(p, _)| *p == prefix) {
            return Err(AssembleError::DuplicatePrefix(prefix));
        }
        self.sections.push((prefix, tree));
        Ok(())
    }

    /// Look up a section's tree by path prefix.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&NavTree> {
        self.sections
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, tree)| tree)
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the sidebar has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NavTree)> {
        self.sections.iter().map(|(p, tree)| (p.as_str(), tree))
    }
}

impl Serialize for Sidebar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (prefix, tree) in &self.sections {
            map.serialize_entry(prefix, tree)?;
        }
        map.end()
    }
}

/// Theme configuration handed to the generator as `themeConfig`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    /// Repository slug or URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Documentation source directory inside the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_dir: Option<String>,
    /// Render all page headers in the sidebar.
    pub display_all_headers: bool,
    /// Show edit links on pages.
    pub edit_links: bool,
    /// Label for edit links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_link_text: Option<String>,
    /// Label for the last-updated timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Sidebar header nesting depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_depth: Option<u8>,
    /// Enable the built-in search box.
    pub search: bool,
    /// Maximum number of search suggestions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_max_suggestions: Option<u16>,
    /// Navbar links, in authored order.
    pub nav: Vec<NavLink>,
    /// Sidebar sections, in declaration order.
    pub sidebar: Sidebar,
}

/// The complete configuration object consumed by the external generator.
///
/// Built once by [`SiteConfig::assemble`] and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Site title.
    pub title: String,
    /// Site description.
    pub description: String,
    /// Head tag descriptors.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub head: Vec<HeadTag>,
    /// Whether the generator registers its service worker.
    pub service_worker: bool,
    /// Theme name, if not the generator's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Theme configuration.
    pub theme_config: ThemeConfig,
}

impl SiteConfig {
    /// Assemble the site configuration from metadata and outlines.
    ///
    /// For each sidebar declaration, in authored order: resolve the
    /// declared outline version, build its tree, and store it under the
    /// declared path prefix.
    ///
    /// # Errors
    ///
    /// Returns `AssembleError::UnknownOutline` if a declaration names an
    /// unregistered version, and `AssembleError::DuplicatePrefix` if two
    /// declarations share a prefix (only possible for metadata built in
    /// code; `SiteMeta` loading already rejects it).
    pub fn assemble(meta: &SiteMeta, outlines: &OutlineSet) -> Result<Self, AssembleError> {
        let mut sidebar = Sidebar::default();
        for decl in &meta.sidebar {
            let outline =
                outlines
                    .get(&decl.outline)
                    .ok_or_else(|| AssembleError::UnknownOutline {
                        prefix: decl.prefix.clone(),
                        version: decl.outline.clone(),
                    })?;
            tracing::debug!(
                prefix = %decl.prefix,
                label = %decl.label,
                version = %decl.outline,
                "assembled sidebar section"
            );
            sidebar.insert(decl.prefix.clone(), outline.nav_tree())?;
        }

        Ok(Self {
            title: meta.title.clone(),
            description: meta.description.clone(),
            head: meta.head.clone(),
            service_worker: meta.service_worker,
            theme: meta.theme.clone(),
            theme_config: ThemeConfig {
                repo: meta.theme_config.repo.clone(),
                docs_dir: meta.theme_config.docs_dir.clone(),
                display_all_headers: meta.theme_config.display_all_headers,
                edit_links: meta.theme_config.edit_links,
                edit_link_text: meta.theme_config.edit_link_text.clone(),
                last_updated: meta.theme_config.last_updated.clone(),
                sidebar_depth: meta.theme_config.sidebar_depth,
                search: meta.theme_config.search,
                search_max_suggestions: meta.theme_config.search_max_suggestions,
                nav: meta.nav.clone(),
                sidebar,
            },
        })
    }

    /// The configuration as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// The configuration as pretty-printed JSON, the artifact the external
    /// generator reads.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    // Plain immutable data throughout; safe to share across threads.
    static_assertions::assert_impl_all!(super::SiteConfig: Send, Sync);

    use pretty_assertions::assert_eq;

    use pressgen_config::SiteMeta;

    use super::*;
    use crate::outline::Outline;

    const SITE_TOML: &str = r##"
title = "Tokio中文"
description = "Tokio：Rust编写快速网络应用的平台"

[[head]]
tag = "link"
attrs = [["rel", "icon"], ["href", "/favicon.ico"]]

[[head]]
tag = "meta"
attrs = [["name", "theme-color"], ["content", "#3eaf7c"]]

[theme_config]
repo = "tokio-zh"
docs_dir = "docs"
display_all_headers = true
edit_links = true
edit_link_text = "在 GitHub 上编辑此页"
last_updated = "上次更新"
sidebar_depth = 0
search_max_suggestions = 11

[[nav]]
text = "文档"
link = "/document/"

[[nav]]
text = "社区"
link = "/community/"

[[nav]]
text = "博客"
link = "/blog/"

[[nav]]
text = "英文"
link = "https://tokio.rs"

[[sidebar]]
prefix = "/document/"
label = "文档"
outline = "document"

[[sidebar]]
prefix = "/blog/"
label = "博客"
outline = "blog"
"##;

    const DOCUMENT_OUTLINE: &str = r#"
version = "document"

[[entry]]
title = "入门"
collapsable = false
pages = [
  "hello-world",
  "runtime-model",
  "futures",
  "tasks",
  "IO",
  "example-chat-server",
]

[[entry]]
title = "深入"
collapsable = false
pages = [
  "timers",
  "essential-combinators",
  "returning-futures",
  "working-with-framed-streams",
  "building-runtime",
]

[[entry]]
title = "内部原理"
collapsable = false
pages = ["internals/intro", "internals/runtime-model", "internals/net"]

[[entry]]
page = "api"
"#;

    const BLOG_OUTLINE: &str = r#"
version = "blog"

[[entry]]
title = "2019"
collapsable = false
pages = ["2019/tokio-alpha", "2019/tokio-trace"]
"#;

    fn fixtures() -> (SiteMeta, OutlineSet) {
        let meta = SiteMeta::from_toml(SITE_TOML).unwrap();
        let mut outlines = OutlineSet::new();
        outlines
            .insert(Outline::from_toml(DOCUMENT_OUTLINE).unwrap())
            .unwrap();
        outlines
            .insert(Outline::from_toml(BLOG_OUTLINE).unwrap())
            .unwrap();
        (meta, outlines)
    }

    #[test]
    fn test_assemble_one_sidebar_entry_per_declared_prefix() {
        let (meta, outlines) = fixtures();

        let config = SiteConfig::assemble(&meta, &outlines).unwrap();

        assert_eq!(config.theme_config.sidebar.len(), 2);
        assert!(config.theme_config.sidebar.get("/document/").is_some());
        assert!(config.theme_config.sidebar.get("/blog/").is_some());
        assert!(config.theme_config.sidebar.get("/community/").is_none());
    }

    #[test]
    fn test_assemble_sidebar_trees_equal_outline_trees() {
        let (meta, outlines) = fixtures();

        let config = SiteConfig::assemble(&meta, &outlines).unwrap();

        assert_eq!(
            config.theme_config.sidebar.get("/document/").unwrap(),
            &outlines.get("document").unwrap().nav_tree()
        );
        assert_eq!(
            config.theme_config.sidebar.get("/blog/").unwrap(),
            &outlines.get("blog").unwrap().nav_tree()
        );
    }

    #[test]
    fn test_assemble_copies_metadata_verbatim() {
        let (meta, outlines) = fixtures();

        let config = SiteConfig::assemble(&meta, &outlines).unwrap();

        assert_eq!(config.title, "Tokio中文");
        assert_eq!(config.description, "Tokio：Rust编写快速网络应用的平台");
        assert!(config.service_worker);
        assert_eq!(config.theme_config.repo, Some("tokio-zh".to_owned()));
        assert_eq!(config.theme_config.docs_dir, Some("docs".to_owned()));
        assert_eq!(config.theme_config.sidebar_depth, Some(0));
        assert_eq!(config.theme_config.search_max_suggestions, Some(11));
    }

    #[test]
    fn test_assemble_preserves_nav_order() {
        let (meta, outlines) = fixtures();

        let config = SiteConfig::assemble(&meta, &outlines).unwrap();

        let texts: Vec<_> = config
            .theme_config
            .nav
            .iter()
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(texts, vec!["文档", "社区", "博客", "英文"]);
    }

    #[test]
    fn test_assemble_unknown_outline_version() {
        let (mut meta, outlines) = fixtures();
        meta.sidebar[1].outline = "missing".to_owned();

        let err = SiteConfig::assemble(&meta, &outlines).unwrap_err();

        assert!(matches!(
            err,
            AssembleError::UnknownOutline { ref prefix, ref version }
                if prefix == "/blog/" && version == "missing"
        ));
    }

    #[test]
    fn test_assemble_duplicate_prefix_in_programmatic_metadata() {
        let (mut meta, outlines) = fixtures();
        // Bypasses SiteMeta validation by mutating the loaded value.
        meta.sidebar[1].prefix = "/document/".to_owned();

        let err = SiteConfig::assemble(&meta, &outlines).unwrap_err();

        assert!(matches!(err, AssembleError::DuplicatePrefix(p) if p == "/document/"));
    }

    #[test]
    fn test_json_shape_matches_generator_schema() {
        let (meta, outlines) = fixtures();

        let config = SiteConfig::assemble(&meta, &outlines).unwrap();
        let json = config.to_json_value().unwrap();

        assert_eq!(json["title"], "Tokio中文");
        assert_eq!(json["serviceWorker"], true);
        assert_eq!(json["head"][0][0], "link");
        assert_eq!(json["head"][0][1]["rel"], "icon");
        assert_eq!(json["head"][0][1]["href"], "/favicon.ico");
        assert_eq!(json["themeConfig"]["repo"], "tokio-zh");
        assert_eq!(json["themeConfig"]["docsDir"], "docs");
        assert_eq!(json["themeConfig"]["displayAllHeaders"], true);
        assert_eq!(json["themeConfig"]["editLinks"], true);
        assert_eq!(json["themeConfig"]["sidebarDepth"], 0);
        assert_eq!(json["themeConfig"]["searchMaxSuggestions"], 11);
        assert_eq!(json["themeConfig"]["nav"][0]["text"], "文档");
        assert_eq!(json["themeConfig"]["nav"][0]["link"], "/document/");
    }

    #[test]
    fn test_json_sidebar_trees() {
        let (meta, outlines) = fixtures();

        let config = SiteConfig::assemble(&meta, &outlines).unwrap();
        let json = config.to_json_value().unwrap();

        let document = &json["themeConfig"]["sidebar"]["/document/"];
        assert_eq!(document[0], "");
        assert_eq!(document[1]["title"], "入门");
        assert_eq!(document[1]["collapsable"], false);
        assert_eq!(document[1]["children"][0], "hello-world");
        assert_eq!(document[4], "api");

        let blog = &json["themeConfig"]["sidebar"]["/blog/"];
        assert_eq!(blog[0], "");
        assert_eq!(blog[1]["title"], "2019");
    }

    #[test]
    fn test_json_sidebar_key_order_follows_declaration_order() {
        let (meta, outlines) = fixtures();

        let config = SiteConfig::assemble(&meta, &outlines).unwrap();
        let json = config.to_json_value().unwrap();

        // "/document/" is declared first; alphabetical order would flip it.
        let keys: Vec<_> = json["themeConfig"]["sidebar"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["/document/", "/blog/"]);
    }

    #[test]
    fn test_json_skips_absent_options() {
        let meta = SiteMeta::from_toml("title = \"Docs\"").unwrap();
        let config = SiteConfig::assemble(&meta, &OutlineSet::new()).unwrap();

        let json = config.to_json_value().unwrap();

        assert!(json.get("theme").is_none());
        assert!(json.get("head").is_none());
        assert!(json["themeConfig"].get("repo").is_none());
        assert!(json["themeConfig"].get("editLinkText").is_none());
        assert_eq!(json["themeConfig"]["search"], true);
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let (meta, outlines) = fixtures();

        let first = SiteConfig::assemble(&meta, &outlines).unwrap();
        let second = SiteConfig::assemble(&meta, &outlines).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first.to_json_pretty().unwrap(),
            second.to_json_pretty().unwrap()
        );
    }

    #[test]
    fn test_sidebar_iter_in_declaration_order() {
        let (meta, outlines) = fixtures();

        let config = SiteConfig::assemble(&meta, &outlines).unwrap();
        let prefixes: Vec<_> = config
            .theme_config
            .sidebar
            .iter()
            .map(|(p, _)| p)
            .collect();

        assert_eq!(prefixes, vec!["/document/", "/blog/"]);
    }

    #[test]
    fn test_assemble_from_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("site.toml"), SITE_TOML).unwrap();
        std::fs::write(dir.path().join("document.toml"), DOCUMENT_OUTLINE).unwrap();
        std::fs::write(dir.path().join("blog.toml"), BLOG_OUTLINE).unwrap();

        let meta = SiteMeta::load(&dir.path().join("site.toml")).unwrap();
        let mut outlines = OutlineSet::new();
        for name in ["document.toml", "blog.toml"] {
            outlines
                .insert(Outline::load(&dir.path().join(name)).unwrap())
                .unwrap();
        }

        let config = SiteConfig::assemble(&meta, &outlines).unwrap();

        assert_eq!(config.theme_config.sidebar.len(), 2);
        let json = config.to_json_pretty().unwrap();
        assert!(json.contains("\"/document/\""));
        assert!(json.contains("hello-world"));
    }
}
