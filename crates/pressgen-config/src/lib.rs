//! Site metadata loading for Pressgen.
//!
//! Parses `site.toml` with serde and validates the result before it is
//! handed to the assembler in `pressgen-site`. The file carries everything
//! the external generator needs besides the sidebar outlines themselves:
//! page head tags, navbar links, theme options, and the sidebar section
//! declarations that bind a URL path prefix to an outline version.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `title`
//! - `description`
//! - `theme_config.repo`

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Deserialize, Serialize, Serializer};

/// Site metadata parsed from `site.toml`.
///
/// All structure is declarative; loading performs environment expansion and
/// validation but no other computation. Sequence fields keep their authored
/// order, which is significant for the rendered navigation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SiteMeta {
    /// Site title shown in the navbar and the page `<title>`.
    pub title: String,
    /// Site description for the meta description tag.
    #[serde(default)]
    pub description: String,
    /// Head tag descriptors emitted into the page `<head>`.
    #[serde(default)]
    pub head: Vec<HeadTag>,
    /// Whether the generator should register its service worker.
    #[serde(default = "default_true")]
    pub service_worker: bool,
    /// Theme name handed to the generator, if not its default theme.
    #[serde(default)]
    pub theme: Option<String>,
    /// Theme options.
    #[serde(default)]
    pub theme_config: ThemeOptions,
    /// Navbar links, in authored order.
    #[serde(default)]
    pub nav: Vec<NavLink>,
    /// Sidebar section declarations, in authored order.
    #[serde(default)]
    pub sidebar: Vec<SectionDecl>,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

/// A head tag descriptor: tag name plus ordered attribute pairs.
///
/// Serializes in the generator's shape, a two-element array of tag name and
/// attribute object: `["link", {"rel": "icon", "href": "/favicon.ico"}]`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct HeadTag {
    /// Tag name (`link`, `meta`, ...).
    pub tag: String,
    /// Attribute name/value pairs, in authored order.
    #[serde(default)]
    pub attrs: Vec<(String, String)>,
}

impl Serialize for HeadTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.tag)?;
        tuple.serialize_element(&HeadAttrs(&self.attrs))?;
        tuple.end()
    }
}

/// Attribute pairs serialized as an object in authored order.
struct HeadAttrs<'a>(&'a [(String, String)]);

impl Serialize for HeadAttrs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A navbar entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    /// Link text.
    pub text: String,
    /// Link target: a site path prefix or an absolute URL.
    pub link: String,
}

/// Theme options forwarded to the generator under `themeConfig`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeOptions {
    /// Repository slug or URL for the "edit this page" integration.
    pub repo: Option<String>,
    /// Documentation source directory inside the repository.
    pub docs_dir: Option<String>,
    /// Render all page headers in the sidebar, not just the active page's.
    pub display_all_headers: bool,
    /// Show edit links on pages.
    pub edit_links: bool,
    /// Label for edit links.
    pub edit_link_text: Option<String>,
    /// Label for the last-updated timestamp.
    pub last_updated: Option<String>,
    /// Sidebar header nesting depth.
    pub sidebar_depth: Option<u8>,
    /// Enable the built-in search box.
    pub search: bool,
    /// Maximum number of search suggestions.
    pub search_max_suggestions: Option<u16>,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            repo: None,
            docs_dir: None,
            display_all_headers: false,
            edit_links: false,
            edit_link_text: None,
            last_updated: None,
            sidebar_depth: None,
            search: true,
            search_max_suggestions: None,
        }
    }
}

/// A sidebar section declaration binding a path prefix to an outline.
///
/// The label names the section for humans and diagnostics; it does not
/// appear in the assembled output.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SectionDecl {
    /// URL path prefix the section's sidebar applies to (`/document/`).
    pub prefix: String,
    /// Human-readable section label.
    pub label: String,
    /// Version of the outline that provides the section's tree.
    pub outline: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`theme_config.repo`").
        field: String,
        /// Error message (e.g., "${`SITE_REPO`} is not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl SiteMeta {
    /// Load site metadata from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist, cannot be parsed, fails
    /// environment expansion, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let mut meta = Self::from_toml(&content)?;
        meta.config_path = Some(path.to_path_buf());
        Ok(meta)
    }

    /// Parse site metadata from TOML content.
    ///
    /// Environment references are expanded and the result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML, a missing environment variable,
    /// or a validation failure.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut meta: Self = toml::from_str(content)?;
        meta.expand_env_vars()?;
        meta.validate()?;
        Ok(meta)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.title = expand::expand_env(&self.title, "title")?;
        self.description = expand::expand_env(&self.description, "description")?;
        if let Some(ref repo) = self.theme_config.repo {
            self.theme_config.repo = Some(expand::expand_env(repo, "theme_config.repo")?);
        }
        Ok(())
    }

    /// Validate configuration values.
    ///
    /// Called automatically by [`SiteMeta::from_toml`] and
    /// [`SiteMeta::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.title, "title")?;
        self.validate_head()?;
        self.validate_nav()?;
        self.validate_sidebar()?;
        Ok(())
    }

    /// Validate head tag descriptors.
    fn validate_head(&self) -> Result<(), ConfigError> {
        for tag in &self.head {
            require_non_empty(&tag.tag, "head.tag")?;
            for (name, _) in &tag.attrs {
                require_non_empty(name, "head.attrs name")?;
            }
        }
        Ok(())
    }

    /// Validate navbar links.
    fn validate_nav(&self) -> Result<(), ConfigError> {
        for link in &self.nav {
            require_non_empty(&link.text, "nav.text")?;
            require_non_empty(&link.link, "nav.link")?;
        }
        Ok(())
    }

    /// Validate sidebar section declarations.
    ///
    /// Prefixes must be `/`-delimited (the generator matches them textually
    /// against page paths) and unique across the file.
    fn validate_sidebar(&self) -> Result<(), ConfigError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for decl in &self.sidebar {
            require_non_empty(&decl.prefix, "sidebar.prefix")?;
            if !decl.prefix.starts_with('/') || !decl.prefix.ends_with('/') {
                return Err(ConfigError::Validation(format!(
                    "sidebar prefix {:?} must start and end with '/'",
                    decl.prefix
                )));
            }
            require_non_empty(&decl.label, "sidebar.label")?;
            require_non_empty(&decl.outline, "sidebar.outline")?;
            if !seen.insert(decl.prefix.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate sidebar prefix: {}",
                    decl.prefix
                )));
            }
        }
        Ok(())
    }
}
