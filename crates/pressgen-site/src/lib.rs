//! Sidebar outlines and site configuration assembly for Pressgen.
//!
//! This crate provides:
//! - The navigation data model: [`NavTree`], [`NavGroup`], [`PageRef`]
//! - Versioned outline loading: [`Outline`], [`OutlineSet`]
//! - Assembly of the generator-facing [`SiteConfig`]
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use pressgen_config::SiteMeta;
//! use pressgen_site::{Outline, OutlineSet, SiteConfig};
//!
//! let meta = SiteMeta::from_toml(r#"
//! title = "Tokio中文"
//!
//! [[sidebar]]
//! prefix = "/document/"
//! label = "文档"
//! outline = "2019.2"
//! "#)?;
//!
//! let mut outlines = OutlineSet::new();
//! outlines.insert(Outline::from_toml(r#"
//! version = "2019.2"
//!
//! [[entry]]
//! title = "入门"
//! collapsable = false
//! pages = ["hello-world"]
//! "#)?)?;
//!
//! let config = SiteConfig::assemble(&meta, &outlines)?;
//! let json = config.to_json_pretty()?;
//! assert!(json.contains("/document/"));
//! # Ok(())
//! # }
//! ```

pub(crate) mod nav;
pub(crate) mod outline;
pub(crate) mod site;

pub use nav::{NavEntry, NavGroup, NavTree, PageRef};
pub use outline::{Outline, OutlineError, OutlineSet};
pub use site::{AssembleError, SiteConfig, Sidebar, ThemeConfig};
