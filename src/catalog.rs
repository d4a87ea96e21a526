//! Tool catalog: the list of tools the search box filters.
//!
//! The catalog is a TOML file of `[[tools]]` tables. A copy is embedded in
//! the binary and used when no catalog file is configured.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{fold, search};

const BUILTIN_CATALOG: &str = include_str!("../assets/tools.toml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("tool #{index} has an empty slug")]
    EmptySlug { index: usize },
    #[error("invalid slug `{0}`: only a-z, 0-9 and '-' are allowed")]
    InvalidSlug(String),
    #[error("duplicate slug `{0}`")]
    DuplicateSlug(String),
    #[error("tool `{0}` has an empty title")]
    EmptyTitle(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolEntry {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub path: String,
    pub is_new: bool,
}

impl ToolEntry {
    /// Language of the entry's text: "ja" if the title or description
    /// contain kana or kanji, "en" otherwise.
    pub fn lang(&self) -> &'static str {
        fold::detect_japanese_script(&self.title)
            .or_else(|| fold::detect_japanese_script(&self.description))
            .map(fold::script_to_lang)
            .unwrap_or("en")
    }

    /// Category comparison after normalization, so "げーむ" selects
    /// "ゲーム". The whole name must match.
    pub fn in_category(&self, name: &str) -> bool {
        search::normalize_target(&self.category) == search::normalize_target(name)
    }

    /// Text fields the search box looks at.
    pub fn search_fields(&self) -> impl Iterator<Item = &str> {
        [
            self.title.as_str(),
            self.description.as_str(),
            self.category.as_str(),
        ]
        .into_iter()
        .chain(self.tags.iter().map(String::as_str))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    tools: Vec<ToolEntryFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ToolEntryFile {
    slug: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    tags: Vec<String>,
    path: Option<String>,
    #[serde(default)]
    is_new: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tools: Vec<ToolEntry>,
}

impl Catalog {
    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&raw)?;
        debug!(path = %path.display(), tools = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        let mut seen = HashSet::new();
        let mut tools = Vec::with_capacity(file.tools.len());

        for (index, entry) in file.tools.into_iter().enumerate() {
            let slug = entry.slug.trim().to_string();
            if slug.is_empty() {
                return Err(CatalogError::EmptySlug { index });
            }
            if !is_valid_slug(&slug) {
                return Err(CatalogError::InvalidSlug(slug));
            }
            if !seen.insert(slug.clone()) {
                return Err(CatalogError::DuplicateSlug(slug));
            }
            let title = entry.title.trim().to_string();
            if title.is_empty() {
                return Err(CatalogError::EmptyTitle(slug));
            }

            let path = entry
                .path
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| format!("/tools/{}", slug));

            tools.push(ToolEntry {
                slug,
                title,
                description: entry.description.trim().to_string(),
                category: entry.category.trim().to_string(),
                tags: entry
                    .tags
                    .into_iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect(),
                path,
                is_new: entry.is_new,
            });
        }

        Ok(Self { tools })
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolEntry> {
        self.tools.iter()
    }

    pub fn get(&self, slug: &str) -> Option<&ToolEntry> {
        self.tools.iter().find(|t| t.slug == slug)
    }

    /// Distinct non-empty categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.tools
            .iter()
            .map(|t| t.category.as_str())
            .filter(|c| !c.is_empty() && seen.insert(*c))
            .collect()
    }

    pub fn in_category(&self, name: &str) -> Vec<&ToolEntry> {
        self.tools.iter().filter(|t| t.in_category(name)).collect()
    }

    /// Entries whose title, description, category or tags match `query`.
    /// A blank query returns every entry.
    pub fn search(&self, query: &str) -> Vec<&ToolEntry> {
        let matched = search::filter(&self.tools, query, ToolEntry::search_fields);
        debug!(query, matched = matched.len(), total = self.len(), "catalog search");
        matched
    }
}

fn is_valid_slug(slug: &str) -> bool {
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
