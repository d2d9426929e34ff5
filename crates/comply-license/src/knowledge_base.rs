//! License knowledge base
//!
//! Resolves license ids to display names and full texts. The directory
//! backed implementation reads its index eagerly and each license text on
//! first request, memoizing the result for the lifetime of the value.
//!
//! Directory layout:
//!
//! ```text
//! <root>/licenses.yaml      index of ids, names and aliases
//! <root>/texts/<id>.txt     license texts, read lazily
//! ```

use crate::error::{LicenseError, LicenseResult};
use crate::expression::{License, LicenseExpression};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of the knowledge base index
pub const INDEX_FILE: &str = "licenses.yaml";

/// Directory holding license texts
pub const TEXTS_DIR: &str = "texts";

/// Lookup of license metadata by id
pub trait LicenseKnowledgeBase: Send + Sync {
    /// Full license text for `id`
    fn text_for_id(&self, id: &str) -> Option<Arc<str>>;

    /// Display name for `id`
    fn name_for_id(&self, id: &str) -> Option<String>;

    /// Canonical id for an alias (ids map to themselves)
    fn id_for_alias(&self, alias: &str) -> Option<String>;
}

/// One index entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LicenseEntry {
    /// Canonical license id
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Alternative spellings of the id
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct IndexDocument {
    #[serde(default)]
    licenses: Vec<LicenseEntry>,
}

#[derive(Debug, Default)]
struct Index {
    names: HashMap<String, String>,
    aliases: HashMap<String, String>,
}

impl Index {
    fn from_entries(entries: impl IntoIterator<Item = LicenseEntry>) -> Self {
        let mut index = Self::default();
        for entry in entries {
            index.aliases.insert(entry.id.clone(), entry.id.clone());
            for alias in entry.aliases {
                index.aliases.insert(alias, entry.id.clone());
            }
            if let Some(name) = entry.name {
                index.names.insert(entry.id, name);
            }
        }
        index
    }
}

/// Knowledge base backed by a directory on disk
#[derive(Debug)]
pub struct DirectoryKnowledgeBase {
    root: PathBuf,
    index: Index,
    texts: DashMap<String, Option<Arc<str>>>,
}

impl DirectoryKnowledgeBase {
    /// Open knowledge base rooted at `root`
    ///
    /// # Errors
    /// - [`LicenseError::Io`] if the index cannot be read
    /// - [`LicenseError::KnowledgeBase`] if the index is not valid YAML
    pub fn open(root: impl Into<PathBuf>) -> LicenseResult<Self> {
        let root = root.into();
        let index_path = root.join(INDEX_FILE);
        let raw = std::fs::read_to_string(&index_path)
            .map_err(|e| LicenseError::io_error(&index_path, e))?;
        let document: IndexDocument = serde_yaml::from_str(&raw)
            .map_err(|e| LicenseError::knowledge_base(&index_path, e.to_string()))?;

        tracing::info!(
            "loaded license knowledge base from {} ({} licenses)",
            root.display(),
            document.licenses.len()
        );

        Ok(Self {
            root,
            index: Index::from_entries(document.licenses),
            texts: DashMap::new(),
        })
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of ids whose text lookup has been memoized
    #[inline]
    #[must_use]
    pub fn cached_text_count(&self) -> usize {
        self.texts.len()
    }

    fn read_text(&self, id: &str) -> Option<Arc<str>> {
        let path = self.root.join(TEXTS_DIR).join(format!("{id}.txt"));
        tracing::debug!("license text cache miss for {}", id);
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(Arc::from(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("failed to read license text {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl LicenseKnowledgeBase for DirectoryKnowledgeBase {
    fn text_for_id(&self, id: &str) -> Option<Arc<str>> {
        if let Some(cached) = self.texts.get(id) {
            return cached.value().clone();
        }
        self.texts
            .entry(id.to_string())
            .or_insert_with(|| self.read_text(id))
            .value()
            .clone()
    }

    fn name_for_id(&self, id: &str) -> Option<String> {
        self.index.names.get(id).cloned()
    }

    fn id_for_alias(&self, alias: &str) -> Option<String> {
        self.index.aliases.get(alias).cloned()
    }
}

/// Knowledge base held entirely in memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryKnowledgeBase {
    names: HashMap<String, String>,
    texts: HashMap<String, Arc<str>>,
    aliases: HashMap<String, String>,
}

impl InMemoryKnowledgeBase {
    /// Create empty knowledge base
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a license with optional name and text
    #[must_use]
    pub fn with_license(
        mut self,
        id: impl Into<String>,
        name: Option<&str>,
        text: Option<&str>,
    ) -> Self {
        let id = id.into();
        self.aliases.insert(id.clone(), id.clone());
        if let Some(name) = name {
            self.names.insert(id.clone(), name.to_string());
        }
        if let Some(text) = text {
            self.texts.insert(id, Arc::from(text));
        }
        self
    }

    /// Register an alias for an id
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, id: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), id.into());
        self
    }
}

impl LicenseKnowledgeBase for InMemoryKnowledgeBase {
    fn text_for_id(&self, id: &str) -> Option<Arc<str>> {
        self.texts.get(id).cloned()
    }

    fn name_for_id(&self, id: &str) -> Option<String> {
        self.names.get(id).cloned()
    }

    fn id_for_alias(&self, alias: &str) -> Option<String> {
        self.aliases.get(alias).cloned()
    }
}

/// Fill missing names and texts of every leaf from `kb`
///
/// Aliases are resolved to canonical ids. The structure of the expression
/// is never changed.
#[must_use]
pub fn enrich(expr: LicenseExpression, kb: &dyn LicenseKnowledgeBase) -> LicenseExpression {
    expr.map_licenses(&mut |license: License| enrich_license(license, kb))
}

fn enrich_license(license: License, kb: &dyn LicenseKnowledgeBase) -> License {
    let id = kb
        .id_for_alias(license.id())
        .unwrap_or_else(|| license.id().to_string());

    let mut enriched = License::new(id.clone());
    match license.common_name() {
        Some(name) => enriched = enriched.with_common_name(name),
        None => {
            if let Some(name) = kb.name_for_id(&id) {
                enriched = enriched.with_common_name(name);
            }
        }
    }
    match license.text() {
        Some(text) => enriched = enriched.with_text(text),
        None => {
            if let Some(text) = kb.text_for_id(&id) {
                enriched = enriched.with_text(&*text);
            } else {
                tracing::debug!("no license text known for {}", id);
            }
        }
    }
    enriched
}
