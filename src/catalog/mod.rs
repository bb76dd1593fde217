//! Product catalog
//!
//! An immutable, insertion-ordered mapping from product key to display name
//! and relevance keywords. It is loaded once at startup from a JSON or YAML
//! file shaped like:
//!
//! ```json
//! { "products": { "laptop": { "display_name": "Laptop", "keywords": ["battery", "screen"] } } }
//! ```
//!
//! When no file is configured the built-in product list is used. Order
//! matters: auto-correction picks the first key within edit distance two,
//! and error messages list the first five entries as examples.

mod fuzzy;

pub use fuzzy::levenshtein;

use crate::error::{IntakeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{info, warn};

/// Maximum edit distance accepted as a typo of a catalog key
pub const MAX_CORRECTION_DISTANCE: usize = 2;

/// Maximum number of suggestions or examples surfaced in one message
pub const MAX_SUGGESTIONS: usize = 5;

const BUILTIN_PRODUCTS: &[&str] = &[
    "laptop",
    "desktop",
    "phone",
    "tablet",
    "monitor",
    "keyboard",
    "mouse",
    "headphone",
    "headphones",
    "gaming pc",
    "smartwatch",
    "camera",
    "printer",
    "speaker",
    "speakers",
    "router",
    "webcam",
    "microphone",
    "charger",
    "cable",
    "hard drive",
    "ssd",
    "ram",
    "graphics card",
    "motherboard",
];

/// Examples quoted when the built-in list is in use
const BUILTIN_EXAMPLES: &[&str] = &["laptop", "phone", "tablet", "monitor", "keyboard"];

/// One product the support desk handles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub key: String,
    pub display_name: String,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CatalogEntry {
    /// Entry whose display name is its key and which has no keywords
    #[must_use]
    pub fn bare(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            display_name: key.clone(),
            key,
            keywords: Vec::new(),
            hint: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProductSpec {
    display_name: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    hint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Map<String, Value>,
}

/// Insertion-ordered product catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    builtin: bool,
}

impl Catalog {
    /// The fallback product list, without display names or keywords
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog =
            Self::from_entries(BUILTIN_PRODUCTS.iter().map(|k| CatalogEntry::bare(*k)).collect());
        catalog.builtin = true;
        catalog
    }

    /// Whether this is the built-in list rather than a loaded file
    #[must_use]
    pub const fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Builds a catalog, normalizing keys and keywords to lowercase
    #[must_use]
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|mut entry| {
                entry.key = entry.key.trim().to_lowercase();
                entry.keywords = entry
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                entry
            })
            .collect();
        Self {
            entries,
            builtin: false,
        }
    }

    /// Parses catalog content, detecting JSON or YAML
    pub fn parse(content: &str) -> Result<Self> {
        let trimmed = content.trim();
        let file: CatalogFile = if trimmed.starts_with('{') {
            serde_json::from_str(trimmed)
                .map_err(|e| IntakeError::Catalog(format!("Invalid JSON: {e}")))?
        } else {
            serde_yaml::from_str(trimmed)
                .map_err(|e| IntakeError::Catalog(format!("Invalid YAML: {e}")))?
        };

        if file.products.is_empty() {
            return Err(IntakeError::Catalog("catalog defines no products".to_string()));
        }

        let mut entries = Vec::with_capacity(file.products.len());
        for (key, value) in file.products {
            let spec: ProductSpec = serde_json::from_value(value)
                .map_err(|e| IntakeError::Catalog(format!("Invalid entry '{key}': {e}")))?;
            entries.push(CatalogEntry {
                display_name: spec.display_name.unwrap_or_else(|| key.clone()),
                key,
                keywords: spec.keywords,
                hint: spec.hint,
            });
        }
        Ok(Self::from_entries(entries))
    }

    /// Reads and parses a catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IntakeError::Catalog(format!("Failed to read {}: {e}", path.display()))
        })?;
        let catalog = Self::parse(&content)?;
        info!("Loaded {} products from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Loads the configured catalog, falling back to the built-in list when
    /// no path is configured or the file does not exist
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                warn!(
                    "Catalog file {} not found; using built-in products",
                    path.display()
                );
                Ok(Self::builtin())
            }
            None => Ok(Self::builtin()),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup by normalized key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Display name for a key, or the key itself when unknown
    #[must_use]
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map_or(key, |e| e.display_name.as_str())
    }

    /// First entry within [`MAX_CORRECTION_DISTANCE`] edits of `input`
    #[must_use]
    pub fn correct(&self, input: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| levenshtein(input, &e.key) <= MAX_CORRECTION_DISTANCE)
    }

    /// Entries sharing a three-character prefix overlap with `input`
    #[must_use]
    pub fn similar(&self, input: &str) -> Vec<&CatalogEntry> {
        let input_prefix: String = input.chars().take(3).collect();
        self.entries
            .iter()
            .filter(|e| {
                let key_prefix: String = e.key.chars().take(3).collect();
                e.key.contains(&input_prefix) || input.contains(&key_prefix)
            })
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    /// Entries quoted in generic "valid products include" messages
    ///
    /// A loaded catalog offers its first entries. The built-in list offers a
    /// fixed selection of common devices.
    #[must_use]
    pub fn examples(&self) -> Vec<&CatalogEntry> {
        if self.builtin {
            BUILTIN_EXAMPLES.iter().filter_map(|k| self.get(k)).collect()
        } else {
            self.entries.iter().take(MAX_SUGGESTIONS).collect()
        }
    }

    /// Keywords for relevance checks
    ///
    /// A product from a loaded catalog uses its own keywords, even an empty
    /// list, so only a mention of the product name counts. `fallback` applies
    /// to the built-in list and to unknown products.
    #[must_use]
    pub fn relevance_keywords<'a>(&'a self, key: &str, fallback: &'a [String]) -> &'a [String] {
        match self.get(key) {
            Some(entry) if !self.builtin => &entry.keywords,
            _ => fallback,
        }
    }

    /// Read-only export for client-side mirroring, in catalog order
    #[must_use]
    pub fn export(&self) -> Value {
        let products: Map<String, Value> = self
            .entries
            .iter()
            .map(|e| {
                let mut spec = Map::new();
                spec.insert("display_name".into(), Value::from(e.display_name.clone()));
                spec.insert("keywords".into(), Value::from(e.keywords.clone()));
                if let Some(hint) = &e.hint {
                    spec.insert("hint".into(), Value::from(hint.clone()));
                }
                (e.key.clone(), Value::Object(spec))
            })
            .collect();
        serde_json::json!({ "products": products })
    }
}
