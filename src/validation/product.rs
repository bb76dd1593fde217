//! Product name validation with catalog-backed fuzzy correction

use super::Reason;
use crate::catalog::Catalog;

/// How a product name was matched against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductMatch {
    /// Input matched a catalog key exactly (after trim and lowercase)
    Exact(String),
    /// Input was within edit distance two of this key
    Corrected(String),
}

impl ProductMatch {
    /// The normalized catalog key
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Exact(key) | Self::Corrected(key) => key,
        }
    }

    /// Note shown to the customer when their input was auto-corrected
    #[must_use]
    pub fn correction_note(&self, original: &str) -> Option<String> {
        match self {
            Self::Exact(_) => None,
            Self::Corrected(_) => Some(format!(" (auto-corrected from '{}')", original.trim())),
        }
    }
}

/// Resolves a free-text product name to a catalog key
///
/// Exact matches win; otherwise the first key within two edits is taken as a
/// correction. Failing both, the error carries up to five similar display
/// names, or five catalog examples when nothing is similar.
pub fn validate_product(input: &str, catalog: &Catalog) -> Result<ProductMatch, Reason> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Reason::ProductRequired);
    }
    let normalized = trimmed.to_lowercase();
    let len = normalized.chars().count();
    if len < 3 {
        return Err(Reason::ProductTooShort);
    }
    if len > 50 {
        return Err(Reason::ProductTooLong);
    }

    if let Some(entry) = catalog.get(&normalized) {
        return Ok(ProductMatch::Exact(entry.key.clone()));
    }
    if let Some(entry) = catalog.correct(&normalized) {
        return Ok(ProductMatch::Corrected(entry.key.clone()));
    }

    let similar = catalog.similar(&normalized);
    if !similar.is_empty() {
        return Err(Reason::UnknownProduct {
            input: trimmed.to_string(),
            suggestions: similar.iter().map(|e| e.display_name.clone()).collect(),
        });
    }
    Err(Reason::UnknownProductExamples {
        input: trimmed.to_string(),
        examples: catalog
            .examples()
            .iter()
            .map(|e| e.display_name.clone())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let catalog = Catalog::builtin();
        assert_eq!(
            validate_product("  Gaming PC ", &catalog),
            Ok(ProductMatch::Exact("gaming pc".into()))
        );
    }

    #[test]
    fn test_typo_is_auto_corrected() {
        let catalog = Catalog::builtin();
        let matched = validate_product("lpatop", &catalog).unwrap();
        assert_eq!(matched, ProductMatch::Corrected("laptop".into()));
        assert_eq!(
            matched.correction_note("lpatop").as_deref(),
            Some(" (auto-corrected from 'lpatop')")
        );
    }

    #[test]
    fn test_length_bounds() {
        let catalog = Catalog::builtin();
        assert_eq!(validate_product("", &catalog), Err(Reason::ProductRequired));
        assert_eq!(validate_product("tv", &catalog), Err(Reason::ProductTooShort));
        assert_eq!(
            validate_product(&"x".repeat(51), &catalog),
            Err(Reason::ProductTooLong)
        );
    }

    #[test]
    fn test_unknown_product_suggestions() {
        let catalog = Catalog::builtin();
        let err = validate_product("headset", &catalog).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown product 'headset'. Did you mean: headphone, headphones?"
        );
    }

    #[test]
    fn test_unknown_product_examples() {
        let catalog = Catalog::builtin();
        let err = validate_product("refrigerator", &catalog).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown product 'refrigerator'. Valid products include: laptop, phone, tablet, monitor, keyboard, etc."
        );
    }
}
