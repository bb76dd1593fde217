//! Free-text issue description checks

use super::rules::ValidationRules;
use super::text::{consonant_triples, count_vowels, longest_run};
use super::Reason;
use crate::catalog::{Catalog, MAX_SUGGESTIONS};

const ALLOWED_PUNCTUATION: &str = " .,!?'-";

fn is_suspicious(word: &str) -> bool {
    let word = word.to_lowercase();
    let word = word.trim_matches(|c| matches!(c, '.' | ',' | '!' | '?'));
    let len = word.chars().count();
    // more all-consonant windows than a third of the word
    len >= 4 && consonant_triples(word) * 3 > len
}

/// Checks that a description reads like a real complaint about `product`
///
/// Rules in order: length 10-500, at least three words, at least three
/// vowels, gibberish words, special-character ratio, long character runs,
/// and finally relevance to the product when one is given.
pub fn validate_description(
    text: &str,
    product: Option<&str>,
    catalog: &Catalog,
    rules: &ValidationRules,
) -> Result<(), Reason> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Reason::DescriptionRequired);
    }
    let len = text.chars().count();
    if len < 10 {
        return Err(Reason::DescriptionTooShort);
    }
    if len > 500 {
        return Err(Reason::DescriptionTooLong);
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 3 {
        return Err(Reason::DescriptionTooBrief);
    }
    if count_vowels(text) < 3 {
        return Err(Reason::DescriptionTooFewVowels);
    }

    let suspicious = words.iter().filter(|w| is_suspicious(w)).count();
    if words.len() >= 2 && suspicious * 2 > words.len() {
        return Err(Reason::Gibberish);
    }

    let special = text
        .chars()
        .filter(|c| !c.is_alphanumeric() && !ALLOWED_PUNCTUATION.contains(*c))
        .count();
    if special * 10 > len * 3 {
        return Err(Reason::TooManySpecialCharacters);
    }

    if longest_run(text) >= 6 {
        return Err(Reason::ExcessiveRepeats);
    }

    if let Some(product) = product {
        let product = product.to_lowercase();
        let lower = text.to_lowercase();
        let keywords = catalog.relevance_keywords(&product, &rules.fallback_keywords);
        let relevant = lower.contains(&product) || keywords.iter().any(|k| lower.contains(k.as_str()));
        if !relevant {
            return Err(Reason::Irrelevant {
                display_name: catalog.display_name(&product).to_string(),
                keywords: keywords.iter().take(MAX_SUGGESTIONS).cloned().collect(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn catalog() -> Catalog {
        Catalog::from_entries(vec![CatalogEntry {
            key: "laptop".into(),
            display_name: "Laptop".into(),
            keywords: vec!["battery".into(), "screen".into(), "hinge".into()],
            hint: None,
        }])
    }

    fn check(text: &str, product: Option<&str>) -> Result<(), Reason> {
        validate_description(text, product, &catalog(), &ValidationRules::default())
    }

    #[test]
    fn test_relevant_description_passes() {
        assert!(check("my laptop battery dies fast", Some("laptop")).is_ok());
        assert!(check("The screen flickers after an hour", Some("laptop")).is_ok());
    }

    #[test]
    fn test_irrelevant_description_rejected() {
        let err = check("xyz unrelated gadget noise", Some("laptop")).unwrap_err();
        assert_eq!(
            err,
            Reason::Irrelevant {
                display_name: "Laptop".into(),
                keywords: vec!["battery".into(), "screen".into(), "hinge".into()],
            }
        );
        assert!(err.to_string().contains("e.g., mention: battery, screen, hinge"));
    }

    #[test]
    fn test_product_without_keywords_needs_its_name() {
        let catalog = Catalog::from_entries(vec![CatalogEntry::bare("router")]);
        let rules = ValidationRules::default();
        assert!(
            validate_description("The router drops wifi every hour", Some("router"), &catalog, &rules)
                .is_ok()
        );
        let err = validate_description("It is broken and keeps failing", Some("router"), &catalog, &rules)
            .unwrap_err();
        assert_eq!(
            err,
            Reason::Irrelevant {
                display_name: "router".into(),
                keywords: Vec::new(),
            }
        );
    }

    #[test]
    fn test_builtin_catalog_uses_fallback_keywords() {
        let catalog = Catalog::builtin();
        let rules = ValidationRules::default();
        assert!(
            validate_description("It is broken and keeps failing", Some("router"), &catalog, &rules)
                .is_ok()
        );
    }

    #[test]
    fn test_relevance_skipped_without_product() {
        assert!(check("xyz unrelated gadget noise", None).is_ok());
    }

    #[test]
    fn test_structure_rules() {
        assert_eq!(check("  ", None), Err(Reason::DescriptionRequired));
        assert_eq!(check("too short", None), Err(Reason::DescriptionTooShort));
        assert_eq!(check(&"word ".repeat(101), None), Err(Reason::DescriptionTooLong));
        assert_eq!(check("brokenscreen again", None), Err(Reason::DescriptionTooBrief));
        assert_eq!(check("brr hmm pfft shh", None), Err(Reason::DescriptionTooFewVowels));
    }

    #[test]
    fn test_gibberish_rejected() {
        assert_eq!(
            check("jhghbgjmhtb kjhgfdsw qwrtpsdf about it", None),
            Err(Reason::Gibberish)
        );
    }

    #[test]
    fn test_spam_signals_rejected() {
        assert_eq!(
            check("please help me %%%%%&&&&&***** now", None),
            Err(Reason::TooManySpecialCharacters)
        );
        assert_eq!(
            check("it is sooooooo slow today", None),
            Err(Reason::ExcessiveRepeats)
        );
    }
}
