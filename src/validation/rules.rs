//! Heuristic rule lists consulted by the validators
//!
//! Every list defaults to the built-in constants and can be extended from
//! the `rules` section of the configuration file.

use serde::{Deserialize, Serialize};

/// Data-driven inputs to the anti-gibberish and anti-spam checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Substrings that mark a username as a keyboard walk
    pub keyboard_walks: Vec<String>,
    /// Substrings a username may not contain
    pub reserved_words: Vec<String>,
    /// Passwords rejected by case-insensitive exact match
    pub weak_passwords: Vec<String>,
    /// Substrings that mark an email as disposable or a test address
    pub disposable_patterns: Vec<String>,
    /// Relevance keywords for products that carry none of their own
    pub fallback_keywords: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            keyboard_walks: owned(&[
                "qwerty", "asdfgh", "zxcvbn", "123456", "abcdef", "qwertz", "asdfg", "yxcvb",
                "mnbvc",
            ]),
            reserved_words: owned(&[
                "test", "admin", "user", "demo", "sample", "guest", "temp", "null", "void", "root",
            ]),
            weak_passwords: owned(&[
                "123456",
                "password",
                "qwerty",
                "admin123",
                "abc123",
                "000000",
                "letmein",
                "welcome",
                "123456789",
            ]),
            disposable_patterns: owned(&["test", "fake", "dummy", "spam", "temp", "throwaway"]),
            fallback_keywords: owned(&["broken", "not working", "issue", "problem"]),
        }
    }
}

impl ValidationRules {
    /// Adds entries from `other` that are not already present
    pub fn extend_from(&mut self, other: &Self) {
        fn merge(into: &mut Vec<String>, from: &[String]) {
            for item in from {
                let item = item.to_lowercase();
                if !into.contains(&item) {
                    into.push(item);
                }
            }
        }
        merge(&mut self.keyboard_walks, &other.keyboard_walks);
        merge(&mut self.reserved_words, &other.reserved_words);
        merge(&mut self.weak_passwords, &other.weak_passwords);
        merge(&mut self.disposable_patterns, &other.disposable_patterns);
        merge(&mut self.fallback_keywords, &other.fallback_keywords);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_from_deduplicates() {
        let mut rules = ValidationRules::default();
        let extra = ValidationRules {
            keyboard_walks: vec!["QWERTY".into(), "poiuy".into()],
            reserved_words: vec![],
            weak_passwords: vec!["hunter2".into()],
            disposable_patterns: vec![],
            fallback_keywords: vec![],
        };
        let walks_before = rules.keyboard_walks.len();
        rules.extend_from(&extra);
        assert_eq!(rules.keyboard_walks.len(), walks_before + 1);
        assert!(rules.weak_passwords.contains(&"hunter2".to_string()));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let rules: ValidationRules =
            serde_json::from_str(r#"{"reserved_words": ["staff"]}"#).unwrap();
        assert_eq!(rules.reserved_words, vec!["staff".to_string()]);
        assert_eq!(rules.weak_passwords, ValidationRules::default().weak_passwords);
    }
}
