//! Customer contact validators (name and email)

use super::rules::ValidationRules;
use super::text::{count_vowels, has_ascii_letter, longest_run};
use super::Reason;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is a valid regex")
});

/// Checks a customer display name
pub fn validate_name(name: &str) -> Result<(), Reason> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Reason::NameRequired);
    }
    let len = name.chars().count();
    if len < 2 {
        return Err(Reason::NameTooShort);
    }
    if len > 100 {
        return Err(Reason::NameTooLong);
    }
    if !has_ascii_letter(name) {
        return Err(Reason::NameNeedsLetter);
    }
    Ok(())
}

/// Checks an email address for syntax and signs of a made-up address
///
/// The address is trimmed and lowercased before any rule runs.
pub fn validate_email(email: &str, rules: &ValidationRules) -> Result<(), Reason> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(Reason::EmailRequired);
    }
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(Reason::EmailFormat);
    }
    if email.chars().count() > 100 {
        return Err(Reason::EmailTooLong);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(Reason::EmailFormat);
    };

    let local_len = local.chars().count();
    if local_len >= 5 && count_vowels(local) < 2 {
        return Err(Reason::EmailLocalPart);
    }
    if local_len >= 4 && longest_run(local) >= 3 {
        return Err(Reason::EmailRepeats);
    }

    let domain_name = domain.split('.').next().unwrap_or_default();
    if domain_name.chars().count() >= 4 && count_vowels(domain_name) == 0 {
        return Err(Reason::EmailDomain);
    }

    if rules
        .disposable_patterns
        .iter()
        .any(|p| local.contains(p.as_str()) || domain.contains(p.as_str()))
    {
        return Err(Reason::DisposableEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(email: &str) -> Result<(), Reason> {
        validate_email(email, &ValidationRules::default())
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name("   "), Err(Reason::NameRequired));
        assert_eq!(validate_name("J"), Err(Reason::NameTooShort));
        assert_eq!(validate_name(&"a".repeat(101)), Err(Reason::NameTooLong));
        assert_eq!(validate_name("42"), Err(Reason::NameNeedsLetter));
        assert!(validate_name(" Li ").is_ok());
    }

    #[test]
    fn test_valid_emails() {
        assert!(check("jane.doe@example.com").is_ok());
        assert!(check("  Ravi@Gmail.COM ").is_ok());
        assert!(check("bo@ibm.org").is_ok());
    }

    #[test]
    fn test_email_rules() {
        assert_eq!(check(""), Err(Reason::EmailRequired));
        assert_eq!(check("jane@example"), Err(Reason::EmailFormat));
        assert_eq!(check("a@b@example.com"), Err(Reason::EmailFormat));
        let long = format!("{}@example.com", "ab".repeat(50));
        assert_eq!(check(&long), Err(Reason::EmailTooLong));
        assert_eq!(check("hnvhb@example.com"), Err(Reason::EmailLocalPart));
        assert_eq!(check("aaaron@example.com"), Err(Reason::EmailRepeats));
        assert_eq!(check("jane@gcgchg.com"), Err(Reason::EmailDomain));
        assert_eq!(check("jane@tempmail.com"), Err(Reason::DisposableEmail));
        assert_eq!(check("fakename@example.com"), Err(Reason::DisposableEmail));
    }

    #[test]
    fn test_short_local_part_skips_heuristics() {
        // under four characters: neither vowel nor repeat checks apply
        assert!(check("xxx@example.com").is_ok());
    }
}
