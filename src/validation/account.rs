//! Account credential validators (username and password)

use super::rules::ValidationRules;
use super::text::{count_vowels, has_ascii_letter, longest_run};
use super::Reason;

/// Checks a customer username against the syntactic and heuristic rules
///
/// Rules run in order: length, letter present, charset, repeated characters,
/// keyboard walks, reserved words, then the vowel minimum for names longer
/// than five characters.
pub fn validate_username(username: &str, rules: &ValidationRules) -> Result<(), Reason> {
    let len = username.chars().count();
    if !(3..=20).contains(&len) {
        return Err(Reason::UsernameLength);
    }
    if !has_ascii_letter(username) {
        return Err(Reason::UsernameNeedsLetter);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(Reason::UsernameCharset);
    }
    if longest_run(username) >= 3 {
        return Err(Reason::RepeatedCharacters);
    }

    let lower = username.to_lowercase();
    if rules.keyboard_walks.iter().any(|walk| lower.contains(walk.as_str())) {
        return Err(Reason::KeyboardPattern);
    }
    if let Some(word) = rules
        .reserved_words
        .iter()
        .find(|word| lower.contains(word.as_str()))
    {
        return Err(Reason::ReservedWord(word.clone()));
    }
    if len > 5 && count_vowels(&lower) < 2 {
        return Err(Reason::UsernameTooFewVowels);
    }
    Ok(())
}

/// Checks a password for minimum strength
pub fn validate_password(password: &str, rules: &ValidationRules) -> Result<(), Reason> {
    if password.chars().count() < 6 {
        return Err(Reason::PasswordTooShort);
    }
    if !has_ascii_letter(password) {
        return Err(Reason::PasswordNeedsLetter);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(Reason::PasswordNeedsDigit);
    }
    if password.contains(' ') {
        return Err(Reason::PasswordHasSpace);
    }
    let lower = password.to_lowercase();
    if rules.weak_passwords.iter().any(|weak| weak.to_lowercase() == lower) {
        return Err(Reason::WeakPassword);
    }
    Ok(())
}
