//! Pure, deterministic input validators
//!
//! Each validator checks its rules in a fixed order and reports only the
//! first one that fails. None of them perform I/O; the catalog and the
//! heuristic rule lists are passed in explicitly.

mod account;
mod contact;
mod date;
mod description;
mod product;
mod rules;
mod text;

pub use account::{validate_password, validate_username};
pub use contact::{validate_email, validate_name};
pub use date::{validate_purchase_date, validate_purchase_date_on};
pub use description::validate_description;
pub use product::{ProductMatch, validate_product};
pub use rules::ValidationRules;

use crate::catalog::Catalog;
use crate::error::{IntakeError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Input field a validation failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Product,
    PurchaseDate,
    Description,
    Username,
    Password,
    Priority,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Product => "product",
            Self::PurchaseDate => "purchase_date",
            Self::Description => "description",
            Self::Username => "username",
            Self::Password => "password",
            Self::Priority => "priority",
        })
    }
}

/// Why a field was rejected; `Display` is the customer-facing message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    // Username
    #[error("Username must be 3-20 characters")]
    UsernameLength,
    #[error("Username must contain at least one letter")]
    UsernameNeedsLetter,
    #[error("Only letters, digits and underscore allowed")]
    UsernameCharset,
    #[error("Cannot have 3 identical characters in a row")]
    RepeatedCharacters,
    #[error("Username too predictable (keyboard pattern detected)")]
    KeyboardPattern,
    #[error("Username not allowed (contains reserved word: {0})")]
    ReservedWord(String),
    #[error("Username must contain at least 2 vowels")]
    UsernameTooFewVowels,
    #[error("Username '{0}' already exists")]
    UsernameTaken(String),

    // Password
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Password must contain at least one letter")]
    PasswordNeedsLetter,
    #[error("Password must contain at least one number")]
    PasswordNeedsDigit,
    #[error("Password cannot contain spaces")]
    PasswordHasSpace,
    #[error("Password is too common and weak")]
    WeakPassword,

    // Product
    #[error("Product name is required")]
    ProductRequired,
    #[error("Product name too short (minimum 3 characters)")]
    ProductTooShort,
    #[error("Product name too long (maximum 50 characters)")]
    ProductTooLong,
    #[error("Unknown product '{input}'. Did you mean: {}?", .suggestions.join(", "))]
    UnknownProduct {
        input: String,
        suggestions: Vec<String>,
    },
    #[error("Unknown product '{input}'. Valid products include: {}, etc.", .examples.join(", "))]
    UnknownProductExamples { input: String, examples: Vec<String> },

    // Purchase date
    #[error("Purchase date is required")]
    DateRequired,
    #[error("Invalid date format. Please use YYYY-MM-DD (e.g., 2024-12-31)")]
    DateFormat,
    #[error("Purchase date too old (year {0}). Products must be purchased after 1990.")]
    DateBefore1990(i32),
    #[error("Purchase date cannot be in the future ({0})")]
    DateInFuture(NaiveDate),
    #[error(
        "Purchase date too old ({0}). We only support products purchased within the last 10 years."
    )]
    DateTooOld(NaiveDate),

    // Description
    #[error("Issue description is required")]
    DescriptionRequired,
    #[error("Description too short (minimum 10 characters). Please provide details about your issue.")]
    DescriptionTooShort,
    #[error("Description too long (maximum 500 characters). Please be concise.")]
    DescriptionTooLong,
    #[error("Description too brief. Please use at least 3 words to describe your issue.")]
    DescriptionTooBrief,
    #[error("Description appears invalid. Please write a proper description of your issue.")]
    DescriptionTooFewVowels,
    #[error("Description contains gibberish. Please write clearly about your actual issue.")]
    Gibberish,
    #[error("Description contains too many special characters. Please write clearly.")]
    TooManySpecialCharacters,
    #[error("Description contains excessive repeated characters. Please write naturally.")]
    ExcessiveRepeats,
    #[error(
        "Description doesn't seem related to {display_name}. Please describe the actual issue with your {display_name} (e.g., mention: {}, etc.)",
        .keywords.join(", ")
    )]
    Irrelevant {
        display_name: String,
        keywords: Vec<String>,
    },

    // Name
    #[error("Name is required")]
    NameRequired,
    #[error("Name too short (minimum 2 characters)")]
    NameTooShort,
    #[error("Name too long (maximum 100 characters)")]
    NameTooLong,
    #[error("Name must contain at least one letter")]
    NameNeedsLetter,

    // Email
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email format (e.g., user@example.com)")]
    EmailFormat,
    #[error("Email too long (maximum 100 characters)")]
    EmailTooLong,
    #[error("Email username appears invalid (please use a real email address)")]
    EmailLocalPart,
    #[error("Email appears invalid (repeated characters)")]
    EmailRepeats,
    #[error("Email domain appears invalid (please use a real email service)")]
    EmailDomain,
    #[error("Email appears to be a test/fake address. Please use your real email.")]
    DisposableEmail,

    // Priority
    #[error("Invalid priority '{0}' (expected Low, Medium, High or Critical)")]
    InvalidPriority(String),
}

/// Raw customer submission as received from the front end
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionForm {
    pub name: String,
    pub email: String,
    pub product: String,
    pub purchase_date: String,
    pub description: String,
}

/// A submission that passed every validator, with normalized fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub name: String,
    /// Trimmed and lowercased
    pub email: String,
    /// Catalog key
    pub product: String,
    pub purchase_date: NaiveDate,
    /// Trimmed, commas replaced with semicolons
    pub description: String,
    /// Set when the product name was auto-corrected
    pub correction_note: Option<String>,
}

/// Runs every submission validator in order: name, email, product, date, description
pub fn validate_submission(
    form: &SubmissionForm,
    catalog: &Catalog,
    rules: &ValidationRules,
    today: NaiveDate,
) -> Result<ValidSubmission> {
    let wrap = |field: Field| move |reason: Reason| IntakeError::validation(field, reason);

    validate_name(&form.name).map_err(wrap(Field::Name))?;
    validate_email(&form.email, rules).map_err(wrap(Field::Email))?;
    let product = validate_product(&form.product, catalog).map_err(wrap(Field::Product))?;
    let purchase_date =
        validate_purchase_date_on(&form.purchase_date, today).map_err(wrap(Field::PurchaseDate))?;
    validate_description(&form.description, Some(product.key()), catalog, rules)
        .map_err(wrap(Field::Description))?;

    Ok(ValidSubmission {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_lowercase(),
        correction_note: product.correction_note(&form.product),
        product: product.key().to_string(),
        purchase_date,
        description: form.description.trim().replace(',', ";"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn form() -> SubmissionForm {
        SubmissionForm {
            name: "  Jane Doe ".into(),
            email: " Jane.Doe@Example.com".into(),
            product: "Laptop".into(),
            purchase_date: "15/03/2024".into(),
            description: "My laptop battery dies fast, even when idle".into(),
        }
    }

    #[test]
    fn test_valid_submission_is_normalized() {
        let valid =
            validate_submission(&form(), &Catalog::builtin(), &ValidationRules::default(), today())
                .unwrap();
        assert_eq!(valid.name, "Jane Doe");
        assert_eq!(valid.email, "jane.doe@example.com");
        assert_eq!(valid.product, "laptop");
        assert_eq!(valid.purchase_date.to_string(), "2024-03-15");
        assert_eq!(valid.description, "My laptop battery dies fast; even when idle");
        assert!(valid.correction_note.is_none());
    }

    #[test]
    fn test_first_failing_field_is_reported() {
        let mut bad = form();
        bad.email = "not-an-email".into();
        bad.product = "zz".into();
        let err =
            validate_submission(&bad, &Catalog::builtin(), &ValidationRules::default(), today())
                .unwrap_err();
        assert!(matches!(
            err,
            IntakeError::Validation {
                field: Field::Email,
                reason: Reason::EmailFormat
            }
        ));
    }

    #[test]
    fn test_correction_note_is_surfaced() {
        let mut typo = form();
        typo.product = "lpatop".into();
        let valid =
            validate_submission(&typo, &Catalog::builtin(), &ValidationRules::default(), today())
                .unwrap();
        assert_eq!(valid.product, "laptop");
        assert_eq!(
            valid.correction_note.as_deref(),
            Some(" (auto-corrected from 'lpatop')")
        );
    }
}
