//! Administrative identities
//!
//! Authentication itself is a seam: the lifecycle manager only needs an
//! [`AdminDirectory`] that turns credentials into an [`AdminIdentity`].
//! [`CsvAdminDirectory`] is the flat-file implementation backed by
//! `admins.csv` with SHA-256 password hashes.

use crate::error::{IntakeError, Result};
use crate::validation::{Field, Reason, ValidationRules, validate_password};
use chrono::Local;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ADMINS_FILE: &str = "admins.csv";

const HEADER: [&str; 5] = ["username", "password_hash", "full_name", "role", "created_at"];

/// An authenticated administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub username: String,
    pub full_name: String,
    pub role: String,
}

/// Credential lookup for administrators
#[cfg_attr(test, mockall::automock)]
pub trait AdminDirectory: Send + Sync {
    /// The identity for these credentials, or `None` if they do not match
    fn verify(&self, username: &str, password: &str) -> Result<Option<AdminIdentity>>;
}

/// Lowercase hex SHA-256 of a password
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[derive(Debug, Clone)]
struct AdminRecord {
    identity: AdminIdentity,
    password_hash: String,
}

/// `admins.csv` with columns `[username, password_hash, full_name, role, created_at]`
#[derive(Debug, Clone)]
pub struct CsvAdminDirectory {
    path: PathBuf,
}

impl CsvAdminDirectory {
    /// Directory stored in `admins.csv` under `data_dir`
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(ADMINS_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn records(&self) -> Result<Vec<AdminRecord>> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = match row {
                Ok(row) if row.len() >= 4 => row,
                Ok(_) => continue,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    debug!("Skipping admin row: {e}");
                    continue;
                }
            };
            records.push(AdminRecord {
                identity: AdminIdentity {
                    username: row[0].trim().to_string(),
                    full_name: row[2].to_string(),
                    role: row[3].to_string(),
                },
                password_hash: row[1].trim().to_lowercase(),
            });
        }
        Ok(records)
    }

    /// All administrators, without their hashes
    pub fn list(&self) -> Result<Vec<AdminIdentity>> {
        Ok(self.records()?.into_iter().map(|r| r.identity).collect())
    }

    /// Creates an administrator account
    pub fn add(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
        role: &str,
        rules: &ValidationRules,
    ) -> Result<AdminIdentity> {
        let username = username.trim();
        if username.is_empty()
            || !username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(IntakeError::validation(Field::Username, Reason::UsernameCharset));
        }
        validate_password(password, rules)
            .map_err(|reason| IntakeError::validation(Field::Password, reason))?;

        if self
            .records()?
            .iter()
            .any(|r| r.identity.username == username)
        {
            return Err(IntakeError::validation(
                Field::Username,
                Reason::UsernameTaken(username.to_string()),
            ));
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        if is_new {
            writer.write_record(HEADER)?;
        }
        let created_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        writer.write_record([
            username,
            hash_password(password).as_str(),
            full_name,
            role,
            created_at.as_str(),
        ])?;
        let bytes = writer
            .into_inner()
            .map_err(|e| IntakeError::StoreUnavailable(e.to_string()))?;
        file.write_all(&bytes)?;

        info!("Admin account '{username}' created");
        Ok(AdminIdentity {
            username: username.to_string(),
            full_name: full_name.to_string(),
            role: role.to_string(),
        })
    }
}

impl AdminDirectory for CsvAdminDirectory {
    fn verify(&self, username: &str, password: &str) -> Result<Option<AdminIdentity>> {
        let hash = hash_password(password);
        Ok(self
            .records()?
            .into_iter()
            .find(|r| r.identity.username == username.trim() && r.password_hash == hash)
            .map(|r| r.identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hash_password_is_sha256_hex() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_add_then_verify() {
        let dir = TempDir::new().unwrap();
        let directory = CsvAdminDirectory::new(dir.path());
        let rules = ValidationRules::default();

        directory
            .add("manager1", "Manager@123", "Morgan Lee", "Manager", &rules)
            .unwrap();
        directory
            .add("support1", "Support@123", "Sam Park", "Support Agent", &rules)
            .unwrap();

        let identity = directory.verify("support1", "Support@123").unwrap().unwrap();
        assert_eq!(identity.full_name, "Sam Park");
        assert_eq!(identity.role, "Support Agent");
        assert!(directory.verify("support1", "wrong1").unwrap().is_none());
        assert!(directory.verify("nobody", "Support@123").unwrap().is_none());

        let content = fs::read_to_string(directory.path()).unwrap();
        assert!(content.starts_with("username,password_hash,full_name,role,created_at\n"));
        assert_eq!(directory.list().unwrap().len(), 2);
    }

    #[test]
    fn test_add_rejects_duplicates_and_weak_passwords() {
        let dir = TempDir::new().unwrap();
        let directory = CsvAdminDirectory::new(dir.path());
        let rules = ValidationRules::default();

        directory
            .add("admin", "Admin@DSA2025!", "Ada", "Super Admin", &rules)
            .unwrap();
        assert!(matches!(
            directory.add("admin", "Other@123", "Ada", "Super Admin", &rules),
            Err(IntakeError::Validation {
                field: Field::Username,
                reason: Reason::UsernameTaken(_)
            })
        ));
        assert!(matches!(
            directory.add("second", "password", "Bo", "Manager", &rules),
            Err(IntakeError::Validation {
                field: Field::Password,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_file_verifies_nobody() {
        let dir = TempDir::new().unwrap();
        let directory = CsvAdminDirectory::new(dir.path());
        assert!(directory.verify("admin", "anything1").unwrap().is_none());
    }
}
