//! Application configuration
//!
//! Values are layered, later sources overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. a configuration file: the `--config` path if given, otherwise
//!    `config.{toml,yaml,json}` in the platform config directory
//! 3. `INTAKE_*` environment variables, with `__` between nested keys
//!    (`INTAKE_LOCK_TIMEOUT_MS`, `INTAKE_DUPLICATE_SCOPE`)

use crate::error::Result;
use crate::storage::DuplicateScope;
use crate::validation::ValidationRules;
use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const ENV_PREFIX: &str = "INTAKE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the partition files
    pub data_dir: PathBuf,
    /// Product catalog (JSON or YAML); the built-in list when unset
    pub catalog_path: Option<PathBuf>,
    pub resolve_cooldown_secs: u64,
    pub lock_timeout_ms: u64,
    pub duplicate_scope: DuplicateScope,
    /// Extra heuristic entries, merged into the built-in lists
    pub rules: ValidationRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            catalog_path: None,
            resolve_cooldown_secs: 60,
            lock_timeout_ms: 5_000,
            duplicate_scope: DuplicateScope::default(),
            rules: ValidationRules::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from defaults, file and environment
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        match explicit {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(dirs) = ProjectDirs::from("", "", "ticket-intake") {
                    let base = dirs.config_dir().join("config");
                    builder = builder
                        .add_source(File::with_name(&base.to_string_lossy()).required(false));
                }
            }
        }

        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    #[must_use]
    pub const fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    #[must_use]
    pub const fn resolve_cooldown(&self) -> Duration {
        Duration::from_secs(self.resolve_cooldown_secs)
    }

    /// Built-in rule lists extended with the configured entries
    #[must_use]
    pub fn effective_rules(&self) -> ValidationRules {
        let mut rules = ValidationRules::default();
        rules.extend_from(&self.rules);
        rules
    }
}
