use crate::auth::CsvAdminDirectory;
use crate::cli::AdminArgs;
use crate::config::AppConfig;
use crate::core::TicketId;
use crate::error::{IntakeError, Result};
use crate::lifecycle::{LifecycleManager, RequestContext};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resources every command handler works against
pub struct HandlerContext {
    pub config: AppConfig,
    pub manager: LifecycleManager,
    pub directory: CsvAdminDirectory,
}

impl HandlerContext {
    /// Loads configuration and opens the desk in its data directory
    ///
    /// `data_dir` overrides whatever the configuration says.
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = AppConfig::load(config_path)?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        debug!("Using data directory {}", config.data_dir.display());

        let manager = LifecycleManager::from_config(&config)?;
        let directory = CsvAdminDirectory::new(&config.data_dir);
        Ok(Self {
            config,
            manager,
            directory,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Logs an administrator in for the duration of one command
    pub fn login(&self, admin: &AdminArgs) -> Result<RequestContext> {
        self.manager.login(
            &self.directory,
            &admin.user,
            &admin.password,
            admin.origin.as_deref(),
        )
    }

    /// Runs `action` inside a login/logout pair
    ///
    /// The logout entry is written even when `action` fails.
    pub fn with_admin<T>(
        &self,
        admin: &AdminArgs,
        action: impl FnOnce(&RequestContext) -> Result<T>,
    ) -> Result<T> {
        let ctx = self.login(admin)?;
        let result = action(&ctx);
        self.manager.logout(&ctx)?;
        result
    }
}

/// Parses a ticket reference such as `1042` or `#1042`
pub fn parse_ticket_id(reference: &str) -> Result<TicketId> {
    reference
        .parse()
        .map_err(|_| IntakeError::InvalidTicketId(reference.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn admin_args(password: &str) -> AdminArgs {
        AdminArgs {
            user: "manager1".to_string(),
            password: password.to_string(),
            origin: Some("10.0.0.5".to_string()),
        }
    }

    #[test]
    fn test_parse_ticket_id() {
        assert_eq!(parse_ticket_id("#1042").unwrap(), TicketId::new(1042));
        assert!(matches!(
            parse_ticket_id("ticket-7"),
            Err(IntakeError::InvalidTicketId(s)) if s == "ticket-7"
        ));
    }

    #[test]
    fn test_with_admin_records_session() {
        let dir = TempDir::new().unwrap();
        let ctx = HandlerContext::new(None, Some(dir.path().join("data"))).unwrap();
        ctx.directory
            .add("manager1", "Secure2024x", "Morgan Lee", "Manager", ctx.manager.rules())
            .unwrap();

        let args = admin_args("Secure2024x");
        let first = ctx
            .with_admin(&args, |session| ctx.manager.activity_log(session))
            .unwrap();
        assert_eq!(first.len(), 1);

        let second = ctx
            .with_admin(&args, |session| ctx.manager.activity_log(session))
            .unwrap();
        let codes: Vec<&str> = second.iter().map(|e| e.action.code()).collect();
        assert_eq!(codes, ["LOGIN", "LOGOUT", "LOGIN"]);
        assert_eq!(second[0].origin, "10.0.0.5");
        assert_eq!(second[0].actor_name, "Morgan Lee");
    }

    #[test]
    fn test_with_admin_rejects_bad_password() {
        let dir = TempDir::new().unwrap();
        let ctx = HandlerContext::new(None, Some(dir.path().to_path_buf())).unwrap();
        let result = ctx.with_admin(&admin_args("Wrong2024x"), |_| Ok(()));
        assert!(matches!(result, Err(IntakeError::Unauthorized(_))));
    }
}
