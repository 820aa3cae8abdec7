use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::password::PasswordPolicy;

/// Shared application state injected into every handler. Built once in main
/// from the loaded configuration; handlers never consult the environment.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
    pub password_policy: PasswordPolicy,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let password_policy = PasswordPolicy::from_config(&config.security);
        Self {
            config: Arc::new(config),
            pool,
            password_policy,
        }
    }
}
