//! Process configuration from the environment (`WORKSPHERE_*`, `.env`).

use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "WORKSPHERE_";

const BCRYPT_COST_RANGE: core::ops::RangeInclusive<u32> = 4..=31;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Env(#[from] envy::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    #[serde(default = "default_employee_password")]
    pub default_employee_password: String,

    #[serde(default = "default_seed_departments")]
    pub seed_departments: bool,
    #[serde(default = "default_recent_employees_limit")]
    pub recent_employees_limit: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_bcrypt_cost() -> u32 {
    10
}
fn default_admin_username() -> String {
    "admin".to_string()
}
fn default_admin_email() -> String {
    "admin@worksphere.com".to_string()
}
fn default_admin_password() -> String {
    "Admin@123".to_string()
}
fn default_employee_password() -> String {
    "password123".to_string()
}
fn default_seed_departments() -> bool {
    true
}
fn default_recent_employees_limit() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            bcrypt_cost: default_bcrypt_cost(),
            admin_username: default_admin_username(),
            admin_email: default_admin_email(),
            admin_password: default_admin_password(),
            default_employee_password: default_employee_password(),
            seed_departments: default_seed_departments(),
            recent_employees_limit: default_recent_employees_limit(),
        }
    }
}

impl Config {
    /// Load `.env` (if present) then the `WORKSPHERE_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = envy::prefixed(ENV_PREFIX).from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Same as [`Config::from_env`] but from an explicit variable list.
    pub fn from_iter<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(vars)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !BCRYPT_COST_RANGE.contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "WORKSPHERE_BCRYPT_COST must be within {BCRYPT_COST_RANGE:?}"
            )));
        }
        if self.admin_username.trim().is_empty() {
            return Err(ConfigError::Invalid("WORKSPHERE_ADMIN_USERNAME cannot be empty".to_string()));
        }
        if !self.admin_email.contains('@') {
            return Err(ConfigError::Invalid("WORKSPHERE_ADMIN_EMAIL must be an email address".to_string()));
        }
        if self.admin_password.len() < 6 || self.default_employee_password.len() < 6 {
            return Err(ConfigError::Invalid(
                "passwords must be at least 6 characters".to_string(),
            ));
        }
        if self.recent_employees_limit == 0 {
            return Err(ConfigError::Invalid(
                "WORKSPHERE_RECENT_EMPLOYEES_LIMIT must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
