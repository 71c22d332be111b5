use hackreg_domain::validation::DEFAULT_EMAIL_SUFFIX;

/// Registration service configuration loaded from environment variables.
#[derive(Debug)]
pub struct RegistrationsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 5001). Env var: `REGISTRATIONS_PORT`.
    pub registrations_port: u16,
    /// Required head-email suffix. Env var: `EMAIL_DOMAIN_SUFFIX`.
    pub email_domain_suffix: String,
    /// Browser origin allowed by CORS (e.g. "https://hackandro.netlify.app").
    pub cors_origin: Option<String>,
    /// Transactional mail API; `None` falls back to logging.
    pub mail_api: Option<MailApiConfig>,
    /// Apply pending migrations at startup (default true). Env var: `RUN_MIGRATIONS`.
    pub run_migrations: bool,
}

/// Transactional mail API settings (`MAIL_API_URL`, `MAIL_API_KEY`,
/// `MAIL_SENDER_EMAIL`, optional `MAIL_SENDER_NAME`).
#[derive(Debug, Clone)]
pub struct MailApiConfig {
    pub url: String,
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: Option<String>,
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl RegistrationsConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            registrations_port: std::env::var("REGISTRATIONS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5001),
            email_domain_suffix: non_empty_var("EMAIL_DOMAIN_SUFFIX")
                .unwrap_or_else(|| DEFAULT_EMAIL_SUFFIX.to_owned()),
            cors_origin: non_empty_var("CORS_ORIGIN"),
            mail_api: MailApiConfig::from_env(),
            run_migrations: std::env::var("RUN_MIGRATIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

impl MailApiConfig {
    /// `None` unless URL, key and sender are all set.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            url: non_empty_var("MAIL_API_URL")?,
            api_key: non_empty_var("MAIL_API_KEY")?,
            sender_email: non_empty_var("MAIL_SENDER_EMAIL")?,
            sender_name: non_empty_var("MAIL_SENDER_NAME"),
        })
    }
}
