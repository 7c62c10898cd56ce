//! Service Configuration
//! Mission: One immutable configuration, resolved at startup from CLI flags and environment

use anyhow::{bail, Result};
use clap::Parser;
use std::time::Duration;

/// Fallback signing secret for local development only.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

/// 5 hours, matching the lifetime the frontend expects.
pub const DEFAULT_JWT_EXPIRATION_SECS: i64 = 5 * 60 * 60;

#[derive(Parser, Debug, Clone)]
#[command(name = "portfolio")]
#[command(about = "Portfolio backend: users, JWT login and self-introduction documents")]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = "portfolio.db")]
    pub database_path: String,

    /// HMAC secret used to sign access tokens
    #[arg(long, env = "JWT_SECRET", default_value = DEV_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[arg(long, env = "JWT_EXPIRATION_SECS", default_value_t = DEFAULT_JWT_EXPIRATION_SECS)]
    pub jwt_expiration_secs: i64,

    /// bcrypt work factor for stored passwords
    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,

    /// Page size used when the client does not ask for one
    #[arg(long, env = "PAGE_SIZE_DEFAULT", default_value_t = 10)]
    pub page_size_default: u32,

    /// Largest page size a client may request
    #[arg(long, env = "PAGE_SIZE_MAX", default_value_t = 100)]
    pub page_size_max: u32,

    /// Upper bound on the time spent serving one request
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Prefix for every href in hypermedia responses
    #[arg(long, env = "PUBLIC_BASE_URL", default_value = "http://localhost:8080")]
    pub public_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            database_path: "portfolio.db".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration_secs: DEFAULT_JWT_EXPIRATION_SECS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            page_size_default: 10,
            page_size_max: 100,
            request_timeout_secs: 10,
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl Config {
    /// Reject combinations the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }
        if self.jwt_expiration_secs <= 0 {
            bail!("JWT_EXPIRATION_SECS must be positive");
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31");
        }
        if self.page_size_max == 0 || self.page_size_default == 0 {
            bail!("page sizes must be positive");
        }
        if self.page_size_default > self.page_size_max {
            bail!(
                "PAGE_SIZE_DEFAULT ({}) exceeds PAGE_SIZE_MAX ({})",
                self.page_size_default,
                self.page_size_max
            );
        }
        if self.request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be positive");
        }
        Ok(())
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.public_base_url.trim_end_matches('/')
    }
}
