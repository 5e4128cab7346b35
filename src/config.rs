use crate::constants::{
    BROWSER_USER_AGENT, DEFAULT_CONFIG_SCOPE, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_ATTEMPTS,
};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub config_scope: String,
    pub http_timeout_secs: u64,
    pub max_attempts: usize,
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let max_attempts: usize = env::var("MAX_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
            .parse()?;
        if max_attempts == 0 {
            anyhow::bail!("MAX_ATTEMPTS must be at least 1");
        }

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./memes.db?mode=rwc".to_string()),
            config_scope: env::var("CONFIG_SCOPE")
                .unwrap_or_else(|_| DEFAULT_CONFIG_SCOPE.to_string()),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_HTTP_TIMEOUT_SECS.to_string())
                .parse()?,
            max_attempts,
            user_agent: env::var("USER_AGENT")
                .unwrap_or_else(|_| BROWSER_USER_AGENT.to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: "sqlite:./memes.db?mode=rwc".to_string(),
            config_scope: DEFAULT_CONFIG_SCOPE.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}
