use std::env;

use reqwest::Url;

use board_persistence::connection::DEFAULT_DATABASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub site_url: Url,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub logsnag_token: Option<String>,
    pub logsnag_project: String,
    pub environment: String,
    pub auth_dev_mode: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),
    #[error("Invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let auth_dev_mode = var("AUTH_DEV_MODE").is_some_and(|v| v == "true");

        // Supabase settings are only optional when the dev provider stands in
        let supabase = |name: &'static str| match var(name) {
            Some(value) => Ok(value),
            None if auth_dev_mode => Ok(String::new()),
            None => Err(ConfigError::Missing(name)),
        };

        let port = var("PORT").unwrap_or_else(|| "8080".to_string());
        let port = port.parse().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: port.clone(),
        })?;

        let site_url = var("SITE_URL").unwrap_or_else(|| "http://localhost:3000".to_string());
        let site_url = Url::parse(&site_url).map_err(|_| ConfigError::Invalid {
            name: "SITE_URL",
            value: site_url.clone(),
        })?;

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            site_url,
            supabase_url: supabase("SUPABASE_URL")?,
            supabase_anon_key: supabase("SUPABASE_ANON_KEY")?,
            supabase_jwt_secret: supabase("SUPABASE_JWT_SECRET")?,
            logsnag_token: var("LOGSNAG_TOKEN"),
            logsnag_project: var("LOGSNAG_PROJECT").unwrap_or_else(|| "wordle-teams".to_string()),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "local".to_string()),
            auth_dev_mode,
        })
    }
}
