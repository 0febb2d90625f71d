//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub url: String,

    // Storage
    /// SQLite database file, relative to the base directory
    pub database: String,
    /// Directory served under /static/
    pub static_dir: String,

    // Admin
    /// Plain-text admin password; empty disables admin login
    pub admin_password: String,
    /// Name of the session cookie
    pub session_cookie: String,

    // Highlighting
    pub highlight_theme: String,

    // Contact form
    #[serde(default)]
    pub smtp: SmtpConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "valette.software".to_string(),
            author: "Mehdi Valette".to_string(),
            url: "http://localhost:4000".to_string(),

            database: "blog.db".to_string(),
            static_dir: "static".to_string(),

            admin_password: String::new(),
            session_cookie: "session-id".to_string(),

            highlight_theme: "base16-ocean.dark".to_string(),

            smtp: SmtpConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load `_config.yml` from a base directory, or defaults if it is missing
    pub fn load_or_default<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");
        if config_path.exists() {
            tracing::debug!("Loading configuration from {:?}", config_path);
            Self::load(&config_path)
        } else {
            tracing::info!("No _config.yml found, using defaults");
            Ok(Self::default())
        }
    }
}

/// Outgoing mail settings for the contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            user: String::new(),
            password: String::new(),
            from: String::new(),
            to: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.database, "blog.db");
        assert_eq!(config.session_cookie, "session-id");
        assert!(config.admin_password.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Site
admin_password: hunter2
smtp:
  host: smtp.example.com
  to: me@example.com
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Site");
        assert_eq!(config.admin_password, "hunter2");
        assert_eq!(config.smtp.host, "smtp.example.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.to, "me@example.com");
        assert_eq!(config.static_dir, "static");
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.database, "blog.db");

        fs::write(dir.path().join("_config.yml"), "database: other.db\n").unwrap();
        let config = SiteConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.database, "other.db");
    }
}
