//! folio-rs: a bilingual personal website and blog server
//!
//! Posts live in SQLite and are written in markdown through a small admin
//! interface. Pages are served in English or French depending on the first
//! segment of the URL path.

pub mod auth;
pub mod commands;
pub mod config;
pub mod contact;
pub mod content;
pub mod i18n;
pub mod server;
pub mod store;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A site rooted in a base directory
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Static assets directory
    pub static_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::SiteConfig::load_or_default(&base_dir)?;

        let database_path = base_dir.join(&config.database);
        let static_dir = base_dir.join(&config.static_dir);

        Ok(Self {
            config,
            base_dir,
            database_path,
            static_dir,
        })
    }

    /// Open the post repository backed by the site database
    pub fn repository(&self) -> Result<content::PostRepository> {
        let store = store::SqliteStore::open(&self.database_path)?;
        let renderer = content::ContentRenderer::new(content::MarkdownRenderer::with_theme(
            &self.config.highlight_theme,
        ));
        Ok(content::PostRepository::new(Arc::new(store), renderer))
    }

    /// Start the web server
    pub async fn serve(&self, ip: &str, port: u16) -> Result<()> {
        server::start(self, ip, port).await
    }
}
