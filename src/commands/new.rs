//! Create a post from the command line

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::{parse_input_date, NewPost, RenderedPost};
use crate::i18n::Language;
use crate::Site;

/// Options of the `new` command
#[derive(Debug, Default)]
pub struct NewPostOptions<'a> {
    pub title: &'a str,
    pub author: Option<&'a str>,
    pub language: &'a str,
    pub summary: &'a str,
    /// Markdown file holding the post body
    pub file: Option<&'a Path>,
    /// `YYYY-MM-DD`; today when absent
    pub date: Option<&'a str>,
}

/// Store a new post and return it
pub fn create_post(site: &Site, options: &NewPostOptions<'_>) -> Result<RenderedPost> {
    if Language::from_code(options.language).is_none() {
        anyhow::bail!(
            "Unknown language: {}. Available: en, fr",
            options.language
        );
    }

    let content = match options.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => String::new(),
    };

    let timestamp = match options.date {
        Some(date) => parse_input_date(date)
            .with_context(|| format!("Invalid date {:?}, expected YYYY-MM-DD", date))?,
        None => 0,
    };

    let new_post = NewPost {
        author: options
            .author
            .unwrap_or(site.config.author.as_str())
            .to_string(),
        language: options.language.to_string(),
        timestamp,
        title: options.title.to_string(),
        summary: options.summary.to_string(),
        content,
    };

    Ok(site.repository()?.add_post(new_post)?)
}

/// Run the new command
pub fn run(site: &Site, options: &NewPostOptions<'_>) -> Result<()> {
    let post = create_post(site, options)?;
    println!(
        "Created: {} (/{}/articles/{}, id {})",
        post.post.title, post.post.language, post.post.slug, post.post.id
    );
    Ok(())
}
