//! List stored posts

use anyhow::Result;

use crate::Site;

/// Print every post, most recent first, optionally for one language only
pub fn run(site: &Site, language: Option<&str>) -> Result<()> {
    let repository = site.repository()?;
    let posts = repository.list_posts(language.unwrap_or(""))?;

    println!("Posts ({}):", posts.len());
    for post in posts {
        println!(
            "  {} - [{}] {} (/articles/{}, id {})",
            post.date_input, post.post.language, post.post.title, post.post.slug, post.post.id
        );
    }

    Ok(())
}
