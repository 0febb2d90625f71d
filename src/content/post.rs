//! Post models

use serde::{Deserialize, Serialize};

/// A post as submitted by an author, before the store assigns it an id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPost {
    pub author: String,

    /// Language code, e.g. "en" or "fr"
    pub language: String,

    /// Seconds since the Unix epoch; zero means "now"
    pub timestamp: i64,

    pub title: String,
    pub summary: String,

    /// Raw markdown
    pub content: String,
}

/// A persisted blog post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Store-assigned identity
    pub id: i64,

    /// Language code, e.g. "en" or "fr"
    pub language: String,

    /// URL-friendly name, derived from the title on creation only
    pub slug: String,

    pub author: String,
    pub title: String,

    /// Seconds since the Unix epoch
    pub timestamp: i64,

    pub summary: String,

    /// Raw markdown
    pub content: String,
}

impl Post {
    /// Attach a store id and slug to a submitted post
    pub fn from_new(id: i64, slug: String, new_post: NewPost) -> Self {
        Self {
            id,
            language: new_post.language,
            slug,
            author: new_post.author,
            title: new_post.title,
            timestamp: new_post.timestamp,
            summary: new_post.summary,
            content: new_post.content,
        }
    }
}

/// A post ready for display: rendered HTML and formatted dates
///
/// Built on every read and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPost {
    #[serde(flatten)]
    pub post: Post,

    /// Trusted HTML rendered from `post.content`
    pub html: String,

    /// Long date in the post's language, e.g. "5 mars 2024"
    pub date_human: String,

    /// UTC timestamp, e.g. "2024-03-05T10:00:00Z"
    pub date_iso: String,

    /// `YYYY-MM-DD` in the display timezone, for date inputs in edit forms
    pub date_input: String,
}
