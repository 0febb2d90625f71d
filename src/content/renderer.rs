//! Display projection of stored posts

use super::date::format_date;
use super::markdown::MarkdownRenderer;
use super::post::{Post, RenderedPost};

/// Turns stored posts into their displayable form
#[derive(Default)]
pub struct ContentRenderer {
    markdown: MarkdownRenderer,
}

impl ContentRenderer {
    pub fn new(markdown: MarkdownRenderer) -> Self {
        Self { markdown }
    }

    /// Render raw markdown to trusted HTML
    pub fn render(&self, markdown: &str) -> String {
        self.markdown.render(markdown)
    }

    /// Project a post: render its content and format its dates
    pub fn render_post(&self, post: Post) -> RenderedPost {
        let html = self.markdown.render(&post.content);
        let dates = format_date(post.timestamp, &post.language);

        RenderedPost {
            post,
            html,
            date_human: dates.human,
            date_iso: dates.iso,
            date_input: dates.input,
        }
    }
}
