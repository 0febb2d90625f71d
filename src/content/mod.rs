//! Content module - posts, slugs, markdown and date rendering

mod date;
mod markdown;
mod post;
mod renderer;
pub mod repository;
mod slug;

pub use date::{format_date, parse_input_date, PostDates, DISPLAY_TIMEZONE};
pub use markdown::MarkdownRenderer;
pub use post::{NewPost, Post, RenderedPost};
pub use renderer::ContentRenderer;
pub use repository::{PostRepository, RepositoryError};
pub use slug::make_slug;
