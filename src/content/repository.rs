//! Blog post repository
//!
//! Owns the content lifecycle: slugs and default timestamps on creation,
//! lookups that distinguish "missing" from "broken", and rendering of every
//! post handed back to callers.

use std::sync::Arc;

use super::post::{NewPost, Post, RenderedPost};
use super::renderer::ContentRenderer;
use super::slug::make_slug;
use crate::store::{PostStore, StoreError};

/// Errors returned by [`PostRepository`]
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("post not found")]
    NotFound,

    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Reads and writes posts, returning them rendered
pub struct PostRepository {
    store: Arc<dyn PostStore>,
    renderer: ContentRenderer,
}

impl PostRepository {
    pub fn new(store: Arc<dyn PostStore>, renderer: ContentRenderer) -> Self {
        Self { store, renderer }
    }

    /// Store a new post
    ///
    /// A zero timestamp is replaced with the current time and the slug is
    /// derived from the title.
    pub fn add_post(&self, mut new_post: NewPost) -> Result<RenderedPost> {
        if new_post.timestamp == 0 {
            new_post.timestamp = chrono::Utc::now().timestamp();
        }

        let slug = make_slug(&new_post.title);
        let id = self.store.insert(&new_post, &slug)?;
        tracing::info!("Created post {} ({})", id, slug);

        Ok(self.renderer.render_post(Post::from_new(id, slug, new_post)))
    }

    /// Overwrite a stored post, slug included
    ///
    /// The slug is kept exactly as given, even if it no longer matches the
    /// title. Fails with [`RepositoryError::NotFound`] when no row has this id.
    pub fn update_post(&self, post: Post) -> Result<RenderedPost> {
        if self.store.update(&post)? == 0 {
            return Err(RepositoryError::NotFound);
        }
        tracing::info!("Updated post {}", post.id);

        Ok(self.renderer.render_post(post))
    }

    /// All posts, most recent first
    ///
    /// An empty `language` lists every post.
    pub fn list_posts(&self, language: &str) -> Result<Vec<RenderedPost>> {
        let filter = (!language.is_empty()).then_some(language);
        let posts = self.store.list(filter)?;

        Ok(posts
            .into_iter()
            .map(|post| self.renderer.render_post(post))
            .collect())
    }

    /// One post by slug; the first match if several share it
    pub fn get_post_by_slug(&self, slug: &str) -> Result<RenderedPost> {
        let post = self
            .store
            .find_by_slug(slug)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(self.renderer.render_post(post))
    }

    pub fn get_post_by_id(&self, id: i64) -> Result<RenderedPost> {
        let post = self
            .store
            .find_by_id(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(self.renderer.render_post(post))
    }

    /// Delete a post. Deleting a missing post succeeds.
    pub fn delete_post_by_id(&self, id: i64) -> Result<()> {
        self.store.delete(id)?;
        tracing::info!("Deleted post {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn repository() -> PostRepository {
        let store = SqliteStore::in_memory().unwrap();
        PostRepository::new(Arc::new(store), ContentRenderer::default())
    }

    fn new_post(title: &str, language: &str, timestamp: i64) -> NewPost {
        NewPost {
            author: "Mehdi".to_string(),
            language: language.to_string(),
            timestamp,
            title: title.to_string(),
            summary: format!("About {}", title),
            content: format!("# {}\n\nBody", title),
        }
    }

    #[test]
    fn test_add_then_get_by_id() {
        let repo = repository();
        let input = new_post("L'Étrange noël", "fr", 1_709_632_800);

        let added = repo.add_post(input.clone()).unwrap();
        let fetched = repo.get_post_by_id(added.post.id).unwrap();

        assert_eq!(fetched.post.title, input.title);
        assert_eq!(fetched.post.author, input.author);
        assert_eq!(fetched.post.summary, input.summary);
        assert_eq!(fetched.post.content, input.content);
        assert_eq!(fetched.post.language, input.language);
        assert_eq!(fetched.post.slug, make_slug(&input.title));
        assert_eq!(fetched.post.slug, "letrange-noel");
        assert_eq!(fetched, added);
        assert!(fetched.html.contains("<h1>"));
        assert!(fetched.html.contains("Étrange noël"));
        assert_eq!(fetched.date_human, "5 mars 2024");
    }

    #[test]
    fn test_add_defaults_timestamp_to_now() {
        let repo = repository();
        let before = chrono::Utc::now().timestamp();
        let added = repo.add_post(new_post("Now", "en", 0)).unwrap();
        let after = chrono::Utc::now().timestamp();

        assert!(added.post.timestamp >= before && added.post.timestamp <= after);
    }

    #[test]
    fn test_get_by_slug() {
        let repo = repository();
        let added = repo.add_post(new_post("The event loop", "en", 100)).unwrap();

        let fetched = repo.get_post_by_slug("the-event-loop").unwrap();
        assert_eq!(fetched.post.id, added.post.id);

        assert!(matches!(
            repo.get_post_by_slug("missing"),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn test_duplicate_slugs_return_one_row() {
        let repo = repository();
        let first = repo.add_post(new_post("Same", "en", 100)).unwrap();
        let second = repo.add_post(new_post("Same", "fr", 200)).unwrap();

        let fetched = repo.get_post_by_slug("same").unwrap();
        assert!(fetched.post.id == first.post.id || fetched.post.id == second.post.id);
    }

    #[test]
    fn test_get_by_id_missing() {
        let repo = repository();
        assert!(matches!(
            repo.get_post_by_id(42),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn test_update_keeps_given_slug() {
        let repo = repository();
        let added = repo.add_post(new_post("Original", "en", 100)).unwrap();

        let mut post = added.post.clone();
        post.title = "Renamed".to_string();
        post.slug = "hand-picked".to_string();
        post.content = "*new*".to_string();

        let updated = repo.update_post(post).unwrap();
        assert_eq!(updated.post.slug, "hand-picked");
        assert!(updated.html.contains("<em>new</em>"));

        let fetched = repo.get_post_by_id(added.post.id).unwrap();
        assert_eq!(fetched.post.title, "Renamed");
        assert_eq!(fetched.post.slug, "hand-picked");
        assert!(repo.get_post_by_slug("original").is_err());
    }

    #[test]
    fn test_update_missing_post_is_not_found() {
        let repo = repository();
        let post = Post {
            id: 999,
            title: "Ghost".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            repo.update_post(post),
            Err(RepositoryError::NotFound)
        ));
        assert!(repo.list_posts("").unwrap().is_empty());
    }

    #[test]
    fn test_list_posts_filter_and_order() {
        let repo = repository();
        repo.add_post(new_post("First", "en", 100)).unwrap();
        repo.add_post(new_post("Premier", "fr", 150)).unwrap();
        repo.add_post(new_post("Second", "en", 200)).unwrap();

        let en = repo.list_posts("en").unwrap();
        let titles: Vec<&str> = en.iter().map(|p| p.post.title.as_str()).collect();
        assert_eq!(titles, ["Second", "First"]);
        assert!(en.iter().all(|p| p.post.language == "en"));
        assert!(en.iter().all(|p| !p.html.is_empty()));

        let all = repo.list_posts("").unwrap();
        let titles: Vec<&str> = all.iter().map(|p| p.post.title.as_str()).collect();
        assert_eq!(titles, ["Second", "Premier", "First"]);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let repo = repository();
        let added = repo.add_post(new_post("Gone", "en", 100)).unwrap();

        repo.delete_post_by_id(added.post.id).unwrap();
        repo.delete_post_by_id(added.post.id).unwrap();
        assert!(matches!(
            repo.get_post_by_id(added.post.id),
            Err(RepositoryError::NotFound)
        ));
    }
}
