//! SQLite-backed post store

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{PostStore, StoreError};
use crate::content::{NewPost, Post};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS post (
    post_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    title     TEXT NOT NULL,
    language  TEXT NOT NULL,
    author    TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    slug      TEXT NOT NULL,
    summary   TEXT NOT NULL,
    content   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS post_slug ON post (slug);
"#;

const COLUMNS: &str = "post_id, title, language, author, timestamp, slug, summary, content";

/// Post store on a single SQLite connection
///
/// `AUTOINCREMENT` keeps ids from ever being reused after a delete.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and make sure the schema exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        tracing::debug!("Opened database {:?}", path.as_ref());
        Self::with_connection(conn)
    }

    /// A private in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get("post_id")?,
        title: row.get("title")?,
        language: row.get("language")?,
        author: row.get("author")?,
        timestamp: row.get("timestamp")?,
        slug: row.get("slug")?,
        summary: row.get("summary")?,
        content: row.get("content")?,
    })
}

impl PostStore for SqliteStore {
    fn insert(&self, post: &NewPost, slug: &str) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO post (title, language, author, timestamp, slug, summary, content)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                post.title,
                post.language,
                post.author,
                post.timestamp,
                slug,
                post.summary,
                post.content
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn update(&self, post: &Post) -> Result<usize, StoreError> {
        let changed = self.conn()?.execute(
            "UPDATE post
             SET title = ?1, language = ?2, author = ?3, timestamp = ?4,
                 slug = ?5, summary = ?6, content = ?7
             WHERE post_id = ?8",
            params![
                post.title,
                post.language,
                post.author,
                post.timestamp,
                post.slug,
                post.summary,
                post.content,
                post.id
            ],
        )?;
        Ok(changed)
    }

    fn list(&self, language: Option<&str>) -> Result<Vec<Post>, StoreError> {
        let conn = self.conn()?;
        let posts = match language {
            Some(language) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM post WHERE language = ?1
                     ORDER BY timestamp DESC, post_id DESC"
                ))?;
                let rows = stmt.query_map(params![language], post_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM post ORDER BY timestamp DESC, post_id DESC"
                ))?;
                let rows = stmt.query_map([], post_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(posts)
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let post = self
            .conn()?
            .query_row(
                &format!("SELECT {COLUMNS} FROM post WHERE slug = ?1 ORDER BY post_id LIMIT 1"),
                params![slug],
                post_from_row,
            )
            .optional()?;
        Ok(post)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Post>, StoreError> {
        let post = self
            .conn()?
            .query_row(
                &format!("SELECT {COLUMNS} FROM post WHERE post_id = ?1"),
                params![id],
                post_from_row,
            )
            .optional()?;
        Ok(post)
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.conn()?
            .execute("DELETE FROM post WHERE post_id = ?1", params![id])?;
        Ok(())
    }
}
