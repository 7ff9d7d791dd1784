//! Blog Post Storage

use crate::models::{BlogPost, PostWithAuthor};
use anyhow::Result;
use rusqlite::{params, Connection};
use std::time::Duration;

pub struct PostStore {
    db_path: String,
}

impl PostStore {
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn conn(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    fn init_db(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
            )",
            [],
        )?;

        Ok(())
    }

    /// Create a post. The author id comes from the authenticated requester
    /// and is never reassignable afterwards.
    pub fn insert(&self, title: &str, content: &str, author_id: i64) -> Result<BlogPost> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO posts (title, content, author_id) VALUES (?1, ?2, ?3)",
            params![title, content, author_id],
        )?;

        Ok(BlogPost {
            id: conn.last_insert_rowid(),
            title: title.to_string(),
            content: content.to_string(),
            author_id,
        })
    }

    /// List every post with the author's username resolved
    pub fn list(&self) -> Result<Vec<PostWithAuthor>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT p.id, p.title, p.content, u.username
             FROM posts p JOIN users u ON u.id = p.author_id
             ORDER BY p.id",
        )?;

        let posts = stmt
            .query_map([], |row| {
                Ok(PostWithAuthor {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    content: row.get(2)?,
                    author: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    pub fn find(&self, id: i64) -> Result<Option<BlogPost>> {
        let conn = self.conn()?;

        let mut stmt =
            conn.prepare("SELECT id, title, content, author_id FROM posts WHERE id = ?1")?;

        let result = stmt.query_row(params![id], |row| {
            Ok(BlogPost {
                id: row.get(0)?,
                title: row.get(1)?,
                content: row.get(2)?,
                author_id: row.get(3)?,
            })
        });

        match result {
            Ok(post) => Ok(Some(post)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM posts WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn update(&self, id: i64, title: &str, content: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE posts SET title = ?1, content = ?2 WHERE id = ?3",
            params![title, content, id],
        )?;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
        Ok(())
    }
}
