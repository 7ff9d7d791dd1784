//! Comment Storage

use crate::models::{Comment, CommentWithAuthor};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::time::Duration;

pub struct CommentStore {
    db_path: String,
}

impl CommentStore {
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
            "CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub fn insert(&self, content: &str, author_id: i64, post_id: i64) -> Result<Comment> {
        let created_at = Utc::now().to_rfc3339();

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO comments (content, author_id, post_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![content, author_id, post_id, created_at],
        )?;

        Ok(Comment {
            id: conn.last_insert_rowid(),
            content: content.to_string(),
            author_id,
            post_id,
            created_at,
        })
    }

    /// Comments for one post with author usernames, oldest first
    pub fn for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT c.id, c.content, u.username, c.created_at
             FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.post_id = ?1
             ORDER BY c.id",
        )?;

        let comments = stmt
            .query_map(params![post_id], |row| {
                Ok(CommentWithAuthor {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    author: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    pub fn find(&self, id: i64) -> Result<Option<Comment>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(
            "SELECT id, content, author_id, post_id, created_at FROM comments WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![id], |row| {
            Ok(Comment {
                id: row.get(0)?,
                content: row.get(1)?,
                author_id: row.get(2)?,
                post_id: row.get(3)?,
                created_at: row.get(4)?,
            })
        });

        match result {
            Ok(comment) => Ok(Some(comment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_content(&self, id: i64, content: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE comments SET content = ?1 WHERE id = ?2",
            params![content, id],
        )?;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM comments WHERE id = ?1", params![id])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{posts::PostStore, users::UserStore};
    use tempfile::NamedTempFile;

    fn create_test_stores() -> (UserStore, PostStore, CommentStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();
        let users = UserStore::new(db_path, "admin123").unwrap();
        let posts = PostStore::new(db_path).unwrap();
        let comments = CommentStore::new(db_path).unwrap();
        (users, posts, comments, temp_file)
    }

    #[test]
    fn test_comment_round_trip() {
        let (users, posts, comments, _temp) = create_test_stores();
        let author = users.register("dave", "dave@x.com", "pw").unwrap();
        let post = posts.insert("Post", "body", author.id).unwrap();

        let comment = comments.insert("Nice post", author.id, post.id).unwrap();
        assert_eq!(comment.post_id, post.id);

        let listed = comments.for_post(post.id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].author, "dave");
        assert_eq!(listed[0].content, "Nice post");
    }

    #[test]
    fn test_for_post_filters_by_post() {
        let (users, posts, comments, _temp) = create_test_stores();
        let author = users.register("dave", "dave@x.com", "pw").unwrap();
        let first = posts.insert("One", "body", author.id).unwrap();
        let second = posts.insert("Two", "body", author.id).unwrap();

        comments.insert("on first", author.id, first.id).unwrap();
        comments.insert("on second", author.id, second.id).unwrap();

        assert_eq!(comments.for_post(first.id).unwrap().len(), 1);
        assert_eq!(comments.for_post(second.id).unwrap().len(), 1);
        // Unknown post just yields an empty list
        assert!(comments.for_post(999).unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete() {
        let (users, posts, comments, _temp) = create_test_stores();
        let author = users.register("dave", "dave@x.com", "pw").unwrap();
        let post = posts.insert("Post", "body", author.id).unwrap();
        let comment = comments.insert("typo", author.id, post.id).unwrap();

        comments.update_content(comment.id, "fixed").unwrap();
        assert_eq!(comments.find(comment.id).unwrap().unwrap().content, "fixed");

        comments.delete(comment.id).unwrap();
        assert!(comments.find(comment.id).unwrap().is_none());
    }

    #[test]
    fn test_deleting_post_cascades_to_comments() {
        let (users, posts, comments, _temp) = create_test_stores();
        let author = users.register("dave", "dave@x.com", "pw").unwrap();
        let post = posts.insert("Post", "body", author.id).unwrap();
        let comment = comments.insert("bye", author.id, post.id).unwrap();

        posts.delete(post.id).unwrap();
        assert!(comments.find(comment.id).unwrap().is_none());
    }

    #[test]
    fn test_deleting_author_cascades_to_comments() {
        let (users, posts, comments, _temp) = create_test_stores();
        let author = users.register("dave", "dave@x.com", "pw").unwrap();
        let commenter = users.register("eve", "eve@x.com", "pw").unwrap();
        let post = posts.insert("Post", "body", author.id).unwrap();
        let comment = comments.insert("mine", commenter.id, post.id).unwrap();

        users.delete(commenter.id).unwrap();
        assert!(comments.find(comment.id).unwrap().is_none());
        // The post itself is untouched
        assert!(posts.find(post.id).unwrap().is_some());
    }
}
