use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use ripple_types::{Comment, CommentView};

use crate::db::DbPool;

pub struct CommentRepository {
    pool: DbPool,
}

impl CommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new comment
    pub fn create(&self, comment: &Comment) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO comments (id, author_id, post_id, content, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (
                comment.id.to_string(),
                comment.author_id.to_string(),
                comment.post_id.to_string(),
                &comment.content,
                comment.created_at.to_rfc3339(),
            ),
        )
        .context("Failed to create comment")?;
        Ok(())
    }

    /// Comments under a post, oldest first, with author names
    pub fn list_for_post(&self, post_id: &Uuid) -> Result<Vec<CommentView>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT c.id, c.author_id, pr.first_name || ' ' || pr.last_name AS author_name,
                    c.post_id, c.content, c.created_at
             FROM comments c
             JOIN profiles pr ON pr.id = c.author_id
             WHERE c.post_id = ?
             ORDER BY c.created_at ASC",
        )?;

        let comments = stmt
            .query_map([post_id.to_string()], |row| {
                Ok(CommentView {
                    id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
                    author_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap(),
                    author_name: row.get(2)?,
                    post_id: Uuid::parse_str(&row.get::<_, String>(3)?).unwrap(),
                    content: row.get(4)?,
                    created_at: row.get::<_, String>(5)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }

    /// Get a single comment by ID
    pub fn get_by_id(&self, comment_id: &Uuid) -> Result<Option<Comment>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, author_id, post_id, content, created_at
             FROM comments WHERE id = ?",
        )?;

        let comment = stmt
            .query_row([comment_id.to_string()], |row| {
                Ok(Comment {
                    id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
                    author_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap(),
                    post_id: Uuid::parse_str(&row.get::<_, String>(2)?).unwrap(),
                    content: row.get(3)?,
                    created_at: row.get::<_, String>(4)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })
            .optional()?;

        Ok(comment)
    }

    /// Rewrite a comment's content
    pub fn update_content(&self, comment_id: &Uuid, content: &str) -> Result<usize> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute(
                "UPDATE comments SET content = ? WHERE id = ?",
                (content, comment_id.to_string()),
            )
            .context("Failed to update comment")?;
        Ok(rows)
    }

    /// Delete a comment
    pub fn delete(&self, comment_id: &Uuid) -> Result<usize> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute("DELETE FROM comments WHERE id = ?", [comment_id.to_string()])
            .context("Failed to delete comment")?;
        Ok(rows)
    }
}
