use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use ripple_types::Like;

use crate::db::{is_constraint_violation, DbPool};

/// Result of a like attempt. The composite primary key on (author, post)
/// settles concurrent duplicate attempts; the pre-check only saves a write.
#[derive(Debug, Clone, PartialEq)]
pub enum LikeOutcome {
    Liked(Like),
    AlreadyLiked,
}

pub struct LikeRepository {
    pool: DbPool,
}

impl LikeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Check if the profile has liked the post
    pub fn has_liked(&self, author_id: &Uuid, post_id: &Uuid) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM likes WHERE author_id = ? AND post_id = ?",
            (author_id.to_string(), post_id.to_string()),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Record a like for (author, post)
    pub fn like(&self, author_id: &Uuid, post_id: &Uuid) -> Result<LikeOutcome> {
        if self.has_liked(author_id, post_id)? {
            return Ok(LikeOutcome::AlreadyLiked);
        }

        let like = Like {
            author_id: *author_id,
            post_id: *post_id,
            created_at: Utc::now(),
        };

        let conn = self.pool.get()?;
        let inserted = conn
            .execute(
                "INSERT INTO likes (author_id, post_id, created_at) VALUES (?, ?, ?)",
                (
                    author_id.to_string(),
                    post_id.to_string(),
                    like.created_at.to_rfc3339(),
                ),
            )
            .map_err(anyhow::Error::from);

        match inserted {
            Ok(_) => Ok(LikeOutcome::Liked(like)),
            // Lost a race with a concurrent identical like
            Err(err) if is_constraint_violation(&err) => Ok(LikeOutcome::AlreadyLiked),
            Err(err) => Err(err).context("Failed to create like"),
        }
    }

    /// Remove a like; returns the number of rows removed so callers can
    /// distinguish an unlike-with-effect from a no-op.
    pub fn unlike(&self, author_id: &Uuid, post_id: &Uuid) -> Result<usize> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute(
                "DELETE FROM likes WHERE author_id = ? AND post_id = ?",
                (author_id.to_string(), post_id.to_string()),
            )
            .context("Failed to remove like")?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{PostRepository, ProfileRepository};
    use crate::db::Database;
    use ripple_types::{Hashtag, Post, Profile};

    fn setup() -> (Database, LikeRepository, Uuid, Uuid) {
        let db = Database::in_memory().expect("Failed to create test database");
        let profiles = ProfileRepository::new(db.pool.clone());
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Test".to_string(),
            biography: String::new(),
            profile_picture: None,
            phone_number: None,
            birth_date: None,
            created_at: Utc::now(),
        };
        profiles.create(&profile).expect("Failed to create profile");

        let posts = PostRepository::new(db.pool.clone());
        let post = Post {
            id: Uuid::new_v4(),
            author_id: profile.id,
            content: "target".to_string(),
            media: None,
            hashtag: Hashtag::Other,
            created_at: Utc::now(),
        };
        posts.create(&post).expect("Failed to create post");

        let repo = LikeRepository::new(db.pool.clone());
        (db, repo, profile.id, post.id)
    }

    #[test]
    fn test_like_then_duplicate() {
        let (_db, repo, profile, post) = setup();

        match repo.like(&profile, &post).unwrap() {
            LikeOutcome::Liked(like) => {
                assert_eq!(like.author_id, profile);
                assert_eq!(like.post_id, post);
            }
            LikeOutcome::AlreadyLiked => panic!("first like must insert"),
        }
        assert!(repo.has_liked(&profile, &post).unwrap());

        assert_eq!(repo.like(&profile, &post).unwrap(), LikeOutcome::AlreadyLiked);
    }

    #[test]
    fn test_unlike_reports_effect() {
        let (_db, repo, profile, post) = setup();

        repo.like(&profile, &post).unwrap();
        assert_eq!(repo.unlike(&profile, &post).unwrap(), 1);
        assert_eq!(repo.unlike(&profile, &post).unwrap(), 0);
        assert!(!repo.has_liked(&profile, &post).unwrap());
    }
}
