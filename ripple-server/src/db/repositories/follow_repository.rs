use anyhow::{Context, Result};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use ripple_types::ProfileSummary;

use crate::db::{is_constraint_violation, DbPool};

/// Result of a follow attempt. The composite primary key on the edge table
/// settles concurrent duplicate attempts; the pre-check only saves a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Followed,
    AlreadyFollowing,
}

pub struct FollowRepository {
    pool: DbPool,
}

impl FollowRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Check if profile A is following profile B
    pub fn is_following(&self, follower_id: &Uuid, following_id: &Uuid) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ? AND following_id = ?",
            (follower_id.to_string(), following_id.to_string()),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Create a follow edge. Callers reject self-follows before getting here;
    /// the table's CHECK constraint backs that up.
    pub fn follow(&self, follower_id: &Uuid, following_id: &Uuid) -> Result<FollowOutcome> {
        if self.is_following(follower_id, following_id)? {
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        let conn = self.pool.get()?;
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;

        let inserted = conn
            .execute(
                "INSERT INTO follows (follower_id, following_id, created_at) VALUES (?, ?, ?)",
                (follower_id.to_string(), following_id.to_string(), now),
            )
            .map_err(anyhow::Error::from);

        match inserted {
            Ok(_) => Ok(FollowOutcome::Followed),
            // Lost a race with a concurrent identical follow
            Err(err) if is_constraint_violation(&err) => Ok(FollowOutcome::AlreadyFollowing),
            Err(err) => Err(err).context("Failed to create follow edge"),
        }
    }

    /// Remove a follow edge; returns the number of rows removed so callers
    /// can distinguish an unfollow-with-effect from a no-op.
    pub fn unfollow(&self, follower_id: &Uuid, following_id: &Uuid) -> Result<usize> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute(
                "DELETE FROM follows WHERE follower_id = ? AND following_id = ?",
                (follower_id.to_string(), following_id.to_string()),
            )
            .context("Failed to remove follow edge")?;
        Ok(rows)
    }

    /// Profiles this profile follows, oldest edge first
    pub fn followings_of(&self, profile_id: &Uuid) -> Result<Vec<ProfileSummary>> {
        self.edge_profiles(profile_id, "f.follower_id", "f.following_id")
    }

    /// Profiles following this profile, oldest edge first
    pub fn followers_of(&self, profile_id: &Uuid) -> Result<Vec<ProfileSummary>> {
        self.edge_profiles(profile_id, "f.following_id", "f.follower_id")
    }

    fn edge_profiles(
        &self,
        profile_id: &Uuid,
        near_column: &str,
        far_column: &str,
    ) -> Result<Vec<ProfileSummary>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT p.id, p.user_id, p.first_name, p.last_name, p.biography, p.profile_picture,
                    (SELECT COUNT(*) FROM follows WHERE following_id = p.id) AS followers_count,
                    (SELECT COUNT(*) FROM follows WHERE follower_id = p.id) AS followings_count
             FROM follows f
             JOIN profiles p ON p.id = {far_column}
             WHERE {near_column} = ?
             ORDER BY f.created_at ASC"
        ))?;

        let profiles = stmt
            .query_map([profile_id.to_string()], |row| {
                Ok(ProfileSummary {
                    id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
                    user_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap(),
                    first_name: row.get(2)?,
                    last_name: row.get(3)?,
                    biography: row.get(4)?,
                    profile_picture: row.get(5)?,
                    followers_count: row.get(6)?,
                    followings_count: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(profiles)
    }

    /// Get follower count
    pub fn follower_count(&self, profile_id: &Uuid) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE following_id = ?",
            [profile_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get following count
    pub fn following_count(&self, profile_id: &Uuid) -> Result<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM follows WHERE follower_id = ?",
            [profile_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
