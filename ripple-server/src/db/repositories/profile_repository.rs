use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use ripple_types::{Profile, ProfileDetail, ProfileSummary};

use crate::db::DbPool;

pub struct ProfileRepository {
    pool: DbPool,
}

fn map_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<Profile> {
    let birth_date: Option<String> = row.get(7)?;
    Ok(Profile {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
        user_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap(),
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        biography: row.get(4)?,
        profile_picture: row.get(5)?,
        phone_number: row.get(6)?,
        birth_date: birth_date.map(|d| d.parse().unwrap()),
        created_at: row.get::<_, String>(8)?.parse::<DateTime<Utc>>().unwrap(),
    })
}

const PROFILE_COLUMNS: &str =
    "id, user_id, first_name, last_name, biography, profile_picture, phone_number, birth_date, created_at";

impl ProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new profile. The unique index on user_id (one profile per
    /// identity) and on phone_number surface as constraint violations.
    pub fn create(&self, profile: &Profile) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO profiles (id, user_id, first_name, last_name, biography, profile_picture, phone_number, birth_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            (
                profile.id.to_string(),
                profile.user_id.to_string(),
                &profile.first_name,
                &profile.last_name,
                &profile.biography,
                &profile.profile_picture,
                &profile.phone_number,
                profile.birth_date.map(|d| d.to_string()),
                profile.created_at.to_rfc3339(),
            ),
        )
        .context("Failed to create profile")?;
        Ok(())
    }

    /// Get a profile by ID
    pub fn find_by_id(&self, profile_id: &Uuid) -> Result<Option<Profile>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?"
        ))?;
        let profile = stmt
            .query_row([profile_id.to_string()], map_profile)
            .optional()?;
        Ok(profile)
    }

    /// Get the profile belonging to an account identity
    pub fn find_by_user(&self, user_id: &Uuid) -> Result<Option<Profile>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?"
        ))?;
        let profile = stmt
            .query_row([user_id.to_string()], map_profile)
            .optional()?;
        Ok(profile)
    }

    /// List profiles with graph-count annotations, optionally filtered by
    /// case-insensitive substrings of the first or last name.
    pub fn list(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProfileSummary>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.user_id, p.first_name, p.last_name, p.biography, p.profile_picture,
                    (SELECT COUNT(*) FROM follows WHERE following_id = p.id) AS followers_count,
                    (SELECT COUNT(*) FROM follows WHERE follower_id = p.id) AS followings_count
             FROM profiles p
             WHERE (?1 IS NULL OR LOWER(p.first_name) LIKE '%' || LOWER(?1) || '%')
               AND (?2 IS NULL OR LOWER(p.last_name) LIKE '%' || LOWER(?2) || '%')
             ORDER BY p.created_at ASC
             LIMIT ?3 OFFSET ?4",
        )?;

        let profiles = stmt
            .query_map((first_name, last_name, limit, offset), |row| {
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

    /// Detail shape: the profile plus live graph and post counts.
    pub fn detail(&self, profile_id: &Uuid) -> Result<Option<ProfileDetail>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.user_id, p.first_name, p.last_name, p.biography, p.profile_picture,
                    p.phone_number, p.birth_date, p.created_at,
                    (SELECT COUNT(*) FROM follows WHERE following_id = p.id) AS followers_count,
                    (SELECT COUNT(*) FROM follows WHERE follower_id = p.id) AS followings_count,
                    (SELECT COUNT(*) FROM posts WHERE author_id = p.id) AS post_count
             FROM profiles p
             WHERE p.id = ?",
        )?;

        let detail = stmt
            .query_row([profile_id.to_string()], |row| {
                let birth_date: Option<String> = row.get(7)?;
                Ok(ProfileDetail {
                    id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
                    user_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap(),
                    first_name: row.get(2)?,
                    last_name: row.get(3)?,
                    biography: row.get(4)?,
                    profile_picture: row.get(5)?,
                    phone_number: row.get(6)?,
                    birth_date: birth_date.map(|d| d.parse().unwrap()),
                    created_at: row.get::<_, String>(8)?.parse::<DateTime<Utc>>().unwrap(),
                    followers_count: row.get(9)?,
                    followings_count: row.get(10)?,
                    post_count: row.get(11)?,
                })
            })
            .optional()?;

        Ok(detail)
    }

    /// Overwrite the mutable fields of a profile
    pub fn update(&self, profile: &Profile) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE profiles
             SET first_name = ?, last_name = ?, biography = ?, phone_number = ?, birth_date = ?
             WHERE id = ?",
            (
                &profile.first_name,
                &profile.last_name,
                &profile.biography,
                &profile.phone_number,
                profile.birth_date.map(|d| d.to_string()),
                profile.id.to_string(),
            ),
        )
        .context("Failed to update profile")?;
        Ok(())
    }

    /// Replace the profile picture reference
    pub fn set_picture(&self, profile_id: &Uuid, media_key: &str) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE profiles SET profile_picture = ? WHERE id = ?",
            (media_key, profile_id.to_string()),
        )
        .context("Failed to set profile picture")?;
        Ok(())
    }

    /// Delete a profile; the store cascades to posts, comments, likes,
    /// and follow edges on both sides.
    pub fn delete(&self, profile_id: &Uuid) -> Result<usize> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute("DELETE FROM profiles WHERE id = ?", [profile_id.to_string()])
            .context("Failed to delete profile")?;
        Ok(rows)
    }
}
