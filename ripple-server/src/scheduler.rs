use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use ripple_types::{Hashtag, Post};

use crate::db::repositories::PostRepository;
use crate::db::Database;

/// A post accepted now for publication at a later activation time.
#[derive(Debug, Clone)]
pub struct ScheduledPost {
    pub author_id: Uuid,
    pub content: String,
    pub hashtag: Hashtag,
    pub publish_at: DateTime<Utc>,
}

/// Seam for the deferred task runner. The API hands drafts across this
/// boundary and answers 202; whoever implements it owns eventual creation.
#[async_trait]
pub trait PostScheduler: Send + Sync {
    async fn schedule(&self, draft: ScheduledPost) -> Result<()>;
}

/// In-process runner: one spawned task per draft, sleeping until the
/// activation time. An activation time already in the past publishes
/// immediately.
pub struct SpawnScheduler {
    db: Database,
}

impl SpawnScheduler {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostScheduler for SpawnScheduler {
    async fn schedule(&self, draft: ScheduledPost) -> Result<()> {
        let db = self.db.clone();
        tracing::info!(
            "Accepted deferred post by {} for {}",
            draft.author_id,
            draft.publish_at
        );

        tokio::spawn(async move {
            let delay = (draft.publish_at - Utc::now()).to_std().unwrap_or_default();
            tokio::time::sleep(delay).await;

            let post = Post {
                id: Uuid::new_v4(),
                author_id: draft.author_id,
                content: draft.content,
                media: None,
                hashtag: draft.hashtag,
                created_at: Utc::now(),
            };
            match PostRepository::new(db.pool.clone()).create(&post) {
                Ok(()) => tracing::info!("Published scheduled post {}", post.id),
                Err(err) => tracing::error!("Deferred post publication failed: {}", err),
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::ProfileRepository;
    use chrono::Duration;
    use ripple_types::Profile;

    fn author(db: &Database) -> Uuid {
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
        profile.id
    }

    #[tokio::test(start_paused = true)]
    async fn test_publishes_at_activation_time() {
        let db = Database::in_memory().expect("Failed to create test database");
        let author_id = author(&db);
        let scheduler = SpawnScheduler::new(db.clone());

        scheduler
            .schedule(ScheduledPost {
                author_id,
                content: "later".to_string(),
                hashtag: Hashtag::Other,
                publish_at: Utc::now() + Duration::seconds(60),
            })
            .await
            .expect("Failed to schedule");

        // Paused clock: sleeping past the activation time drives the
        // spawned task to completion.
        tokio::time::sleep(std::time::Duration::from_secs(61)).await;

        let posts = PostRepository::new(db.pool.clone())
            .feed(&author_id, None, 25, 0)
            .expect("Failed to read feed");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].content, "later");
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_activation_time_publishes_immediately() {
        let db = Database::in_memory().expect("Failed to create test database");
        let author_id = author(&db);
        let scheduler = SpawnScheduler::new(db.clone());

        scheduler
            .schedule(ScheduledPost {
                author_id,
                content: "overdue".to_string(),
                hashtag: Hashtag::Other,
                publish_at: Utc::now() - Duration::seconds(60),
            })
            .await
            .expect("Failed to schedule");

        tokio::time::sleep(std::time::Duration::from_millis(1)).await;

        let posts = PostRepository::new(db.pool.clone())
            .feed(&author_id, None, 25, 0)
            .expect("Failed to read feed");
        assert_eq!(posts.len(), 1);
    }
}
