use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use ripple_types::{FeedPost, Hashtag, Post};

use crate::db::DbPool;

pub struct PostRepository {
    pool: DbPool,
}

/// Shared SELECT head for feed-shaped rows: the post, its author's name,
/// and the two aggregate counts computed inside the same statement so a
/// post's existence and its counts can never disagree.
const FEED_SELECT: &str = "SELECT p.id, p.author_id, pr.first_name || ' ' || pr.last_name AS author_name,
        p.content, p.media, p.hashtag, p.created_at,
        (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
 FROM posts p
 JOIN profiles pr ON pr.id = p.author_id";

/// Restricts rows to the viewer's visible-author set: their own posts plus
/// posts by profiles they currently follow.
const VISIBLE_TO_VIEWER: &str = "(p.author_id = ?1
    OR p.author_id IN (SELECT following_id FROM follows WHERE follower_id = ?1))";

fn map_feed_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FeedPost> {
    Ok(FeedPost {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
        author_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap(),
        author_name: row.get(2)?,
        content: row.get(3)?,
        media: row.get(4)?,
        hashtag: Hashtag::parse(&row.get::<_, String>(5)?).unwrap(),
        created_at: row.get::<_, String>(6)?.parse::<DateTime<Utc>>().unwrap(),
        like_count: row.get(7)?,
        comment_count: row.get(8)?,
    })
}

impl PostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post
    pub fn create(&self, post: &Post) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO posts (id, author_id, content, media, hashtag, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                post.id.to_string(),
                post.author_id.to_string(),
                &post.content,
                &post.media,
                post.hashtag.as_str(),
                post.created_at.to_rfc3339(),
            ),
        )
        .context("Failed to create post")?;
        Ok(())
    }

    /// Compose the viewer's feed: posts by the viewer and by everyone they
    /// follow, newest first, annotated with live like/comment counts.
    /// `hashtag` narrows to tags containing the given substring,
    /// case-insensitively.
    pub fn feed(
        &self,
        viewer_id: &Uuid,
        hashtag: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FeedPost>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "{FEED_SELECT}
             WHERE {VISIBLE_TO_VIEWER}
               AND (?2 IS NULL OR LOWER(p.hashtag) LIKE '%' || LOWER(?2) || '%')
             ORDER BY p.created_at DESC
             LIMIT ?3 OFFSET ?4"
        ))?;

        let posts = stmt
            .query_map((viewer_id.to_string(), hashtag, limit, offset), map_feed_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Retrieve one post in feed shape, only if it sits inside the viewer's
    /// visible-author set.
    pub fn get_for_viewer(&self, post_id: &Uuid, viewer_id: &Uuid) -> Result<Option<FeedPost>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "{FEED_SELECT}
             WHERE {VISIBLE_TO_VIEWER} AND p.id = ?2"
        ))?;

        let post = stmt
            .query_row((viewer_id.to_string(), post_id.to_string()), map_feed_row)
            .optional()?;

        Ok(post)
    }

    /// Get the raw post row (ownership checks, media replacement)
    pub fn get_by_id(&self, post_id: &Uuid) -> Result<Option<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, author_id, content, media, hashtag, created_at
             FROM posts WHERE id = ?",
        )?;

        let post = stmt
            .query_row([post_id.to_string()], |row| {
                Ok(Post {
                    id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap(),
                    author_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap(),
                    content: row.get(2)?,
                    media: row.get(3)?,
                    hashtag: Hashtag::parse(&row.get::<_, String>(4)?).unwrap(),
                    created_at: row.get::<_, String>(5)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })
            .optional()?;

        Ok(post)
    }

    /// Posts the given profile has liked, newest first
    pub fn liked_by(&self, profile_id: &Uuid) -> Result<Vec<FeedPost>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "{FEED_SELECT}
             WHERE p.id IN (SELECT post_id FROM likes WHERE author_id = ?1)
             ORDER BY p.created_at DESC"
        ))?;

        let posts = stmt
            .query_map([profile_id.to_string()], map_feed_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    /// Replace the media reference; content itself is immutable
    pub fn set_media(&self, post_id: &Uuid, media_key: &str) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE posts SET media = ? WHERE id = ?",
            (media_key, post_id.to_string()),
        )
        .context("Failed to set post media")?;
        Ok(())
    }

    /// Delete a post; the store cascades to its comments and likes
    pub fn delete(&self, post_id: &Uuid) -> Result<usize> {
        let conn = self.pool.get()?;
        let rows = conn
            .execute("DELETE FROM posts WHERE id = ?", [post_id.to_string()])
            .context("Failed to delete post")?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CommentRepository, FollowRepository, LikeRepository, ProfileRepository,
    };
    use crate::db::Database;
    use ripple_types::{Comment, Profile};

    struct Fixture {
        db: Database,
        posts: PostRepository,
        follows: FollowRepository,
        likes: LikeRepository,
        comments: CommentRepository,
        a: Uuid,
        b: Uuid,
        c: Uuid,
    }

    fn fixture() -> Fixture {
        let db = Database::in_memory().expect("Failed to create test database");
        let profiles = ProfileRepository::new(db.pool.clone());
        let mut ids = Vec::new();
        for name in ["Ada", "Ben", "Cleo"] {
            let profile = Profile {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                first_name: name.to_string(),
                last_name: "Test".to_string(),
                biography: String::new(),
                profile_picture: None,
                phone_number: None,
                birth_date: None,
                created_at: Utc::now(),
            };
            profiles.create(&profile).expect("Failed to create profile");
            ids.push(profile.id);
        }
        Fixture {
            posts: PostRepository::new(db.pool.clone()),
            follows: FollowRepository::new(db.pool.clone()),
            likes: LikeRepository::new(db.pool.clone()),
            comments: CommentRepository::new(db.pool.clone()),
            db,
            a: ids[0],
            b: ids[1],
            c: ids[2],
        }
    }

    fn make_post(author: Uuid, content: &str, hashtag: Hashtag, at: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id: author,
            content: content.to_string(),
            media: None,
            hashtag,
            created_at: at.parse().unwrap(),
        }
    }

    #[test]
    fn test_feed_scenario_follow_like_and_filter() {
        let fx = fixture();
        // A follows B. B posts "hello" (Travel), C posts "world" (Food).
        fx.follows.follow(&fx.a, &fx.b).unwrap();
        let hello = make_post(fx.b, "hello", Hashtag::Travel, "2024-01-10T10:00:00Z");
        let world = make_post(fx.c, "world", Hashtag::Food, "2024-01-10T11:00:00Z");
        fx.posts.create(&hello).unwrap();
        fx.posts.create(&world).unwrap();

        let feed = fx.posts.feed(&fx.a, None, 25, 0).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].content, "hello");
        assert_eq!(feed[0].author_name, "Ben Test");
        assert_eq!(feed[0].like_count, 0);
        assert_eq!(feed[0].comment_count, 0);

        // A likes B's post: the aggregate reflects it on the next read
        fx.likes.like(&fx.a, &hello.id).unwrap();
        let feed = fx.posts.feed(&fx.a, None, 25, 0).unwrap();
        assert_eq!(feed[0].like_count, 1);

        // Case-insensitive substring filter on the hashtag
        let travel = fx.posts.feed(&fx.a, Some("trav"), 25, 0).unwrap();
        assert_eq!(travel.len(), 1);
        assert_eq!(travel[0].content, "hello");
        let food = fx.posts.feed(&fx.a, Some("food"), 25, 0).unwrap();
        assert!(food.is_empty());
    }

    #[test]
    fn test_feed_always_contains_own_posts() {
        let fx = fixture();
        let own = make_post(fx.a, "mine", Hashtag::Other, "2024-01-01T00:00:00Z");
        fx.posts.create(&own).unwrap();

        let feed = fx.posts.feed(&fx.a, None, 25, 0).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, own.id);
    }

    #[test]
    fn test_feed_tracks_the_live_follow_graph() {
        let fx = fixture();
        let post = make_post(fx.b, "from ben", Hashtag::Tech, "2024-01-05T00:00:00Z");
        fx.posts.create(&post).unwrap();

        assert!(fx.posts.feed(&fx.a, None, 25, 0).unwrap().is_empty());

        fx.follows.follow(&fx.a, &fx.b).unwrap();
        assert_eq!(fx.posts.feed(&fx.a, None, 25, 0).unwrap().len(), 1);

        fx.follows.unfollow(&fx.a, &fx.b).unwrap();
        assert!(fx.posts.feed(&fx.a, None, 25, 0).unwrap().is_empty());
    }

    #[test]
    fn test_feed_is_ordered_and_idempotent() {
        let fx = fixture();
        fx.follows.follow(&fx.a, &fx.b).unwrap();
        for (content, at) in [
            ("oldest", "2024-01-01T00:00:00Z"),
            ("middle", "2024-01-02T00:00:00Z"),
            ("newest", "2024-01-03T00:00:00Z"),
        ] {
            fx.posts
                .create(&make_post(fx.b, content, Hashtag::Music, at))
                .unwrap();
        }

        let first = fx.posts.feed(&fx.a, None, 25, 0).unwrap();
        let contents: Vec<_> = first.iter().map(|p| p.content.as_str()).collect();
        assert_eq!(contents, ["newest", "middle", "oldest"]);

        // No intervening writes: identical ordered result
        let second = fx.posts.feed(&fx.a, None, 25, 0).unwrap();
        let ids_first: Vec<_> = first.iter().map(|p| p.id).collect();
        let ids_second: Vec<_> = second.iter().map(|p| p.id).collect();
        assert_eq!(ids_first, ids_second);

        // Pagination walks the same ordering
        let page = fx.posts.feed(&fx.a, None, 1, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].content, "middle");
    }

    #[test]
    fn test_post_appears_once_despite_join_fanout() {
        let fx = fixture();
        let post = make_post(fx.a, "busy post", Hashtag::Sport, "2024-01-01T00:00:00Z");
        fx.posts.create(&post).unwrap();

        fx.likes.like(&fx.b, &post.id).unwrap();
        fx.likes.like(&fx.c, &post.id).unwrap();
        for i in 0..3 {
            let comment = Comment {
                id: Uuid::new_v4(),
                author_id: fx.b,
                post_id: post.id,
                content: format!("comment {i}"),
                created_at: Utc::now(),
            };
            fx.comments.create(&comment).unwrap();
        }

        let feed = fx.posts.feed(&fx.a, None, 25, 0).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].like_count, 2);
        assert_eq!(feed[0].comment_count, 3);
    }

    #[test]
    fn test_like_count_survives_toggle_cycles() {
        let fx = fixture();
        let post = make_post(fx.a, "toggle target", Hashtag::Food, "2024-01-01T00:00:00Z");
        fx.posts.create(&post).unwrap();

        fx.likes.like(&fx.b, &post.id).unwrap();
        fx.likes.unlike(&fx.b, &post.id).unwrap();
        fx.likes.like(&fx.b, &post.id).unwrap();
        fx.likes.like(&fx.c, &post.id).unwrap();

        let feed = fx.posts.feed(&fx.a, None, 25, 0).unwrap();
        assert_eq!(feed[0].like_count, 2);
    }

    #[test]
    fn test_get_for_viewer_respects_visibility() {
        let fx = fixture();
        let post = make_post(fx.b, "scoped", Hashtag::Tech, "2024-01-01T00:00:00Z");
        fx.posts.create(&post).unwrap();

        assert!(fx.posts.get_for_viewer(&post.id, &fx.a).unwrap().is_none());

        fx.follows.follow(&fx.a, &fx.b).unwrap();
        let visible = fx.posts.get_for_viewer(&post.id, &fx.a).unwrap().unwrap();
        assert_eq!(visible.id, post.id);

        // The author always sees their own post
        assert!(fx.posts.get_for_viewer(&post.id, &fx.b).unwrap().is_some());
    }

    #[test]
    fn test_liked_by_lists_only_liked_posts() {
        let fx = fixture();
        let liked = make_post(fx.b, "liked one", Hashtag::Travel, "2024-01-01T00:00:00Z");
        let other = make_post(fx.b, "ignored one", Hashtag::Travel, "2024-01-02T00:00:00Z");
        fx.posts.create(&liked).unwrap();
        fx.posts.create(&other).unwrap();
        fx.likes.like(&fx.a, &liked.id).unwrap();

        let posts = fx.posts.liked_by(&fx.a).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, liked.id);
        assert_eq!(posts[0].like_count, 1);
    }

    #[test]
    fn test_delete_cascades_to_comments_and_likes() {
        let fx = fixture();
        let post = make_post(fx.a, "doomed", Hashtag::Other, "2024-01-01T00:00:00Z");
        fx.posts.create(&post).unwrap();
        fx.likes.like(&fx.b, &post.id).unwrap();
        fx.comments
            .create(&Comment {
                id: Uuid::new_v4(),
                author_id: fx.b,
                post_id: post.id,
                content: "gone soon".to_string(),
                created_at: Utc::now(),
            })
            .unwrap();

        assert_eq!(fx.posts.delete(&post.id).unwrap(), 1);

        let conn = fx.db.connection().unwrap();
        let likes: i64 = conn
            .query_row("SELECT COUNT(*) FROM likes", [], |row| row.get(0))
            .unwrap();
        let comments: i64 = conn
            .query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(likes, 0);
        assert_eq!(comments, 0);
    }
}
