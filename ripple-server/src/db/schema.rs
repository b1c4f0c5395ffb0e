/// SQL schema for the Ripple database
/// Creates all tables with proper constraints, foreign keys, and indexes
pub const SCHEMA: &str = r#"
-- Profiles table (one row per account identity)
CREATE TABLE IF NOT EXISTS profiles (
    id TEXT PRIMARY KEY,
    user_id TEXT UNIQUE NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    biography TEXT NOT NULL,
    profile_picture TEXT,
    phone_number TEXT UNIQUE,
    birth_date TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_profiles_user_id ON profiles(user_id);

-- Follows table (one-way relationships)
CREATE TABLE IF NOT EXISTS follows (
    follower_id TEXT NOT NULL,
    following_id TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    PRIMARY KEY (follower_id, following_id),
    CHECK (follower_id <> following_id),
    FOREIGN KEY (follower_id) REFERENCES profiles(id) ON DELETE CASCADE,
    FOREIGN KEY (following_id) REFERENCES profiles(id) ON DELETE CASCADE
);

-- Indexes for efficient follow lookups
CREATE INDEX IF NOT EXISTS idx_follows_follower ON follows(follower_id);
CREATE INDEX IF NOT EXISTS idx_follows_following ON follows(following_id);

-- Posts table
CREATE TABLE IF NOT EXISTS posts (
    id TEXT PRIMARY KEY,
    author_id TEXT NOT NULL,
    content TEXT NOT NULL CHECK(length(content) > 0),
    media TEXT,
    hashtag TEXT NOT NULL
        CHECK(hashtag IN ('Travel', 'Food', 'Sport', 'Music', 'Tech', 'Other')),
    created_at TEXT NOT NULL,
    FOREIGN KEY (author_id) REFERENCES profiles(id) ON DELETE CASCADE
);

-- Create index on created_at for efficient feed sorting
CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at DESC);
CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id);

-- Comments table
CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    author_id TEXT NOT NULL,
    post_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY (author_id) REFERENCES profiles(id) ON DELETE CASCADE,
    FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id);
CREATE INDEX IF NOT EXISTS idx_comments_author ON comments(author_id);

-- Likes table (one per author/post pair)
CREATE TABLE IF NOT EXISTS likes (
    author_id TEXT NOT NULL,
    post_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    PRIMARY KEY (author_id, post_id),
    FOREIGN KEY (author_id) REFERENCES profiles(id) ON DELETE CASCADE,
    FOREIGN KEY (post_id) REFERENCES posts(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_likes_post ON likes(post_id);
"#;

/// Demo data for development
/// Three profiles, a small follow graph, and enough posts, likes, and
/// comments to make the feed endpoints show something out of the box.
pub const DEMO_DATA: &str = r#"
-- ============================================================================
-- DEMO PROFILES
-- ============================================================================
INSERT OR IGNORE INTO profiles (id, user_id, first_name, last_name, biography, profile_picture, phone_number, birth_date, created_at) VALUES
    ('550e8400-e29b-41d4-a716-446655440001', '110e8400-e29b-41d4-a716-446655440001', 'Alice', 'Nguyen', 'Backpacker, always between airports.', NULL, '+14155550101', '1993-04-12', '2024-01-01T00:00:00Z'),
    ('550e8400-e29b-41d4-a716-446655440002', '110e8400-e29b-41d4-a716-446655440002', 'Bruno', 'Costa', 'Home cook chasing the perfect stew.', NULL, '+14155550102', '1988-11-02', '2024-01-02T00:00:00Z'),
    ('550e8400-e29b-41d4-a716-446655440003', '110e8400-e29b-41d4-a716-446655440003', 'Carla', 'Meyer', 'Synths by night, spreadsheets by day.', NULL, NULL, NULL, '2024-01-03T00:00:00Z');

-- ============================================================================
-- FOLLOW GRAPH
-- ============================================================================
INSERT OR IGNORE INTO follows (follower_id, following_id, created_at) VALUES
    ('550e8400-e29b-41d4-a716-446655440001', '550e8400-e29b-41d4-a716-446655440002', 1704672000),
    ('550e8400-e29b-41d4-a716-446655440002', '550e8400-e29b-41d4-a716-446655440001', 1704672060),
    ('550e8400-e29b-41d4-a716-446655440003', '550e8400-e29b-41d4-a716-446655440001', 1704758400);

-- ============================================================================
-- DEMO POSTS
-- ============================================================================
INSERT OR IGNORE INTO posts (id, author_id, content, media, hashtag, created_at) VALUES
    ('650e8400-e29b-41d4-a716-446655440001', '550e8400-e29b-41d4-a716-446655440001', 'Overnight train to Ljubljana, best decision of the trip.', NULL, 'Travel', '2024-01-10T10:00:00Z'),
    ('650e8400-e29b-41d4-a716-446655440002', '550e8400-e29b-41d4-a716-446655440002', 'Feijoada attempt number four. The beans finally cooperated.', NULL, 'Food', '2024-01-10T12:30:00Z'),
    ('650e8400-e29b-41d4-a716-446655440003', '550e8400-e29b-41d4-a716-446655440003', 'New patch sounds like a dial-up modem falling in love.', NULL, 'Music', '2024-01-11T09:15:00Z'),
    ('650e8400-e29b-41d4-a716-446655440004', '550e8400-e29b-41d4-a716-446655440001', 'Packing list: one jacket, three chargers, zero regrets.', NULL, 'Travel', '2024-01-12T08:00:00Z');

-- ============================================================================
-- LIKES AND COMMENTS
-- ============================================================================
INSERT OR IGNORE INTO likes (author_id, post_id, created_at) VALUES
    ('550e8400-e29b-41d4-a716-446655440002', '650e8400-e29b-41d4-a716-446655440001', '2024-01-10T11:00:00Z'),
    ('550e8400-e29b-41d4-a716-446655440003', '650e8400-e29b-41d4-a716-446655440001', '2024-01-10T11:05:00Z'),
    ('550e8400-e29b-41d4-a716-446655440001', '650e8400-e29b-41d4-a716-446655440002', '2024-01-10T13:00:00Z');

INSERT OR IGNORE INTO comments (id, author_id, post_id, content, created_at) VALUES
    ('750e8400-e29b-41d4-a716-446655440001', '550e8400-e29b-41d4-a716-446655440002', '650e8400-e29b-41d4-a716-446655440001', 'Which carriage? The old ones rattle like maracas.', '2024-01-10T11:10:00Z'),
    ('750e8400-e29b-41d4-a716-446655440002', '550e8400-e29b-41d4-a716-446655440001', '650e8400-e29b-41d4-a716-446655440002', 'Save me a bowl.', '2024-01-10T13:05:00Z');
"#;
