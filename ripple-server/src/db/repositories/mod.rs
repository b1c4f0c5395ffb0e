pub mod comment_repository;
pub mod follow_repository;
pub mod like_repository;
pub mod post_repository;
pub mod profile_repository;

pub use comment_repository::CommentRepository;
pub use follow_repository::{FollowOutcome, FollowRepository};
pub use like_repository::{LikeOutcome, LikeRepository};
pub use post_repository::PostRepository;
pub use profile_repository::ProfileRepository;
