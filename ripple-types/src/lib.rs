pub mod enums;
pub mod models;

pub use enums::Hashtag;
pub use models::*;
