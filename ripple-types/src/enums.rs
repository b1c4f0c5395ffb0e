use serde::{Deserialize, Serialize};

/// The fixed hashtag vocabulary a post is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hashtag {
    Travel,
    Food,
    Sport,
    Music,
    Tech,
    Other,
}

impl Hashtag {
    pub const ALL: [Hashtag; 6] = [
        Hashtag::Travel,
        Hashtag::Food,
        Hashtag::Sport,
        Hashtag::Music,
        Hashtag::Tech,
        Hashtag::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hashtag::Travel => "Travel",
            Hashtag::Food => "Food",
            Hashtag::Sport => "Sport",
            Hashtag::Music => "Music",
            Hashtag::Tech => "Tech",
            Hashtag::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Travel" => Some(Hashtag::Travel),
            "Food" => Some(Hashtag::Food),
            "Sport" => Some(Hashtag::Sport),
            "Music" => Some(Hashtag::Music),
            "Tech" => Some(Hashtag::Tech),
            "Other" => Some(Hashtag::Other),
            _ => None,
        }
    }
}
