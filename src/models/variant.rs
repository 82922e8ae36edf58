use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Which of the two review flavours the service runs as.
///
/// `Review` is the stall review board: scores 1 to 5, the comment is optional.
/// `Rating` is the project rating board: scores 0 to 5 where 0 marks a
/// text-only review that must carry a comment, and author names need at
/// least two characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Review,
    Rating,
}

impl Variant {
    pub fn min_score(self) -> i64 {
        match self {
            Variant::Review => 1,
            Variant::Rating => 0,
        }
    }

    pub fn max_score(self) -> i64 {
        5
    }

    pub fn min_author_len(self) -> usize {
        match self {
            Variant::Review => 1,
            Variant::Rating => 2,
        }
    }

    pub fn requires_text(self, score: i64) -> bool {
        self == Variant::Rating && score == 0
    }

    /// Table name and data file stem.
    pub fn collection(self) -> &'static str {
        match self {
            Variant::Review => "reviews",
            Variant::Rating => "ratings",
        }
    }

    pub fn route_prefix(self) -> &'static str {
        match self {
            Variant::Review => "/api/reviews",
            Variant::Rating => "/api/ratings",
        }
    }

    /// Singular noun used in client-facing messages.
    pub fn noun(self) -> &'static str {
        match self {
            Variant::Review => "Review",
            Variant::Rating => "Rating",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Variant::Review => 3000,
            Variant::Rating => 3001,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Review => write!(f, "review"),
            Variant::Rating => write!(f, "rating"),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "review" | "reviews" => Ok(Variant::Review),
            "rating" | "ratings" => Ok(Variant::Rating),
            other => Err(format!("Unknown variant '{other}', expected review or rating")),
        }
    }
}
