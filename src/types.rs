/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of list categories. Each variant owns one storage namespace
/// (a table or in-memory bucket named after the category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Anime,
    Games,
    Movies,
    Shows,
    Books,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Anime,
        Category::Games,
        Category::Movies,
        Category::Shows,
        Category::Books,
    ];

    /// Storage namespace for this category
    pub fn table_name(self) -> &'static str {
        match self {
            Category::Anime => "anime",
            Category::Games => "games",
            Category::Movies => "movies",
            Category::Shows => "shows",
            Category::Books => "books",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid category: {0}")]
pub struct InvalidCategory(pub String);

impl FromStr for Category {
    type Err = InvalidCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.table_name() == s)
            .ok_or_else(|| InvalidCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_allowed_category() {
        for name in ["anime", "games", "movies", "shows", "books"] {
            let category: Category = name.parse().unwrap();
            assert_eq!(category.table_name(), name);
            assert_eq!(category.to_string(), name);
        }
    }

    #[test]
    fn rejects_unknown_and_mixed_case() {
        assert!("music".parse::<Category>().is_err());
        assert!("Anime".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
        assert!("anime ".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_value(Category::Shows).unwrap(), "shows");
    }
}
