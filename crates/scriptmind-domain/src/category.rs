//! Category module - the three fixed extraction schemas

use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory category extracted from a document
///
/// Each category has its own record schema:
/// - Semantic: facts, concepts, character traits, world building
/// - Episodic: events, scenes, timeline, turning points
/// - Procedural: skills, processes, behaviors, rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// General knowledge about the story world and its characters
    Semantic,

    /// What happens, where and when
    Episodic,

    /// How characters do things
    Procedural,
}

impl Category {
    /// All categories in pipeline order
    pub const ALL: [Category; 3] = [Category::Semantic, Category::Episodic, Category::Procedural];

    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Semantic => "semantic",
            Category::Episodic => "episodic",
            Category::Procedural => "procedural",
        }
    }

    /// Parse a category from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "semantic" => Some(Category::Semantic),
            "episodic" => Some(Category::Episodic),
            "procedural" => Some(Category::Procedural),
            _ => None,
        }
    }

    /// Name of the primary field, the one that carries diagnostics
    /// when extraction for a chunk fails
    pub fn primary_field(&self) -> &'static str {
        match self {
            Category::Semantic => "facts",
            Category::Episodic => "events",
            Category::Procedural => "skills",
        }
    }

    /// Field names of the category's schema, primary field first
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Category::Semantic => &["facts", "concepts", "character_traits", "world_building"],
            Category::Episodic => &["events", "scenes", "timeline", "turning_points"],
            Category::Procedural => &["skills", "processes", "behaviors", "rules"],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_order() {
        assert_eq!(
            Category::ALL,
            [Category::Semantic, Category::Episodic, Category::Procedural]
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(Category::parse("semantic"), Some(Category::Semantic));
        assert_eq!(Category::parse(" Episodic "), Some(Category::Episodic));
        assert_eq!(Category::parse("PROCEDURAL"), Some(Category::Procedural));
        assert_eq!(Category::parse("emotional"), None);
        assert!("bogus".parse::<Category>().is_err());
    }

    #[test]
    fn test_primary_field_is_first_field() {
        for category in Category::ALL {
            assert_eq!(category.fields()[0], category.primary_field());
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Category::Episodic).unwrap();
        assert_eq!(json, "\"episodic\"");
        let parsed: Category = serde_json::from_str("\"procedural\"").unwrap();
        assert_eq!(parsed, Category::Procedural);
    }
}
