//! News categories
//!
//! The category set is closed: anything outside these six values is rejected
//! before it can reach storage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Article category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Mathematics,
    Physics,
    Chemistry,
    Medicine,
    Biology,
    #[serde(rename = "IT")]
    It,
}

impl Category {
    /// Every category, in seeding order.
    pub const ALL: [Category; 6] = [
        Category::Mathematics,
        Category::Physics,
        Category::Chemistry,
        Category::Medicine,
        Category::Biology,
        Category::It,
    ];

    /// Name as stored in the `categories` table and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mathematics => "Mathematics",
            Category::Physics => "Physics",
            Category::Chemistry => "Chemistry",
            Category::Medicine => "Medicine",
            Category::Biology => "Biology",
            Category::It => "IT",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// Exact, case-sensitive match against the six category names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidVariant {
                field: "category",
                value: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_names() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn rejects_unknown_and_wrong_case() {
        assert!(matches!(
            "Astronomy".parse::<Category>().unwrap_err(),
            ValidationError::InvalidVariant { .. }
        ));
        assert!("physics".parse::<Category>().is_err());
        assert!("It".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_as_plain_name() {
        assert_eq!(serde_json::to_string(&Category::It).unwrap(), "\"IT\"");
        assert_eq!(
            serde_json::to_string(&Category::Medicine).unwrap(),
            "\"Medicine\""
        );

        let parsed: Category = serde_json::from_str("\"IT\"").unwrap();
        assert_eq!(parsed, Category::It);
    }
}
