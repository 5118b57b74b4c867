//! Article model and field validation
//!
//! Incoming JSON lands in [`ArticlePayload`] (plain strings and integers) and
//! only becomes an [`Article`] after every field passes its rule:
//!
//! | field          | rule                  |
//! |----------------|-----------------------|
//! | title          | 1..=100 characters    |
//! | author         | 1..=50 characters     |
//! | text           | 1..=2000 characters   |
//! | agency         | 1..=50 characters     |
//! | category       | one of [`Category`]   |
//! | user_submitted | 0 or 1                |

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::validation::check_length;
use super::{Category, ValidationError};

/// Declares a validated, length-bounded text field.
macro_rules! bounded_text {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Maximum length in characters.
            pub const MAX_LEN: usize = $max;

            pub fn new(s: &str) -> Result<Self, ValidationError> {
                check_length($field, s, Self::MAX_LEN)?;
                Ok(Self(s.to_owned()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

bounded_text!(
    /// Article headline
    ArticleTitle, "title", 100
);
bounded_text!(AuthorName, "author", 50);
bounded_text!(
    /// Article body
    ArticleText, "text", 2000
);
bounded_text!(
    /// Publishing agency
    AgencyName, "agency", 50
);

/// Whether an article came from a user submission (1) or the bundled seed set (0).
///
/// Stored and serialized as an integer to keep the wire format `0|1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserSubmitted(u8);

impl UserSubmitted {
    pub const SEEDED: UserSubmitted = UserSubmitted(0);
    pub const USER: UserSubmitted = UserSubmitted(1);

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        match value {
            0 => Ok(Self::SEEDED),
            1 => Ok(Self::USER),
            _ => Err(ValidationError::OutOfRange {
                field: "user_submitted",
                value,
                min: 0,
                max: 1,
            }),
        }
    }

    pub fn as_i16(&self) -> i16 {
        i16::from(self.0)
    }

    pub fn is_user(&self) -> bool {
        self.0 == 1
    }
}

/// A validated news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: ArticleTitle,
    pub date: DateTime<Utc>,
    pub author: AuthorName,
    pub text: ArticleText,
    pub agency: AgencyName,
    pub category: Category,
    pub user_submitted: UserSubmitted,
}

/// Unvalidated article as received over HTTP.
///
/// `user_submitted` must be a JSON integer; strings and booleans fail to deserialize.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticlePayload {
    pub title: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
    pub author: String,
    pub text: String,
    pub agency: String,
    pub category: String,
    pub user_submitted: i64,
}

/// Timestamp layouts accepted without an offset; these are read as UTC.
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an RFC 3339 timestamp, or an offset-less ISO 8601 one taken as UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s)))
}

impl TryFrom<ArticlePayload> for Article {
    type Error = ValidationError;

    fn try_from(p: ArticlePayload) -> Result<Self, Self::Error> {
        Ok(Self {
            title: ArticleTitle::new(&p.title)?,
            date: p.date,
            author: AuthorName::new(&p.author)?,
            text: ArticleText::new(&p.text)?,
            agency: AgencyName::new(&p.agency)?,
            category: p.category.parse()?,
            user_submitted: UserSubmitted::new(p.user_submitted)?,
        })
    }
}
