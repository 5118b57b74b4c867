//! Cross-origin policy driven by an origin regex

use std::fmt;
use std::str::FromStr;

use axum::http::request::Parts;
use axum::http::{HeaderValue, Method};
use regex::Regex;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Regex an `Origin` header must match in full to be allowed.
#[derive(Debug, Clone)]
pub struct OriginPattern(Regex);

impl OriginPattern {
    /// Compile `pattern`, anchored at both ends.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{})$", pattern)).map(Self)
    }

    pub fn matches(&self, origin: &str) -> bool {
        self.0.is_match(origin)
    }

    /// CORS layer allowing matching origins with OPTIONS, GET and POST.
    pub fn layer(&self) -> CorsLayer {
        let pattern = self.clone();
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _parts: &Parts| {
                    origin.to_str().map(|o| pattern.matches(o)).unwrap_or(false)
                },
            ))
            .allow_methods([Method::OPTIONS, Method::GET, Method::POST])
            .allow_headers(Any)
    }
}

impl FromStr for OriginPattern {
    type Err = regex::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for OriginPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
