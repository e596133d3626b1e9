//! Route matching logic.
//!
//! # Responsibilities
//! - Define the matcher seam used by subscriptions
//! - Provide a path pattern matcher (`/users/:id`, `/files/*`)
//! - Produce structured match results (captured params)
//!
//! # Design Decisions
//! - Any `Fn(&str) -> Option<Value>` closure is a matcher
//! - Path matching is case-sensitive and segment-based
//! - Empty segments are ignored (`/a//b/` matches like `/a/b`)
//! - No regex to guarantee O(n) matching

use serde_json::{json, Map, Value};

use crate::error::ListenerError;
use crate::routing::subscription::Match;

/// Computes a match result for a pathname.
///
/// Matchers run against a snapshot of the subscription list, so they may
/// read router state or call back into the router. A matcher that changes
/// the location supersedes the pass it runs in.
pub trait RouteMatcher: Send + Sync {
    /// Returns `Some(payload)` when the pathname matches, `None` otherwise.
    fn is_match(&self, pathname: &str) -> Result<Match, ListenerError>;
}

impl<F> RouteMatcher for F
where
    F: Fn(&str) -> Match + Send + Sync,
{
    fn is_match(&self, pathname: &str) -> Result<Match, ListenerError> {
        Ok(self(pathname))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    Wildcard,
}

/// Matches pathnames against a segment pattern.
///
/// `:name` captures one segment, a trailing `*` captures the rest.
/// A match yields `{"pattern", "url", "is_exact", "params"}`.
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: String,
    segments: Vec<Segment>,
    exact: bool,
}

impl PathPattern {
    /// Create a prefix pattern: `/users` also matches `/users/42`.
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "*" => Segment::Wildcard,
                _ => match s.strip_prefix(':') {
                    Some(name) => Segment::Param(name.to_string()),
                    None => Segment::Static(s.to_string()),
                },
            })
            .collect();

        Self {
            pattern,
            segments,
            exact: false,
        }
    }

    /// Create a pattern that only matches when every segment is consumed.
    pub fn exact(pattern: impl Into<String>) -> Self {
        Self::new(pattern).with_exact(true)
    }

    pub fn with_exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Parameter names in declaration order (`*` for a wildcard).
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Param(name) => Some(name.as_str()),
                Segment::Wildcard => Some("*"),
                Segment::Static(_) => None,
            })
            .collect()
    }

    /// True when a wildcard appears anywhere but last.
    pub fn has_inner_wildcard(&self) -> bool {
        self.segments
            .iter()
            .rev()
            .skip(1)
            .any(|s| *s == Segment::Wildcard)
    }

    /// Match a pathname, returning the structured result.
    pub fn matches(&self, pathname: &str) -> Match {
        let path: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Map::new();
        let mut consumed = 0;

        for segment in &self.segments {
            match segment {
                Segment::Static(expected) => {
                    if path.get(consumed) != Some(&expected.as_str()) {
                        return None;
                    }
                    consumed += 1;
                }
                Segment::Param(name) => {
                    let value = path.get(consumed)?;
                    params.insert(name.clone(), Value::String((*value).to_string()));
                    consumed += 1;
                }
                Segment::Wildcard => {
                    params.insert("*".to_string(), Value::String(path[consumed..].join("/")));
                    consumed = path.len();
                    break;
                }
            }
        }

        let is_exact = consumed == path.len();
        if self.exact && !is_exact {
            return None;
        }

        Some(json!({
            "pattern": self.pattern,
            "url": format!("/{}", path[..consumed].join("/")),
            "is_exact": is_exact,
            "params": params,
        }))
    }
}

impl RouteMatcher for PathPattern {
    fn is_match(&self, pathname: &str) -> Result<Match, ListenerError> {
        Ok(self.matches(pathname))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matcher() {
        let matcher = PathPattern::new("/api");

        let matched = matcher.matches("/api/v1").unwrap();
        assert_eq!(matched["url"], "/api");
        assert_eq!(matched["is_exact"], false);

        assert!(matcher.matches("/images").is_none());
        assert!(matcher.matches("/apiv1").is_none());
    }

    #[test]
    fn test_exact_matcher() {
        let matcher = PathPattern::exact("/api");
        assert!(matcher.matches("/api").is_some());
        assert!(matcher.matches("/api/").is_some());
        assert!(matcher.matches("/api/v1").is_none());
    }

    #[test]
    fn test_params_captured() {
        let matcher = PathPattern::exact("/users/:id/posts/:post");
        let matched = matcher.matches("/users/42/posts/7").unwrap();
        assert_eq!(matched["params"], json!({ "id": "42", "post": "7" }));
        assert_eq!(matched["pattern"], "/users/:id/posts/:post");
        assert_eq!(matcher.param_names(), vec!["id", "post"]);
    }

    #[test]
    fn test_case_sensitive() {
        let matcher = PathPattern::new("/Users");
        assert!(matcher.matches("/users").is_none());
    }

    #[test]
    fn test_wildcard_captures_rest() {
        let matcher = PathPattern::exact("/files/*");
        let matched = matcher.matches("/files/a/b/c.txt").unwrap();
        assert_eq!(matched["params"]["*"], "a/b/c.txt");
        assert_eq!(matched["is_exact"], true);
        assert!(!matcher.has_inner_wildcard());
        assert!(PathPattern::new("/a/*/b").has_inner_wildcard());
    }

    #[test]
    fn test_root_pattern() {
        assert!(PathPattern::new("/").matches("/anything").is_some());
        assert!(PathPattern::exact("/").matches("/").is_some());
        assert!(PathPattern::exact("/").matches("/x").is_none());
    }

    #[test]
    fn test_closure_is_matcher() {
        let matcher = |pathname: &str| pathname.starts_with("/a").then(|| json!({}));
        assert_eq!(matcher.is_match("/abc").unwrap(), Some(json!({})));
        assert_eq!(matcher.is_match("/b").unwrap(), None);
    }
}
