//! Relative pathname resolution.
//!
//! # Design Decisions
//! - Same semantics as URL resolution: a base without a trailing slash names a
//!   "file", so its last segment is replaced
//! - `..` past the root is absorbed for absolute results and preserved as
//!   leading `..` segments for relative ones
//! - Never fails; every input has a resolution

fn is_absolute(pathname: &str) -> bool {
    pathname.starts_with('/')
}

/// Resolve `to` against the base pathname `from`.
///
/// ```
/// use active_router::location::resolve_pathname;
///
/// assert_eq!(resolve_pathname("../c", Some("/a/b")), "/c");
/// assert_eq!(resolve_pathname(".", Some("/foo/bar")), "/foo/");
/// assert_eq!(resolve_pathname("c", None), "c");
/// ```
pub fn resolve_pathname(to: &str, from: Option<&str>) -> String {
    let from = from.unwrap_or("");

    let to_parts: Vec<&str> = if to.is_empty() { Vec::new() } else { to.split('/').collect() };
    let mut parts: Vec<&str> = if from.is_empty() { Vec::new() } else { from.split('/').collect() };

    let to_absolute = is_absolute(to);
    let must_end_absolute = to_absolute || is_absolute(from);

    if to_absolute {
        parts = to_parts;
    } else if !to_parts.is_empty() {
        // The base's last segment is a file, not a directory.
        parts.pop();
        parts.extend(to_parts);
    }

    if parts.is_empty() {
        return "/".to_string();
    }

    let has_trailing_slash = matches!(parts.last(), Some(&"") | Some(&".") | Some(&".."));

    let mut up = 0usize;
    let mut i = parts.len();
    while i > 0 {
        i -= 1;
        match parts[i] {
            "." => {
                parts.remove(i);
            }
            ".." => {
                parts.remove(i);
                up += 1;
            }
            _ if up > 0 => {
                parts.remove(i);
                up -= 1;
            }
            _ => {}
        }
    }

    if !must_end_absolute {
        for _ in 0..up {
            parts.insert(0, "..");
        }
    }

    if must_end_absolute && parts.first() != Some(&"") {
        parts.insert(0, "");
    }

    let mut result = parts.join("/");
    if has_trailing_slash && !result.ends_with('/') {
        result.push('/');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_not_given() {
        assert_eq!(resolve_pathname("c", None), "c");
    }

    #[test]
    fn test_from_relative() {
        assert_eq!(resolve_pathname("c", Some("a/b")), "a/c");
    }

    #[test]
    fn test_to_absolute() {
        assert_eq!(resolve_pathname("/c", Some("/a/b")), "/c");
    }

    #[test]
    fn test_to_empty() {
        assert_eq!(resolve_pathname("", Some("/a/b")), "/a/b");
    }

    #[test]
    fn test_sibling_of_parent() {
        assert_eq!(resolve_pathname("../c", Some("/a/b")), "/c");
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(resolve_pathname("c", Some("/a/b")), "/a/c");
    }

    #[test]
    fn test_from_index_path() {
        assert_eq!(resolve_pathname("c", Some("/a/")), "/a/c");
    }

    #[test]
    fn test_parent_directory() {
        assert_eq!(resolve_pathname("..", Some("/a/b")), "/");
    }

    #[test]
    fn test_url_resolution_table() {
        // (from, to, expected)
        let cases = [
            ("/foo/bar/baz", "quux", "/foo/bar/quux"),
            ("/foo/bar/baz", "quux/asdf", "/foo/bar/quux/asdf"),
            ("/foo/bar/baz", "quux/baz", "/foo/bar/quux/baz"),
            ("/foo/bar/baz", "../quux/baz", "/foo/quux/baz"),
            ("/foo/bar/baz", "/bar", "/bar"),
            ("/foo/bar/baz/", "quux", "/foo/bar/baz/quux"),
            ("/foo/bar/baz/", "quux/baz", "/foo/bar/baz/quux/baz"),
            ("/foo/bar/baz", "../../../../../../../../quux/baz", "/quux/baz"),
            ("/foo/bar/baz", "../../../../../../../quux/baz", "/quux/baz"),
            ("/foo", ".", "/"),
            ("/foo", "..", "/"),
            ("/foo/", ".", "/foo/"),
            ("/foo/", "..", "/"),
            ("/foo/bar", ".", "/foo/"),
            ("/foo/bar", "..", "/"),
            ("/foo/bar/", ".", "/foo/bar/"),
            ("/foo/bar/", "..", "/foo/"),
            ("foo/bar", "../../../baz", "../../baz"),
            ("foo/bar/", "../../../baz", "../baz"),
            ("/foo/bar/baz", "/../etc/passwd", "/etc/passwd"),
        ];

        for (from, to, expected) in cases {
            assert_eq!(
                resolve_pathname(to, Some(from)),
                expected,
                "resolve_pathname({:?}, {:?})",
                to,
                from
            );
        }
    }

    #[test]
    fn test_root() {
        assert_eq!(resolve_pathname("/", Some("/a/b")), "/");
        assert_eq!(resolve_pathname("", None), "/");
    }
}
