//! Location parsing.
//!
//! # Responsibilities
//! - Split a raw path into pathname, search and hash
//! - Decode the pathname (reserved-character escapes stay encoded)
//! - Resolve relative pathnames against the current one
//! - Derive the query mapping from the search string

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::location::resolve::resolve_pathname;
use crate::location::types::{DecodingError, Location, LocationInput, Query};

/// Characters whose escapes survive pathname decoding.
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Build a [`Location`] from a raw path or structured parts.
///
/// With `current_pathname`, an empty pathname becomes the current one and a
/// relative pathname is resolved against it. Without it, an empty pathname
/// becomes `/` and a relative one is kept as given.
pub fn create_location(
    input: impl Into<LocationInput>,
    current_pathname: Option<&str>,
    key: Option<&str>,
) -> Result<Location, DecodingError> {
    let (raw_pathname, search, hash) = match input.into() {
        LocationInput::Path(path) => split_path(&path),
        LocationInput::Parts(parts) => (
            parts.pathname.unwrap_or_default(),
            with_prefix(parts.search.unwrap_or_default(), '?'),
            with_prefix(parts.hash.unwrap_or_default(), '#'),
        ),
    };

    let decoded = decode_pathname(&raw_pathname)?;
    let pathname = match current_pathname {
        Some(current) if decoded.is_empty() => current.to_string(),
        Some(current) if !decoded.starts_with('/') => resolve_pathname(&decoded, Some(current)),
        _ if decoded.is_empty() => "/".to_string(),
        _ => decoded,
    };

    let query = parse_query(&search);

    Ok(Location {
        pathname,
        search,
        hash,
        query,
        key: key.map(str::to_string),
    })
}

impl Location {
    /// Wrap a pathname and search string read from an external source.
    ///
    /// The pathname is taken as is (no decoding, no resolution).
    pub fn from_raw(pathname: &str, search: &str) -> Self {
        let pathname = if pathname.is_empty() { "/" } else { pathname };
        let search = with_prefix(search.to_string(), '?');
        let query = parse_query(&search);
        Self {
            pathname: pathname.to_string(),
            search,
            hash: String::new(),
            query,
            key: None,
        }
    }
}

/// Split on the first `#`, then on the first `?`.
fn split_path(path: &str) -> (String, String, String) {
    let (rest, hash) = match path.find('#') {
        Some(i) => path.split_at(i),
        None => (path, ""),
    };
    let (pathname, search) = match rest.find('?') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };

    (
        pathname.to_string(),
        with_prefix(search.to_string(), '?'),
        with_prefix(hash.to_string(), '#'),
    )
}

/// Ensure a non-empty part starts with `prefix`; a bare prefix becomes empty.
fn with_prefix(part: String, prefix: char) -> String {
    if part.is_empty() || (part.len() == prefix.len_utf8() && part.starts_with(prefix)) {
        String::new()
    } else if part.starts_with(prefix) {
        part
    } else {
        format!("{}{}", prefix, part)
    }
}

/// Parse a search string into a query mapping. Later duplicate keys win.
pub fn parse_query(search: &str) -> Query {
    let raw = search.strip_prefix('?').unwrap_or(search);
    url::form_urlencoded::parse(raw.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Percent-decode a pathname, failing on malformed escapes.
///
/// Every `%` must start a two-digit hex escape and the decoded bytes must be
/// valid UTF-8.
pub fn decode_pathname(raw: &str) -> Result<String, DecodingError> {
    let fail = || DecodingError::new(raw);
    let mut out = String::with_capacity(raw.len());
    let mut chunk_start = 0;
    let mut i = 0;

    while let Some(offset) = raw[i..].find('%') {
        let at = i + offset;
        let escape = raw
            .get(at..at + 3)
            .filter(|escape| escape.bytes().skip(1).all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(fail)?;

        if percent_decode_str(escape).next().is_some_and(|b| RESERVED.contains(&b)) {
            out.push_str(&decode_chunk(&raw[chunk_start..at]).ok_or_else(fail)?);
            out.push_str(escape);
            chunk_start = at + 3;
        }
        i = at + 3;
    }

    out.push_str(&decode_chunk(&raw[chunk_start..]).ok_or_else(fail)?);
    Ok(out)
}

fn decode_chunk(chunk: &str) -> Option<Cow<'_, str>> {
    percent_decode_str(chunk).decode_utf8().ok()
}
