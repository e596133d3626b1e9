//! Location utilities.
//!
//! # Data Flow
//! ```text
//! raw path ("/a/b?x=1#top") or PartialLocation
//!     → parse.rs (split, decode pathname, parse query)
//!     → resolve.rs (relative pathname against the current one)
//!     → Location (immutable value)
//!
//! match results (previous, next)
//!     → equal.rs (structural comparison)
//!     → "changed" / "unchanged"
//! ```
//!
//! # Design Decisions
//! - Pure functions only; no access to router state
//! - Decoding failures are typed ([`DecodingError`]), everything else is total

pub mod equal;
pub mod parse;
pub mod resolve;
pub mod types;

pub use equal::value_equal;
pub use parse::{create_location, decode_pathname, parse_query};
pub use resolve::resolve_pathname;
pub use types::{DecodingError, Location, LocationInput, PartialLocation, Query};
