//! Router state store.
//!
//! # Data Flow
//! ```text
//! navigation event
//!     → Router::set(StatePatch) / Router::navigate(path)
//!     → state.rs (shallow merge into a new snapshot)
//!     → Router::dispatch()
//!     → routing::Dispatcher (one pass)
//!     → listeners (entering first, then leaving)
//!
//! first read with no state:
//!     → source.rs (external pathname + search)
//!     → synthesized RouterState
//! ```
//!
//! # Design Decisions
//! - Everything runs synchronously on the calling thread
//! - Re-entry from listeners is allowed; an optional depth limit bounds it
//! - Errors from matchers and listeners propagate to the caller untouched

pub mod router;
pub mod source;
pub mod state;

pub use router::{Router, RouterOptions, SubscriptionHandle, WeakRouter};
pub use source::{LocationSource, StaticSource};
pub use state::{RouterState, StatePatch, LOCATION_KEY};
