//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Router::subscribe(RouteSubscription)
//!     → matcher.rs (evaluate current pathname)
//!     → listener invoked once with the current match
//!     → dispatcher.rs (sorted insert by group/index)
//!
//! Router::dispatch()
//!     → dispatcher.rs (snapshot, one pass over all subscriptions, commit)
//!     → Notification[] (entering first, then leaving)
//!     → listeners invoked in order
//! ```
//!
//! # Design Decisions
//! - Matching is supplied by the caller (any `RouteMatcher`); `PathPattern`
//!   covers the common segment patterns
//! - Deterministic: same pathname and history always produce the same
//!   notifications in the same order
//! - First match wins within an exclusivity group (ordered by index)

pub mod dispatcher;
pub mod matcher;
pub mod subscription;

pub use dispatcher::{Dispatcher, Notification, PassOutcome, PassSnapshot, SubscriptionId};
pub use matcher::{PathPattern, RouteMatcher};
pub use subscription::{Match, RouteListener, RouteSubscription, SubscriptionBuilder};
