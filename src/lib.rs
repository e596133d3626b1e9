//! Client-side navigation coordinator.
//!
//! Tracks the current location and notifies route subscriptions whose match
//! changes, with exclusivity groups deciding which member of a group is
//! considered matched.

pub mod config;
pub mod error;
pub mod location;
pub mod observability;
pub mod routing;
pub mod store;

pub use config::RouterConfig;
pub use error::{ListenerError, RouterError, RouterResult};
pub use location::{create_location, resolve_pathname, value_equal, DecodingError, Location};
pub use routing::{PathPattern, RouteSubscription};
pub use store::{Router, StatePatch, StaticSource, SubscriptionHandle, WeakRouter};
