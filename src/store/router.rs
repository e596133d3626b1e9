//! The router state store.
//!
//! # Responsibilities
//! - Hold the current state snapshot (location + attributes)
//! - Merge patches and run a dispatch pass on every `set`
//! - Register subscriptions and hand out idempotent unsubscribe handles
//!
//! # Design Decisions
//! - One `Router` per routing session, constructed explicitly and cloned
//!   (cheap `Arc` clone) into every consumer
//! - Snapshots are swapped atomically; readers never block
//! - Mutations and passes hold a reentrant lock: calls from other threads
//!   wait, calls from a listener on the same thread re-enter
//! - Matchers and listeners run with no internal borrow held, so they may call `set`,
//!   `subscribe` or unsubscribe

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwapOption;
use parking_lot::ReentrantMutex;
use serde_json::Value;
use uuid::Uuid;

use crate::config::RouterConfig;
use crate::error::{RouterError, RouterResult};
use crate::location::{create_location, Location, LocationInput};
use crate::observability::metrics;
use crate::routing::{Dispatcher, RouteSubscription, SubscriptionId};
use crate::store::source::{LocationSource, StaticSource};
use crate::store::state::{RouterState, StatePatch};

/// Router tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterOptions {
    /// Maximum number of nested dispatch passes (a listener calling `set`
    /// starts a nested pass). `None` leaves re-entry unbounded.
    pub max_dispatch_depth: Option<usize>,

    /// Record passes, notifications, subscriptions and navigations through
    /// the `metrics` facade.
    pub metrics_enabled: bool,
}

impl From<&RouterConfig> for RouterOptions {
    fn from(config: &RouterConfig) -> Self {
        Self {
            max_dispatch_depth: config.dispatch.max_depth,
            metrics_enabled: config.observability.metrics_enabled,
        }
    }
}

struct Inner {
    dispatcher: Dispatcher,
    depth: usize,
}

struct Shared {
    source: Arc<dyn LocationSource>,
    state: ArcSwapOption<RouterState>,
    inner: ReentrantMutex<RefCell<Inner>>,
    options: RouterOptions,
}

/// Handle to the routing session.
#[derive(Clone)]
pub struct Router {
    shared: Arc<Shared>,
}

impl Router {
    /// Create a router reading its initial location from `source`.
    pub fn new(source: impl LocationSource + 'static) -> Self {
        Self::with_options(source, RouterOptions::default())
    }

    pub fn with_options(source: impl LocationSource + 'static, options: RouterOptions) -> Self {
        Self {
            shared: Arc::new(Shared {
                source: Arc::new(source),
                state: ArcSwapOption::empty(),
                inner: ReentrantMutex::new(RefCell::new(Inner {
                    dispatcher: Dispatcher::new(),
                    depth: 0,
                })),
                options,
            }),
        }
    }

    /// Create a router from configuration: the configured initial location
    /// and dispatch and metrics settings. Routes are subscribed by the caller.
    pub fn from_config(config: &RouterConfig) -> Self {
        let source = StaticSource::new(config.source.pathname.clone(), config.source.search.clone());
        Self::with_options(source, RouterOptions::from(config))
    }

    pub fn options(&self) -> &RouterOptions {
        &self.shared.options
    }

    /// Current state. Before the first `set`, the state is synthesized once
    /// from the location source.
    pub fn state(&self) -> Arc<RouterState> {
        if let Some(state) = self.shared.state.load_full() {
            return state;
        }

        let synthesized = Arc::new(RouterState::new(self.shared.source.location()));
        let previous = self
            .shared
            .state
            .compare_and_swap(&None::<Arc<RouterState>>, Some(Arc::clone(&synthesized)));
        match &*previous {
            Some(existing) => Arc::clone(existing),
            None => {
                tracing::debug!(
                    pathname = %synthesized.location.pathname,
                    "Synthesized initial state from location source"
                );
                synthesized
            }
        }
    }

    /// Read one attribute (`"location"` yields the serialized location).
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state().get(key)
    }

    pub fn location(&self) -> Location {
        self.state().location.clone()
    }

    /// Merge `patch` into the state and run a dispatch pass.
    pub fn set(&self, patch: impl Into<StatePatch>) -> RouterResult<()> {
        let _guard = self.shared.inner.lock();
        let next = self.state().merge(patch.into())?;
        self.shared.state.store(Some(Arc::new(next)));
        self.dispatch()
    }

    /// Navigate to a path relative to the current pathname.
    ///
    /// The new location carries a fresh key so that repeated navigations to
    /// the same path stay distinguishable.
    pub fn navigate(&self, to: impl Into<LocationInput>) -> RouterResult<Location> {
        let _guard = self.shared.inner.lock();
        let current = self.state();
        let key = Uuid::new_v4().simple().to_string();
        let location = create_location(to, Some(&current.location.pathname), Some(&key[..8]))?;

        tracing::info!(
            from = %current.location.pathname,
            to = %location.pathname,
            key = ?location.key,
            "Navigating"
        );
        if self.shared.options.metrics_enabled {
            metrics::record_navigation();
        }

        self.set(location.clone())?;
        Ok(location)
    }

    /// Re-evaluate every subscription against the current pathname and
    /// notify the ones whose match changed.
    ///
    /// A failing listener aborts the remaining notifications of this pass.
    /// Matchers run with no internal borrow held; when one of them changes
    /// the location, the nested pass wins and this one delivers nothing.
    pub fn dispatch(&self) -> RouterResult<()> {
        let guard = self.shared.inner.lock();
        let depth = DepthGuard::enter(&guard, self.shared.options.max_dispatch_depth)?;

        let pathname = self.state().location.pathname.clone();
        let snapshot = guard.borrow().dispatcher.snapshot();
        let outcome = snapshot.evaluate(&pathname);
        let current = guard.borrow_mut().dispatcher.commit(&outcome);
        let notifications = outcome.into_result()?;

        if !current {
            tracing::debug!(
                pathname = %pathname,
                depth = depth.level,
                "Dropping pass superseded by a nested pass"
            );
            return Ok(());
        }

        let entered = notifications.iter().filter(|n| n.is_entering()).count();
        let left = notifications.len() - entered;
        if self.shared.options.metrics_enabled {
            metrics::record_dispatch_pass(entered, left);
        }
        tracing::debug!(
            pathname = %pathname,
            depth = depth.level,
            entered,
            left,
            "Dispatch pass"
        );

        for notification in &notifications {
            let registered = guard.borrow().dispatcher.contains(notification.id);
            if !registered {
                tracing::trace!(
                    subscription = notification.id.as_u64(),
                    "Skipping listener removed during pass"
                );
                continue;
            }

            tracing::trace!(
                subscription = notification.id.as_u64(),
                name = ?notification.subscription.name(),
                entering = notification.is_entering(),
                "Notifying listener"
            );
            notification.deliver()?;
        }

        Ok(())
    }

    /// Register a subscription.
    ///
    /// The listener is invoked once, synchronously, with the match for the
    /// current pathname before this returns.
    ///
    /// The router keeps the listener alive until it is unsubscribed. A
    /// listener that captures a `Router` clone therefore keeps the whole
    /// router alive; capture [`Router::downgrade`] instead when the router
    /// should be dropped with its last outside handle.
    pub fn subscribe(&self, subscription: RouteSubscription) -> RouterResult<SubscriptionHandle> {
        let guard = self.shared.inner.lock();
        let pathname = self.state().location.pathname.clone();

        let matched = subscription.evaluate(&pathname)?;
        subscription.notify(matched.as_ref())?;

        let name = subscription.name().map(str::to_string);
        let (id, count) = {
            let mut inner = guard.borrow_mut();
            let id = inner.dispatcher.insert(Arc::new(subscription), matched);
            (id, inner.dispatcher.len())
        };

        if self.shared.options.metrics_enabled {
            metrics::record_subscriptions(count);
        }
        tracing::info!(subscription = id.as_u64(), name = ?name, total = count, "Subscribed");

        Ok(SubscriptionHandle {
            shared: Arc::downgrade(&self.shared),
            id,
            active: AtomicBool::new(true),
        })
    }

    /// A handle that does not keep the router alive.
    pub fn downgrade(&self) -> WeakRouter {
        WeakRouter {
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.shared.inner.lock().borrow().dispatcher.len()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("location", &self.location().path())
            .field("subscriptions", &self.subscription_count())
            .field("options", &self.shared.options)
            .finish()
    }
}

/// Non-owning router handle, for listeners that call back into the router.
#[derive(Clone)]
pub struct WeakRouter {
    shared: Weak<Shared>,
}

impl WeakRouter {
    /// `None` once every `Router` clone has been dropped.
    pub fn upgrade(&self) -> Option<Router> {
        self.shared.upgrade().map(|shared| Router { shared })
    }
}

impl fmt::Debug for WeakRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakRouter")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

/// Tracks nesting of dispatch passes for the lifetime of one pass.
struct DepthGuard<'a> {
    inner: &'a RefCell<Inner>,
    level: usize,
}

impl<'a> DepthGuard<'a> {
    fn enter(inner: &'a RefCell<Inner>, limit: Option<usize>) -> RouterResult<Self> {
        let mut state = inner.borrow_mut();
        if let Some(limit) = limit {
            if state.depth >= limit {
                tracing::warn!(limit, "Dispatch nesting limit reached");
                return Err(RouterError::DispatchDepthExceeded { limit });
            }
        }
        state.depth += 1;
        Ok(Self {
            inner,
            level: state.depth,
        })
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.inner.borrow_mut().depth -= 1;
    }
}

/// Returned by [`Router::subscribe`]. Unsubscribing is one-shot: later
/// calls do nothing.
pub struct SubscriptionHandle {
    shared: Weak<Shared>,
    id: SubscriptionId,
    active: AtomicBool,
}

impl SubscriptionHandle {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Remove the subscription. Safe to call any number of times, including
    /// from inside a listener.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }

        let Some(shared) = self.shared.upgrade() else {
            return;
        };

        let guard = shared.inner.lock();
        let (removed, count) = {
            let mut inner = guard.borrow_mut();
            let removed = inner.dispatcher.remove_listener(self.id);
            (removed, inner.dispatcher.len())
        };

        if removed {
            if shared.options.metrics_enabled {
                metrics::record_subscriptions(count);
            }
            tracing::info!(subscription = self.id.as_u64(), total = count, "Unsubscribed");
        }
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListenerError;
    use crate::routing::PathPattern;
    use parking_lot::Mutex;

    fn recorder() -> (
        Arc<Mutex<Vec<Option<Value>>>>,
        impl Fn(Option<&Value>) -> Result<(), ListenerError> + Send + Sync + 'static,
    ) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |m: Option<&Value>| {
            sink.lock().push(m.cloned());
            Ok(())
        })
    }

    #[test]
    fn test_default_state_from_source() {
        let router = Router::new(StaticSource::from_path("/start?tab=2"));
        let location = router.location();
        assert_eq!(location.pathname, "/start");
        assert_eq!(location.search, "?tab=2");
        assert_eq!(router.get("location").unwrap()["query"]["tab"], "2");
        assert!(router.get("missing").is_none());
    }

    #[test]
    fn test_set_merges_and_dispatches() {
        let router = Router::new(StaticSource::default());
        let (calls, listener) = recorder();
        router
            .subscribe(RouteSubscription::new(PathPattern::new("/a"), listener))
            .unwrap();
        assert_eq!(calls.lock().len(), 1);

        router.set(StatePatch::new().attribute("user", "u1")).unwrap();
        assert_eq!(calls.lock().len(), 1);

        router.navigate("/a").unwrap();
        assert_eq!(calls.lock().len(), 2);
        assert_eq!(router.get("user"), Some(Value::from("u1")));
    }

    #[test]
    fn test_navigate_resolves_and_keys() {
        let router = Router::new(StaticSource::from_path("/a/b"));
        let first = router.navigate("c?x=1").unwrap();
        assert_eq!(first.pathname, "/a/c");
        assert_eq!(first.key.as_ref().map(String::len), Some(8));

        let second = router.navigate("c?x=1").unwrap();
        assert_ne!(first.key, second.key);
        assert_eq!(router.location(), second);
    }

    #[test]
    fn test_navigate_decoding_error_leaves_state() {
        let router = Router::new(StaticSource::from_path("/a"));
        let err = router.navigate("/test%").unwrap_err();
        assert_eq!(err.to_string(), "Pathname \"/test%\" could not be decoded.");
        assert_eq!(router.location().pathname, "/a");
    }

    #[test]
    fn test_unsubscribe_twice() {
        let router = Router::new(StaticSource::default());
        let (calls, listener) = recorder();
        let handle = router
            .subscribe(RouteSubscription::new(PathPattern::new("/a"), listener))
            .unwrap();

        handle.unsubscribe();
        handle.unsubscribe();
        assert!(!handle.is_active());
        assert_eq!(router.subscription_count(), 0);

        router.navigate("/a").unwrap();
        assert_eq!(calls.lock().len(), 1);
    }

    #[test]
    fn test_depth_limit() {
        let router = Router::with_options(
            StaticSource::default(),
            RouterOptions {
                max_dispatch_depth: Some(1),
                ..RouterOptions::default()
            },
        );
        let inner = router.clone();
        router
            .subscribe(RouteSubscription::new(
                PathPattern::new("/loop"),
                move |m: Option<&Value>| {
                    if m.is_some() {
                        inner.set(StatePatch::new().attribute("again", true))?;
                    }
                    Ok(())
                },
            ))
            .unwrap();

        let err = router.navigate("/loop").unwrap_err();
        assert!(matches!(err, RouterError::Listener(_)));
        assert!(err.to_string().contains("Dispatch nesting exceeded limit of 1"));
    }

    #[test]
    fn test_options_from_config() {
        let mut config = RouterConfig::default();
        assert_eq!(Router::from_config(&config).options(), &RouterOptions::default());

        config.dispatch.max_depth = Some(4);
        config.observability.metrics_enabled = true;
        config.source.pathname = "/users/7".to_string();
        let router = Router::from_config(&config);
        assert_eq!(
            router.options(),
            &RouterOptions {
                max_dispatch_depth: Some(4),
                metrics_enabled: true,
            }
        );
        assert_eq!(router.location().pathname, "/users/7");
    }
}
