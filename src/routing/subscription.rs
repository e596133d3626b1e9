//! Route subscriptions.
//!
//! A subscription pairs a matcher with a listener and optionally places it in
//! an exclusivity group. Within a group, the lowest `group_index` that matches
//! wins and every other member sees `None`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{ListenerError, RouterError, RouterResult};
use crate::routing::matcher::RouteMatcher;

/// Match result: `Some(payload)` for a match, `None` for no match.
pub type Match = Option<Value>;

/// Receives match changes.
pub trait RouteListener: Send + Sync {
    fn on_change(&self, matched: Option<&Value>) -> Result<(), ListenerError>;
}

impl<F> RouteListener for F
where
    F: Fn(Option<&Value>) -> Result<(), ListenerError> + Send + Sync,
{
    fn on_change(&self, matched: Option<&Value>) -> Result<(), ListenerError> {
        self(matched)
    }
}

/// A registered (matcher, listener) pair with optional group membership.
#[derive(Clone)]
pub struct RouteSubscription {
    matcher: Arc<dyn RouteMatcher>,
    listener: Arc<dyn RouteListener>,
    group_id: Option<String>,
    group_index: Option<u32>,
    name: Option<String>,
}

impl RouteSubscription {
    /// Create an ungrouped subscription.
    pub fn new<M, L>(matcher: M, listener: L) -> Self
    where
        M: RouteMatcher + 'static,
        L: Fn(Option<&Value>) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        Self {
            matcher: Arc::new(matcher),
            listener: Arc::new(listener),
            group_id: None,
            group_index: None,
            name: None,
        }
    }

    pub fn builder() -> SubscriptionBuilder {
        SubscriptionBuilder::default()
    }

    /// Place the subscription in an exclusivity group. An empty id means
    /// ungrouped.
    pub fn in_group(mut self, group_id: impl Into<String>, group_index: u32) -> Self {
        let group_id = group_id.into();
        if group_id.is_empty() {
            self.group_id = None;
            self.group_index = None;
        } else {
            self.group_id = Some(group_id);
            self.group_index = Some(group_index);
        }
        self
    }

    /// Label used in logs.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    pub fn group_index(&self) -> Option<u32> {
        self.group_index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Dispatch order key: ungrouped first, then by group id and index.
    pub(crate) fn sort_key(&self) -> (Option<&str>, Option<u32>) {
        (self.group_id.as_deref(), self.group_index)
    }

    pub(crate) fn evaluate(&self, pathname: &str) -> RouterResult<Match> {
        self.matcher
            .is_match(pathname)
            .map_err(|source| RouterError::Matcher {
                pathname: pathname.to_string(),
                source,
            })
    }

    pub(crate) fn notify(&self, matched: Option<&Value>) -> RouterResult<()> {
        self.listener.on_change(matched).map_err(RouterError::Listener)
    }
}

impl fmt::Debug for RouteSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSubscription")
            .field("name", &self.name)
            .field("group_id", &self.group_id)
            .field("group_index", &self.group_index)
            .finish_non_exhaustive()
    }
}

/// Builder for subscriptions assembled from parts (config, plugins).
#[derive(Default)]
pub struct SubscriptionBuilder {
    matcher: Option<Arc<dyn RouteMatcher>>,
    listener: Option<Arc<dyn RouteListener>>,
    group: Option<(String, u32)>,
    name: Option<String>,
}

impl SubscriptionBuilder {
    pub fn matcher(mut self, matcher: impl RouteMatcher + 'static) -> Self {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    pub fn listener<L>(mut self, listener: L) -> Self
    where
        L: Fn(Option<&Value>) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        self.listener = Some(Arc::new(listener));
        self
    }

    /// Use a shared listener implementation.
    pub fn shared_listener(mut self, listener: Arc<dyn RouteListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn group(mut self, group_id: impl Into<String>, group_index: u32) -> Self {
        self.group = Some((group_id.into(), group_index));
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Fails with [`RouterError::InvalidSubscriber`] when the matcher or the
    /// listener is missing.
    pub fn build(self) -> RouterResult<RouteSubscription> {
        let label = self.name.clone().unwrap_or_else(|| "<unnamed>".to_string());
        let matcher = self
            .matcher
            .ok_or_else(|| RouterError::InvalidSubscriber(format!("{} has no matcher", label)))?;
        let listener = self
            .listener
            .ok_or_else(|| RouterError::InvalidSubscriber(format!("{} has no listener", label)))?;

        let mut subscription = RouteSubscription {
            matcher,
            listener,
            group_id: None,
            group_index: None,
            name: self.name,
        };
        if let Some((group_id, group_index)) = self.group {
            subscription = subscription.in_group(group_id, group_index);
        }
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::matcher::PathPattern;

    fn noop(_: Option<&Value>) -> Result<(), ListenerError> {
        Ok(())
    }

    #[test]
    fn test_builder_requires_listener() {
        let err = RouteSubscription::builder()
            .matcher(PathPattern::new("/a"))
            .name("a")
            .build()
            .unwrap_err();
        assert!(matches!(err, RouterError::InvalidSubscriber(_)));
        assert_eq!(err.to_string(), "Invalid subscriber: a has no listener");
    }

    #[test]
    fn test_builder_requires_matcher() {
        let err = RouteSubscription::builder().listener(noop).build().unwrap_err();
        assert!(matches!(err, RouterError::InvalidSubscriber(_)));
    }

    #[test]
    fn test_empty_group_is_ungrouped() {
        let sub = RouteSubscription::new(PathPattern::new("/"), noop).in_group("", 3);
        assert_eq!(sub.sort_key(), (None, None));

        let sub = RouteSubscription::new(PathPattern::new("/"), noop).in_group("main", 3);
        assert_eq!(sub.sort_key(), (Some("main"), Some(3)));
    }

    #[test]
    fn test_listener_error_wrapped() {
        let sub = RouteSubscription::new(PathPattern::new("/"), |_: Option<&Value>| {
            Err("nope".into())
        });
        let err = sub.notify(None).unwrap_err();
        assert!(matches!(err, RouterError::Listener(_)));
    }
}
