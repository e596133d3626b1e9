//! Shared utilities for router integration tests.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use active_router::routing::{PathPattern, RouteSubscription};
use active_router::{ListenerError, Router, StaticSource};

/// One recorded listener call: (route label, match payload).
pub type Call = (String, Option<Value>);

/// A call log shared by every listener of a test.
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener that appends `(label, match)` to the log.
    pub fn listener(
        &self,
        label: &str,
    ) -> impl Fn(Option<&Value>) -> Result<(), ListenerError> + Send + Sync + 'static {
        let calls = Arc::clone(&self.calls);
        let label = label.to_string();
        move |matched: Option<&Value>| {
            calls.lock().push((label.clone(), matched.cloned()));
            Ok(())
        }
    }

    /// Subscription on `pattern` (prefix match) recording under `label`.
    pub fn subscription(&self, label: &str, pattern: &str) -> RouteSubscription {
        RouteSubscription::new(PathPattern::new(pattern), self.listener(label)).named(label)
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock())
    }

    /// Drain the log, keeping (label, matched?) pairs.
    #[allow(dead_code)]
    pub fn take_flags(&self) -> Vec<(String, bool)> {
        self.take()
            .into_iter()
            .map(|(label, matched)| (label, matched.is_some()))
            .collect()
    }
}

pub fn router_at(path: &str) -> Router {
    Router::new(StaticSource::from_path(path))
}

#[allow(dead_code)]
pub fn flags(pairs: &[(&str, bool)]) -> Vec<(String, bool)> {
    pairs
        .iter()
        .map(|(label, matched)| (label.to_string(), *matched))
        .collect()
}
