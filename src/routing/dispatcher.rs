//! Grouped match dispatch.
//!
//! # Responsibilities
//! - Keep subscriptions sorted by `(group_id, group_index)`
//! - Recompute every match on each pass
//! - Enforce group exclusivity (first match in a group wins)
//! - Report only subscriptions whose match changed
//!
//! # Pass Algorithm
//! ```text
//! for each subscription in sort order:
//!     group already matched?  → match = None
//!     otherwise               → match = matcher(pathname); record group if Some
//!     match != last_match     → queue notification
//!     last_match = match
//! notifications: entering (Some) first, then leaving (None), scan order kept
//! ```
//!
//! # Design Decisions
//! - Sorted insert (binary search) instead of re-sorting the whole list
//! - Equal sort keys keep registration order
//! - A failing matcher aborts the pass; entries already walked keep their
//!   updated `last_match`
//! - Matchers run against a snapshot with no borrow of the list held; the
//!   new match memory is committed afterwards, and only for subscriptions
//!   still registered
//! - A pass that another pass committed over while its matchers ran (a
//!   matcher navigating, say) is superseded and writes nothing back

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::RouterResult;
use crate::location::value_equal;
use crate::routing::subscription::{Match, RouteSubscription};

/// Identity of a registered subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Entry {
    id: SubscriptionId,
    subscription: Arc<RouteSubscription>,
    last_match: Match,
}

/// A listener to invoke after a pass, with its new match.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: SubscriptionId,
    pub subscription: Arc<RouteSubscription>,
    pub matched: Match,
}

impl Notification {
    /// True when the subscription went from no match (or another match) to a match.
    pub fn is_entering(&self) -> bool {
        self.matched.is_some()
    }

    /// Invoke the listener.
    pub fn deliver(&self) -> RouterResult<()> {
        self.subscription.notify(self.matched.as_ref())
    }
}

/// Subscriptions and their match memory, copied out for one pass.
#[derive(Debug)]
pub struct PassSnapshot {
    entries: Vec<Entry>,
    generation: u64,
}

impl PassSnapshot {
    /// Run every matcher against `pathname`. No dispatcher state is touched.
    pub fn evaluate(self, pathname: &str) -> PassOutcome {
        let mut updates = Vec::with_capacity(self.entries.len());
        let result = walk(&self.entries, pathname, &mut updates);
        PassOutcome {
            generation: self.generation,
            updates,
            result,
        }
    }
}

/// Match memory computed by a pass, plus the notifications to deliver.
#[derive(Debug)]
pub struct PassOutcome {
    generation: u64,
    updates: Vec<(SubscriptionId, Match)>,
    result: RouterResult<Vec<Notification>>,
}

impl PassOutcome {
    pub fn into_result(self) -> RouterResult<Vec<Notification>> {
        self.result
    }
}

fn walk(
    entries: &[Entry],
    pathname: &str,
    updates: &mut Vec<(SubscriptionId, Match)>,
) -> RouterResult<Vec<Notification>> {
    let mut matched_groups: HashSet<&str> = HashSet::new();
    let mut entering = Vec::new();
    let mut leaving = Vec::new();

    for entry in entries {
        let group = entry.subscription.group_id();
        let matched = match group {
            Some(group) if matched_groups.contains(group) => None,
            _ => {
                let matched = entry.subscription.evaluate(pathname)?;
                if let (Some(group), Some(_)) = (group, &matched) {
                    matched_groups.insert(group);
                }
                matched
            }
        };

        let changed = !value_equal(matched.as_ref(), entry.last_match.as_ref());
        updates.push((entry.id, matched.clone()));

        if changed {
            let notification = Notification {
                id: entry.id,
                subscription: Arc::clone(&entry.subscription),
                matched,
            };
            if notification.is_entering() {
                entering.push(notification);
            } else {
                leaving.push(notification);
            }
        }
    }

    entering.extend(leaving);
    Ok(entering)
}

/// Ordered subscription list plus per-subscription match memory.
#[derive(Debug, Default)]
pub struct Dispatcher {
    entries: Vec<Entry>,
    next_id: u64,
    generation: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Subscriptions in dispatch order.
    pub fn subscriptions(&self) -> impl Iterator<Item = (SubscriptionId, &RouteSubscription)> {
        self.entries.iter().map(|e| (e.id, e.subscription.as_ref()))
    }

    /// Evaluate, notify once with the current match, then register.
    ///
    /// Group exclusivity is not applied here; the next pass reconciles it.
    pub fn add_listener(
        &mut self,
        subscription: RouteSubscription,
        pathname: &str,
    ) -> RouterResult<SubscriptionId> {
        let matched = subscription.evaluate(pathname)?;
        subscription.notify(matched.as_ref())?;
        Ok(self.insert(Arc::new(subscription), matched))
    }

    /// Register a subscription whose current match is already known.
    pub fn insert(&mut self, subscription: Arc<RouteSubscription>, last_match: Match) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let key = subscription.sort_key();
        let at = self
            .entries
            .partition_point(|e| e.subscription.sort_key() <= key);
        self.entries.insert(
            at,
            Entry {
                id,
                subscription,
                last_match,
            },
        );
        id
    }

    /// Remove by identity. Returns false when already absent.
    pub fn remove_listener(&mut self, id: SubscriptionId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Copy out the subscriptions for a pass.
    pub fn snapshot(&self) -> PassSnapshot {
        PassSnapshot {
            entries: self.entries.clone(),
            generation: self.generation,
        }
    }

    /// Write back the match memory of an evaluated pass.
    ///
    /// Returns false, writing nothing, when another pass committed since the
    /// snapshot was taken.
    pub fn commit(&mut self, outcome: &PassOutcome) -> bool {
        if outcome.generation != self.generation {
            return false;
        }
        self.generation += 1;

        let updates: HashMap<SubscriptionId, &Match> =
            outcome.updates.iter().map(|(id, matched)| (*id, matched)).collect();
        for entry in &mut self.entries {
            if let Some(matched) = updates.get(&entry.id) {
                entry.last_match = (*matched).clone();
            }
        }
        true
    }

    /// Run one matching pass and return the notifications in delivery order.
    pub fn run_pass(&mut self, pathname: &str) -> RouterResult<Vec<Notification>> {
        let outcome = self.snapshot().evaluate(pathname);
        self.commit(&outcome);
        outcome.into_result()
    }

    #[cfg(test)]
    pub(crate) fn last_match(&self, id: SubscriptionId) -> Option<&Match> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.last_match)
    }
}
