//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::{PathPattern, RouteSubscription, SubscriptionBuilder};

/// Root configuration for the router.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Initial external location.
    pub source: SourceConfig,

    /// Dispatch tuning.
    pub dispatch: DispatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route definitions subscribed at startup.
    pub routes: Vec<RouteConfig>,
}

/// Initial location reported by the external source.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub pathname: String,
    pub search: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            pathname: "/".to_string(),
            search: String::new(),
        }
    }
}

/// Dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Maximum nested dispatch passes. Unbounded when absent.
    pub max_depth: Option<usize>,
}

/// Route configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// Route identifier for logging and output.
    pub name: String,

    /// Path pattern (`/users/:id`, `/files/*`).
    pub pattern: String,

    /// Require the whole pathname to be consumed.
    #[serde(default)]
    pub exact: bool,

    /// Exclusivity group.
    #[serde(default)]
    pub group: Option<String>,

    /// Priority within the group (lower = checked first).
    #[serde(default)]
    pub group_index: Option<u32>,
}

impl RouteConfig {
    pub fn matcher(&self) -> PathPattern {
        PathPattern::new(self.pattern.clone()).with_exact(self.exact)
    }

    /// Start a subscription for this route; the caller supplies the listener.
    pub fn subscription(&self) -> SubscriptionBuilder {
        let builder = RouteSubscription::builder()
            .name(self.name.clone())
            .matcher(self.matcher());
        match &self.group {
            Some(group) => builder.group(group.clone(), self.group_index.unwrap_or_default()),
            None => builder,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    #[default]
    Compact,
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Record dispatch metrics through the `metrics` facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            metrics_enabled: false,
        }
    }
}
