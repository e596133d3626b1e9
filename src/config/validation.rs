//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check route patterns and group slots
//! - Validate value ranges (dispatch depth > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::RouterConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route #{index} has an empty name")]
    EmptyRouteName { index: usize },

    #[error("route name {0:?} is used more than once")]
    DuplicateRouteName(String),

    #[error("route {route:?} pattern {pattern:?} must start with '/'")]
    RelativePattern { route: String, pattern: String },

    #[error("route {route:?} pattern {pattern:?} has a wildcard before the last segment")]
    InnerWildcard { route: String, pattern: String },

    #[error("route {route:?} sets group_index without a group")]
    GroupIndexWithoutGroup { route: String },

    #[error("group {group:?} index {index} is used by more than one route")]
    DuplicateGroupSlot { group: String, index: u32 },

    #[error("source pathname {0:?} must start with '/'")]
    RelativeSource(String),

    #[error("dispatch.max_depth must be greater than zero")]
    ZeroDispatchDepth,
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();
    let mut slots = HashSet::new();

    if !config.source.pathname.starts_with('/') {
        errors.push(ValidationError::RelativeSource(config.source.pathname.clone()));
    }

    if config.dispatch.max_depth == Some(0) {
        errors.push(ValidationError::ZeroDispatchDepth);
    }

    for (index, route) in config.routes.iter().enumerate() {
        if route.name.is_empty() {
            errors.push(ValidationError::EmptyRouteName { index });
        } else if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRouteName(route.name.clone()));
        }

        if !route.pattern.starts_with('/') {
            errors.push(ValidationError::RelativePattern {
                route: route.name.clone(),
                pattern: route.pattern.clone(),
            });
        } else if route.matcher().has_inner_wildcard() {
            errors.push(ValidationError::InnerWildcard {
                route: route.name.clone(),
                pattern: route.pattern.clone(),
            });
        }

        match (route.group.as_deref(), route.group_index) {
            (None, Some(_)) | (Some(""), Some(_)) => {
                errors.push(ValidationError::GroupIndexWithoutGroup {
                    route: route.name.clone(),
                });
            }
            (Some(group), index) if !group.is_empty() => {
                let index = index.unwrap_or_default();
                if !slots.insert((group, index)) {
                    errors.push(ValidationError::DuplicateGroupSlot {
                        group: group.to_string(),
                        index,
                    });
                }
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
