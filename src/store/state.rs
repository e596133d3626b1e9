//! Router state snapshots and patches.

use serde_json::{Map, Value};

use crate::error::{RouterError, RouterResult};
use crate::location::Location;

/// Attribute name under which the current location is exposed.
pub const LOCATION_KEY: &str = "location";

/// Immutable router state: the current location plus free-form attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouterState {
    pub location: Location,
    pub attributes: Map<String, Value>,
}

impl RouterState {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            attributes: Map::new(),
        }
    }

    /// Read one attribute. `"location"` yields the serialized location.
    pub fn get(&self, key: &str) -> Option<Value> {
        if key == LOCATION_KEY {
            return serde_json::to_value(&self.location).ok();
        }
        self.attributes.get(key).cloned()
    }

    /// Shallow-merge `patch` into a new state; `self` is left untouched.
    pub fn merge(&self, patch: StatePatch) -> RouterResult<Self> {
        let StatePatch {
            location,
            mut attributes,
        } = patch;

        let mut next = self.clone();
        if let Some(raw) = attributes.remove(LOCATION_KEY) {
            next.location = serde_json::from_value(raw).map_err(RouterError::InvalidLocation)?;
        }
        if let Some(location) = location {
            next.location = location;
        }
        next.attributes.extend(attributes);
        Ok(next)
    }

    /// Full state as a JSON object.
    pub fn to_value(&self) -> Value {
        let mut object = self.attributes.clone();
        if let Some(location) = self.get(LOCATION_KEY) {
            object.insert(LOCATION_KEY.to_string(), location);
        }
        Value::Object(object)
    }
}

/// Partial state to merge on `set`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    location: Option<Location>,
    attributes: Map<String, Value>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set a free-form attribute. A `"location"` attribute must hold a
    /// location object and is applied before [`StatePatch::location`].
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.attributes.is_empty()
    }
}

impl From<Location> for StatePatch {
    fn from(location: Location) -> Self {
        Self::new().location(location)
    }
}

impl From<Map<String, Value>> for StatePatch {
    fn from(attributes: Map<String, Value>) -> Self {
        Self {
            location: None,
            attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::create_location;
    use serde_json::json;

    #[test]
    fn test_merge_is_shallow_and_non_destructive() {
        let base = RouterState::new(Location::default());
        let first = base
            .merge(StatePatch::new().attribute("user", json!({ "id": 1 })).attribute("theme", "dark"))
            .unwrap();
        let second = first
            .merge(StatePatch::new().attribute("user", json!({ "name": "x" })))
            .unwrap();

        assert!(base.attributes.is_empty());
        assert_eq!(first.get("user"), Some(json!({ "id": 1 })));
        assert_eq!(second.get("user"), Some(json!({ "name": "x" })));
        assert_eq!(second.get("theme"), Some(json!("dark")));
    }

    #[test]
    fn test_location_attribute_is_typed() {
        let base = RouterState::default();
        let next = base
            .merge(StatePatch::new().attribute("location", json!({ "pathname": "/a", "search": "?b=1" })))
            .unwrap();
        assert_eq!(next.location.pathname, "/a");
        assert_eq!(next.get("location").unwrap()["search"], "?b=1");
        assert!(next.attributes.get("location").is_none());

        let err = base
            .merge(StatePatch::new().attribute("location", json!(42)))
            .unwrap_err();
        assert!(matches!(err, RouterError::InvalidLocation(_)));
    }

    #[test]
    fn test_to_value_includes_location() {
        let location = create_location("/x?y=1", None, None).unwrap();
        let state = RouterState::new(location).merge(StatePatch::new().attribute("a", 1)).unwrap();
        let value = state.to_value();
        assert_eq!(value["location"]["pathname"], "/x");
        assert_eq!(value["location"]["query"]["y"], "1");
        assert_eq!(value["a"], 1);
    }
}
