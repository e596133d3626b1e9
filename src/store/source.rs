//! External location source (the address bar boundary).

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::location::Location;

/// Read-only view of the host's current pathname and search string.
///
/// Consulted once, when router state is first read before any `set`.
pub trait LocationSource: Send + Sync {
    fn pathname(&self) -> String;
    fn search(&self) -> String;

    /// The location this source describes. The pathname is not decoded.
    fn location(&self) -> Location {
        Location::from_raw(&self.pathname(), &self.search())
    }
}

/// A source that can be repointed, standing in for a browser address bar.
///
/// A router reads its source once, so a replacement only shows when it
/// happens before the router's first state read. Share the source through
/// an `Arc` to keep a handle for repointing.
#[derive(Debug)]
pub struct StaticSource {
    current: ArcSwap<(String, String)>,
}

impl StaticSource {
    pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            current: ArcSwap::from_pointee((pathname.into(), search.into())),
        }
    }

    /// Split a raw `path?search` string. Anything after `#` is ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split('#').next().unwrap_or_default();
        match path.split_once('?') {
            Some((pathname, search)) => Self::new(pathname, format!("?{}", search)),
            None => Self::new(path, ""),
        }
    }

    /// Repoint the source.
    pub fn replace(&self, pathname: impl Into<String>, search: impl Into<String>) {
        self.current.store(Arc::new((pathname.into(), search.into())));
    }
}

impl Default for StaticSource {
    fn default() -> Self {
        Self::new("/", "")
    }
}

impl LocationSource for StaticSource {
    fn pathname(&self) -> String {
        self.current.load().0.clone()
    }

    fn search(&self) -> String {
        self.current.load().1.clone()
    }
}

impl<T: LocationSource + ?Sized> LocationSource for Arc<T> {
    fn pathname(&self) -> String {
        (**self).pathname()
    }

    fn search(&self) -> String {
        (**self).search()
    }

    fn location(&self) -> Location {
        (**self).location()
    }
}
