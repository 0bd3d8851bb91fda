//! Host environment traits
//!
//! The seams between the theme runtime and whatever hosts it: a browser-like
//! document, a webview bridge, or the in-memory host used in tests. All trait
//! objects are `Send + Sync` so a single environment can be shared across an
//! application via `Arc`.

use crate::Capability;
use std::sync::Arc;

/// Durable string key-value store (the browser analog is `localStorage`).
///
/// Implementations never panic; a failing backend reads as `None` and writes
/// as silent no-ops.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn read(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`.
    fn write(&self, key: &str, value: &str);

    /// Remove any value stored under `key`.
    fn remove(&self, key: &str);
}

/// The document root element: one themed attribute plus live CSS custom
/// properties.
pub trait RootElement: Send + Sync {
    /// Read an attribute value.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Set an attribute value.
    fn set_attribute(&self, name: &str, value: &str);

    /// Read a property from the element's computed style, trimmed.
    /// Inline properties take precedence over the computed baseline.
    fn computed_value(&self, property: &str) -> Option<String>;

    /// Set an inline style property.
    fn set_property(&self, property: &str, value: &str);
}

/// OS appearance queries the runtime follows.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum MediaQuery {
    /// `(prefers-color-scheme: dark)`
    PrefersDark,
    /// `(prefers-color-scheme: light)`
    PrefersLight,
    /// `(forced-colors: active)`
    ForcedColors,
}

impl MediaQuery {
    /// Canonical query string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PrefersDark => "(prefers-color-scheme: dark)",
            Self::PrefersLight => "(prefers-color-scheme: light)",
            Self::ForcedColors => "(forced-colors: active)",
        }
    }

    /// Full query list.
    pub fn all() -> &'static [MediaQuery] {
        const QUERIES: [MediaQuery; 3] = [
            MediaQuery::PrefersDark,
            MediaQuery::PrefersLight,
            MediaQuery::ForcedColors,
        ];
        &QUERIES
    }
}

/// Handle identifying one media-change registration.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct MediaWatchId(u64);

impl MediaWatchId {
    /// Wrap a raw registration id.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw registration id.
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

/// Callback invoked synchronously when a watched query's match state changes.
pub type MediaChangeHandler = Arc<dyn Fn() + Send + Sync>;

/// Source of OS appearance signals.
pub trait MediaSource: Send + Sync {
    /// Whether `query` currently matches.
    fn matches(&self, query: MediaQuery) -> bool;

    /// Register `handler` to run when `query` changes match state.
    fn watch(&self, query: MediaQuery, handler: MediaChangeHandler) -> MediaWatchId;

    /// Remove a registration. Unknown ids are ignored.
    fn unwatch(&self, id: MediaWatchId);
}

/// A host, probed one capability at a time.
pub trait HostEnvironment: Send + Sync {
    /// Probe for durable storage.
    fn storage(&self) -> Capability<Arc<dyn KeyValueStore>>;

    /// Probe for the document root element.
    fn root(&self) -> Capability<Arc<dyn RootElement>>;

    /// Probe for OS appearance queries.
    fn media(&self) -> Capability<Arc<dyn MediaSource>>;
}
