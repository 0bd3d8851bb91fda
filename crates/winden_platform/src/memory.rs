//! In-memory host
//!
//! A full [`HostEnvironment`] implementation with no real document behind it.
//! Used by the test suites and by headless embedders. Each capability can be
//! switched off to model degraded hosts (private-browsing storage, no DOM,
//! no media-query support), and switched back on to model a capability that
//! appears later in the process's life.

use crate::env::{
    HostEnvironment, KeyValueStore, MediaChangeHandler, MediaQuery, MediaSource, MediaWatchId,
    RootElement,
};
use crate::Capability;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory key-value store with a write counter for assertions.
struct MemoryStore {
    values: Mutex<FxHashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    fn new() -> Self {
        Self {
            values: Mutex::new(FxHashMap::default()),
            writes: AtomicUsize::new(0),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn remove(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}

/// In-memory root element: attributes, inline properties, and a seedable
/// computed-style baseline.
struct MemoryRoot {
    attributes: Mutex<FxHashMap<String, String>>,
    properties: Mutex<FxHashMap<String, String>>,
    computed: Mutex<FxHashMap<String, String>>,
    attribute_writes: AtomicUsize,
}

impl MemoryRoot {
    fn new() -> Self {
        Self {
            attributes: Mutex::new(FxHashMap::default()),
            properties: Mutex::new(FxHashMap::default()),
            computed: Mutex::new(FxHashMap::default()),
            attribute_writes: AtomicUsize::new(0),
        }
    }
}

impl RootElement for MemoryRoot {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.lock().unwrap().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        self.attribute_writes.fetch_add(1, Ordering::SeqCst);
    }

    fn computed_value(&self, property: &str) -> Option<String> {
        let inline = self.properties.lock().unwrap().get(property).cloned();
        inline
            .or_else(|| self.computed.lock().unwrap().get(property).cloned())
            .map(|value| value.trim().to_string())
    }

    fn set_property(&self, property: &str, value: &str) {
        self.properties
            .lock()
            .unwrap()
            .insert(property.to_string(), value.to_string());
    }
}

/// In-memory appearance queries with synchronous change dispatch.
struct MemoryMedia {
    matches: Mutex<FxHashMap<MediaQuery, bool>>,
    watchers: Mutex<FxHashMap<u64, (MediaQuery, MediaChangeHandler)>>,
    next_watch_id: AtomicU64,
}

impl MemoryMedia {
    fn new() -> Self {
        Self {
            matches: Mutex::new(FxHashMap::default()),
            watchers: Mutex::new(FxHashMap::default()),
            next_watch_id: AtomicU64::new(1),
        }
    }

    /// Flip a query's match state, firing its watchers on an actual change.
    fn set_matches(&self, query: MediaQuery, value: bool) {
        {
            let mut matches = self.matches.lock().unwrap();
            if matches.get(&query).copied().unwrap_or(false) == value {
                return;
            }
            matches.insert(query, value);
        }
        // Snapshot first: handlers may re-enter watch/unwatch.
        let handlers: Vec<MediaChangeHandler> = self
            .watchers
            .lock()
            .unwrap()
            .values()
            .filter(|(watched, _)| *watched == query)
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler();
        }
    }
}

impl MediaSource for MemoryMedia {
    fn matches(&self, query: MediaQuery) -> bool {
        self.matches
            .lock()
            .unwrap()
            .get(&query)
            .copied()
            .unwrap_or(false)
    }

    fn watch(&self, query: MediaQuery, handler: MediaChangeHandler) -> MediaWatchId {
        let raw = self.next_watch_id.fetch_add(1, Ordering::SeqCst);
        self.watchers.lock().unwrap().insert(raw, (query, handler));
        MediaWatchId::from_raw(raw)
    }

    fn unwatch(&self, id: MediaWatchId) {
        self.watchers.lock().unwrap().remove(&id.to_raw());
    }
}

struct HostParts {
    storage: Arc<MemoryStore>,
    root: Arc<MemoryRoot>,
    media: Arc<MemoryMedia>,
    storage_enabled: AtomicBool,
    root_enabled: AtomicBool,
    media_enabled: AtomicBool,
}

/// In-memory [`HostEnvironment`].
///
/// Cloning shares the underlying state, so a test can keep one handle for
/// inspection while the runtime holds another.
///
/// # Example
///
/// ```rust
/// use winden_platform::{HostEnvironment, MediaQuery, MemoryHost};
///
/// let host = MemoryHost::new().without_storage();
/// assert!(!host.storage().is_available());
///
/// host.set_media(MediaQuery::PrefersDark, true);
/// assert!(host.media().available().unwrap().matches(MediaQuery::PrefersDark));
/// ```
#[derive(Clone)]
pub struct MemoryHost {
    parts: Arc<HostParts>,
}

impl MemoryHost {
    /// Host with all three capabilities available.
    pub fn new() -> Self {
        Self {
            parts: Arc::new(HostParts {
                storage: Arc::new(MemoryStore::new()),
                root: Arc::new(MemoryRoot::new()),
                media: Arc::new(MemoryMedia::new()),
                storage_enabled: AtomicBool::new(true),
                root_enabled: AtomicBool::new(true),
                media_enabled: AtomicBool::new(true),
            }),
        }
    }

    /// Host with no capabilities at all, modeling non-interactive rendering.
    pub fn headless() -> Self {
        Self::new().without_storage().without_root().without_media()
    }

    // ========== Capability Toggles ==========

    /// Disable the storage capability.
    pub fn without_storage(self) -> Self {
        self.parts.storage_enabled.store(false, Ordering::SeqCst);
        self
    }

    /// Disable the root-element capability.
    pub fn without_root(self) -> Self {
        self.parts.root_enabled.store(false, Ordering::SeqCst);
        self
    }

    /// Disable the media capability.
    pub fn without_media(self) -> Self {
        self.parts.media_enabled.store(false, Ordering::SeqCst);
        self
    }

    /// Re-enable storage; values seeded while disabled are retained.
    pub fn enable_storage(&self) {
        self.parts.storage_enabled.store(true, Ordering::SeqCst);
    }

    /// Re-enable the root element.
    pub fn enable_root(&self) {
        self.parts.root_enabled.store(true, Ordering::SeqCst);
    }

    /// Re-enable the media capability.
    pub fn enable_media(&self) {
        self.parts.media_enabled.store(true, Ordering::SeqCst);
    }

    // ========== Storage Inspection ==========

    /// Seed a stored value directly, bypassing the write counter.
    pub fn seed_stored(&self, key: &str, value: &str) {
        self.parts
            .storage
            .values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    /// Read a stored value directly.
    pub fn stored(&self, key: &str) -> Option<String> {
        self.parts.storage.values.lock().unwrap().get(key).cloned()
    }

    /// Number of writes performed through the [`KeyValueStore`] trait.
    pub fn storage_write_count(&self) -> usize {
        self.parts.storage.writes.load(Ordering::SeqCst)
    }

    // ========== Root Inspection ==========

    /// Seed a root attribute directly (server-rendered markup), bypassing the
    /// write counter.
    pub fn seed_root_attribute(&self, name: &str, value: &str) {
        self.parts
            .root
            .attributes
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    /// Read a root attribute directly.
    pub fn root_attribute(&self, name: &str) -> Option<String> {
        self.parts.root.attributes.lock().unwrap().get(name).cloned()
    }

    /// Number of attribute writes performed through the [`RootElement`] trait.
    pub fn attribute_write_count(&self) -> usize {
        self.parts.root.attribute_writes.load(Ordering::SeqCst)
    }

    /// Seed a computed-style property (what the generated stylesheet would
    /// resolve for the active theme).
    pub fn seed_computed(&self, property: &str, value: &str) {
        self.parts
            .root
            .computed
            .lock()
            .unwrap()
            .insert(property.to_string(), value.to_string());
    }

    /// Read an inline style property written through the trait.
    pub fn root_property(&self, property: &str) -> Option<String> {
        self.parts
            .root
            .properties
            .lock()
            .unwrap()
            .get(property)
            .cloned()
    }

    // ========== Media Control ==========

    /// Flip a query's match state, firing registered watchers on change.
    pub fn set_media(&self, query: MediaQuery, matches: bool) {
        self.parts.media.set_matches(query, matches);
    }

    /// Number of live media-change registrations.
    pub fn media_watcher_count(&self) -> usize {
        self.parts.media.watchers.lock().unwrap().len()
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEnvironment for MemoryHost {
    fn storage(&self) -> Capability<Arc<dyn KeyValueStore>> {
        if self.parts.storage_enabled.load(Ordering::SeqCst) {
            Capability::Available(Arc::clone(&self.parts.storage) as Arc<dyn KeyValueStore>)
        } else {
            Capability::Absent
        }
    }

    fn root(&self) -> Capability<Arc<dyn RootElement>> {
        if self.parts.root_enabled.load(Ordering::SeqCst) {
            Capability::Available(Arc::clone(&self.parts.root) as Arc<dyn RootElement>)
        } else {
            Capability::Absent
        }
    }

    fn media(&self) -> Capability<Arc<dyn MediaSource>> {
        if self.parts.media_enabled.load(Ordering::SeqCst) {
            Capability::Available(Arc::clone(&self.parts.media) as Arc<dyn MediaSource>)
        } else {
            Capability::Absent
        }
    }
}
