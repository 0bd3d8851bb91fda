//! Theme context: resolution, commit, and OS-signal propagation
//!
//! One `ThemeContext` exists per application or session. It owns the cached
//! current theme, the listener registry, and the OS appearance watchers, and
//! is injected into consumers rather than reached through a process global,
//! so every test constructs a fresh context over its own host.
//!
//! Boot resolution precedence, first match wins:
//!
//! 1. valid persisted preference
//! 2. valid theme already on the root element's `data-theme` attribute
//!    (server-rendered or pre-set markup)
//! 3. OS signal: forced colors → contrast, else dark, else light
//! 4. fallback: light
//!
//! Once a preference is persisted the context is *pinned*: OS appearance
//! changes are ignored until [`ThemeContext::clear_preference`] removes the
//! stored value.

use crate::subscription::{notify_all, ListenerRegistry, ThemeListener, ThemeSubscription};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use winden_core::ThemeMode;
use winden_platform::{
    Capability, HostEnvironment, MediaChangeHandler, MediaQuery, MediaSource, MediaWatchId,
};

/// Storage key holding the persisted preference.
pub const THEME_STORAGE_KEY: &str = "theme";

/// Root-element attribute mirroring the current theme. The generated
/// stylesheet keys its palettes off this attribute.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Result of boot-time theme resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootResolution {
    /// The effective boot theme.
    pub theme: ThemeMode,
    /// The persisted preference, when the boot theme came from one. `None`
    /// means the theme was inferred (DOM, OS signal, or fallback).
    pub persisted: Option<ThemeMode>,
}

/// Options for one commit.
struct CommitOptions {
    persist: bool,
    notify: bool,
    /// Known stored value, skipping a redundant store read when supplied.
    persisted_hint: Option<ThemeMode>,
}

/// Installed OS watchers plus the source needed to detach them.
struct MediaWatchBundle {
    source: Arc<dyn MediaSource>,
    ids: Vec<MediaWatchId>,
}

impl MediaWatchBundle {
    fn detach(self) {
        for id in self.ids {
            self.source.unwatch(id);
        }
    }
}

pub(crate) struct ThemeInner {
    pub(crate) env: Arc<dyn HostEnvironment>,

    /// Cached current theme; unset until first resolution.
    current: RwLock<Option<ThemeMode>>,

    /// Theme-change listeners.
    listeners: Arc<Mutex<ListenerRegistry>>,

    /// One-time bootstrap guard.
    bootstrapped: AtomicBool,

    /// Set when an explicit `set_theme` could not persist because storage
    /// was absent at that exact call; drained by `initialize`.
    deferred_persist: AtomicBool,

    /// OS watchers, installed at most once per context.
    watch: Mutex<Option<MediaWatchBundle>>,
}

impl ThemeInner {
    // ========== Host Access ==========

    /// Read the persisted preference. A stored string that is not a valid
    /// mode is corruption: it is removed and read as absent.
    fn read_stored(&self) -> Option<ThemeMode> {
        let storage = self.env.storage().available()?;
        let value = storage.read(THEME_STORAGE_KEY)?;
        match ThemeMode::parse(&value) {
            Some(mode) => Some(mode),
            None => {
                tracing::debug!(stored = %value, "removing corrupt persisted theme");
                storage.remove(THEME_STORAGE_KEY);
                None
            }
        }
    }

    fn write_stored(&self, mode: ThemeMode) {
        if let Capability::Available(storage) = self.env.storage() {
            storage.write(THEME_STORAGE_KEY, mode.as_str());
        }
    }

    fn remove_stored(&self) {
        if let Capability::Available(storage) = self.env.storage() {
            storage.remove(THEME_STORAGE_KEY);
        }
    }

    /// Read a valid theme already present on the root attribute.
    fn read_root_theme(&self) -> Option<ThemeMode> {
        let root = self.env.root().available()?;
        ThemeMode::parse(&root.attribute(THEME_ATTRIBUTE)?)
    }

    /// OS-signaled preference: forced colors dominates, then dark, then light.
    fn detect_system_theme(&self) -> Option<ThemeMode> {
        let media = self.env.media().available()?;
        if media.matches(MediaQuery::ForcedColors) {
            return Some(ThemeMode::Contrast);
        }
        if media.matches(MediaQuery::PrefersDark) {
            return Some(ThemeMode::Dark);
        }
        if media.matches(MediaQuery::PrefersLight) {
            return Some(ThemeMode::Light);
        }
        None
    }

    // ========== Resolution ==========

    fn resolve_boot_theme(&self) -> BootResolution {
        if let Some(persisted) = self.read_stored() {
            return BootResolution {
                theme: persisted,
                persisted: Some(persisted),
            };
        }
        if let Some(theme) = self.read_root_theme() {
            return BootResolution {
                theme,
                persisted: None,
            };
        }
        BootResolution {
            theme: self.detect_system_theme().unwrap_or_default(),
            persisted: None,
        }
    }

    // ========== Commit Engine ==========

    /// Apply `mode`: mirror it onto the root attribute, optionally persist,
    /// optionally notify. Every write is guarded by an equality check.
    fn commit(&self, mode: ThemeMode, options: CommitOptions) {
        if let Capability::Available(root) = self.env.root() {
            if root.attribute(THEME_ATTRIBUTE).as_deref() != Some(mode.as_str()) {
                root.set_attribute(THEME_ATTRIBUTE, mode.as_str());
            } else {
                tracing::trace!(theme = %mode, "root attribute already current, skipping write");
            }
        }

        if options.persist {
            let stored = options.persisted_hint.or_else(|| self.read_stored());
            if stored != Some(mode) {
                self.write_stored(mode);
            }
        }

        if options.notify {
            notify_all(&self.listeners, mode);
        }
    }

    // ========== OS Signal Handling ==========

    /// React to an OS appearance change. A persisted preference pins the
    /// context and the signal is ignored; otherwise the OS theme is adopted
    /// without being persisted.
    fn handle_media_change(&self) {
        if self.read_stored().is_some() {
            tracing::trace!("os appearance change ignored, preference is pinned");
            return;
        }

        let next = self.detect_system_theme().unwrap_or_default();
        {
            let mut current = self.current.write().unwrap();
            if *current == Some(next) {
                return;
            }
            *current = Some(next);
        }

        tracing::debug!(theme = %next, "os appearance change adopted");
        self.commit(
            next,
            CommitOptions {
                persist: false,
                notify: true,
                persisted_hint: None,
            },
        );
    }

    fn teardown_watchers(&self) {
        if let Some(bundle) = self.watch.lock().unwrap().take() {
            tracing::debug!("detaching os appearance watchers");
            bundle.detach();
        }
    }
}

impl Drop for ThemeInner {
    fn drop(&mut self) {
        if let Ok(slot) = self.watch.get_mut() {
            if let Some(bundle) = slot.take() {
                bundle.detach();
            }
        }
    }
}

/// Per-session theme runtime handle.
///
/// Cloning is cheap and shares state; hand clones to the UI layers that need
/// to read, change, or observe the theme.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use winden_platform::MemoryHost;
/// use winden_theme::ThemeContext;
/// use winden_core::ThemeMode;
///
/// let ctx = ThemeContext::new(Arc::new(MemoryHost::new()));
/// ctx.initialize();
///
/// ctx.set_theme(ThemeMode::Dark);
/// assert_eq!(ctx.current_theme(), ThemeMode::Dark);
/// ```
#[derive(Clone)]
pub struct ThemeContext {
    pub(crate) inner: Arc<ThemeInner>,
}

impl ThemeContext {
    /// Create a context over `env`. No host access happens until the first
    /// read, `set_theme`, or `initialize` call.
    pub fn new(env: Arc<dyn HostEnvironment>) -> Self {
        Self {
            inner: Arc::new(ThemeInner {
                env,
                current: RwLock::new(None),
                listeners: Arc::new(Mutex::new(ListenerRegistry::new())),
                bootstrapped: AtomicBool::new(false),
                deferred_persist: AtomicBool::new(false),
                watch: Mutex::new(None),
            }),
        }
    }

    /// Compute the boot theme from the precedence chain without caching,
    /// committing, or persisting anything. A corrupt persisted value is
    /// removed as a side effect of reading it.
    pub fn resolve_boot_theme(&self) -> BootResolution {
        self.inner.resolve_boot_theme()
    }

    /// The current theme. Resolves and caches the boot theme on first use;
    /// a mere read never commits or persists.
    pub fn current_theme(&self) -> ThemeMode {
        if let Some(mode) = *self.inner.current.read().unwrap() {
            return mode;
        }
        let resolution = self.inner.resolve_boot_theme();
        let mut current = self.inner.current.write().unwrap();
        *current.get_or_insert(resolution.theme)
    }

    /// Explicitly select `mode`. A no-op when it already equals the cached
    /// current theme. Otherwise the change is committed, persisted (or
    /// queued for persistence when storage is absent right now), and
    /// broadcast to listeners.
    pub fn set_theme(&self, mode: ThemeMode) {
        {
            let mut current = self.inner.current.write().unwrap();
            if *current == Some(mode) {
                return;
            }
            *current = Some(mode);
        }

        tracing::debug!(theme = %mode, "explicit theme change");
        self.inner
            .deferred_persist
            .store(!self.inner.env.storage().is_available(), Ordering::SeqCst);
        self.inner.commit(
            mode,
            CommitOptions {
                persist: true,
                notify: true,
                persisted_hint: None,
            },
        );
    }

    /// Register a theme-change listener. The listener receives every
    /// subsequent change (explicit or OS-driven) until the returned handle's
    /// `unsubscribe` is called. Boot is silent: `initialize` does not notify.
    pub fn subscribe(
        &self,
        listener: impl Fn(ThemeMode) + Send + Sync + 'static,
    ) -> ThemeSubscription {
        let listener: ThemeListener = Arc::new(listener);
        let id = self.inner.listeners.lock().unwrap().insert(listener);
        ThemeSubscription::new(Arc::downgrade(&self.inner.listeners), id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().unwrap().len()
    }

    /// One-time bootstrap. Resolves the boot theme (keeping a cache already
    /// populated by an earlier call), commits it silently, performs any
    /// queued or confirming persistence, and installs the OS watchers.
    /// Calling again is a pure no-op.
    pub fn initialize(&self) {
        if self.inner.bootstrapped.swap(true, Ordering::SeqCst) {
            return;
        }

        let resolution = self.inner.resolve_boot_theme();
        let theme = {
            let mut current = self.inner.current.write().unwrap();
            *current.get_or_insert(resolution.theme)
        };

        let should_persist =
            self.inner.deferred_persist.swap(false, Ordering::SeqCst) || resolution.persisted.is_some();
        tracing::debug!(theme = %theme, persist = should_persist, "theme bootstrap");
        self.inner.commit(
            theme,
            CommitOptions {
                persist: should_persist,
                notify: false,
                persisted_hint: resolution.persisted,
            },
        );

        self.install_media_watchers();
    }

    /// Whether `initialize` has run.
    pub fn is_initialized(&self) -> bool {
        self.inner.bootstrapped.load(Ordering::SeqCst)
    }

    /// Remove the persisted preference, unpinning the context. The current
    /// theme is left untouched; OS signals are followed again from the next
    /// change event.
    pub fn clear_preference(&self) {
        tracing::debug!("clearing persisted theme preference");
        self.inner.deferred_persist.store(false, Ordering::SeqCst);
        self.inner.remove_stored();
    }

    /// Detach the OS watchers. Also performed when the last handle drops.
    /// Idempotent.
    pub fn shutdown(&self) {
        self.inner.teardown_watchers();
    }

    fn install_media_watchers(&self) {
        let mut watch = self.inner.watch.lock().unwrap();
        if watch.is_some() {
            return;
        }
        let Capability::Available(source) = self.inner.env.media() else {
            return;
        };

        // Weak: the media source stores the handler, which must not keep the
        // context alive.
        let weak = Arc::downgrade(&self.inner);
        let handler: MediaChangeHandler = Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.handle_media_change();
            }
        });

        let ids = MediaQuery::all()
            .iter()
            .map(|&query| source.watch(query, Arc::clone(&handler)))
            .collect();
        *watch = Some(MediaWatchBundle { source, ids });
    }
}
