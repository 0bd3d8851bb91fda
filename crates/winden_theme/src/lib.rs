//! Winden Theme Runtime
//!
//! Resolves, persists, and broadcasts the active theme for a host UI, and
//! exposes a thin live view over its design-token custom properties.
//!
//! # Overview
//!
//! The runtime composes four responsibilities in one [`ThemeContext`]:
//!
//! - **Resolution**: effective boot theme from persisted preference, pre-set
//!   root markup, OS appearance signals, or the light fallback
//! - **Commit**: idempotent mirroring onto the root's `data-theme` attribute
//!   plus optional persistence
//! - **Subscriptions**: synchronous change notification with per-listener
//!   fault isolation
//! - **OS tracking**: appearance-change watchers that apply only while no
//!   explicit preference is persisted
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use winden_core::ThemeMode;
//! use winden_platform::MemoryHost;
//! use winden_theme::ThemeContext;
//!
//! let ctx = ThemeContext::new(Arc::new(MemoryHost::new()));
//! ctx.initialize();
//!
//! let seen = ctx.subscribe(|mode| println!("theme is now {mode}"));
//! ctx.set_theme(ThemeMode::Contrast);
//! assert_eq!(ctx.current_theme(), ThemeMode::Contrast);
//! seen.unsubscribe();
//! ```
//!
//! # Degradation
//!
//! Every host capability is optional. With no storage the explicit choice is
//! queued and persisted at bootstrap if storage has appeared; with no root
//! element commits skip the attribute mirror; with no media source the
//! runtime simply never follows OS changes. Nothing in this crate returns a
//! fatal error.

pub mod context;
pub mod subscription;
pub mod tokens;

pub use context::{BootResolution, ThemeContext, THEME_ATTRIBUTE, THEME_STORAGE_KEY};
pub use subscription::{ThemeListener, ThemeSubscription};
pub use tokens::ResponsiveTokenPaths;
