//! Winden Platform Abstraction
//!
//! The theme runtime never talks to a host directly; it probes for
//! capabilities through the [`HostEnvironment`] trait and degrades when a
//! capability is missing. Three capabilities exist:
//!
//! - **Storage** ([`KeyValueStore`]): durable preference persistence
//! - **Root element** ([`RootElement`]): the `data-theme` attribute and live
//!   CSS custom properties
//! - **Media source** ([`MediaSource`]): OS appearance queries and their
//!   change signals
//!
//! Every probe returns a [`Capability`], making the absence path explicit in
//! the type signature instead of relying on suppressed host exceptions.
//! Implementations of the three capability traits must not panic: a failing
//! backend surfaces as `None` or a silent no-op.
//!
//! [`MemoryHost`] is a complete in-memory implementation used by the test
//! suites and by headless embedders (non-interactive rendering has no DOM,
//! no storage, and no media queries).

pub mod capability;
pub mod env;
pub mod memory;

pub use capability::Capability;
pub use env::{
    HostEnvironment, KeyValueStore, MediaChangeHandler, MediaQuery, MediaSource, MediaWatchId,
    RootElement,
};
pub use memory::MemoryHost;
