//! Capability results for host probing
//!
//! Probing a host for storage, a root element, or media queries can always
//! come up empty: private-browsing storage, server-side rendering with no
//! DOM, a host without media-query support. `Capability` makes that outcome
//! a value rather than a swallowed exception.

/// Outcome of probing the host for an optional capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capability<T> {
    /// The capability is present and usable.
    Available(T),
    /// The host does not provide this capability. Never fatal: callers
    /// proceed with reduced functionality.
    Absent,
}

impl<T> Capability<T> {
    /// Whether the capability is present.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Convert into an `Option`, discarding the absence marker.
    pub fn available(self) -> Option<T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// Borrowing view of the capability.
    pub fn as_ref(&self) -> Capability<&T> {
        match self {
            Self::Available(value) => Capability::Available(value),
            Self::Absent => Capability::Absent,
        }
    }

    /// Map the available value, preserving absence.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Capability<U> {
        match self {
            Self::Available(value) => Capability::Available(f(value)),
            Self::Absent => Capability::Absent,
        }
    }
}

impl<T> From<Option<T>> for Capability<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Available(value),
            None => Self::Absent,
        }
    }
}
