//! Live token access
//!
//! Thin pass-through over the root element's CSS custom properties: a dotted
//! token path (`color.text.primary`) maps to the flattened property the
//! build step emits (`--color-text-primary`). Reads come from the computed
//! style, writes land as inline overrides.

use crate::ThemeContext;
use winden_core::css_variable_name;
use winden_platform::Capability;

/// A token path with optional per-breakpoint variants.
///
/// Only the base path is resolved today; breakpoint-aware resolution stays
/// with the CSS layer, which already gets the variants from the generated
/// utility classes.
#[derive(Clone, Debug, Default)]
pub struct ResponsiveTokenPaths {
    /// Path used for resolution.
    pub base: String,
    /// `sm` breakpoint variant.
    pub sm: Option<String>,
    /// `md` breakpoint variant.
    pub md: Option<String>,
    /// `lg` breakpoint variant.
    pub lg: Option<String>,
    /// `xl` breakpoint variant.
    pub xl: Option<String>,
    /// `2xl` breakpoint variant.
    pub xxl: Option<String>,
}

impl ResponsiveTokenPaths {
    /// Paths with only a base entry.
    pub fn base(path: impl Into<String>) -> Self {
        Self {
            base: path.into(),
            ..Self::default()
        }
    }
}

impl ThemeContext {
    /// Resolve a dotted token path against the root's computed style.
    /// `None` when the root element is absent or the property is unset.
    pub fn token_value(&self, path: &str) -> Option<String> {
        let root = self.inner.env.root().available()?;
        root.computed_value(&css_variable_name(path))
    }

    /// Write token overrides as inline custom properties on the root.
    /// Silently does nothing on a rootless host.
    pub fn update_tokens<I, K, V>(&self, updates: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let Capability::Available(root) = self.inner.env.root() else {
            return;
        };
        for (path, value) in updates {
            root.set_property(&css_variable_name(path.as_ref()), value.as_ref());
        }
    }

    /// Resolve a responsive token set. Currently resolves the base path.
    pub fn responsive_token_value(&self, paths: &ResponsiveTokenPaths) -> Option<String> {
        self.token_value(&paths.base)
    }
}
