//! Options shared by a builder and every assembler nested under it.

use crate::error::Error;

/// Upper bound on how much a single size hint may pre-allocate.
pub const DEFAULT_MAX_SIZE_HINT: usize = 1 << 16;

/// Options for building nodes.
///
/// Options are carried by styles and inherited by every child assembler,
/// so a whole tree is built under one policy.
///
/// # Example
///
/// ```
/// use datamodel_core::{BuildOptions, BuildOptionsOverride};
///
/// let options = BuildOptions::default().override_with(&BuildOptionsOverride {
///     strict: Some(true),
///     ..Default::default()
/// });
/// assert!(options.strict);
/// assert_eq!(options.clamp_size_hint(usize::MAX), options.max_size_hint);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Panic on protocol misuse instead of returning
    /// [`Error::IllegalState`].
    pub strict: bool,

    /// Size hints are honoured for pre-allocation only up to this many
    /// elements. Containers still grow past it as entries arrive.
    pub max_size_hint: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            strict: false,
            max_size_hint: DEFAULT_MAX_SIZE_HINT,
        }
    }
}

/// Partial [`BuildOptions`]; `None` fields keep the base value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptionsOverride {
    pub strict: Option<bool>,
    pub max_size_hint: Option<usize>,
}

impl BuildOptions {
    pub fn override_with(&self, overrides: &BuildOptionsOverride) -> Self {
        Self {
            strict: overrides.strict.unwrap_or(self.strict),
            max_size_hint: overrides.max_size_hint.unwrap_or(self.max_size_hint),
        }
    }

    pub fn clamp_size_hint(&self, size_hint: usize) -> usize {
        size_hint.min(self.max_size_hint)
    }

    /// Report a protocol violation.
    ///
    /// Every assembler routes its out-of-order calls through here, so the
    /// strict policy applies uniformly.
    ///
    /// # Panics
    ///
    /// Panics when [`strict`](Self::strict) is set.
    #[track_caller]
    pub fn misuse(&self, operation: &'static str, detail: &'static str) -> Error {
        tracing::debug!(operation, detail, "assembler protocol violation");
        if self.strict {
            panic!("invalid state: {operation} cannot be called {detail}");
        }
        Error::IllegalState { operation, detail }
    }
}
