//! Error type shared by every node and assembler.
//!
//! Each variant is returned by the operation that detects it. Only
//! [`Error::IllegalState`] signals a caller bug; everything else is an
//! ordinary, recoverable outcome the caller can branch on.

use thiserror::Error;

use crate::kind::{Kind, KindSet};
use crate::path::PathSegment;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An operation was invoked out of protocol order.
    #[error("invalid state: {operation} cannot be called {detail}")]
    IllegalState {
        operation: &'static str,
        detail: &'static str,
    },

    /// An operation was attempted against an incompatible kind.
    #[error("{type_name}.{method}: only works on kinds {appropriate}, not {actual}")]
    WrongKind {
        type_name: &'static str,
        method: &'static str,
        appropriate: KindSet,
        actual: Kind,
    },

    /// A lookup found nothing at the given key or index.
    #[error("key not found: {segment}")]
    NotExists { segment: PathSegment },

    /// A map key was assembled a second time.
    #[error("repeated map key: {key:?}")]
    DuplicateKey { key: String },

    /// `next()` was called on an exhausted iterator.
    #[error("iterator overread: next() called after done()")]
    IteratorOverread,

    /// `lookup` was given a key node that is not the map's key representation.
    #[error("{type_name}.lookup: key of kind {actual} is not a {type_name} key")]
    InvalidKeyType {
        type_name: &'static str,
        actual: Kind,
    },
}

impl Error {
    pub fn not_exists(segment: impl Into<PathSegment>) -> Self {
        Error::NotExists {
            segment: segment.into(),
        }
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, Error::IllegalState { .. })
    }

    pub fn is_wrong_kind(&self) -> bool {
        matches!(self, Error::WrongKind { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotExists { .. })
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Error::DuplicateKey { .. })
    }

    /// Everything except a protocol violation can be handled by the caller.
    pub fn is_recoverable(&self) -> bool {
        !self.is_illegal_state()
    }
}
