//! The read-only node contract.
//!
//! # Design
//!
//! A [`Node`] is an immutable view of one value. Everything that consumes
//! values (encoders, traversal, schema layers) goes through this trait and
//! never touches concrete storage.
//!
//! Every accessor has a default that fails with [`Error::WrongKind`], so a
//! concrete node only implements what its kind supports:
//!
//! ```ignore
//! impl Node for Flag {
//!     fn kind(&self) -> Kind { Kind::Bool }
//!     fn type_name(&self) -> &'static str { "example.Flag" }
//!     fn as_bool(&self) -> Result<bool> { Ok(self.0) }
//!     // ...
//! }
//! ```
//!
//! Nodes are shared as [`NodeRef`] and are `Send + Sync`, so any number of
//! readers can walk a finished tree concurrently.

use core::any::Any;
use core::fmt::Debug;
use std::sync::Arc;

use crate::assembler::NodeStyle;
use crate::error::{Error, Result};
use crate::kind::{Kind, KindSet};
use crate::link::Link;
use crate::path::PathSegment;

/// Shared handle to a finished node.
pub type NodeRef = Arc<dyn Node>;

pub trait Node: Debug + Send + Sync + 'static {
    /// The kind of this node. Never [`Kind::Invalid`].
    fn kind(&self) -> Kind;

    /// Name of the concrete representation, used in error messages.
    fn type_name(&self) -> &'static str;

    /// A style that builds nodes of this same representation.
    fn style(&self) -> Box<dyn NodeStyle>;

    /// Access to the concrete type, for representations that can adopt
    /// their own kind without copying.
    fn as_any(&self) -> &dyn Any;

    fn is_null(&self) -> bool {
        self.kind() == Kind::Null
    }

    fn as_bool(&self) -> Result<bool> {
        Err(wrong_kind(self, "as_bool", KindSet::BOOL))
    }

    fn as_int(&self) -> Result<i64> {
        Err(wrong_kind(self, "as_int", KindSet::INT))
    }

    fn as_float(&self) -> Result<f64> {
        Err(wrong_kind(self, "as_float", KindSet::FLOAT))
    }

    fn as_str(&self) -> Result<&str> {
        Err(wrong_kind(self, "as_str", KindSet::STRING))
    }

    fn as_bytes(&self) -> Result<&[u8]> {
        Err(wrong_kind(self, "as_bytes", KindSet::BYTES))
    }

    fn as_link(&self) -> Result<&Link> {
        Err(wrong_kind(self, "as_link", KindSet::LINK))
    }

    /// Number of entries or items. Maps and lists only.
    fn length(&self) -> Result<usize> {
        Err(wrong_kind(self, "length", KindSet::RECURSIVE))
    }

    /// Look up a map value by its key in string form.
    fn lookup_string(&self, key: &str) -> Result<NodeRef> {
        let _ = key;
        Err(wrong_kind(self, "lookup_string", KindSet::MAP))
    }

    /// Look up a map value by a key node of the map's own key representation.
    fn lookup(&self, key: &dyn Node) -> Result<NodeRef> {
        let _ = key;
        Err(wrong_kind(self, "lookup", KindSet::MAP))
    }

    fn lookup_index(&self, index: usize) -> Result<NodeRef> {
        let _ = index;
        Err(wrong_kind(self, "lookup_index", KindSet::LIST))
    }

    /// Look up by path segment: maps use the segment's string form, lists
    /// its index form.
    fn lookup_segment(&self, segment: &PathSegment) -> Result<NodeRef> {
        match self.kind() {
            Kind::Map => match segment {
                PathSegment::Key(key) => self.lookup_string(key),
                PathSegment::Index(index) => self.lookup_string(&index.to_string()),
            },
            Kind::List => match segment.as_index() {
                Some(index) => self.lookup_index(index),
                None => Err(Error::not_exists(segment.clone())),
            },
            _ => Err(wrong_kind(self, "lookup_segment", KindSet::RECURSIVE)),
        }
    }

    /// A fresh cursor over the entries, in insertion order.
    fn map_iter(&self) -> Result<Box<dyn MapIterator + '_>> {
        Err(wrong_kind(self, "map_iter", KindSet::MAP))
    }

    /// A fresh cursor over the items, in order.
    fn list_iter(&self) -> Result<Box<dyn ListIterator + '_>> {
        Err(wrong_kind(self, "list_iter", KindSet::LIST))
    }
}

/// Single-pass cursor over a map's entries.
///
/// Termination is signalled by [`done`](Self::done); calling
/// [`next`](Self::next) past the end fails with [`Error::IteratorOverread`].
pub trait MapIterator {
    fn next(&mut self) -> Result<(NodeRef, NodeRef)>;

    fn done(&self) -> bool;
}

/// Single-pass cursor over a list's items, yielding `(index, value)`.
pub trait ListIterator {
    fn next(&mut self) -> Result<(usize, NodeRef)>;

    fn done(&self) -> bool;
}

/// The error every unsupported accessor returns.
pub fn wrong_kind<N: Node + ?Sized>(
    node: &N,
    method: &'static str,
    appropriate: KindSet,
) -> Error {
    Error::WrongKind {
        type_name: node.type_name(),
        method,
        appropriate,
        actual: node.kind(),
    }
}
