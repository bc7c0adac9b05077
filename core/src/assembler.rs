//! The write side: styles, builders and assemblers.
//!
//! # Protocol
//!
//! A [`NodeStyle`] hands out fresh [`NodeBuilder`]s. A builder is shaped by
//! exactly one call (`begin_map`, `begin_list` or one of the `assign_*`
//! methods); recursive kinds then hand out child assemblers for their
//! entries. Handles returned by an assembler borrow it, so a caller can only
//! drive one level of the hierarchy at a time.
//!
//! ```text
//! builder.begin_map(2)?            -> &mut dyn MapAssembler
//!   ma.assemble_key()?.assign_string("a")?
//!   ma.assemble_value()?.assign_int(1)?
//!   ma.assemble_entry("b")?.assign_int(2)?
//!   ma.finish()?
//! builder.build()?                 -> NodeRef
//! ```
//!
//! Calls made out of order fail with
//! [`Error::IllegalState`](crate::Error::IllegalState).

use core::fmt::Debug;

use crate::error::Result;
use crate::link::Link;
use crate::node::NodeRef;

/// Stateless factory for builders of one representation.
pub trait NodeStyle: Debug + Send + Sync {
    fn new_builder(&self) -> Box<dyn NodeBuilder>;
}

/// Write handle for one value.
///
/// Exactly one shaping call may succeed per assembler.
pub trait NodeAssembler: Debug {
    fn begin_map(&mut self, size_hint: usize) -> Result<&mut dyn MapAssembler>;

    fn begin_list(&mut self, size_hint: usize) -> Result<&mut dyn ListAssembler>;

    fn assign_null(&mut self) -> Result<()>;

    fn assign_bool(&mut self, value: bool) -> Result<()>;

    fn assign_int(&mut self, value: i64) -> Result<()>;

    fn assign_float(&mut self, value: f64) -> Result<()>;

    fn assign_string(&mut self, value: &str) -> Result<()>;

    fn assign_bytes(&mut self, value: &[u8]) -> Result<()>;

    fn assign_link(&mut self, value: Link) -> Result<()>;

    /// Assign an already-built node, of any origin.
    fn assign_node(&mut self, node: NodeRef) -> Result<()>;

    /// The style of the nodes this assembler produces.
    fn style(&self) -> Box<dyn NodeStyle>;
}

/// Top-level, single-use entry point producing one node.
pub trait NodeBuilder: NodeAssembler {
    /// Produce the finished node.
    ///
    /// Fails with `IllegalState` if nothing was assigned, or a begun map or
    /// list was not finished.
    fn build(&mut self) -> Result<NodeRef>;

    /// Discard all partial state so the builder can be used again.
    fn reset(&mut self);
}

/// Write handle for a map being assembled.
pub trait MapAssembler: Debug {
    /// Start the next key. The returned assembler only accepts the map's key kind.
    fn assemble_key(&mut self) -> Result<&mut dyn NodeAssembler>;

    /// Start the value for the key just assigned.
    fn assemble_value(&mut self) -> Result<&mut dyn NodeAssembler>;

    /// Shorthand for `assemble_key` + `assign_string` + `assemble_value`.
    fn assemble_entry(&mut self, key: &str) -> Result<&mut dyn NodeAssembler>;

    fn finish(&mut self) -> Result<()>;

    fn key_style(&self) -> Box<dyn NodeStyle>;

    fn value_style(&self, key: &str) -> Box<dyn NodeStyle>;
}

/// Write handle for a list being assembled.
pub trait ListAssembler: Debug {
    fn assemble_value(&mut self) -> Result<&mut dyn NodeAssembler>;

    fn finish(&mut self) -> Result<()>;

    fn value_style(&self, index: usize) -> Box<dyn NodeStyle>;
}
