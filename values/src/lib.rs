//! Default node representations for the data model.
//!
//! - [`MapNode`], [`ListNode`] and the scalar nodes implement
//!   [`Node`](datamodel_core::Node)
//! - [`MapStyle`], [`ListStyle`], [`ScalarStyle`] and [`AnyStyle`] hand out
//!   the matching builders
//! - [`copy_node`] and [`deep_equal`] work across any representations

#![deny(unsafe_code)]

pub mod any;
pub mod copy;
pub mod equal;
pub mod list;
pub mod map;
mod phase;
pub mod scalar;
pub mod value;

pub use any::{AnyBuilder, AnyStyle};
pub use copy::copy_node;
pub use equal::deep_equal;
pub use list::{ListBuilder, ListNode, ListStyle};
pub use map::{MapBuilder, MapNode, MapStyle};
pub use scalar::{
    Bool, Bytes, Float, Int, LinkNode, Null, ScalarBuilder, ScalarStyle, Str, null,
};
pub use value::ValueConstraint;

static_assertions::assert_impl_all!(MapNode: Send, Sync);
static_assertions::assert_impl_all!(ListNode: Send, Sync);
