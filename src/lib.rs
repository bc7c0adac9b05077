//! Datamodel - a generic, schema-free tree of values
//!
//! # Overview
//!
//! Values are trees of maps, lists and scalars. Consumers read them through
//! the [`Node`] trait and never see concrete storage; producers (decoders,
//! converters, schema layers) write them through a strict builder protocol:
//!
//! - a [`NodeStyle`] hands out fresh [`NodeBuilder`]s
//! - a builder is shaped exactly once: `begin_map`, `begin_list` or an
//!   `assign_*` call
//! - maps are filled key by key through a [`MapAssembler`]
//! - calls made out of order fail with [`Error::IllegalState`]
//!
//! # Quick Start
//!
//! ```
//! use datamodel::{AnyStyle, Error, Node, NodeAssembler, NodeBuilder, NodeStyle};
//!
//! let mut builder = AnyStyle::new().new_builder();
//! let ma = builder.begin_map(2).unwrap();
//! ma.assemble_entry("a").unwrap().assign_int(1).unwrap();
//! ma.assemble_entry("b").unwrap().assign_int(2).unwrap();
//!
//! // Keys are unique.
//! assert!(ma.assemble_entry("a").unwrap_err().is_duplicate_key());
//! ma.finish().unwrap();
//!
//! let map = builder.build().unwrap();
//! assert_eq!(map.length(), Ok(2));
//! assert_eq!(map.lookup_string("a").unwrap().as_int(), Ok(1));
//! assert_eq!(map.lookup_string("c").unwrap_err(), Error::not_exists("c"));
//! ```
//!
//! # Representations
//!
//! [`MapStyle`] and [`ListStyle`] take a [`ValueConstraint`] that restricts
//! the kind of their values and decides whether nulls are stored as a
//! wrapper state. [`AnyStyle`] accepts every kind. Any node can be imported
//! into another representation with `assign_node` or [`copy_node`].

// Re-export the node and builder contract
pub use datamodel_core::{
    BuildOptions, BuildOptionsOverride, Error, Kind, KindSet, Link, ListAssembler, ListIterator,
    MapAssembler, MapIterator, Maybe, MaybeNode, Node, NodeAssembler, NodeBuilder, NodeRef,
    NodeStyle, PathSegment, Result,
};

// Re-export the default representations
pub use datamodel_values::{
    AnyBuilder, AnyStyle, ListBuilder, ListNode, ListStyle, MapBuilder, MapNode, MapStyle,
    ScalarBuilder, ScalarStyle, ValueConstraint, copy_node, deep_equal, null,
};
pub use datamodel_values::scalar;
