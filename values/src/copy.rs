//! Copying nodes between representations.
//!
//! Copies read the source only through [`Node`] and write through
//! [`NodeAssembler`], so they work for any pair of representations.
//!
//! # Example
//!
//! ```
//! use datamodel_core::{Node, NodeAssembler, NodeBuilder};
//! use datamodel_values::{AnyBuilder, MapBuilder, MapStyle, copy_node};
//!
//! let mut src = AnyBuilder::new();
//! src.assign_int(42).unwrap();
//! let node = src.build().unwrap();
//!
//! let mut dst = AnyBuilder::new();
//! copy_node(&*node, &mut dst).unwrap();
//! assert_eq!(dst.build().unwrap().as_int(), Ok(42));
//!
//! // A map style refuses anything but maps.
//! let mut maps = MapBuilder::new(MapStyle::default());
//! assert!(copy_node(&*node, &mut maps).unwrap_err().is_wrong_kind());
//! ```

use datamodel_core::{
    Kind, KindSet, ListAssembler, MapAssembler, Node, NodeAssembler, NodeRef, Result, wrong_kind,
};

/// Deep-copy `src` into `dst`.
///
/// Recursive kinds are rebuilt level by level, so the result shares no
/// structure with the source. Stops at the first error; `dst` is then left
/// unfinished and its `build` fails.
pub fn copy_node(src: &dyn Node, dst: &mut dyn NodeAssembler) -> Result<()> {
    match src.kind() {
        Kind::Null => dst.assign_null(),
        Kind::Bool => dst.assign_bool(src.as_bool()?),
        Kind::Int => dst.assign_int(src.as_int()?),
        Kind::Float => dst.assign_float(src.as_float()?),
        Kind::String => dst.assign_string(src.as_str()?),
        Kind::Bytes => dst.assign_bytes(src.as_bytes()?),
        Kind::Link => dst.assign_link(src.as_link()?.clone()),
        Kind::Map => copy_entries(src, dst.begin_map(src.length()?)?, |value, va| {
            copy_node(&*value, va)
        }),
        Kind::List => copy_items(src, dst.begin_list(src.length()?)?, |item, va| {
            copy_node(&*item, va)
        }),
        Kind::Invalid => Err(wrong_kind(src, "copy_node", KindSet::all())),
    }
}

/// Shallow import: each key and value is handed over with `assign_node`,
/// so the target adopts child nodes without copying them.
pub(crate) fn replay_map(src: &dyn Node, ma: &mut dyn MapAssembler) -> Result<()> {
    copy_entries(src, ma, |value, va| va.assign_node(value))
}

pub(crate) fn replay_list(src: &dyn Node, la: &mut dyn ListAssembler) -> Result<()> {
    copy_items(src, la, |item, va| va.assign_node(item))
}

fn copy_entries(
    src: &dyn Node,
    ma: &mut dyn MapAssembler,
    value: impl Fn(NodeRef, &mut dyn NodeAssembler) -> Result<()>,
) -> Result<()> {
    let mut entries = src.map_iter()?;
    while !entries.done() {
        let (k, v) = entries.next()?;
        ma.assemble_key()?.assign_node(k)?;
        value(v, ma.assemble_value()?)?;
    }
    ma.finish()
}

fn copy_items(
    src: &dyn Node,
    la: &mut dyn ListAssembler,
    item: impl Fn(NodeRef, &mut dyn NodeAssembler) -> Result<()>,
) -> Result<()> {
    let mut items = src.list_iter()?;
    while !items.done() {
        let (_, v) = items.next()?;
        item(v, la.assemble_value()?)?;
    }
    la.finish()
}
