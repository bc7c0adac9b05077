//! The child value slot shared by map values, list items and [`AnyBuilder`].
//!
//! A [`ValueAssembler`] is embedded in its parent and reused for every
//! entry. It records its own completion, and the parent pulls the finished
//! value out with [`ValueAssembler::take_finished`] when it next advances.
//!
//! [`AnyBuilder`]: crate::AnyBuilder

use core::mem;
use std::sync::Arc;

use datamodel_core::{
    BuildOptions, Error, Kind, KindSet, Link, ListAssembler, MapAssembler, MaybeNode,
    NodeAssembler, NodeRef, NodeStyle, Result,
};
use tracing::trace;

use crate::any::AnyStyle;
use crate::list::{ListNodeAssembler, ListStyle};
use crate::map::{MapNodeAssembler, MapStyle};
use crate::scalar::{Bool, Bytes, Float, Int, LinkNode, ScalarStyle, Str, null, scalar_type_name};

/// What a value slot accepts.
///
/// `kind: None` admits every kind. `nullable` stores nulls as the
/// [`MaybeNode::Null`] wrapper state instead of a null node, which lets a
/// kind-constrained slot accept null at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ValueConstraint {
    pub kind: Option<Kind>,
    pub nullable: bool,
}

impl ValueConstraint {
    pub const ANY: Self = Self {
        kind: None,
        nullable: false,
    };

    pub const fn of(kind: Kind) -> Self {
        Self {
            kind: Some(kind),
            nullable: false,
        }
    }

    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    /// `Invalid` is never admitted, so no slot completes with it.
    pub fn admits(&self, kind: Kind) -> bool {
        kind != Kind::Invalid && self.kind.is_none_or(|k| k == kind)
    }

    /// Every kind a slot under this constraint can be shaped as.
    pub fn accepted(&self) -> KindSet {
        let kinds = match self.kind {
            None => KindSet::all(),
            Some(kind) => KindSet::of(kind),
        };
        if self.nullable {
            kinds | KindSet::NULL
        } else {
            kinds
        }
    }

    /// The style whose builders produce values this constraint admits.
    pub fn style(&self, options: BuildOptions) -> Box<dyn NodeStyle> {
        match self.kind {
            None => Box::new(AnyStyle::new().with_options(options)),
            Some(Kind::Map) => Box::new(MapStyle::default().with_options(options)),
            Some(Kind::List) => Box::new(ListStyle::default().with_options(options)),
            Some(kind) => match ScalarStyle::new(kind) {
                Ok(style) => Box::new(style.with_options(options)),
                // Admits no kind; its builders reject every shaping call.
                Err(_) => Box::new(AnyStyle::constrained(*self).with_options(options)),
            },
        }
    }

    fn type_name(&self) -> &'static str {
        match self.kind {
            None => "values.Any",
            Some(kind) => scalar_type_name(kind),
        }
    }
}

#[derive(Debug, Default)]
enum Slot {
    #[default]
    Empty,
    Map(Box<MapNodeAssembler>),
    List(Box<ListNodeAssembler>),
    /// Nullable wrapper null; no node is stored.
    Null,
    Complete(NodeRef),
    /// Passed through `assign_node` as is.
    Adopted(NodeRef),
}

/// Assembler for a single child value.
#[derive(Debug)]
pub(crate) struct ValueAssembler {
    constraint: ValueConstraint,
    options: BuildOptions,
    slot: Slot,
    spare_map: Option<Box<MapNodeAssembler>>,
    spare_list: Option<Box<ListNodeAssembler>>,
}

impl ValueAssembler {
    pub(crate) fn new(constraint: ValueConstraint, options: BuildOptions) -> Self {
        Self {
            constraint,
            options,
            slot: Slot::Empty,
            spare_map: None,
            spare_list: None,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        matches!(self.slot, Slot::Empty)
    }

    /// Why `build` would fail on this slot right now.
    pub(crate) fn unfinished_detail(&self) -> &'static str {
        match self.slot {
            Slot::Empty => "before any value was assigned",
            Slot::Map(_) | Slot::List(_) => "before the value was finished",
            Slot::Null | Slot::Complete(_) | Slot::Adopted(_) => {
                "on an assembler that's already finished"
            }
        }
    }

    /// Ordering then kind checks for a shaping call.
    fn admit(&self, method: &'static str, kind: Kind) -> Result<()> {
        if !self.is_empty() {
            let detail = match self.slot {
                Slot::Map(_) | Slot::List(_) => "after the value was already begun",
                _ => "on an assembler that's already finished",
            };
            return Err(self.options.misuse(method, detail));
        }
        if !self.constraint.admits(kind) {
            return Err(Error::WrongKind {
                type_name: self.constraint.type_name(),
                method,
                appropriate: self.constraint.accepted(),
                actual: kind,
            });
        }
        Ok(())
    }

    fn complete(&mut self, method: &'static str, kind: Kind, node: NodeRef) -> Result<()> {
        self.admit(method, kind)?;
        self.slot = Slot::Complete(node);
        Ok(())
    }

    /// The finished payload, if the slot is settled.
    ///
    /// A begun map or list only counts once its own `finish` succeeded. On
    /// success the slot is cleared for the next entry and any child
    /// assembler is kept for reuse.
    pub(crate) fn take_finished(&mut self) -> Option<MaybeNode> {
        let value = match &mut self.slot {
            Slot::Empty => return None,
            Slot::Map(ma) => MaybeNode::Value(ma.take_finished()?),
            Slot::List(la) => MaybeNode::Value(la.take_finished()?),
            Slot::Null => MaybeNode::Null,
            Slot::Complete(node) | Slot::Adopted(node) => MaybeNode::Value(node.clone()),
        };
        self.recycle();
        Some(value)
    }

    pub(crate) fn reset(&mut self) {
        self.recycle();
    }

    fn recycle(&mut self) {
        match mem::take(&mut self.slot) {
            Slot::Map(ma) => self.spare_map = Some(ma),
            Slot::List(la) => self.spare_list = Some(la),
            Slot::Empty | Slot::Null | Slot::Complete(_) | Slot::Adopted(_) => {}
        }
    }
}

impl NodeAssembler for ValueAssembler {
    fn begin_map(&mut self, size_hint: usize) -> Result<&mut dyn MapAssembler> {
        self.admit("begin_map", Kind::Map)?;
        let mut ma = self.spare_map.take().unwrap_or_else(|| {
            Box::new(MapNodeAssembler::new(
                MapStyle::default().with_options(self.options),
            ))
        });
        ma.begin(size_hint);
        trace!(size_hint, "child map begun");
        self.slot = Slot::Map(ma);
        match &mut self.slot {
            Slot::Map(ma) => Ok(&mut **ma),
            _ => unreachable!(),
        }
    }

    fn begin_list(&mut self, size_hint: usize) -> Result<&mut dyn ListAssembler> {
        self.admit("begin_list", Kind::List)?;
        let mut la = self.spare_list.take().unwrap_or_else(|| {
            Box::new(ListNodeAssembler::new(
                ListStyle::default().with_options(self.options),
            ))
        });
        la.begin(size_hint);
        trace!(size_hint, "child list begun");
        self.slot = Slot::List(la);
        match &mut self.slot {
            Slot::List(la) => Ok(&mut **la),
            _ => unreachable!(),
        }
    }

    fn assign_null(&mut self) -> Result<()> {
        if self.constraint.nullable {
            // Any kind constraint applies to values, not to the wrapper.
            if !self.is_empty() {
                return Err(self
                    .options
                    .misuse("assign_null", "on an assembler that's already finished"));
            }
            self.slot = Slot::Null;
            return Ok(());
        }
        self.complete("assign_null", Kind::Null, null())
    }

    fn assign_bool(&mut self, value: bool) -> Result<()> {
        self.complete("assign_bool", Kind::Bool, Arc::new(Bool(value)))
    }

    fn assign_int(&mut self, value: i64) -> Result<()> {
        self.complete("assign_int", Kind::Int, Arc::new(Int(value)))
    }

    fn assign_float(&mut self, value: f64) -> Result<()> {
        self.complete("assign_float", Kind::Float, Arc::new(Float(value)))
    }

    fn assign_string(&mut self, value: &str) -> Result<()> {
        self.admit("assign_string", Kind::String)?;
        self.slot = Slot::Complete(Arc::new(Str::new(value)));
        Ok(())
    }

    fn assign_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.admit("assign_bytes", Kind::Bytes)?;
        self.slot = Slot::Complete(Arc::new(Bytes::new(value)));
        Ok(())
    }

    fn assign_link(&mut self, value: Link) -> Result<()> {
        self.complete("assign_link", Kind::Link, Arc::new(LinkNode(value)))
    }

    /// Nodes are adopted as given; nothing is copied.
    fn assign_node(&mut self, node: NodeRef) -> Result<()> {
        if node.is_null() {
            return self.assign_null();
        }
        self.admit("assign_node", node.kind())?;
        trace!(type_name = node.type_name(), "adopting node");
        self.slot = Slot::Adopted(node);
        Ok(())
    }

    fn style(&self) -> Box<dyn NodeStyle> {
        self.constraint.style(self.options)
    }
}

#[cfg(test)]
mod tests {
    use datamodel_core::{Maybe, Node, NodeBuilder};

    use super::*;

    #[test]
    fn test_constraint_admission() {
        let any = ValueConstraint::ANY;
        assert!(Kind::CONCRETE.iter().all(|&k| any.admits(k)));
        assert!(!any.admits(Kind::Invalid));
        assert!(!ValueConstraint::of(Kind::Invalid).admits(Kind::Invalid));

        let ints = ValueConstraint::of(Kind::Int).nullable();
        assert!(ints.admits(Kind::Int));
        assert!(!ints.admits(Kind::Null));
        assert_eq!(ints.accepted(), KindSet::INT | KindSet::NULL);
    }

    #[test]
    fn test_second_shaping_is_misuse() {
        let mut va = ValueAssembler::new(ValueConstraint::ANY, BuildOptions::default());
        va.assign_int(1).unwrap();
        assert!(va.assign_int(2).unwrap_err().is_illegal_state());
        assert!(va.begin_map(0).unwrap_err().is_illegal_state());
    }

    #[test]
    fn test_adopted_node_is_passed_through() {
        let node: NodeRef = Arc::new(Int(3));
        let mut va = ValueAssembler::new(ValueConstraint::ANY, BuildOptions::default());
        va.assign_node(node.clone()).unwrap();
        assert!(matches!(va.slot, Slot::Adopted(_)));
        assert!(va.assign_int(4).unwrap_err().is_illegal_state());

        let taken = va.take_finished().and_then(MaybeNode::into_value).unwrap();
        assert!(Arc::ptr_eq(&taken, &node));
        assert!(va.is_empty());
    }

    #[test]
    fn test_invalid_constraint_style_rejects_everything() {
        let style = ValueConstraint::of(Kind::Invalid).style(BuildOptions::default());
        let mut builder = style.new_builder();
        assert!(builder.assign_int(1).unwrap_err().is_wrong_kind());
        assert!(builder.begin_map(0).unwrap_err().is_wrong_kind());
        assert!(builder.build().unwrap_err().is_illegal_state());
    }

    #[test]
    fn test_null_under_kind_constraint() {
        let mut va = ValueAssembler::new(ValueConstraint::of(Kind::Int), BuildOptions::default());
        let err = va.assign_null().unwrap_err();
        assert_eq!(
            err,
            Error::WrongKind {
                type_name: "values.Int",
                method: "assign_null",
                appropriate: KindSet::INT,
                actual: Kind::Null,
            }
        );

        let mut va = ValueAssembler::new(
            ValueConstraint::of(Kind::Int).nullable(),
            BuildOptions::default(),
        );
        va.assign_null().unwrap();
        assert_eq!(va.take_finished().map(|m| m.state()), Some(Maybe::Null));
        assert!(va.is_empty());
    }

    #[test]
    fn test_unfinished_child_is_not_taken() {
        let mut va = ValueAssembler::new(ValueConstraint::ANY, BuildOptions::default());
        let ma = va.begin_map(1).unwrap();
        ma.assemble_entry("a").unwrap().assign_int(1).unwrap();
        assert!(va.take_finished().is_none());

        let Slot::Map(ma) = &mut va.slot else {
            panic!("expected a map slot");
        };
        ma.finish().unwrap();
        let node = va.take_finished().and_then(MaybeNode::into_value).unwrap();
        assert_eq!(node.length(), Ok(1));
        assert!(va.spare_map.is_some());
    }
}
