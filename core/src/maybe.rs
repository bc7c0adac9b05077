use crate::node::NodeRef;

/// Tri-state optionality.
///
/// An assembler's completion signal starts out `Absent` and only ever moves
/// forward, to `Null` or (after any in-progress work) to `Value`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Maybe {
    #[default]
    Absent,
    Null,
    Value,
}

impl Maybe {
    pub const fn is_absent(self) -> bool {
        matches!(self, Maybe::Absent)
    }
}

/// A [`Maybe`] that carries its payload.
///
/// This is the wrapper stored for nullable map values, and what
/// `lookup_maybe` returns.
#[derive(Clone, Debug, Default)]
pub enum MaybeNode {
    #[default]
    Absent,
    Null,
    Value(NodeRef),
}

impl MaybeNode {
    pub fn state(&self) -> Maybe {
        match self {
            MaybeNode::Absent => Maybe::Absent,
            MaybeNode::Null => Maybe::Null,
            MaybeNode::Value(_) => Maybe::Value,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, MaybeNode::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MaybeNode::Null)
    }

    pub fn value(&self) -> Option<&NodeRef> {
        match self {
            MaybeNode::Value(node) => Some(node),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<NodeRef> {
        match self {
            MaybeNode::Value(node) => Some(node),
            _ => None,
        }
    }
}
