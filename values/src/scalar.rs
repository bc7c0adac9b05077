//! Scalar nodes and their builder.
//!
//! Scalars need no staged assembly: a single `assign_*` call produces the
//! finished node.

use core::any::Any;
use std::sync::Arc;

use datamodel_core::{
    BuildOptions, Error, Kind, KindSet, Link, ListAssembler, MapAssembler, Node, NodeAssembler,
    NodeBuilder, NodeRef, NodeStyle, Result,
};
use once_cell::sync::Lazy;

use crate::phase::Phase;

static NULL: Lazy<NodeRef> = Lazy::new(|| Arc::new(Null));

/// The shared null node.
pub fn null() -> NodeRef {
    NULL.clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Null;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bool(pub bool);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int(pub i64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Float(pub f64);

/// A string node. This is also the key representation of [`MapNode`](crate::MapNode).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Str(Box<str>);

impl Str {
    pub fn new(value: &str) -> Self {
        Str(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bytes(Box<[u8]>);

impl Bytes {
    pub fn new(value: &[u8]) -> Self {
        Bytes(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkNode(pub Link);

macro_rules! impl_scalar_node {
    ($ty:ty, $kind:expr, $name:literal { $($accessor:tt)* }) => {
        impl Node for $ty {
            fn kind(&self) -> Kind {
                $kind
            }

            fn type_name(&self) -> &'static str {
                $name
            }

            fn style(&self) -> Box<dyn NodeStyle> {
                Box::new(ScalarStyle::known($kind))
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            $($accessor)*
        }
    };
}

impl_scalar_node!(Null, Kind::Null, "values.Null" {});

impl_scalar_node!(Bool, Kind::Bool, "values.Bool" {
    fn as_bool(&self) -> Result<bool> {
        Ok(self.0)
    }
});

impl_scalar_node!(Int, Kind::Int, "values.Int" {
    fn as_int(&self) -> Result<i64> {
        Ok(self.0)
    }
});

impl_scalar_node!(Float, Kind::Float, "values.Float" {
    fn as_float(&self) -> Result<f64> {
        Ok(self.0)
    }
});

impl_scalar_node!(Str, Kind::String, "values.String" {
    fn as_str(&self) -> Result<&str> {
        Ok(&self.0)
    }
});

impl_scalar_node!(Bytes, Kind::Bytes, "values.Bytes" {
    fn as_bytes(&self) -> Result<&[u8]> {
        Ok(&self.0)
    }
});

impl_scalar_node!(LinkNode, Kind::Link, "values.Link" {
    fn as_link(&self) -> Result<&Link> {
        Ok(&self.0)
    }
});

pub(crate) fn scalar_type_name(kind: Kind) -> &'static str {
    match kind {
        Kind::Null => "values.Null",
        Kind::Bool => "values.Bool",
        Kind::Int => "values.Int",
        Kind::Float => "values.Float",
        Kind::String => "values.String",
        Kind::Bytes => "values.Bytes",
        Kind::Link => "values.Link",
        Kind::Map => "values.Map",
        Kind::List => "values.List",
        Kind::Invalid => "values.Invalid",
    }
}

/// Re-create a scalar node of another representation as one of ours.
pub(crate) fn rebuild_scalar(node: &dyn Node) -> Result<NodeRef> {
    let rebuilt: NodeRef = match node.kind() {
        Kind::Null => null(),
        Kind::Bool => Arc::new(Bool(node.as_bool()?)),
        Kind::Int => Arc::new(Int(node.as_int()?)),
        Kind::Float => Arc::new(Float(node.as_float()?)),
        Kind::String => Arc::new(Str::new(node.as_str()?)),
        Kind::Bytes => Arc::new(Bytes::new(node.as_bytes()?)),
        Kind::Link => Arc::new(LinkNode(node.as_link()?.clone())),
        Kind::Map | Kind::List | Kind::Invalid => {
            return Err(datamodel_core::wrong_kind(node, "rebuild_scalar", KindSet::SCALAR));
        }
    };
    Ok(rebuilt)
}

/// Style for one scalar kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarStyle {
    kind: Kind,
    options: BuildOptions,
}

impl ScalarStyle {
    /// Fails with `WrongKind` unless `kind` is a scalar kind.
    pub fn new(kind: Kind) -> Result<Self> {
        if !kind.is_scalar() {
            return Err(Error::WrongKind {
                type_name: "values.ScalarStyle",
                method: "new",
                appropriate: KindSet::SCALAR,
                actual: kind,
            });
        }
        Ok(Self::known(kind))
    }

    /// For kinds fixed at the call site.
    pub(crate) fn known(kind: Kind) -> Self {
        Self {
            kind,
            options: BuildOptions::default(),
        }
    }

    pub fn with_options(self, options: BuildOptions) -> Self {
        Self { options, ..self }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }
}

impl NodeStyle for ScalarStyle {
    fn new_builder(&self) -> Box<dyn NodeBuilder> {
        Box::new(ScalarBuilder::new(*self))
    }
}

/// Builder accepting exactly one scalar kind.
#[derive(Debug)]
pub struct ScalarBuilder {
    style: ScalarStyle,
    phase: Phase,
}

impl ScalarBuilder {
    pub fn new(style: ScalarStyle) -> Self {
        Self {
            style,
            phase: Phase::Fresh,
        }
    }

    fn type_name(&self) -> &'static str {
        scalar_type_name(self.style.kind)
    }

    /// Ordering and kind checks shared by every shaping call.
    fn admit(&self, method: &'static str, actual: Kind) -> Result<()> {
        if let Some(detail) = self.phase.shaping_misuse() {
            return Err(self.style.options.misuse(method, detail));
        }
        if actual != self.style.kind {
            return Err(self.wrong_kind(method, actual));
        }
        Ok(())
    }

    fn wrong_kind(&self, method: &'static str, actual: Kind) -> Error {
        Error::WrongKind {
            type_name: self.type_name(),
            method,
            appropriate: KindSet::of(self.style.kind),
            actual,
        }
    }

    /// Phase check first; maps and lists never fit a scalar builder.
    fn reject<T>(&self, method: &'static str, actual: Kind) -> Result<T> {
        if let Some(detail) = self.phase.shaping_misuse() {
            return Err(self.style.options.misuse(method, detail));
        }
        Err(self.wrong_kind(method, actual))
    }

    fn assign(&mut self, method: &'static str, actual: Kind, node: NodeRef) -> Result<()> {
        self.admit(method, actual)?;
        self.phase = Phase::Assigned(node);
        Ok(())
    }
}

impl NodeAssembler for ScalarBuilder {
    fn begin_map(&mut self, _size_hint: usize) -> Result<&mut dyn MapAssembler> {
        self.reject("begin_map", Kind::Map)
    }

    fn begin_list(&mut self, _size_hint: usize) -> Result<&mut dyn ListAssembler> {
        self.reject("begin_list", Kind::List)
    }

    fn assign_null(&mut self) -> Result<()> {
        self.assign("assign_null", Kind::Null, null())
    }

    fn assign_bool(&mut self, value: bool) -> Result<()> {
        self.assign("assign_bool", Kind::Bool, Arc::new(Bool(value)))
    }

    fn assign_int(&mut self, value: i64) -> Result<()> {
        self.assign("assign_int", Kind::Int, Arc::new(Int(value)))
    }

    fn assign_float(&mut self, value: f64) -> Result<()> {
        self.assign("assign_float", Kind::Float, Arc::new(Float(value)))
    }

    fn assign_string(&mut self, value: &str) -> Result<()> {
        self.admit("assign_string", Kind::String)?;
        self.phase = Phase::Assigned(Arc::new(Str::new(value)));
        Ok(())
    }

    fn assign_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.admit("assign_bytes", Kind::Bytes)?;
        self.phase = Phase::Assigned(Arc::new(Bytes::new(value)));
        Ok(())
    }

    fn assign_link(&mut self, value: Link) -> Result<()> {
        self.assign("assign_link", Kind::Link, Arc::new(LinkNode(value)))
    }

    fn assign_node(&mut self, node: NodeRef) -> Result<()> {
        self.admit("assign_node", node.kind())?;
        // Our own representation is adopted as is; anything else is re-created.
        let node = if node.type_name() == self.type_name() {
            node
        } else {
            rebuild_scalar(&*node)?
        };
        self.phase = Phase::Assigned(node);
        Ok(())
    }

    fn style(&self) -> Box<dyn NodeStyle> {
        Box::new(self.style)
    }
}

impl NodeBuilder for ScalarBuilder {
    fn build(&mut self) -> Result<NodeRef> {
        match self.phase.take_built() {
            Ok(node) => Ok(node),
            Err(detail) => Err(self.style.options.misuse("build", detail)),
        }
    }

    fn reset(&mut self) {
        self.phase = Phase::Fresh;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_is_shared() {
        assert!(Arc::ptr_eq(&null(), &null()));
        assert!(null().is_null());
    }

    #[test]
    fn test_accessors_reject_other_kinds() {
        let node = Int(7);
        assert_eq!(node.as_int(), Ok(7));
        let err = node.as_str().unwrap_err();
        assert_eq!(
            err,
            Error::WrongKind {
                type_name: "values.Int",
                method: "as_str",
                appropriate: KindSet::STRING,
                actual: Kind::Int,
            }
        );
        assert!(node.length().unwrap_err().is_wrong_kind());
    }

    #[test]
    fn test_scalar_builder_single_use() {
        let mut builder = ScalarStyle::new(Kind::String).unwrap().new_builder();
        builder.assign_string("hi").unwrap();
        assert!(builder.assign_string("again").unwrap_err().is_illegal_state());

        let node = builder.build().unwrap();
        assert_eq!(node.as_str(), Ok("hi"));
        assert!(builder.build().unwrap_err().is_illegal_state());

        builder.reset();
        builder.assign_string("reused").unwrap();
        assert_eq!(builder.build().unwrap().as_str(), Ok("reused"));
    }

    #[test]
    fn test_scalar_builder_rejects_other_kinds() {
        let mut builder = ScalarBuilder::new(ScalarStyle::new(Kind::Int).unwrap());
        assert!(builder.assign_bool(true).unwrap_err().is_wrong_kind());
        assert!(builder.begin_map(0).is_err());
        assert!(builder.build().unwrap_err().is_illegal_state());
    }

    #[test]
    fn test_style_only_for_scalar_kinds() {
        for kind in [Kind::Invalid, Kind::Map, Kind::List] {
            let err = ScalarStyle::new(kind).unwrap_err();
            assert_eq!(
                err,
                Error::WrongKind {
                    type_name: "values.ScalarStyle",
                    method: "new",
                    appropriate: KindSet::SCALAR,
                    actual: kind,
                }
            );
        }
        assert_eq!(ScalarStyle::new(Kind::Null).map(|s| s.kind()), Ok(Kind::Null));
    }

    #[test]
    fn test_scalar_builder_rejects_containers_after_phase_check() {
        let mut builder = ScalarBuilder::new(ScalarStyle::new(Kind::Bool).unwrap());
        assert!(builder.begin_list(0).unwrap_err().is_wrong_kind());
        builder.assign_bool(true).unwrap();
        assert!(builder.begin_map(0).unwrap_err().is_illegal_state());
    }
}
