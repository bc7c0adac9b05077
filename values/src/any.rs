//! The kind-erased builder: one builder for every kind, with the kind
//! decided by the first shaping call.

use datamodel_core::{
    BuildOptions, Link, ListAssembler, MapAssembler, MaybeNode, Node, NodeAssembler, NodeBuilder,
    NodeRef, NodeStyle, Result,
};
use tracing::trace;

use crate::phase::Phase;
use crate::scalar::null;
use crate::value::{ValueAssembler, ValueConstraint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnyStyle {
    values: ValueConstraint,
    options: BuildOptions,
}

impl AnyStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builders that only accept what `values` admits.
    pub(crate) fn constrained(values: ValueConstraint) -> Self {
        Self {
            values,
            options: BuildOptions::default(),
        }
    }

    pub fn with_options(self, options: BuildOptions) -> Self {
        Self { options, ..self }
    }
}

impl NodeStyle for AnyStyle {
    fn new_builder(&self) -> Box<dyn NodeBuilder> {
        Box::new(AnyBuilder::from_style(*self))
    }
}

/// Builder that accepts any kind.
///
/// Exactly one shaping call may succeed before [`build`](NodeBuilder::build).
/// Maps and lists use the default representations; `assign_node` adopts the
/// given node as is.
///
/// ```
/// use datamodel_core::{Node, NodeAssembler, NodeBuilder};
/// use datamodel_values::AnyBuilder;
///
/// let mut builder = AnyBuilder::new();
/// let ma = builder.begin_map(1).unwrap();
/// ma.assemble_entry("answer").unwrap().assign_int(42).unwrap();
/// ma.finish().unwrap();
///
/// let node = builder.build().unwrap();
/// assert_eq!(node.lookup_string("answer").unwrap().as_int(), Ok(42));
/// ```
#[derive(Debug)]
pub struct AnyBuilder {
    inner: ValueAssembler,
    style: AnyStyle,
    /// Only `Fresh` or `Built`; the payload lives in `inner`.
    phase: Phase,
}

impl Default for AnyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnyBuilder {
    pub fn new() -> Self {
        Self::with_options(BuildOptions::default())
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self::from_style(AnyStyle::new().with_options(options))
    }

    fn from_style(style: AnyStyle) -> Self {
        Self {
            inner: ValueAssembler::new(style.values, style.options),
            style,
            phase: Phase::Fresh,
        }
    }

    fn spent(&self, operation: &'static str) -> Result<()> {
        match self.phase.shaping_misuse() {
            Some(detail) => Err(self.style.options.misuse(operation, detail)),
            None => Ok(()),
        }
    }
}

impl NodeAssembler for AnyBuilder {
    fn begin_map(&mut self, size_hint: usize) -> Result<&mut dyn MapAssembler> {
        self.spent("begin_map")?;
        self.inner.begin_map(size_hint)
    }

    fn begin_list(&mut self, size_hint: usize) -> Result<&mut dyn ListAssembler> {
        self.spent("begin_list")?;
        self.inner.begin_list(size_hint)
    }

    fn assign_null(&mut self) -> Result<()> {
        self.spent("assign_null")?;
        self.inner.assign_null()
    }

    fn assign_bool(&mut self, value: bool) -> Result<()> {
        self.spent("assign_bool")?;
        self.inner.assign_bool(value)
    }

    fn assign_int(&mut self, value: i64) -> Result<()> {
        self.spent("assign_int")?;
        self.inner.assign_int(value)
    }

    fn assign_float(&mut self, value: f64) -> Result<()> {
        self.spent("assign_float")?;
        self.inner.assign_float(value)
    }

    fn assign_string(&mut self, value: &str) -> Result<()> {
        self.spent("assign_string")?;
        self.inner.assign_string(value)
    }

    fn assign_bytes(&mut self, value: &[u8]) -> Result<()> {
        self.spent("assign_bytes")?;
        self.inner.assign_bytes(value)
    }

    fn assign_link(&mut self, value: Link) -> Result<()> {
        self.spent("assign_link")?;
        self.inner.assign_link(value)
    }

    fn assign_node(&mut self, node: NodeRef) -> Result<()> {
        self.spent("assign_node")?;
        self.inner.assign_node(node)
    }

    fn style(&self) -> Box<dyn NodeStyle> {
        Box::new(self.style)
    }
}

impl NodeBuilder for AnyBuilder {
    fn build(&mut self) -> Result<NodeRef> {
        let options = self.style.options;
        if let Phase::Built = self.phase {
            return Err(options.misuse("build", self.phase.build_misuse()));
        }
        let detail = self.inner.unfinished_detail();
        let node = match self.inner.take_finished() {
            Some(MaybeNode::Value(node)) => node,
            Some(MaybeNode::Null) => null(),
            Some(MaybeNode::Absent) | None => return Err(options.misuse("build", detail)),
        };
        self.phase = Phase::Built;
        trace!(kind = %node.kind(), "built node");
        Ok(node)
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.phase = Phase::Fresh;
    }
}
