//! The default list representation and its assembly.
//!
//! Lists follow the same protocol as maps, minus keys: `assemble_value`
//! hands out the embedded child slot, and the next call tidies its result
//! onto the end of the list.

use core::any::Any;
use core::mem;
use std::sync::Arc;

use datamodel_core::{
    BuildOptions, Error, Kind, KindSet, Link, ListAssembler, ListIterator, MapAssembler,
    MaybeNode, Node, NodeAssembler, NodeBuilder, NodeRef, NodeStyle, Result,
};
use tracing::trace;

use crate::copy::replay_list;
use crate::phase::Phase;
use crate::scalar::null;
use crate::value::{ValueAssembler, ValueConstraint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListStyle {
    values: ValueConstraint,
    options: BuildOptions,
}

impl ListStyle {
    pub fn new(values: ValueConstraint) -> Self {
        Self {
            values,
            options: BuildOptions::default(),
        }
    }

    pub fn with_options(self, options: BuildOptions) -> Self {
        Self { options, ..self }
    }

    pub fn values(&self) -> ValueConstraint {
        self.values
    }
}

impl NodeStyle for ListStyle {
    fn new_builder(&self) -> Box<dyn NodeBuilder> {
        Box::new(ListBuilder::new(*self))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListNode {
    values: ValueConstraint,
    items: Vec<NodeRef>,
}

impl ListNode {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeRef> {
        self.items.iter()
    }
}

impl Node for ListNode {
    fn kind(&self) -> Kind {
        Kind::List
    }

    fn type_name(&self) -> &'static str {
        "values.List"
    }

    fn style(&self) -> Box<dyn NodeStyle> {
        Box::new(ListStyle::new(self.values))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn length(&self) -> Result<usize> {
        Ok(self.items.len())
    }

    fn lookup_index(&self, index: usize) -> Result<NodeRef> {
        self.items
            .get(index)
            .cloned()
            .ok_or_else(|| Error::not_exists(index))
    }

    fn list_iter(&self) -> Result<Box<dyn ListIterator + '_>> {
        Ok(Box::new(ListItems {
            items: &self.items,
            next: 0,
        }))
    }
}

struct ListItems<'a> {
    items: &'a [NodeRef],
    next: usize,
}

impl ListIterator for ListItems<'_> {
    fn next(&mut self) -> Result<(usize, NodeRef)> {
        let item = self.items.get(self.next).ok_or(Error::IteratorOverread)?;
        let index = self.next;
        self.next += 1;
        Ok((index, item.clone()))
    }

    fn done(&self) -> bool {
        self.next >= self.items.len()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ListState {
    Initial,
    MidValue,
    Finished,
}

impl ListState {
    fn next(self, finish: bool) -> Result<ListState, &'static str> {
        match (self, finish) {
            (ListState::Initial, false) => Ok(ListState::MidValue),
            (ListState::Initial, true) => Ok(ListState::Finished),
            (ListState::MidValue, _) => Err("when in the middle of assembling a value"),
            (ListState::Finished, _) => Err("on an assembler that's already finished"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ListNodeAssembler {
    style: ListStyle,
    w: ListNode,
    state: ListState,
    va: ValueAssembler,
}

impl ListNodeAssembler {
    pub(crate) fn new(style: ListStyle) -> Self {
        Self {
            style,
            w: ListNode {
                values: style.values,
                items: Vec::new(),
            },
            state: ListState::Initial,
            va: ValueAssembler::new(style.values, style.options),
        }
    }

    pub(crate) fn begin(&mut self, size_hint: usize) {
        let capacity = self.style.options.clamp_size_hint(size_hint);
        self.w = ListNode {
            values: self.style.values,
            items: Vec::with_capacity(capacity),
        };
        self.state = ListState::Initial;
        self.va.reset();
    }

    pub(crate) fn take_finished(&mut self) -> Option<NodeRef> {
        if self.state != ListState::Finished {
            return None;
        }
        Some(Arc::new(mem::take(&mut self.w)))
    }

    fn transition(&mut self, operation: &'static str, finish: bool) -> Result<ListState> {
        if self.state == ListState::MidValue {
            if let Some(value) = self.va.take_finished() {
                let item = match value {
                    MaybeNode::Value(node) => node,
                    MaybeNode::Null | MaybeNode::Absent => null(),
                };
                self.w.items.push(item);
                self.state = ListState::Initial;
            }
        }
        self.state
            .next(finish)
            .map_err(|detail| self.style.options.misuse(operation, detail))
    }
}

impl ListAssembler for ListNodeAssembler {
    fn assemble_value(&mut self) -> Result<&mut dyn NodeAssembler> {
        self.state = self.transition("assemble_value", false)?;
        Ok(&mut self.va)
    }

    fn finish(&mut self) -> Result<()> {
        self.state = self.transition("finish", true)?;
        trace!(len = self.w.items.len(), "list finished");
        Ok(())
    }

    fn value_style(&self, _index: usize) -> Box<dyn NodeStyle> {
        self.va.style()
    }
}

/// Builder for [`ListNode`]s of one [`ListStyle`].
#[derive(Debug)]
pub struct ListBuilder {
    la: ListNodeAssembler,
    phase: Phase,
}

impl ListBuilder {
    pub fn new(style: ListStyle) -> Self {
        Self {
            la: ListNodeAssembler::new(style),
            phase: Phase::Fresh,
        }
    }

    fn admit(&self, method: &'static str) -> Result<()> {
        match self.phase.shaping_misuse() {
            Some(detail) => Err(self.la.style.options.misuse(method, detail)),
            None => Ok(()),
        }
    }

    fn reject<T>(&self, method: &'static str, actual: Kind) -> Result<T> {
        self.admit(method)?;
        Err(Error::WrongKind {
            type_name: "values.List",
            method,
            appropriate: KindSet::LIST,
            actual,
        })
    }
}

impl NodeAssembler for ListBuilder {
    fn begin_map(&mut self, _size_hint: usize) -> Result<&mut dyn MapAssembler> {
        self.reject("begin_map", Kind::Map)
    }

    fn begin_list(&mut self, size_hint: usize) -> Result<&mut dyn ListAssembler> {
        self.admit("begin_list")?;
        self.la.begin(size_hint);
        self.phase = Phase::Begun;
        Ok(&mut self.la)
    }

    fn assign_null(&mut self) -> Result<()> {
        self.reject("assign_null", Kind::Null)
    }

    fn assign_bool(&mut self, _value: bool) -> Result<()> {
        self.reject("assign_bool", Kind::Bool)
    }

    fn assign_int(&mut self, _value: i64) -> Result<()> {
        self.reject("assign_int", Kind::Int)
    }

    fn assign_float(&mut self, _value: f64) -> Result<()> {
        self.reject("assign_float", Kind::Float)
    }

    fn assign_string(&mut self, _value: &str) -> Result<()> {
        self.reject("assign_string", Kind::String)
    }

    fn assign_bytes(&mut self, _value: &[u8]) -> Result<()> {
        self.reject("assign_bytes", Kind::Bytes)
    }

    fn assign_link(&mut self, _value: Link) -> Result<()> {
        self.reject("assign_link", Kind::Link)
    }

    fn assign_node(&mut self, node: NodeRef) -> Result<()> {
        if node.is_null() {
            return self.assign_null();
        }
        self.admit("assign_node")?;
        let same_repr = node
            .as_any()
            .downcast_ref::<ListNode>()
            .is_some_and(|list| list.values == self.la.style.values);
        if same_repr {
            self.phase = Phase::Assigned(node);
            return Ok(());
        }
        if node.kind() != Kind::List {
            return self.reject("assign_node", node.kind());
        }
        let la = self.begin_list(node.length()?)?;
        replay_list(&*node, la)
    }

    fn style(&self) -> Box<dyn NodeStyle> {
        Box::new(self.la.style)
    }
}

impl NodeBuilder for ListBuilder {
    fn build(&mut self) -> Result<NodeRef> {
        if matches!(self.phase, Phase::Begun) {
            if let Some(list) = self.la.take_finished() {
                self.phase = Phase::Built;
                return Ok(list);
            }
        }
        self.phase
            .take_built()
            .map_err(|detail| self.la.style.options.misuse("build", detail))
    }

    fn reset(&mut self) {
        self.la.begin(0);
        self.phase = Phase::Fresh;
    }
}
