//! Incremental map assembly.
//!
//! # State machine
//!
//! ```text
//!            assemble_key            key assigned
//! Initial ─────────────────► MidKey ─────────────► ExpectValue
//!   ▲  │                                               │
//!   │  │ assemble_entry(k)            assemble_value   │
//!   │  └──────────────────► MidValue ◄─────────────────┘
//!   │        tidy              │
//!   └──────────────────────────┘
//! Initial ──finish──► Finished
//! ```
//!
//! Every transition goes through [`MapState::next`]. A value handed out in
//! `MidValue` reports its own completion; the next call on the map tidies
//! it into the pending entry before consulting the table.

use core::mem;
use std::sync::Arc;

use datamodel_core::{
    BuildOptions, Error, Kind, KindSet, Link, ListAssembler, MapAssembler, Node, NodeAssembler,
    NodeBuilder, NodeRef, NodeStyle, Result,
};
use tracing::{debug, trace};

use super::{MapNode, MapStyle};
use crate::copy::replay_map;
use crate::phase::Phase;
use crate::scalar::ScalarStyle;
use crate::value::ValueAssembler;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum MapState {
    Initial,
    MidKey,
    ExpectValue,
    MidValue,
    Finished,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum MapOp {
    AssembleKey,
    AssignKey,
    AssembleValue,
    AssembleEntry,
    Finish,
}

impl MapOp {
    fn name(self) -> &'static str {
        match self {
            MapOp::AssembleKey => "assemble_key",
            MapOp::AssignKey => "KeyAssembler.assign_string",
            MapOp::AssembleValue => "assemble_value",
            MapOp::AssembleEntry => "assemble_entry",
            MapOp::Finish => "finish",
        }
    }

    /// Operations that first absorb a value completed in `MidValue`.
    fn tidies(self) -> bool {
        matches!(
            self,
            MapOp::AssembleKey | MapOp::AssembleEntry | MapOp::Finish
        )
    }
}

impl MapState {
    /// The transition table. Errors carry the detail for `IllegalState`.
    fn next(self, op: MapOp) -> Result<MapState, &'static str> {
        use MapOp::*;
        use MapState::*;

        match (self, op) {
            (Initial, AssembleKey) => Ok(MidKey),
            (Initial, AssembleEntry) => Ok(MidValue),
            (Initial, Finish) => Ok(Finished),
            (MidKey, AssignKey) => Ok(ExpectValue),
            (ExpectValue, AssembleValue) => Ok(MidValue),

            (_, AssignKey) => Err("after the key assembler's valid lifetime"),
            (Initial, AssembleValue) => Err("when no key is primed"),
            (MidKey, _) => Err("when in the middle of assembling a key"),
            (ExpectValue, _) => Err("when expecting start of value assembly"),
            (MidValue, AssembleValue) => Err("when in the middle of assembling another value"),
            (MidValue, _) => Err("when in the middle of assembling a value"),
            (Finished, _) => Err("on an assembler that's already finished"),
        }
    }
}

/// The map under construction and its state.
///
/// Also serves as the key assembler: while in `MidKey` it accepts exactly
/// one string, which becomes the key of a new pending entry.
#[derive(Debug)]
struct MapCore {
    style: MapStyle,
    w: MapNode,
    state: MapState,
}

impl MapCore {
    fn transition(&self, op: MapOp) -> Result<MapState> {
        self.state
            .next(op)
            .map_err(|detail| self.style.options.misuse(op.name(), detail))
    }

    fn insert_key(&mut self, key: &str) -> Result<()> {
        if self.w.insert_key(key) {
            trace!(key, "map key assigned");
            Ok(())
        } else {
            debug!(key, "repeated map key");
            Err(Error::DuplicateKey { key: key.into() })
        }
    }

    /// Window check, then reject: keys are strings only.
    fn reject<T>(&self, method: &'static str, actual: Kind) -> Result<T> {
        if let Err(detail) = self.state.next(MapOp::AssignKey) {
            return Err(self.style.options.misuse(method, detail));
        }
        Err(Error::WrongKind {
            type_name: "values.Map.Key",
            method,
            appropriate: KindSet::STRING,
            actual,
        })
    }
}

impl NodeAssembler for MapCore {
    fn begin_map(&mut self, _size_hint: usize) -> Result<&mut dyn MapAssembler> {
        self.reject("begin_map", Kind::Map)
    }

    fn begin_list(&mut self, _size_hint: usize) -> Result<&mut dyn ListAssembler> {
        self.reject("begin_list", Kind::List)
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

    fn assign_string(&mut self, value: &str) -> Result<()> {
        let next = self.transition(MapOp::AssignKey)?;
        self.insert_key(value)?;
        self.state = next;
        Ok(())
    }

    fn assign_bytes(&mut self, _value: &[u8]) -> Result<()> {
        self.reject("assign_bytes", Kind::Bytes)
    }

    fn assign_link(&mut self, _value: Link) -> Result<()> {
        self.reject("assign_link", Kind::Link)
    }

    fn assign_node(&mut self, node: NodeRef) -> Result<()> {
        match node.kind() {
            Kind::String => self.assign_string(node.as_str()?),
            kind => self.reject("assign_node", kind),
        }
    }

    fn style(&self) -> Box<dyn NodeStyle> {
        Box::new(ScalarStyle::known(Kind::String).with_options(self.style.options))
    }
}

/// Assembler for a [`MapNode`], reusable through [`begin`](Self::begin).
#[derive(Debug)]
pub(crate) struct MapNodeAssembler {
    core: MapCore,
    va: ValueAssembler,
}

impl MapNodeAssembler {
    pub(crate) fn new(style: MapStyle) -> Self {
        Self {
            core: MapCore {
                style,
                w: MapNode::with_capacity(style.values, 0),
                state: MapState::Initial,
            },
            va: ValueAssembler::new(style.values, style.options),
        }
    }

    /// Start a fresh map, discarding anything in progress.
    pub(crate) fn begin(&mut self, size_hint: usize) {
        let capacity = self.core.style.options.clamp_size_hint(size_hint);
        self.core.w = MapNode::with_capacity(self.core.style.values, capacity);
        self.core.state = MapState::Initial;
        self.va.reset();
    }

    /// The finished map, once `finish` has succeeded.
    pub(crate) fn take_finished(&mut self) -> Option<NodeRef> {
        if self.core.state != MapState::Finished {
            return None;
        }
        let map = mem::take(&mut self.core.w);
        Some(Arc::new(map))
    }

    /// Move a completed child value into the pending entry.
    ///
    /// Leaves the state in `MidValue` when the value is not yet complete.
    fn value_finish_tidy(&mut self) {
        let Some(value) = self.va.take_finished() else {
            return;
        };
        if self.core.w.settle_last(value) {
            self.core.state = MapState::Initial;
        }
    }

    fn transition(&mut self, op: MapOp) -> Result<MapState> {
        if self.core.state == MapState::MidValue && op.tidies() {
            self.value_finish_tidy();
        }
        self.core.transition(op)
    }
}

impl MapAssembler for MapNodeAssembler {
    fn assemble_key(&mut self) -> Result<&mut dyn NodeAssembler> {
        self.core.state = self.transition(MapOp::AssembleKey)?;
        Ok(&mut self.core)
    }

    fn assemble_value(&mut self) -> Result<&mut dyn NodeAssembler> {
        self.core.state = self.transition(MapOp::AssembleValue)?;
        Ok(&mut self.va)
    }

    fn assemble_entry(&mut self, key: &str) -> Result<&mut dyn NodeAssembler> {
        let next = self.transition(MapOp::AssembleEntry)?;
        self.core.insert_key(key)?;
        self.core.state = next;
        Ok(&mut self.va)
    }

    fn finish(&mut self) -> Result<()> {
        self.core.state = self.transition(MapOp::Finish)?;
        trace!(len = self.core.w.len(), "map finished");
        Ok(())
    }

    fn key_style(&self) -> Box<dyn NodeStyle> {
        self.core.style()
    }

    fn value_style(&self, _key: &str) -> Box<dyn NodeStyle> {
        self.va.style()
    }
}

/// Builder for [`MapNode`]s of one [`MapStyle`].
///
/// `assign_node` adopts a `MapNode` with the same value constraint as is;
/// any other map is replayed entry by entry.
#[derive(Debug)]
pub struct MapBuilder {
    ma: MapNodeAssembler,
    phase: Phase,
}

impl MapBuilder {
    pub fn new(style: MapStyle) -> Self {
        Self {
            ma: MapNodeAssembler::new(style),
            phase: Phase::Fresh,
        }
    }

    fn options(&self) -> BuildOptions {
        self.ma.core.style.options
    }

    fn admit(&self, method: &'static str) -> Result<()> {
        match self.phase.shaping_misuse() {
            Some(detail) => Err(self.options().misuse(method, detail)),
            None => Ok(()),
        }
    }

    fn reject<T>(&self, method: &'static str, actual: Kind) -> Result<T> {
        self.admit(method)?;
        Err(Error::WrongKind {
            type_name: "values.Map",
            method,
            appropriate: KindSet::MAP,
            actual,
        })
    }
}

impl NodeAssembler for MapBuilder {
    fn begin_map(&mut self, size_hint: usize) -> Result<&mut dyn MapAssembler> {
        self.admit("begin_map")?;
        self.ma.begin(size_hint);
        self.phase = Phase::Begun;
        Ok(&mut self.ma)
    }

    fn begin_list(&mut self, _size_hint: usize) -> Result<&mut dyn ListAssembler> {
        self.reject("begin_list", Kind::List)
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
            .downcast_ref::<MapNode>()
            .is_some_and(|map| map.values == self.ma.core.style.values);
        if same_repr {
            trace!("adopting map node");
            self.phase = Phase::Assigned(node);
            return Ok(());
        }

        if node.kind() != Kind::Map {
            return self.reject("assign_node", node.kind());
        }
        // On failure the map stays unfinished, so `build` refuses it.
        let ma = self.begin_map(node.length()?)?;
        replay_map(&*node, ma)
    }

    fn style(&self) -> Box<dyn NodeStyle> {
        Box::new(self.ma.core.style)
    }
}

impl NodeBuilder for MapBuilder {
    fn build(&mut self) -> Result<NodeRef> {
        if matches!(self.phase, Phase::Begun) {
            if let Some(map) = self.ma.take_finished() {
                self.phase = Phase::Built;
                return Ok(map);
            }
        }
        self.phase
            .take_built()
            .map_err(|detail| self.options().misuse("build", detail))
    }

    fn reset(&mut self) {
        self.ma.begin(0);
        self.phase = Phase::Fresh;
    }
}
