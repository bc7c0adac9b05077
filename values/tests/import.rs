//! Bulk import through `assign_node`, and copying across representations.

use core::any::Any;
use std::sync::Arc;

use datamodel_core::test_utils::init_test_logging;
use datamodel_core::{
    Error, Kind, KindSet, MapIterator, Node, NodeAssembler, NodeBuilder, NodeRef, NodeStyle,
    Result,
};
use datamodel_values::{
    AnyBuilder, AnyStyle, Int, MapBuilder, MapNode, MapStyle, Str, ValueConstraint, copy_node,
    deep_equal,
};
use pretty_assertions::assert_eq;

/// A map kept as a plain list of pairs, standing in for a representation
/// from another crate.
#[derive(Debug)]
struct PairMap(Vec<(&'static str, NodeRef)>);

impl Node for PairMap {
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn type_name(&self) -> &'static str {
        "test.PairMap"
    }

    fn style(&self) -> Box<dyn NodeStyle> {
        Box::new(AnyStyle::new())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn length(&self) -> Result<usize> {
        Ok(self.0.len())
    }

    fn lookup_string(&self, key: &str) -> Result<NodeRef> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| Error::not_exists(key))
    }

    fn map_iter(&self) -> Result<Box<dyn MapIterator + '_>> {
        Ok(Box::new(PairIter { map: self, next: 0 }))
    }
}

struct PairIter<'a> {
    map: &'a PairMap,
    next: usize,
}

impl MapIterator for PairIter<'_> {
    fn next(&mut self) -> Result<(NodeRef, NodeRef)> {
        let (k, v) = self.map.0.get(self.next).ok_or(Error::IteratorOverread)?;
        self.next += 1;
        let key: NodeRef = Arc::new(Str::new(k));
        Ok((key, v.clone()))
    }

    fn done(&self) -> bool {
        self.next >= self.map.0.len()
    }
}

/// A node that never decided its kind.
#[derive(Debug)]
struct Undecided;

impl Node for Undecided {
    fn kind(&self) -> Kind {
        Kind::Invalid
    }

    fn type_name(&self) -> &'static str {
        "test.Undecided"
    }

    fn style(&self) -> Box<dyn NodeStyle> {
        Box::new(AnyStyle::new())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn int(v: i64) -> NodeRef {
    Arc::new(Int(v))
}

fn sample_map() -> NodeRef {
    let mut b = MapBuilder::new(MapStyle::default());
    let ma = b.begin_map(3).unwrap();
    ma.assemble_entry("k1").unwrap().assign_int(1).unwrap();
    ma.assemble_entry("k2").unwrap().assign_string("two").unwrap();
    let inner = ma.assemble_entry("k3").unwrap().begin_map(1).unwrap();
    inner.assemble_entry("deep").unwrap().assign_bool(true).unwrap();
    inner.finish().unwrap();
    ma.finish().unwrap();
    b.build().unwrap()
}

fn keys(node: &NodeRef) -> Vec<String> {
    let mut it = node.map_iter().unwrap();
    let mut out = Vec::new();
    while !it.done() {
        out.push(it.next().unwrap().0.as_str().unwrap().to_string());
    }
    out
}

// =============================================================================
// assign_node on the map builder
// =============================================================================

#[test]
fn same_representation_is_adopted() {
    init_test_logging();
    let map = sample_map();
    let mut b = MapBuilder::new(MapStyle::default());
    b.assign_node(map.clone()).unwrap();
    let imported = b.build().unwrap();
    assert!(Arc::ptr_eq(&map, &imported));
}

#[test]
fn foreign_map_is_replayed() {
    init_test_logging();
    let foreign: NodeRef = Arc::new(PairMap(vec![("b", int(2)), ("a", int(1))]));
    let mut b = MapBuilder::new(MapStyle::default());
    b.assign_node(foreign.clone()).unwrap();
    let imported = b.build().unwrap();

    assert!(imported.as_any().downcast_ref::<MapNode>().is_some());
    assert_eq!(keys(&imported), ["b", "a"]);
    assert_eq!(imported.lookup_string("a").unwrap().as_int(), Ok(1));
    assert!(deep_equal(&*foreign, &*imported).unwrap());
}

#[test]
fn round_trip_keeps_keys_order_and_values() {
    let original = sample_map();
    let mut b = MapBuilder::new(MapStyle::new(ValueConstraint::ANY.nullable()));
    b.assign_node(original.clone()).unwrap();
    let copy = b.build().unwrap();

    // Different value constraint, so this went through replay.
    assert!(!Arc::ptr_eq(&original, &copy));
    assert_eq!(keys(&copy), keys(&original));
    assert!(deep_equal(&*original, &*copy).unwrap());
    // Replay adopts child nodes.
    assert!(Arc::ptr_eq(
        &original.lookup_string("k3").unwrap(),
        &copy.lookup_string("k3").unwrap()
    ));
}

#[test]
fn duplicate_keys_abort_the_import() {
    let foreign: NodeRef = Arc::new(PairMap(vec![("a", int(1)), ("a", int(2))]));
    let mut b = MapBuilder::new(MapStyle::default());
    let err = b.assign_node(foreign).unwrap_err();
    assert_eq!(err, Error::DuplicateKey { key: "a".into() });

    // Nothing partially built is exposed.
    assert!(b.build().unwrap_err().is_illegal_state());

    b.reset();
    b.assign_node(sample_map()).unwrap();
    assert_eq!(b.build().unwrap().length(), Ok(3));
}

#[test]
fn wrong_value_kind_aborts_the_import() {
    let text: NodeRef = Arc::new(Str::new("x"));
    let foreign: NodeRef = Arc::new(PairMap(vec![("a", int(1)), ("b", text)]));
    let mut b = MapBuilder::new(MapStyle::new(ValueConstraint::of(Kind::Int)));
    let err = b.assign_node(foreign).unwrap_err();
    assert_eq!(
        err,
        Error::WrongKind {
            type_name: "values.Int",
            method: "assign_node",
            appropriate: KindSet::INT,
            actual: Kind::String,
        }
    );
    assert!(b.build().unwrap_err().is_illegal_state());
}

#[test]
fn non_map_is_rejected() {
    let mut b = MapBuilder::new(MapStyle::default());
    assert_eq!(
        b.assign_node(int(1)).unwrap_err(),
        Error::WrongKind {
            type_name: "values.Map",
            method: "assign_node",
            appropriate: KindSet::MAP,
            actual: Kind::Int,
        }
    );
    assert!(b.assign_node(datamodel_values::null()).unwrap_err().is_wrong_kind());
}

#[test]
fn invalid_kind_is_never_adopted() {
    let undecided: NodeRef = Arc::new(Undecided);
    let expected = Error::WrongKind {
        type_name: "values.Any",
        method: "assign_node",
        appropriate: KindSet::all(),
        actual: Kind::Invalid,
    };

    let mut b = AnyBuilder::new();
    assert_eq!(b.assign_node(undecided.clone()).unwrap_err(), expected);
    assert!(b.build().unwrap_err().is_illegal_state());

    let mut b = AnyBuilder::new();
    let ma = b.begin_map(1).unwrap();
    let va = ma.assemble_entry("x").unwrap();
    assert_eq!(va.assign_node(undecided.clone()).unwrap_err(), expected);
    va.assign_int(1).unwrap();
    ma.finish().unwrap();
    let map = b.build().unwrap();
    assert_eq!(map.lookup_string("x").unwrap().kind(), Kind::Int);

    // Agrees with the deep copy path.
    let mut b = AnyBuilder::new();
    assert!(copy_node(&*undecided, &mut b).unwrap_err().is_wrong_kind());
}

// =============================================================================
// copy_node
// =============================================================================

#[test]
fn deep_copy_shares_nothing() {
    let original = sample_map();
    let mut b = AnyBuilder::new();
    copy_node(&*original, &mut b).unwrap();
    let copy = b.build().unwrap();

    assert!(deep_equal(&*original, &*copy).unwrap());
    assert!(!Arc::ptr_eq(
        &original.lookup_string("k3").unwrap(),
        &copy.lookup_string("k3").unwrap()
    ));
}

#[test]
fn copy_into_constrained_style() {
    let foreign = PairMap(vec![("x", int(1)), ("y", int(2))]);
    let mut b = MapBuilder::new(MapStyle::new(ValueConstraint::of(Kind::Int)));
    copy_node(&foreign, &mut b).unwrap();
    let copy = b.build().unwrap();
    assert_eq!(keys(&copy), ["x", "y"]);
}

#[test]
fn deep_equal_is_order_sensitive() {
    let ab: NodeRef = Arc::new(PairMap(vec![("a", int(1)), ("b", int(2))]));
    let ba: NodeRef = Arc::new(PairMap(vec![("b", int(2)), ("a", int(1))]));
    assert!(deep_equal(&*ab, &*ab).unwrap());
    assert!(!deep_equal(&*ab, &*ba).unwrap());
    assert!(!deep_equal(&*ab, &*int(1)).unwrap());
}
