//! The default map representation.
//!
//! # Layout
//!
//! Entries live in a `Vec` in insertion order. A [`HashTable`] of entry
//! positions gives O(1) lookup without storing keys twice; positions stay
//! valid as the vector grows, so a map can take more entries than its size
//! hint.

use core::any::Any;
use core::fmt;
use core::hash::BuildHasher;
use std::sync::Arc;

use datamodel_core::{
    BuildOptions, Error, Kind, MapIterator, MaybeNode, Node, NodeBuilder, NodeRef, NodeStyle,
    Result,
};
use hashbrown::DefaultHashBuilder;
use hashbrown::HashTable;

use crate::scalar::{Str, null};
use crate::value::ValueConstraint;

mod assembler;

pub use assembler::MapBuilder;
pub(crate) use assembler::MapNodeAssembler;

/// Style of [`MapNode`]s whose values satisfy one [`ValueConstraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapStyle {
    values: ValueConstraint,
    options: BuildOptions,
}

impl MapStyle {
    pub fn new(values: ValueConstraint) -> Self {
        Self {
            values,
            options: Default::default(),
        }
    }

    pub fn with_options(self, options: BuildOptions) -> Self {
        Self { options, ..self }
    }

    pub fn values(&self) -> ValueConstraint {
        self.values
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }
}

impl NodeStyle for MapStyle {
    fn new_builder(&self) -> Box<dyn NodeBuilder> {
        Box::new(MapBuilder::new(*self))
    }
}

#[derive(Debug, Clone)]
struct Entry {
    key: Arc<Str>,
    /// `Absent` only while the value is being assembled.
    value: MaybeNode,
}

impl Entry {
    fn node(&self) -> Result<NodeRef> {
        match &self.value {
            MaybeNode::Value(node) => Ok(node.clone()),
            MaybeNode::Null => Ok(null()),
            MaybeNode::Absent => Err(Error::not_exists(self.key.as_str())),
        }
    }
}

/// Ordered map from string keys to child values.
#[derive(Clone, Default)]
pub struct MapNode {
    values: ValueConstraint,
    index: HashTable<usize>,
    entries: Vec<Entry>,
    hasher: DefaultHashBuilder,
}

impl MapNode {
    pub(crate) fn with_capacity(values: ValueConstraint, capacity: usize) -> Self {
        Self {
            values,
            index: HashTable::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
            hasher: DefaultHashBuilder::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn value_constraint(&self) -> ValueConstraint {
        self.values
    }

    fn find(&self, key: &str) -> Option<&Entry> {
        let hash = self.hasher.hash_one(key);
        self.index
            .find(hash, |&i| self.entries[i].key.as_str() == key)
            .map(|&i| &self.entries[i])
    }

    /// Look up a key, telling a nullable map's null apart from a missing key.
    pub fn lookup_maybe(&self, key: &str) -> MaybeNode {
        self.find(key)
            .map(|entry| entry.value.clone())
            .unwrap_or_default()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MaybeNode)> {
        self.entries.iter().map(|e| (e.key.as_str(), &e.value))
    }

    /// Append a key with a pending value. Returns false, leaving the map
    /// unchanged, if the key is already present.
    pub(crate) fn insert_key(&mut self, key: &str) -> bool {
        let hash = self.hasher.hash_one(key);
        let entries = &self.entries;
        let hasher = &self.hasher;
        match self.index.entry(
            hash,
            |&i| entries[i].key.as_str() == key,
            |&i| hasher.hash_one(entries[i].key.as_str()),
        ) {
            hashbrown::hash_table::Entry::Occupied(_) => false,
            hashbrown::hash_table::Entry::Vacant(slot) => {
                slot.insert(entries.len());
                self.entries.push(Entry {
                    key: Arc::new(Str::new(key)),
                    value: MaybeNode::Absent,
                });
                true
            }
        }
    }

    /// Fill in the pending value of the most recent entry.
    pub(crate) fn settle_last(&mut self, value: MaybeNode) -> bool {
        match self.entries.last_mut() {
            Some(entry) if entry.value.is_absent() => {
                entry.value = value;
                true
            }
            _ => false,
        }
    }
}

impl fmt::Debug for MapNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (e.key.as_str(), &e.value)))
            .finish()
    }
}

impl Node for MapNode {
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn type_name(&self) -> &'static str {
        "values.Map"
    }

    fn style(&self) -> Box<dyn NodeStyle> {
        Box::new(MapStyle::new(self.values))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn length(&self) -> Result<usize> {
        Ok(self.entries.len())
    }

    fn lookup_string(&self, key: &str) -> Result<NodeRef> {
        self.find(key)
            .ok_or_else(|| Error::not_exists(key))?
            .node()
    }

    fn lookup(&self, key: &dyn Node) -> Result<NodeRef> {
        let Some(key) = key.as_any().downcast_ref::<Str>() else {
            return Err(Error::InvalidKeyType {
                type_name: self.type_name(),
                actual: key.kind(),
            });
        };
        self.lookup_string(key.as_str())
    }

    fn map_iter(&self) -> Result<Box<dyn MapIterator + '_>> {
        Ok(Box::new(MapEntries {
            entries: &self.entries,
            next: 0,
        }))
    }
}

struct MapEntries<'a> {
    entries: &'a [Entry],
    next: usize,
}

impl MapIterator for MapEntries<'_> {
    fn next(&mut self) -> Result<(NodeRef, NodeRef)> {
        let entry = self.entries.get(self.next).ok_or(Error::IteratorOverread)?;
        self.next += 1;
        let key: NodeRef = entry.key.clone();
        Ok((key, entry.node()?))
    }

    fn done(&self) -> bool {
        self.next >= self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::scalar::Int;

    fn sample() -> MapNode {
        let mut map = MapNode::with_capacity(ValueConstraint::ANY, 0);
        for (i, key) in ["b", "a", "c"].into_iter().enumerate() {
            assert!(map.insert_key(key));
            assert!(map.settle_last(MaybeNode::Value(Arc::new(Int(i as i64)))));
        }
        map
    }

    #[test]
    fn test_grows_past_capacity() {
        let map = sample();
        assert_eq!(map.len(), 3);
        assert_eq!(map.lookup_string("c").unwrap().as_int(), Ok(2));
        assert_eq!(map.lookup_string("b").unwrap().as_int(), Ok(0));
    }

    #[test]
    fn test_insert_existing_key_leaves_map_unchanged() {
        let mut map = sample();
        assert!(!map.insert_key("a"));
        assert_eq!(map.len(), 3);
        assert_eq!(map.lookup_string("a").unwrap().as_int(), Ok(1));
    }

    #[test]
    fn test_iteration_order_and_overread() {
        let map = sample();
        let mut it = map.map_iter().unwrap();
        let mut keys = Vec::new();
        while !it.done() {
            let (k, _) = it.next().unwrap();
            keys.push(k.as_str().unwrap().to_string());
        }
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(it.next().unwrap_err(), Error::IteratorOverread);
    }

    #[test]
    fn test_lookup_rejects_foreign_keys() {
        let map = sample();
        let err = map.lookup(&Int(1)).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidKeyType {
                type_name: "values.Map",
                actual: Kind::Int
            }
        );
        assert_eq!(map.lookup(&Str::new("a")).unwrap().as_int(), Ok(1));
    }

    #[test]
    fn test_missing_key() {
        let map = sample();
        assert!(map.lookup_string("zzz").unwrap_err().is_not_found());
        assert!(map.lookup_maybe("zzz").is_absent());
    }

    #[test]
    fn test_debug_lists_entries_in_order() {
        let map = sample();
        assert_eq!(
            format!("{map:?}"),
            r#"{"b": Value(Int(0)), "a": Value(Int(1)), "c": Value(Int(2))}"#
        );
    }
}
