//! Record containers
//!
//! A [`Chain`] owns the records of one type in stream order. Dropping or
//! destroying the chain releases every record exactly once; nothing else
//! holds a record. A [`ChainSet`] keeps one chain per type, in the order the
//! types were first seen.

use indexmap::IndexMap;

use crate::error::{DxfError, Result};
use crate::record::Record;
use crate::schema::EntitySchema;
use crate::types::Handle;

/// Ordered records of a single type
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    entity_type: &'static str,
    records: Vec<Record>,
}

impl Chain {
    /// Create an empty chain for records tagged `entity_type`
    pub fn new(entity_type: &'static str) -> Self {
        Self {
            entity_type,
            records: Vec::new(),
        }
    }

    /// Create an empty chain for `schema`'s records
    pub fn for_schema(schema: &EntitySchema) -> Self {
        Self::new(schema.name())
    }

    /// Type of the records held
    pub fn entity_type(&self) -> &'static str {
        self.entity_type
    }

    /// Append a record at the end.
    ///
    /// Fails with [`DxfError::ChainTypeMismatch`] for a record of another
    /// type and with [`DxfError::ResourceExhausted`] when the chain cannot
    /// grow; the chain is unchanged in both cases.
    pub fn append(&mut self, record: Record) -> Result<()> {
        self.check_type(record.entity_type())?;
        self.records.try_reserve(1)?;
        self.records.push(record);
        Ok(())
    }

    /// Move every record of `other` to the end of this chain
    pub fn merge(&mut self, mut other: Chain) -> Result<()> {
        self.check_type(other.entity_type)?;
        self.records.try_reserve(other.records.len())?;
        self.records.append(&mut other.records);
        Ok(())
    }

    fn check_type(&self, found: &str) -> Result<()> {
        if found != self.entity_type {
            return Err(DxfError::ChainTypeMismatch {
                expected: self.entity_type.to_string(),
                found: found.to_string(),
            });
        }
        Ok(())
    }

    /// Records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Record> {
        self.records.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record carrying `handle`.
    ///
    /// Handles are not checked for uniqueness on append.
    pub fn find_by_handle(&self, handle: Handle) -> Option<&Record> {
        self.records.iter().find(|r| r.handle() == Some(handle))
    }

    /// Release every record and return how many were released
    pub fn destroy(self) -> usize {
        let count = self.records.len();
        drop(self.records);
        count
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for Chain {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// One chain per record type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainSet {
    chains: IndexMap<&'static str, Chain>,
}

impl ChainSet {
    pub fn new() -> Self {
        Self {
            chains: IndexMap::new(),
        }
    }

    /// Append a record to the chain of its type, creating the chain on
    /// first use
    pub fn append(&mut self, record: Record) -> Result<()> {
        let entity_type = record.entity_type();
        self.chains
            .entry(entity_type)
            .or_insert_with(|| Chain::new(entity_type))
            .append(record)
    }

    /// Add a whole chain, merging it into an existing chain of its type
    pub fn insert_chain(&mut self, chain: Chain) -> Result<()> {
        match self.chains.get_mut(chain.entity_type()) {
            Some(existing) => existing.merge(chain),
            None => {
                self.chains.insert(chain.entity_type(), chain);
                Ok(())
            }
        }
    }

    /// Merge every chain of `other` into this set
    pub fn merge(&mut self, other: ChainSet) -> Result<()> {
        for chain in other.chains.into_values() {
            self.insert_chain(chain)?;
        }
        Ok(())
    }

    /// Chain of one type
    pub fn get(&self, entity_type: &str) -> Option<&Chain> {
        self.chains.get(entity_type)
    }

    pub fn get_mut(&mut self, entity_type: &str) -> Option<&mut Chain> {
        self.chains.get_mut(entity_type)
    }

    /// Chains in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &Chain> {
        self.chains.values()
    }

    /// Record types present, in first-seen order
    pub fn types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.chains.keys().copied()
    }

    /// Number of chains
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Total number of records across every chain
    pub fn record_count(&self) -> usize {
        self.chains.values().map(Chain::len).sum()
    }

    /// First record of any type carrying `handle`
    pub fn find_by_handle(&self, handle: Handle) -> Option<&Record> {
        self.chains.values().find_map(|c| c.find_by_handle(handle))
    }

    /// Release every chain and return how many records were released
    pub fn destroy(self) -> usize {
        self.chains.into_values().map(Chain::destroy).sum()
    }
}
