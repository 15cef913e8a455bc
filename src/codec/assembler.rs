//! Point assembly and occurrence counting
//!
//! Points arrive as separate X/Y/Z tokens, possibly interleaved with other
//! fields. Components are buffered per point field until the point is
//! complete, a new point of the same field starts, or the record ends.
//! A single point read twice keeps the latest value of each component.

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::error::Result;
use crate::record::Record;
use crate::schema::{Cardinality, FieldSpec};
use crate::types::Point3;

/// Partially read point
#[derive(Debug, Clone, Copy, Default)]
struct PendingPoint {
    components: [Option<f64>; 3],
}

impl PendingPoint {
    fn is_complete(&self) -> bool {
        self.components.iter().all(Option::is_some)
    }

    fn has(&self, axis: usize) -> bool {
        self.components[axis].is_some()
    }

    /// Missing components become 0
    fn materialize(&self) -> Point3 {
        let [x, y, z] = self.components.map(|c| c.unwrap_or(0.0));
        Point3::new(x, y, z)
    }

    fn stored(point: Point3) -> Self {
        Self {
            components: point.components().map(Some),
        }
    }
}

/// Buffers point components per field, keyed by field index
#[derive(Debug, Default)]
pub struct PointAssembler {
    pending: IndexMap<usize, (&'static str, Cardinality, PendingPoint)>,
    /// Last point stored for each single point field
    stored: AHashMap<usize, Point3>,
}

impl PointAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one component of field `index`.
    ///
    /// In a point list, a component already present in the buffer starts a
    /// new point: the buffered one is stored first. A single point only
    /// overwrites that component, on top of what was already read.
    pub fn feed(
        &mut self,
        index: usize,
        spec: &FieldSpec,
        axis: usize,
        value: f64,
        record: &mut Record,
    ) -> Result<()> {
        let starts_new = spec.cardinality == Cardinality::PointList
            && self
                .pending
                .get(&index)
                .map_or(false, |(_, _, p)| p.has(axis));
        if starts_new {
            self.flush_one(index, record)?;
        }

        let seed = match spec.cardinality {
            Cardinality::Point => self.stored.get(&index).copied().map(PendingPoint::stored),
            _ => None,
        };
        let entry = self
            .pending
            .entry(index)
            .or_insert((spec.name, spec.cardinality, seed.unwrap_or_default()));
        entry.2.components[axis] = Some(value);

        if entry.2.is_complete() {
            self.flush_one(index, record)?;
        }
        Ok(())
    }

    /// Store every buffered point, in the order their first component arrived
    pub fn finish(&mut self, record: &mut Record) -> Result<()> {
        for (_, (name, cardinality, point)) in self.pending.drain(..) {
            store(record, name, cardinality, point.materialize())?;
        }
        Ok(())
    }

    /// Number of points still buffered
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn flush_one(&mut self, index: usize, record: &mut Record) -> Result<()> {
        if let Some((name, cardinality, point)) = self.pending.shift_remove(&index) {
            let point = point.materialize();
            if cardinality == Cardinality::Point {
                self.stored.insert(index, point);
            }
            store(record, name, cardinality, point)?;
        }
        Ok(())
    }
}

fn store(record: &mut Record, name: &'static str, cardinality: Cardinality, point: Point3) -> Result<()> {
    match cardinality {
        Cardinality::PointList => record.push_point(name, point),
        _ => {
            record.set(name, point);
            Ok(())
        }
    }
}

/// Per-code occurrence counts within one record
#[derive(Debug, Default)]
pub struct OccurrenceCounter {
    counts: AHashMap<i32, u32>,
}

impl OccurrenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occurrences of `code` seen so far
    pub fn seen(&self, code: i32) -> u32 {
        self.counts.get(&code).copied().unwrap_or(0)
    }

    /// Record that `code` has now been seen `n` times
    pub fn set(&mut self, code: i32, n: u32) {
        self.counts.insert(code, n);
    }

    /// Raise the count of `code` to at least `n`
    pub fn raise_to(&mut self, code: i32, n: u32) {
        let count = self.counts.entry(code).or_insert(0);
        *count = (*count).max(n);
    }
}
