use fxhash::FxHashSet;
use serde::Serialize;

use crate::problem::node::NodeIdx;

/// A stop and the vehicle (by node index) that visited it or is heading to it.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisitRecord {
    pub node: NodeIdx,
    pub vehicle: NodeIdx,
}

impl VisitRecord {
    pub fn new(node: NodeIdx, vehicle: NodeIdx) -> Self {
        VisitRecord { node, vehicle }
    }
}

impl From<VisitRecord> for [usize; 2] {
    fn from(record: VisitRecord) -> Self {
        [record.node.get(), record.vehicle.get()]
    }
}

/// Work the next solve must not reassign: stops already visited, and the
/// destination each vehicle is driving to right now.
#[derive(Debug, Clone, Default)]
pub struct VisitLedger {
    visited: Vec<VisitRecord>,
    recorded: FxHashSet<VisitRecord>,
    locked: Vec<VisitRecord>,
}

impl VisitLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visits in the order they happened; each pair appears once.
    pub fn visited(&self) -> &[VisitRecord] {
        &self.visited
    }

    /// Destinations locked by the latest tick.
    pub fn locked(&self) -> &[VisitRecord] {
        &self.locked
    }

    /// Returns `false` when the pair was already recorded.
    pub(crate) fn record_visit(&mut self, node: NodeIdx, vehicle: NodeIdx) -> bool {
        let record = VisitRecord::new(node, vehicle);

        if self.recorded.insert(record) {
            self.visited.push(record);
            true
        } else {
            false
        }
    }

    pub(crate) fn replace_locked(&mut self, locked: Vec<VisitRecord>) {
        self.locked = locked;
    }

    pub fn clear(&mut self) {
        self.visited.clear();
        self.recorded.clear();
        self.locked.clear();
    }
}
