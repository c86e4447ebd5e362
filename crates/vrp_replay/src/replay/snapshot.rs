use fxhash::FxHashMap;

use crate::problem::{
    location::Location,
    node::{Node, NodeIdx},
};

/// Vehicle positions before a replay starts moving them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionSnapshot {
    positions: FxHashMap<NodeIdx, Location>,
}

impl PositionSnapshot {
    pub fn capture(nodes: &[Node]) -> Self {
        PositionSnapshot {
            positions: nodes
                .iter()
                .filter(|node| node.kind().is_vehicle())
                .map(|node| (node.index(), node.location()))
                .collect(),
        }
    }

    pub fn get(&self, vehicle: NodeIdx) -> Option<Location> {
        self.positions.get(&vehicle).copied()
    }

    pub(crate) fn restore(&self, nodes: &mut [Node]) {
        for (&vehicle, &location) in &self.positions {
            if let Some(node) = nodes.get_mut(vehicle.get()) {
                node.move_to(location);
            }
        }
    }
}
