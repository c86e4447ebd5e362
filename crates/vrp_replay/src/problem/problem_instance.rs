use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::problem::{
    location::Location,
    node::{Node, NodeIdx, NodeKind},
    pickup_delivery::PickupDeliveryPair,
    time_window::{TimeWindow, TimeWindowError},
};

/// Radius around a click within which the editor picks a node to edit.
pub const NODE_SELECTION_RADIUS: f64 = 20.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("add the delivery node of the last pickup first")]
    DeliveryRequired,

    #[error("only one depot is allowed")]
    DepotAlreadyExists,

    #[error("cannot edit the time window of car or depot node {0}")]
    WindowLocked(NodeIdx),

    #[error("node {0} does not exist")]
    UnknownNode(usize),

    #[error("node at position {position} has index {index}")]
    IndexMismatch { position: usize, index: usize },

    #[error("nodes {pickup} and {delivery} do not form a pickup/delivery pair")]
    InvalidPair { pickup: usize, delivery: usize },

    #[error(transparent)]
    InvalidTimeWindow(#[from] TimeWindowError),
}

/// What a click on the canvas adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMode {
    Depot,
    Car,
    Task,
    PickupDelivery,
}

impl FromStr for PlacementMode {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "depot" => Ok(PlacementMode::Depot),
            "car" => Ok(PlacementMode::Car),
            "task" => Ok(PlacementMode::Task),
            "pickup-delivery" => Ok(PlacementMode::PickupDelivery),
            other => Err(format!("unknown placement mode {other:?}")),
        }
    }
}

/// Arena owning every node of the edited instance. Everything else refers to
/// nodes by [`NodeIdx`]; indices are handed out in placement order and never
/// reused until the instance is cleared.
#[derive(Debug, Clone, Default)]
pub struct ProblemInstance {
    nodes: Vec<Node>,
    pairs: Vec<PickupDeliveryPair>,
}

impl ProblemInstance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        nodes: Vec<Node>,
        pairs: Vec<PickupDeliveryPair>,
    ) -> Result<Self, PlacementError> {
        for (position, node) in nodes.iter().enumerate() {
            if node.index().get() != position {
                return Err(PlacementError::IndexMismatch {
                    position,
                    index: node.index().get(),
                });
            }
        }

        for pair in &pairs {
            let pickup = pair.pickup().lookup(&nodes).map(Node::kind);
            let delivery = pair.delivery().lookup(&nodes).map(Node::kind);

            if !matches!(
                (pickup, delivery),
                (Some(NodeKind::Pickup), Some(NodeKind::Delivery))
            ) {
                return Err(PlacementError::InvalidPair {
                    pickup: pair.pickup().get(),
                    delivery: pair.delivery().get(),
                });
            }
        }

        Ok(ProblemInstance { nodes, pairs })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn pairs(&self) -> &[PickupDeliveryPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn depot(&self) -> Option<&Node> {
        self.nodes.iter().find(|node| node.kind().is_depot())
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.kind().is_vehicle())
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.pairs.clear();
    }

    /// Appends a node of `kind` without applying the editor rules.
    pub(crate) fn push_node(&mut self, location: Location, kind: NodeKind) -> NodeIdx {
        let index = NodeIdx::next_in(&self.nodes);
        self.nodes.push(Node::new(index, location, kind));
        index
    }

    pub(crate) fn push_pair(&mut self, pickup: NodeIdx, delivery: NodeIdx) {
        self.pairs.push(PickupDeliveryPair::new(pickup, delivery));
    }

    /// Adds the node a click at `(x, y)` produces in `mode`.
    ///
    /// In pickup-delivery mode clicks alternate: the first creates a pickup,
    /// the next its delivery. No other kind may be placed while a pickup is
    /// waiting for its delivery.
    pub fn place_node(
        &mut self,
        x: f64,
        y: f64,
        mode: PlacementMode,
    ) -> Result<NodeIdx, PlacementError> {
        let location = Location::from_cartesian(x, y);
        let pending_pickup = self
            .nodes
            .last()
            .filter(|node| node.kind().is_pickup())
            .map(Node::index);

        let index = match (mode, pending_pickup) {
            (PlacementMode::PickupDelivery, Some(pickup)) => {
                let delivery = self.push_node(location, NodeKind::Delivery);
                self.push_pair(pickup, delivery);
                delivery
            }
            (PlacementMode::PickupDelivery, None) => self.push_node(location, NodeKind::Pickup),
            (_, Some(_)) => return Err(PlacementError::DeliveryRequired),
            (PlacementMode::Car, None) => self.push_node(location, NodeKind::vehicle()),
            (PlacementMode::Depot, None) => {
                if self.depot().is_some() {
                    return Err(PlacementError::DepotAlreadyExists);
                }
                self.push_node(location, NodeKind::Depot)
            }
            (PlacementMode::Task, None) => self.push_node(location, NodeKind::task()),
        };

        debug!(node = %index, ?mode, x, y, "placed node");
        Ok(index)
    }

    pub fn edit_time_window(
        &mut self,
        index: NodeIdx,
        time_window: TimeWindow,
    ) -> Result<(), PlacementError> {
        let node = self
            .nodes
            .get_mut(index.get())
            .ok_or(PlacementError::UnknownNode(index.get()))?;

        if node.kind().has_locked_time_window() {
            return Err(PlacementError::WindowLocked(index));
        }

        time_window.validate()?;
        node.set_time_window(time_window);

        Ok(())
    }

    /// Node closest to `(x, y)`, if one lies within `max_distance`.
    pub fn closest_node(&self, x: f64, y: f64, max_distance: f64) -> Option<NodeIdx> {
        let click = Location::from_cartesian(x, y);

        self.nodes
            .iter()
            .map(|node| (node.index(), node.location().euclidean_distance(&click)))
            .filter(|&(_, distance)| distance <= max_distance)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| index)
    }
}
