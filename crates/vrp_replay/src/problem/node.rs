use serde::Serialize;

use crate::{
    define_index_newtype,
    problem::{location::Location, time_window::TimeWindow},
};

define_index_newtype!(NodeIdx, Node);

pub const DEFAULT_TASK_DURATION: i64 = 50;
pub const DEFAULT_VEHICLE_CAPACITY: i64 = 50;

/// Window of depots and vehicles, wide enough to never constrain a route.
pub const OPEN_TIME_WINDOW: TimeWindow = TimeWindow::new(0, 1_000_000);
pub const DEFAULT_TASK_TIME_WINDOW: TimeWindow = TimeWindow::new(50, 250);
pub const DEFAULT_STOP_TIME_WINDOW: TimeWindow = TimeWindow::new(0, 200);

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Depot,
    Vehicle { capacity: i64 },
    Task { duration: i64 },
    Pickup,
    Delivery,
}

impl NodeKind {
    pub fn vehicle() -> Self {
        NodeKind::Vehicle {
            capacity: DEFAULT_VEHICLE_CAPACITY,
        }
    }

    pub fn task() -> Self {
        NodeKind::Task {
            duration: DEFAULT_TASK_DURATION,
        }
    }

    pub fn is_depot(&self) -> bool {
        matches!(self, NodeKind::Depot)
    }

    pub fn is_vehicle(&self) -> bool {
        matches!(self, NodeKind::Vehicle { .. })
    }

    pub fn is_pickup(&self) -> bool {
        matches!(self, NodeKind::Pickup)
    }

    pub fn is_delivery(&self) -> bool {
        matches!(self, NodeKind::Delivery)
    }

    /// Nodes a vehicle has to visit: tasks, pickups and deliveries.
    pub fn requires_visit(&self) -> bool {
        matches!(
            self,
            NodeKind::Task { .. } | NodeKind::Pickup | NodeKind::Delivery
        )
    }

    /// Depot and vehicle windows are fixed and cannot be edited.
    pub fn has_locked_time_window(&self) -> bool {
        self.is_depot() || self.is_vehicle()
    }

    pub fn default_time_window(&self) -> TimeWindow {
        match self {
            NodeKind::Depot | NodeKind::Vehicle { .. } => OPEN_TIME_WINDOW,
            NodeKind::Task { .. } => DEFAULT_TASK_TIME_WINDOW,
            NodeKind::Pickup | NodeKind::Delivery => DEFAULT_STOP_TIME_WINDOW,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct Node {
    index: NodeIdx,
    location: Location,
    kind: NodeKind,
    time_window: TimeWindow,
    visited: bool,
}

impl Node {
    pub fn new(index: NodeIdx, location: Location, kind: NodeKind) -> Self {
        Node {
            index,
            location,
            kind,
            time_window: kind.default_time_window(),
            visited: false,
        }
    }

    pub fn with_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = time_window;
        self
    }

    pub fn with_visited(mut self, visited: bool) -> Self {
        self.visited = visited;
        self
    }

    pub fn index(&self) -> NodeIdx {
        self.index
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub(crate) fn set_time_window(&mut self, time_window: TimeWindow) {
        self.time_window = time_window;
    }

    /// Only vehicles move, and only while a route is replayed.
    pub(crate) fn move_to(&mut self, location: Location) {
        debug_assert!(self.kind.is_vehicle(), "node {} is not a vehicle", self.index);
        self.location = location;
    }

    /// Returns `true` when the flag flipped from unvisited to visited.
    pub(crate) fn mark_visited(&mut self) -> bool {
        !std::mem::replace(&mut self.visited, true)
    }

    pub(crate) fn clear_visited(&mut self) {
        self.visited = false;
    }
}

/// Load picked up (positive) or dropped off (negative) at `node`.
pub fn demand(node: &Node, default_demand: i64) -> i64 {
    match node.kind() {
        NodeKind::Pickup => default_demand,
        NodeKind::Delivery => -default_demand,
        NodeKind::Depot | NodeKind::Vehicle { .. } | NodeKind::Task { .. } => 0,
    }
}

pub fn service_time(node: &Node, default_service_time: i64) -> i64 {
    match node.kind() {
        NodeKind::Task { duration } => duration,
        NodeKind::Pickup | NodeKind::Delivery => default_service_time,
        NodeKind::Depot | NodeKind::Vehicle { .. } => 0,
    }
}
