use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::problem::{
    location::Location,
    node::{Node, NodeIdx, NodeKind},
    pickup_delivery::PickupDeliveryPair,
    problem_instance::{PlacementError, ProblemInstance},
    time_window::TimeWindow,
};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase", rename = "NodeType")]
pub enum JsonNodeKind {
    Depot,
    Car,
    Task,
    Pickup,
    Delivery,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", rename = "Node")]
pub struct JsonNode {
    pub x: f64,
    pub y: f64,
    pub index: usize,

    #[serde(rename = "type")]
    pub kind: JsonNodeKind,

    pub time_window: [i64; 2],

    #[serde(default)]
    pub visited: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i64>,
}

impl From<&Node> for JsonNode {
    fn from(node: &Node) -> Self {
        let (kind, duration, capacity) = match node.kind() {
            NodeKind::Depot => (JsonNodeKind::Depot, None, None),
            NodeKind::Vehicle { capacity } => (JsonNodeKind::Car, None, Some(capacity)),
            NodeKind::Task { duration } => (JsonNodeKind::Task, Some(duration), None),
            NodeKind::Pickup => (JsonNodeKind::Pickup, None, None),
            NodeKind::Delivery => (JsonNodeKind::Delivery, None, None),
        };

        JsonNode {
            x: node.location().x(),
            y: node.location().y(),
            index: node.index().get(),
            kind,
            time_window: node.time_window().into(),
            visited: node.is_visited(),
            duration,
            capacity,
        }
    }
}

impl From<&JsonNode> for Node {
    fn from(value: &JsonNode) -> Self {
        let kind = match value.kind {
            JsonNodeKind::Depot => NodeKind::Depot,
            JsonNodeKind::Car => value
                .capacity
                .map_or_else(NodeKind::vehicle, |capacity| NodeKind::Vehicle { capacity }),
            JsonNodeKind::Task => value
                .duration
                .map_or_else(NodeKind::task, |duration| NodeKind::Task { duration }),
            JsonNodeKind::Pickup => NodeKind::Pickup,
            JsonNodeKind::Delivery => NodeKind::Delivery,
        };

        Node::new(
            NodeIdx::new(value.index),
            Location::from_cartesian(value.x, value.y),
            kind,
        )
        .with_time_window(TimeWindow::from(value.time_window))
        .with_visited(value.visited)
    }
}

/// Problem file written by `generate problem` and read by the CLI.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", rename = "Problem")]
pub struct JsonProblem {
    pub nodes: Vec<JsonNode>,

    #[serde(default)]
    pub pickup_delivery_pairs: Vec<[usize; 2]>,
}

impl From<&ProblemInstance> for JsonProblem {
    fn from(instance: &ProblemInstance) -> Self {
        JsonProblem {
            nodes: instance.nodes().iter().map(JsonNode::from).collect(),
            pickup_delivery_pairs: instance
                .pairs()
                .iter()
                .map(|pair| [pair.pickup().get(), pair.delivery().get()])
                .collect(),
        }
    }
}

impl JsonProblem {
    pub fn build_problem(&self) -> Result<ProblemInstance, PlacementError> {
        let nodes = self.nodes.iter().map(Node::from).collect();
        let pairs = self
            .pickup_delivery_pairs
            .iter()
            .map(|&[pickup, delivery]| {
                PickupDeliveryPair::new(NodeIdx::new(pickup), NodeIdx::new(delivery))
            })
            .collect();

        ProblemInstance::from_parts(nodes, pairs)
    }
}
