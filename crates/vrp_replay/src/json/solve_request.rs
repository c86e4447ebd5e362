use std::{fmt, str::FromStr};

use fxhash::FxHashSet;
use schemars::JsonSchema;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::{
    json::{solver_response::SolverResponse, types::JsonNode},
    problem::{
        node::{self, NodeIdx, NodeKind},
        problem_instance::ProblemInstance,
    },
    replay::ledger::VisitLedger,
};

pub const DEFAULT_DEMAND: i64 = 5;
pub const DEFAULT_CAPACITY: i64 = 50;
pub const DEFAULT_SERVICE_TIME: i64 = 5;

#[derive(Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Objective {
    /// Minimize the sum of all route costs.
    MinSum,
    /// Minimize the longest route.
    MinLongest,
}

impl FromStr for Objective {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "minSum" => Ok(Objective::MinSum),
            "minLongest" => Ok(Objective::MinLongest),
            other => Err(ValidationError::InvalidObjective(other.to_owned())),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Objective::MinSum => write!(f, "minSum"),
            Objective::MinLongest => write!(f, "minLongest"),
        }
    }
}

/// Solver settings chosen by the user. The objective stays a raw string until
/// the request is validated.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveParameters {
    pub scaling_factor: f64,
    /// Seconds the solver may search.
    pub time_limit: i64,
    pub objective: String,
    pub use_times: bool,
    pub return_to_depot: bool,
    pub max_route_length: i64,
    pub default_demand: i64,
    pub default_capacity: i64,
    pub default_service_time: i64,
}

impl Default for SolveParameters {
    fn default() -> Self {
        Self {
            scaling_factor: 1.0,
            time_limit: 10,
            objective: Objective::MinSum.to_string(),
            use_times: true,
            return_to_depot: false,
            max_route_length: 1_000_000,
            default_demand: DEFAULT_DEMAND,
            default_capacity: DEFAULT_CAPACITY,
            default_service_time: DEFAULT_SERVICE_TIME,
        }
    }
}

/// Reasons a request is not sent. Checks run in declaration order and the
/// first failing one is reported.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("time window [{start}, {end}] of node {node} is not valid")]
    InvalidTimeWindow { node: NodeIdx, start: i64, end: i64 },

    #[error("delivery {delivery} closes before its pickup {pickup} opens")]
    InvalidPairWindow { pickup: NodeIdx, delivery: NodeIdx },

    #[error("problem does not contain cars")]
    NoVehicles,

    #[error("problem does not contain a depot")]
    MissingDepot,

    #[error("problem does not contain any tasks, pickups or deliveries")]
    NoVisitNodes,

    #[error("node {0} is missing its corresponding pickup or delivery")]
    UnpairedPickupDelivery(NodeIdx),

    #[error("scaling factor must be positive, got {0}")]
    InvalidScalingFactor(f64),

    #[error("time limit must be positive, got {0}")]
    InvalidTimeLimit(i64),

    #[error("objective {0:?} is invalid, expected minSum or minLongest")]
    InvalidObjective(String),

    #[error("current time {0} is not valid")]
    InvalidClock(f64),
}

/// The last response, when it solved the instance. Anything else goes out as
/// an empty object.
#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PreviousSolution {
    Solved(SolverResponse),
    Empty {},
}

impl PreviousSolution {
    pub fn from_response(response: Option<&SolverResponse>) -> Self {
        match response {
            Some(response) if response.is_success() => PreviousSolution::Solved(response.clone()),
            _ => PreviousSolution::Empty {},
        }
    }
}

/// Everything the solver service needs to (re-)solve the instance: the nodes,
/// index groups derived from them, the solver settings, and the replay state
/// that pins work already done.
#[derive(Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", rename = "SolveRequest")]
pub struct SolveRequest {
    pub nodes: Vec<JsonNode>,
    pub visit_node_indices: Vec<usize>,
    pub car_indices: Vec<usize>,
    pub task_indices: Vec<usize>,
    pub depot_index: usize,
    pub pickup_delivery_pair_indices: Vec<[usize; 2]>,
    pub pickup_delivery_indices_flat: Vec<usize>,
    pub time_windows: Vec<[i64; 2]>,
    pub demands: Vec<i64>,
    /// `[node, service time]` for every node.
    pub service_times: Vec<[i64; 2]>,

    pub scaling_factor: f64,
    pub time_limit: i64,
    pub objective: Objective,
    pub use_times: bool,
    pub return_to_depot: bool,
    pub max_route_length: i64,

    pub previous_solution: PreviousSolution,
    pub current_time: i64,
    pub visited_nodes_cars: Vec<[usize; 2]>,
    pub locked_nodes_cars: Vec<[usize; 2]>,

    pub default_demand: i64,
    pub default_capacity: i64,
    pub default_service_time: i64,
}

impl SolveRequest {
    /// Validates the instance and parameters, then packs them with the replay
    /// state at `clock`.
    #[instrument(skip_all, level = "debug", fields(nodes = instance.len(), clock = clock))]
    pub fn assemble(
        instance: &ProblemInstance,
        params: &SolveParameters,
        previous: Option<&SolverResponse>,
        clock: f64,
        ledger: &VisitLedger,
    ) -> Result<SolveRequest, ValidationError> {
        let (depot_index, objective) = validate(instance, params, clock)?;

        let mut visit_node_indices = Vec::new();
        let mut car_indices = Vec::new();
        let mut task_indices = Vec::new();
        let mut pickup_delivery_indices_flat = Vec::new();

        for node in instance.nodes() {
            let index = node.index().get();
            match node.kind() {
                NodeKind::Depot => {}
                NodeKind::Vehicle { .. } => car_indices.push(index),
                NodeKind::Task { .. } => {
                    task_indices.push(index);
                    visit_node_indices.push(index);
                }
                NodeKind::Pickup | NodeKind::Delivery => {
                    pickup_delivery_indices_flat.push(index);
                    visit_node_indices.push(index);
                }
            }
        }

        Ok(SolveRequest {
            nodes: instance.nodes().iter().map(JsonNode::from).collect(),
            visit_node_indices,
            car_indices,
            task_indices,
            depot_index: depot_index.get(),
            pickup_delivery_pair_indices: instance
                .pairs()
                .iter()
                .map(|pair| [pair.pickup().get(), pair.delivery().get()])
                .collect(),
            pickup_delivery_indices_flat,
            time_windows: instance
                .nodes()
                .iter()
                .map(|node| node.time_window().into())
                .collect(),
            demands: instance
                .nodes()
                .iter()
                .map(|node| node::demand(node, params.default_demand))
                .collect(),
            service_times: instance
                .nodes()
                .iter()
                .map(|node| {
                    [
                        node.index().get() as i64,
                        node::service_time(node, params.default_service_time),
                    ]
                })
                .collect(),
            scaling_factor: params.scaling_factor,
            time_limit: params.time_limit,
            objective,
            use_times: params.use_times,
            return_to_depot: params.return_to_depot,
            max_route_length: params.max_route_length,
            previous_solution: PreviousSolution::from_response(previous),
            current_time: clock.floor() as i64,
            visited_nodes_cars: ledger.visited().iter().copied().map(Into::into).collect(),
            locked_nodes_cars: ledger.locked().iter().copied().map(Into::into).collect(),
            default_demand: params.default_demand,
            default_capacity: params.default_capacity,
            default_service_time: params.default_service_time,
        })
    }
}

fn validate(
    instance: &ProblemInstance,
    params: &SolveParameters,
    clock: f64,
) -> Result<(NodeIdx, Objective), ValidationError> {
    let nodes = instance.nodes();

    if let Some(node) = nodes.iter().find(|node| !node.time_window().is_valid()) {
        return Err(ValidationError::InvalidTimeWindow {
            node: node.index(),
            start: node.time_window().start(),
            end: node.time_window().end(),
        });
    }

    if let Some(pair) = instance.pairs().iter().find(|pair| {
        nodes[pair.delivery()].time_window().end() < nodes[pair.pickup()].time_window().start()
    }) {
        return Err(ValidationError::InvalidPairWindow {
            pickup: pair.pickup(),
            delivery: pair.delivery(),
        });
    }

    if instance.vehicles().next().is_none() {
        return Err(ValidationError::NoVehicles);
    }

    let depot = instance.depot().ok_or(ValidationError::MissingDepot)?;

    if !nodes.iter().any(|node| node.kind().requires_visit()) {
        return Err(ValidationError::NoVisitNodes);
    }

    let paired = instance
        .pairs()
        .iter()
        .flat_map(|pair| [pair.pickup(), pair.delivery()])
        .collect::<FxHashSet<_>>();

    if let Some(node) = nodes.iter().find(|node| {
        (node.kind().is_pickup() || node.kind().is_delivery()) && !paired.contains(&node.index())
    }) {
        return Err(ValidationError::UnpairedPickupDelivery(node.index()));
    }

    if !params.scaling_factor.is_finite() || params.scaling_factor <= 0.0 {
        return Err(ValidationError::InvalidScalingFactor(params.scaling_factor));
    }

    if params.time_limit <= 0 {
        return Err(ValidationError::InvalidTimeLimit(params.time_limit));
    }

    let objective = params.objective.parse::<Objective>()?;

    if !clock.is_finite() || clock < 0.0 {
        return Err(ValidationError::InvalidClock(clock));
    }

    Ok((depot.index(), objective))
}
