use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::ReplayError,
    problem::node::{Node, NodeIdx},
    solution::route_solution::{RouteSolution, VehicleRoute},
};

/// Reply of the solver service. Without `routes` the instance was not solved.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Default)]
#[serde(rename = "SolverResponse")]
pub struct SolverResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<Vec<usize>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_times_in: Option<Vec<Vec<f64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_times_out: Option<Vec<Vec<f64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_loads: Option<Vec<Vec<i64>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_costs: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,

    #[serde(default)]
    pub status: String,
}

impl SolverResponse {
    pub fn is_success(&self) -> bool {
        self.status.contains("SUCCESS")
    }

    /// Routes of the response, anchored at the vehicles' current locations.
    /// `None` when the response carries no routes.
    pub fn to_route_solution(&self, nodes: &[Node]) -> Result<Option<RouteSolution>, ReplayError> {
        let Some(routes) = &self.routes else {
            return Ok(None);
        };

        let times = self.route_times_in.as_deref().ok_or_else(|| {
            ReplayError::MalformedSolution("response has routes but no route_times_in".to_owned())
        })?;

        if times.len() != routes.len() {
            return Err(ReplayError::MalformedSolution(format!(
                "{} routes but {} arrival time lists",
                routes.len(),
                times.len()
            )));
        }

        let solution = routes
            .iter()
            .zip(times)
            .enumerate()
            .map(|(index, (stops, times))| {
                let origin = stops
                    .first()
                    .and_then(|&vehicle| nodes.get(vehicle))
                    .map(Node::location)
                    .ok_or_else(|| {
                        ReplayError::MalformedSolution(format!(
                            "route {index} does not start at a known node"
                        ))
                    })?;

                Ok(VehicleRoute::new(
                    origin,
                    stops.iter().copied().map(NodeIdx::new).collect(),
                    times.clone(),
                ))
            })
            .collect::<Result<RouteSolution, ReplayError>>()?;

        solution.validate(nodes)?;

        Ok(Some(solution))
    }
}
