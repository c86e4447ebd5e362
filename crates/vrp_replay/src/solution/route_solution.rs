use serde::Serialize;

use crate::{
    define_index_newtype,
    error::ReplayError,
    problem::{
        location::Location,
        node::{Node, NodeIdx},
    },
};

define_index_newtype!(RouteIdx, VehicleRoute);

/// Stops of one vehicle in visiting order, with the scheduled arrival time at
/// each stop. Stop 0 is always the vehicle itself.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VehicleRoute {
    /// Where the vehicle stood when the solver planned this route.
    origin: Location,
    stops: Vec<NodeIdx>,
    arrival_times: Vec<f64>,
}

impl VehicleRoute {
    pub fn new(origin: Location, stops: Vec<NodeIdx>, arrival_times: Vec<f64>) -> Self {
        VehicleRoute {
            origin,
            stops,
            arrival_times,
        }
    }

    pub fn origin(&self) -> Location {
        self.origin
    }

    pub fn stops(&self) -> &[NodeIdx] {
        &self.stops
    }

    pub fn arrival_times(&self) -> &[f64] {
        &self.arrival_times
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn vehicle(&self) -> Option<NodeIdx> {
        self.stops.first().copied()
    }

    /// A vehicle with nothing but its own start has no assignment.
    pub fn has_assignment(&self) -> bool {
        self.stops.len() > 1
    }

    pub fn completion_time(&self) -> Option<f64> {
        self.arrival_times.last().copied()
    }

    /// Position of stop `position`; stop 0 is the origin, not the vehicle's
    /// current location.
    pub fn stop_location(&self, position: usize, nodes: &[Node]) -> Location {
        if position == 0 {
            self.origin
        } else {
            nodes[self.stops[position]].location()
        }
    }

    /// The route reduced to its start and the stops from `pivot` on. A
    /// completed route keeps only its start.
    pub(crate) fn remaining_from(&self, pivot: usize, completed: bool) -> VehicleRoute {
        let mut stops = Vec::with_capacity(self.stops.len());
        let mut arrival_times = Vec::with_capacity(self.stops.len());

        stops.extend(self.stops.first());
        arrival_times.extend(self.arrival_times.first());

        if !completed {
            let from = pivot.max(1);
            stops.extend_from_slice(&self.stops[from..]);
            arrival_times.extend_from_slice(&self.arrival_times[from..]);
        }

        VehicleRoute {
            origin: self.origin,
            stops,
            arrival_times,
        }
    }

    fn validate(&self, route: RouteIdx, nodes: &[Node]) -> Result<(), ReplayError> {
        let malformed = |reason: String| {
            Err(ReplayError::MalformedSolution(format!("route {route}: {reason}")))
        };

        if self.stops.is_empty() {
            return malformed("route has no stops".to_owned());
        }

        if self.stops.len() != self.arrival_times.len() {
            return malformed(format!(
                "{} stops but {} arrival times",
                self.stops.len(),
                self.arrival_times.len()
            ));
        }

        if let Some(time) = self.arrival_times.iter().find(|time| !time.is_finite()) {
            return malformed(format!("arrival time {time} is not finite"));
        }

        if let Some(position) = self
            .arrival_times
            .windows(2)
            .position(|pair| pair[0] > pair[1])
        {
            return malformed(format!(
                "arrival time decreases after stop {position}"
            ));
        }

        if let Some(stop) = self.stops.iter().find(|stop| stop.lookup(nodes).is_none()) {
            return malformed(format!("stop {stop} is not a known node"));
        }

        if !nodes[self.stops[0]].kind().is_vehicle() {
            return malformed(format!("first stop {} is not a vehicle", self.stops[0]));
        }

        Ok(())
    }
}

/// One route per vehicle, as committed from a solver response.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct RouteSolution {
    routes: Vec<VehicleRoute>,
}

impl RouteSolution {
    pub fn new(routes: Vec<VehicleRoute>) -> Self {
        RouteSolution { routes }
    }

    pub fn routes(&self) -> &[VehicleRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RouteIdx, &VehicleRoute)> {
        RouteIdx::enumerate(&self.routes)
    }

    /// Latest scheduled arrival over all routes; 0 without routes.
    pub fn horizon(&self) -> f64 {
        self.routes
            .iter()
            .filter_map(VehicleRoute::completion_time)
            .fold(0.0, f64::max)
    }

    /// Checks the solution is structurally sound against `nodes`: one route
    /// per vehicle node, each starting at a vehicle, with as many
    /// non-decreasing arrival times as stops.
    pub fn validate(&self, nodes: &[Node]) -> Result<(), ReplayError> {
        let vehicles = nodes.iter().filter(|node| node.kind().is_vehicle()).count();

        if self.routes.len() != vehicles {
            return Err(ReplayError::MalformedSolution(format!(
                "{} routes for {vehicles} vehicles",
                self.routes.len()
            )));
        }

        self.iter()
            .try_for_each(|(index, route)| route.validate(index, nodes))
    }
}

impl FromIterator<VehicleRoute> for RouteSolution {
    fn from_iter<T: IntoIterator<Item = VehicleRoute>>(iter: T) -> Self {
        RouteSolution::new(iter.into_iter().collect())
    }
}
