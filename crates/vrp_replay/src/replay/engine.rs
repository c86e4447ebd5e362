use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{
    error::ReplayError,
    problem::{location::Location, node::Node},
    replay::{
        clock::SimulationClock,
        ledger::{VisitLedger, VisitRecord},
    },
    solution::route_solution::{RouteIdx, RouteSolution, VehicleRoute},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvanceParams {
    /// Distance units covered per time unit.
    pub scaling_factor: f64,
    pub increment: f64,
}

/// Something odd the engine noticed and worked around during a tick.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A vehicle with stops ahead has no stop it is heading to; the tick
    /// treated its start as both the previous and the next stop.
    InconsistentPivot {
        route: RouteIdx,
        clock: f64,
        stops: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub clock: SimulationClock,
    /// What is left of every route, for redraw and for the next solve.
    pub remaining: RouteSolution,
    pub is_complete: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Moves the replay forward by one tick.
///
/// Every route is checked before anything is touched, so an error leaves
/// `nodes` and `ledger` as they were. On success the vehicles have moved,
/// passed stops are marked visited (once), and the ledger's locked list holds
/// exactly this tick's destinations of vehicles still on their way.
#[instrument(skip_all, level = "trace", fields(clock = clock.value()))]
pub fn advance(
    clock: SimulationClock,
    solution: &RouteSolution,
    nodes: &mut [Node],
    ledger: &mut VisitLedger,
    params: AdvanceParams,
) -> Result<TickOutcome, ReplayError> {
    if !params.increment.is_finite() || params.increment < 0.0 {
        return Err(ReplayError::InvalidIncrement(params.increment));
    }

    if !params.scaling_factor.is_finite() || params.scaling_factor <= 0.0 {
        return Err(ReplayError::InvalidScalingFactor(params.scaling_factor));
    }

    solution.validate(nodes)?;

    let horizon = solution.horizon();
    let clock = clock.advanced(params.increment, horizon);
    let now = clock.value();

    let mut remaining = Vec::with_capacity(solution.len());
    let mut locked = Vec::with_capacity(solution.len());
    let mut diagnostics = Vec::new();

    for (route_idx, route) in solution.iter() {
        let stops = route.stops();
        let vehicle = stops[0];
        let completed = route
            .completion_time()
            .is_some_and(|time| clock.has_reached(time));
        let pivot = find_pivot(route.arrival_times(), now);

        // A finished vehicle has passed its final stop as well.
        let passed = if completed { stops.len() } else { pivot };
        for &stop in &stops[1.min(passed)..passed] {
            let node = &mut nodes[stop];
            if node.kind().requires_visit() && node.mark_visited() {
                ledger.record_visit(stop, vehicle);
            }
        }

        remaining.push(route.remaining_from(pivot, completed));

        if !route.has_assignment() {
            continue;
        }

        if pivot == 0 {
            warn!(
                route = %route_idx,
                vehicle = %vehicle,
                clock = now,
                "vehicle with an assignment has no next stop, falling back to its start"
            );
            diagnostics.push(Diagnostic::InconsistentPivot {
                route: route_idx,
                clock: now,
                stops: stops.len(),
            });
        }

        // A finished vehicle is not heading anywhere.
        if !completed {
            locked.push(VisitRecord::new(stops[pivot], vehicle));
        }

        let position = vehicle_position(route, pivot, nodes, now, params.scaling_factor);
        nodes[vehicle].move_to(position);
    }

    ledger.replace_locked(locked);

    let is_complete = clock.has_reached(horizon);
    debug!(clock = now, horizon, is_complete, "advanced replay");

    Ok(TickOutcome {
        clock,
        remaining: RouteSolution::new(remaining),
        is_complete,
        diagnostics,
    })
}

/// First stop scheduled strictly after `now`, or the last stop when every
/// arrival is already behind.
fn find_pivot(arrival_times: &[f64], now: f64) -> usize {
    arrival_times
        .iter()
        .position(|&time| time > now)
        .unwrap_or(arrival_times.len().saturating_sub(1))
}

/// Where the vehicle is at `now` on its leg towards stop `pivot`. It waits at
/// the previous stop until it must leave to arrive on time, then drives in a
/// straight line at constant speed.
fn vehicle_position(
    route: &VehicleRoute,
    pivot: usize,
    nodes: &[Node],
    now: f64,
    scaling_factor: f64,
) -> Location {
    let from = route.stop_location(pivot.saturating_sub(1), nodes);
    let to = route.stop_location(pivot, nodes);
    let arrival = route.arrival_times()[pivot];
    let travel_time = from.euclidean_distance(&to) / scaling_factor;

    if now <= arrival - travel_time {
        from
    } else if now <= arrival {
        let fraction = if travel_time > 0.0 {
            (travel_time - (arrival - now)) / travel_time
        } else {
            1.0
        };
        from.lerp(&to, fraction)
    } else {
        to
    }
}
