use crate::{
    problem::{node::Node, pickup_delivery::PickupDeliveryPair},
    replay::clock::SimulationClock,
    solution::route_solution::RouteSolution,
};

/// Presentation side of the replay. Implementations only read what they are
/// handed; the controller calls them after each state change.
pub trait Renderer {
    fn draw_problem(&mut self, nodes: &[Node], pairs: &[PickupDeliveryPair]);

    fn draw_route(&mut self, nodes: &[Node], solution: &RouteSolution);

    fn show_clock(&mut self, _clock: SimulationClock) {}
}
