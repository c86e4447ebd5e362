use crate::{
    problem::{
        location::Location,
        node::{Node, NodeIdx, NodeKind},
        pickup_delivery::PickupDeliveryPair,
        problem_instance::ProblemInstance,
    },
    replay::{clock::SimulationClock, renderer::Renderer},
    solution::route_solution::{RouteSolution, VehicleRoute},
};

/// Vehicle node of [`single_vehicle_line`].
pub const VEHICLE: NodeIdx = NodeIdx::new(0);

pub struct TestNode {
    pub x: f64,
    pub y: f64,
    pub kind: NodeKind,
}

pub fn vehicle(x: f64, y: f64) -> TestNode {
    TestNode {
        x,
        y,
        kind: NodeKind::vehicle(),
    }
}

pub fn task(x: f64, y: f64) -> TestNode {
    TestNode {
        x,
        y,
        kind: NodeKind::task(),
    }
}

pub fn depot(x: f64, y: f64) -> TestNode {
    TestNode {
        x,
        y,
        kind: NodeKind::Depot,
    }
}

pub fn pickup(x: f64, y: f64) -> TestNode {
    TestNode {
        x,
        y,
        kind: NodeKind::Pickup,
    }
}

pub fn delivery(x: f64, y: f64) -> TestNode {
    TestNode {
        x,
        y,
        kind: NodeKind::Delivery,
    }
}

/// Nodes get indices in slice order. Each delivery is paired with the pickup
/// right before it.
pub fn create_instance(nodes: &[TestNode]) -> ProblemInstance {
    let mut instance = ProblemInstance::new();
    let mut pending_pickup = None;

    for node in nodes {
        let index = instance.push_node(Location::from_cartesian(node.x, node.y), node.kind);

        match node.kind {
            NodeKind::Pickup => pending_pickup = Some(index),
            NodeKind::Delivery => {
                let pickup = pending_pickup.take().unwrap();
                instance.push_pair(pickup, index);
            }
            _ => {}
        }
    }

    instance
}

pub struct TestRoute {
    pub stops: Vec<usize>,
    pub times: Vec<f64>,
}

/// Routes start wherever their vehicle currently stands.
pub fn create_solution(instance: &ProblemInstance, routes: Vec<TestRoute>) -> RouteSolution {
    routes
        .into_iter()
        .map(|route| {
            VehicleRoute::new(
                instance.nodes()[route.stops[0]].location(),
                route.stops.into_iter().map(NodeIdx::new).collect(),
                route.times,
            )
        })
        .collect()
}

/// Vehicle at (0, 0), pickup at (10, 0), delivery at (20, 0), one route
/// visiting them in order with the given arrival times.
pub fn single_vehicle_line(times: Vec<f64>) -> (ProblemInstance, RouteSolution) {
    let instance = create_instance(&[
        vehicle(0.0, 0.0),
        pickup(10.0, 0.0),
        delivery(20.0, 0.0),
    ]);
    let solution = create_solution(
        &instance,
        vec![TestRoute {
            stops: vec![0, 1, 2],
            times,
        }],
    );

    (instance, solution)
}

pub fn locations(nodes: &[Node]) -> Vec<Location> {
    nodes.iter().map(Node::location).collect()
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub problems: usize,
    pub clocks: Vec<f64>,
    pub routes: Vec<RouteSolution>,
}

impl Renderer for RecordingRenderer {
    fn draw_problem(&mut self, _nodes: &[Node], _pairs: &[PickupDeliveryPair]) {
        self.problems += 1;
    }

    fn draw_route(&mut self, _nodes: &[Node], solution: &RouteSolution) {
        self.routes.push(solution.clone());
    }

    fn show_clock(&mut self, clock: SimulationClock) {
        self.clocks.push(clock.value());
    }
}
