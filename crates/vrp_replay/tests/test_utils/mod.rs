use vrp_replay::{
    problem::{
        location::Location,
        node::{Node, NodeIdx, NodeKind},
        pickup_delivery::PickupDeliveryPair,
        problem_instance::ProblemInstance,
    },
    replay::{clock::SimulationClock, renderer::Renderer},
    solution::route_solution::{RouteSolution, VehicleRoute},
};

//
//  Layout used by most replay tests:
//
//  V1 (0,0) ---- P1 (10,0) ---- D1 (20,0)
//
//  V2 (0,10) --- P2 (10,10) --- D2 (20,10) --- T (30,10)
//
//  Depot at (0,20). Nodes are indexed in the order below.
//
pub const V1: usize = 0;
pub const V2: usize = 1;
pub const DEPOT: usize = 2;
pub const P1: usize = 3;
pub const D1: usize = 4;
pub const P2: usize = 5;
pub const D2: usize = 6;
pub const TASK: usize = 7;

pub fn create_nodes(nodes: &[(f64, f64, NodeKind)]) -> Vec<Node> {
    nodes
        .iter()
        .enumerate()
        .map(|(index, &(x, y, kind))| {
            Node::new(NodeIdx::new(index), Location::from_cartesian(x, y), kind)
        })
        .collect()
}

pub fn create_two_vehicle_problem() -> ProblemInstance {
    let nodes = create_nodes(&[
        (0.0, 0.0, NodeKind::vehicle()),
        (0.0, 10.0, NodeKind::vehicle()),
        (0.0, 20.0, NodeKind::Depot),
        (10.0, 0.0, NodeKind::Pickup),
        (20.0, 0.0, NodeKind::Delivery),
        (10.0, 10.0, NodeKind::Pickup),
        (20.0, 10.0, NodeKind::Delivery),
        (30.0, 10.0, NodeKind::task()),
    ]);
    let pairs = vec![
        PickupDeliveryPair::new(NodeIdx::new(P1), NodeIdx::new(D1)),
        PickupDeliveryPair::new(NodeIdx::new(P2), NodeIdx::new(D2)),
    ];

    ProblemInstance::from_parts(nodes, pairs).unwrap()
}

/// Vehicle 1 drives P1, D1 and is done at 20; vehicle 2 drives P2, D2, T and
/// is done at 30.
pub fn create_two_vehicle_solution(nodes: &[Node]) -> RouteSolution {
    create_solution(
        nodes,
        vec![
            TestRoute {
                stops: vec![V1, P1, D1],
                times: vec![0.0, 10.0, 20.0],
            },
            TestRoute {
                stops: vec![V2, P2, D2, TASK],
                times: vec![0.0, 10.0, 20.0, 30.0],
            },
        ],
    )
}

/// Vehicle at (0,0), pickup at (10,0), delivery at (20,0).
pub fn create_single_vehicle_problem() -> ProblemInstance {
    let nodes = create_nodes(&[
        (0.0, 0.0, NodeKind::vehicle()),
        (10.0, 0.0, NodeKind::Pickup),
        (20.0, 0.0, NodeKind::Delivery),
    ]);

    ProblemInstance::from_parts(
        nodes,
        vec![PickupDeliveryPair::new(NodeIdx::new(1), NodeIdx::new(2))],
    )
    .unwrap()
}

pub struct TestRoute {
    pub stops: Vec<usize>,
    pub times: Vec<f64>,
}

pub fn create_solution(nodes: &[Node], routes: Vec<TestRoute>) -> RouteSolution {
    RouteSolution::new(
        routes
            .into_iter()
            .map(|route| {
                VehicleRoute::new(
                    nodes[route.stops[0]].location(),
                    route.stops.into_iter().map(NodeIdx::new).collect(),
                    route.times,
                )
            })
            .collect(),
    )
}

pub fn locations(nodes: &[Node]) -> Vec<Location> {
    nodes.iter().map(Node::location).collect()
}

pub fn visited_flags(nodes: &[Node]) -> Vec<bool> {
    nodes.iter().map(Node::is_visited).collect()
}

#[derive(Default)]
pub struct FrameRecorder {
    pub clocks: Vec<f64>,
    pub frames: Vec<RouteSolution>,
}

impl Renderer for FrameRecorder {
    fn draw_problem(&mut self, _nodes: &[Node], _pairs: &[PickupDeliveryPair]) {}

    fn draw_route(&mut self, _nodes: &[Node], solution: &RouteSolution) {
        self.frames.push(solution.clone());
    }

    fn show_clock(&mut self, clock: SimulationClock) {
        self.clocks.push(clock.value());
    }
}
