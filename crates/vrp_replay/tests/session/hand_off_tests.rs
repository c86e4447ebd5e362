use vrp_replay::{
    json::{
        solve_request::{SolveParameters, SolveRequest},
        solver_response::SolverResponse,
    },
    problem::{location::Location, problem_instance::PlacementMode},
    replay::controller::{ReplayController, ReplayParams, ReplayState},
    session::{Session, SolveOutcome},
};

use crate::test_utils::{self, FrameRecorder, TestRoute};

fn add_depot(session: &mut Session) {
    session
        .instance_mut()
        .place_node(0.0, 50.0, PlacementMode::Depot)
        .unwrap();
}

#[test]
fn test_re_solve_continues_paused_replay() {
    let instance = test_utils::create_single_vehicle_problem();
    let solution = test_utils::create_solution(
        instance.nodes(),
        vec![TestRoute {
            stops: vec![0, 1, 2],
            times: vec![0.0, 10.0, 20.0],
        }],
    );
    let mut session = Session::new(instance);
    let mut renderer = FrameRecorder::default();
    let mut controller = ReplayController::new(ReplayParams {
        increment: 5.0,
        scaling_factor: 1.0,
    });

    controller
        .load(&mut session, solution, &mut renderer)
        .unwrap();
    controller.start().unwrap();
    for _ in 0..3 {
        controller.step(&mut session, &mut renderer).unwrap();
    }
    controller.pause().unwrap();

    assert_eq!(
        session.instance().nodes()[0].location(),
        Location::from_cartesian(15.0, 0.0)
    );

    add_depot(&mut session);

    // The solver sees the work already done and plans from the current clock.
    let client = |request: &SolveRequest| -> anyhow::Result<SolverResponse> {
        assert_eq!(request.current_time, 15);
        assert_eq!(request.visited_nodes_cars, vec![[1, 0]]);
        assert_eq!(request.locked_nodes_cars, vec![[2, 0]]);
        assert_eq!(request.nodes[0].x, 15.0);
        assert!(request.nodes[1].visited);

        Ok(SolverResponse {
            routes: Some(vec![vec![0, 2]]),
            route_times_in: Some(vec![vec![15.0, 20.0]]),
            status: "ROUTING_SUCCESS".to_owned(),
            ..SolverResponse::default()
        })
    };

    let outcome = session
        .solve(&client, &SolveParameters::default())
        .unwrap();
    let SolveOutcome::Solved(resolved) = outcome else {
        panic!("solver returned no routes");
    };

    assert_eq!(
        resolved.routes()[0].origin(),
        Location::from_cartesian(15.0, 0.0)
    );

    controller
        .hand_off(&mut session, resolved, &mut renderer)
        .unwrap();

    assert_eq!(controller.state(), ReplayState::Paused);
    assert_eq!(session.clock().value(), 15.0);
    assert_eq!(session.ledger().visited().len(), 1);

    controller.start().unwrap();
    let last = controller.step(&mut session, &mut renderer).unwrap();

    assert!(last.is_complete);
    assert_eq!(controller.state(), ReplayState::Finished);
    assert_eq!(
        session.instance().nodes()[0].location(),
        Location::from_cartesian(20.0, 0.0)
    );
    assert_eq!(session.ledger().visited().len(), 2);

    // Reset goes back to where the vehicle stood before the first replay.
    controller.reset(&mut session, &mut renderer).unwrap();
    assert_eq!(
        session.instance().nodes()[0].location(),
        Location::from_cartesian(0.0, 0.0)
    );
}

#[test]
fn test_hand_off_rejects_mismatched_solution() {
    let instance = test_utils::create_two_vehicle_problem();
    let solution = test_utils::create_two_vehicle_solution(instance.nodes());
    let mut session = Session::new(instance);
    let mut renderer = FrameRecorder::default();
    let mut controller = ReplayController::default();

    controller
        .load(&mut session, solution.clone(), &mut renderer)
        .unwrap();
    controller.start().unwrap();
    controller.step(&mut session, &mut renderer).unwrap();
    controller.pause().unwrap();

    let single = test_utils::create_solution(
        session.instance().nodes(),
        vec![TestRoute {
            stops: vec![test_utils::V1, test_utils::P1],
            times: vec![0.0, 10.0],
        }],
    );

    assert!(
        controller
            .hand_off(&mut session, single, &mut renderer)
            .is_err()
    );
    assert_eq!(session.solution(), Some(&solution));
}

#[test]
fn test_request_after_one_vehicle_finished() {
    let instance = test_utils::create_two_vehicle_problem();
    let solution = test_utils::create_two_vehicle_solution(instance.nodes());
    let mut session = Session::new(instance);
    let mut renderer = FrameRecorder::default();
    let mut controller = ReplayController::new(ReplayParams {
        increment: 22.0,
        scaling_factor: 1.0,
    });

    controller
        .load(&mut session, solution, &mut renderer)
        .unwrap();
    controller.start().unwrap();
    controller.step(&mut session, &mut renderer).unwrap();
    controller.pause().unwrap();

    let request = session
        .build_request(&SolveParameters::default())
        .unwrap();

    assert_eq!(request.current_time, 22);
    assert_eq!(
        request.locked_nodes_cars,
        vec![[test_utils::TASK, test_utils::V2]]
    );
    assert!(
        request
            .locked_nodes_cars
            .iter()
            .all(|pair| !request.visited_nodes_cars.contains(pair))
    );
}
