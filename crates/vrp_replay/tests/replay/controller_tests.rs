use vrp_replay::{
    error::ReplayError,
    replay::{
        controller::{ReplayController, ReplayParams, ReplayState},
        snapshot::PositionSnapshot,
    },
    session::Session,
};

use crate::test_utils::{self, FrameRecorder, V1, V2};

fn loaded(increment: f64) -> (ReplayController, Session, FrameRecorder) {
    let instance = test_utils::create_two_vehicle_problem();
    let solution = test_utils::create_two_vehicle_solution(instance.nodes());
    let mut session = Session::new(instance);
    let mut renderer = FrameRecorder::default();
    let mut controller = ReplayController::new(ReplayParams {
        increment,
        scaling_factor: 1.0,
    });

    controller
        .load(&mut session, solution, &mut renderer)
        .unwrap();

    (controller, session, renderer)
}

fn run_to_end(controller: &mut ReplayController, session: &mut Session, renderer: &mut FrameRecorder) {
    while controller.is_running() {
        controller.step(session, renderer).unwrap();
    }
}

#[test]
fn test_load_draws_full_solution() {
    let (controller, session, renderer) = loaded(1.0);

    assert_eq!(controller.state(), ReplayState::Ready);
    assert_eq!(renderer.clocks, vec![0.0]);
    assert_eq!(renderer.frames.len(), 1);
    assert_eq!(Some(&renderer.frames[0]), session.solution());
    assert_eq!(
        controller.snapshot(),
        &PositionSnapshot::capture(session.instance().nodes())
    );
}

#[test]
fn test_replay_runs_to_finished() {
    let (mut controller, mut session, mut renderer) = loaded(4.0);

    controller.start().unwrap();
    run_to_end(&mut controller, &mut session, &mut renderer);

    assert_eq!(controller.state(), ReplayState::Finished);
    assert_eq!(session.clock().value(), 30.0);
    assert_eq!(renderer.clocks.last(), Some(&30.0));

    let last = controller.view().unwrap();
    assert!(last.routes().iter().all(|route| route.len() == 1));
    assert_eq!(session.ledger().visited().len(), 5);
    assert!(session.instance().nodes().iter().all(|node| {
        node.is_visited() || !node.kind().requires_visit()
    }));
}

#[test]
fn test_reset_round_trip() {
    let (mut controller, mut session, mut renderer) = loaded(3.3);
    let before = test_utils::locations(session.instance().nodes());

    controller.start().unwrap();
    for _ in 0..5 {
        controller.step(&mut session, &mut renderer).unwrap();
    }
    controller.pause().unwrap();

    assert_ne!(test_utils::locations(session.instance().nodes()), before);

    controller.reset(&mut session, &mut renderer).unwrap();

    assert_eq!(controller.state(), ReplayState::Ready);
    assert_eq!(test_utils::locations(session.instance().nodes()), before);
    assert_eq!(session.clock().value(), 0.0);
    assert!(session.ledger().visited().is_empty());
    assert!(session.ledger().locked().is_empty());
    assert!(
        test_utils::visited_flags(session.instance().nodes())
            .iter()
            .all(|visited| !visited)
    );
    assert_eq!(renderer.frames.last(), session.solution());

    // The replay can be run again from the restored state.
    controller.start().unwrap();
    run_to_end(&mut controller, &mut session, &mut renderer);
    assert_eq!(controller.state(), ReplayState::Finished);
}

#[test]
fn test_pause_freezes_clock() {
    let (mut controller, mut session, mut renderer) = loaded(2.0);

    controller.start().unwrap();
    controller.step(&mut session, &mut renderer).unwrap();
    controller.pause().unwrap();

    let clock = session.clock();
    let positions = [
        session.instance().nodes()[V1].location(),
        session.instance().nodes()[V2].location(),
    ];

    assert_eq!(
        controller.step(&mut session, &mut renderer),
        Err(ReplayError::InvalidTransition {
            from: ReplayState::Paused,
            action: "step",
        })
    );
    assert_eq!(session.clock(), clock);
    assert_eq!(
        [
            session.instance().nodes()[V1].location(),
            session.instance().nodes()[V2].location(),
        ],
        positions
    );
}

#[test]
fn test_load_replaces_finished_replay() {
    let (mut controller, mut session, mut renderer) = loaded(100.0);

    controller.start().unwrap();
    run_to_end(&mut controller, &mut session, &mut renderer);
    assert_eq!(controller.state(), ReplayState::Finished);

    let solution = test_utils::create_two_vehicle_solution(session.instance().nodes());
    controller
        .load(&mut session, solution, &mut renderer)
        .unwrap();

    assert_eq!(controller.state(), ReplayState::Ready);
    assert_eq!(session.clock().value(), 0.0);
    assert!(session.ledger().visited().is_empty());
}

#[test]
fn test_clear_returns_to_idle() {
    let (mut controller, mut session, _) = loaded(1.0);

    controller.clear(&mut session);

    assert_eq!(controller.state(), ReplayState::Idle);
    assert!(session.instance().is_empty());
    assert!(session.solution().is_none());
    assert!(controller.start().is_err());
}
