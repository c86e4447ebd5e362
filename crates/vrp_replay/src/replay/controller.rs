use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    error::ReplayError,
    replay::{
        engine::{AdvanceParams, TickOutcome},
        renderer::Renderer,
        snapshot::PositionSnapshot,
    },
    session::Session,
    solution::route_solution::RouteSolution,
};

/// Clock advance per tick used by the editor.
pub const DEFAULT_INCREMENT: f64 = 0.07;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    /// No solution loaded.
    Idle,
    /// Solution loaded, clock at zero.
    Ready,
    Running,
    /// Clock frozen, can be resumed.
    Paused,
    /// Clock reached the route horizon; only a reset or a new load leaves it.
    Finished,
}

impl fmt::Display for ReplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ReplayState::Idle => "idle",
                ReplayState::Ready => "ready",
                ReplayState::Running => "running",
                ReplayState::Paused => "paused",
                ReplayState::Finished => "finished",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayParams {
    pub increment: f64,
    pub scaling_factor: f64,
}

impl Default for ReplayParams {
    fn default() -> Self {
        Self {
            increment: DEFAULT_INCREMENT,
            scaling_factor: 1.0,
        }
    }
}

impl From<ReplayParams> for AdvanceParams {
    fn from(params: ReplayParams) -> Self {
        AdvanceParams {
            scaling_factor: params.scaling_factor,
            increment: params.increment,
        }
    }
}

/// Drives the engine one tick at a time.
///
/// The controller never schedules anything itself: the host calls
/// [`ReplayController::step`] while [`ReplayController::is_running`] holds and
/// yields to its event loop between calls, which is where pauses and resets
/// arrive. A tick always runs to completion.
#[derive(Debug, Clone)]
pub struct ReplayController {
    state: ReplayState,
    params: ReplayParams,
    snapshot: PositionSnapshot,
    view: Option<RouteSolution>,
}

impl ReplayController {
    pub fn new(params: ReplayParams) -> Self {
        ReplayController {
            state: ReplayState::Idle,
            params,
            snapshot: PositionSnapshot::default(),
            view: None,
        }
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn params(&self) -> ReplayParams {
        self.params
    }

    pub fn is_running(&self) -> bool {
        self.state == ReplayState::Running
    }

    /// Vehicle positions captured when the current solution was loaded.
    pub fn snapshot(&self) -> &PositionSnapshot {
        &self.snapshot
    }

    /// Remaining routes emitted by the latest tick.
    pub fn view(&self) -> Option<&RouteSolution> {
        self.view.as_ref()
    }

    /// Commits `solution` and rewinds the replay to its start.
    pub fn load(
        &mut self,
        session: &mut Session,
        solution: RouteSolution,
        renderer: &mut impl Renderer,
    ) -> Result<(), ReplayError> {
        self.ensure(
            &[ReplayState::Idle, ReplayState::Ready, ReplayState::Finished],
            "load a solution",
        )?;
        solution.validate(session.instance().nodes())?;

        session.reset_replay();
        self.snapshot = PositionSnapshot::capture(session.instance().nodes());
        self.view = None;
        session.commit_solution(solution);

        self.transition(ReplayState::Ready);
        self.redraw_committed(session, renderer);

        Ok(())
    }

    /// Swaps in a re-optimized solution while paused. Clock, visited stops and
    /// the original snapshot carry over, so the replay continues where it was.
    pub fn hand_off(
        &mut self,
        session: &mut Session,
        solution: RouteSolution,
        renderer: &mut impl Renderer,
    ) -> Result<(), ReplayError> {
        self.ensure(&[ReplayState::Paused], "hand off a solution")?;
        solution.validate(session.instance().nodes())?;

        session.commit_solution(solution);
        self.view = None;
        self.redraw_committed(session, renderer);

        info!(clock = session.clock().value(), "handed off re-optimized solution");
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), ReplayError> {
        self.ensure(&[ReplayState::Ready, ReplayState::Paused], "start")?;
        self.transition(ReplayState::Running);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), ReplayError> {
        self.ensure(&[ReplayState::Running], "pause")?;
        self.transition(ReplayState::Paused);
        Ok(())
    }

    /// Runs one tick and hands the result to `renderer`. Reaching the horizon
    /// finishes the replay. A failed tick pauses it with nothing changed.
    pub fn step(
        &mut self,
        session: &mut Session,
        renderer: &mut impl Renderer,
    ) -> Result<TickOutcome, ReplayError> {
        self.ensure(&[ReplayState::Running], "step")?;

        let outcome = match session.advance(self.params.into()) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(%error, "tick failed, pausing replay");
                self.transition(ReplayState::Paused);
                return Err(error);
            }
        };

        renderer.show_clock(outcome.clock);
        renderer.draw_route(session.instance().nodes(), &outcome.remaining);
        self.view = Some(outcome.remaining.clone());

        if outcome.is_complete {
            self.transition(ReplayState::Finished);
        }

        Ok(outcome)
    }

    /// Back to the start of the loaded solution: clock at zero, vehicles where
    /// they were at load time, nothing visited or locked.
    pub fn reset(
        &mut self,
        session: &mut Session,
        renderer: &mut impl Renderer,
    ) -> Result<(), ReplayError> {
        if self.state == ReplayState::Idle {
            return Ok(());
        }

        session.reset_replay();
        self.snapshot.restore(session.instance_mut().nodes_mut());
        self.view = None;

        self.transition(ReplayState::Ready);
        self.redraw_committed(session, renderer);

        Ok(())
    }

    /// Drops the session's instance and solution.
    pub fn clear(&mut self, session: &mut Session) {
        session.clear();
        self.snapshot = PositionSnapshot::default();
        self.view = None;
        self.transition(ReplayState::Idle);
    }

    fn ensure(&self, allowed: &[ReplayState], action: &'static str) -> Result<(), ReplayError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(ReplayError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    fn transition(&mut self, to: ReplayState) {
        if self.state != to {
            info!(from = %self.state, %to, "replay state changed");
            self.state = to;
        }
    }

    fn redraw_committed(&self, session: &Session, renderer: &mut impl Renderer) {
        renderer.show_clock(session.clock());
        if let Some(solution) = session.solution() {
            renderer.draw_route(session.instance().nodes(), solution);
        }
    }
}

impl Default for ReplayController {
    fn default() -> Self {
        Self::new(ReplayParams::default())
    }
}
