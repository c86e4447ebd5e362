use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    error::ReplayError,
    json::{
        solve_request::{SolveParameters, SolveRequest, ValidationError},
        solver_response::SolverResponse,
    },
    problem::{node::Node, problem_instance::ProblemInstance},
    replay::{
        clock::SimulationClock,
        engine::{self, AdvanceParams, TickOutcome},
        ledger::VisitLedger,
    },
    solution::route_solution::RouteSolution,
    solver_client::SolverClient,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Solved(RouteSolution),
    /// The solver answered without routes.
    Unsolved { status: String },
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Client(#[from] anyhow::Error),
}

/// One editing session: the instance, the committed solution and the replay
/// state that goes with it.
#[derive(Debug, Default)]
pub struct Session {
    instance: ProblemInstance,
    solution: Option<RouteSolution>,
    last_response: Option<SolverResponse>,
    clock: SimulationClock,
    ledger: VisitLedger,
}

impl Session {
    pub fn new(instance: ProblemInstance) -> Self {
        Session {
            instance,
            ..Session::default()
        }
    }

    pub fn instance(&self) -> &ProblemInstance {
        &self.instance
    }

    pub fn instance_mut(&mut self) -> &mut ProblemInstance {
        &mut self.instance
    }

    pub fn solution(&self) -> Option<&RouteSolution> {
        self.solution.as_ref()
    }

    pub fn clock(&self) -> SimulationClock {
        self.clock
    }

    pub fn ledger(&self) -> &VisitLedger {
        &self.ledger
    }

    pub fn last_response(&self) -> Option<&SolverResponse> {
        self.last_response.as_ref()
    }

    pub(crate) fn commit_solution(&mut self, solution: RouteSolution) {
        self.solution = Some(solution);
    }

    /// Clock to zero, nothing visited or locked. Vehicle positions are left to
    /// the caller.
    pub(crate) fn reset_replay(&mut self) {
        self.clock = SimulationClock::ZERO;
        self.ledger.clear();
        self.instance
            .nodes_mut()
            .iter_mut()
            .for_each(Node::clear_visited);
    }

    pub(crate) fn advance(&mut self, params: AdvanceParams) -> Result<TickOutcome, ReplayError> {
        let solution = self.solution.as_ref().ok_or(ReplayError::NoSolution)?;

        let outcome = engine::advance(
            self.clock,
            solution,
            self.instance.nodes_mut(),
            &mut self.ledger,
            params,
        )?;
        self.clock = outcome.clock;

        Ok(outcome)
    }

    /// Drops everything; the next node placed gets index 0 again.
    pub fn clear(&mut self) {
        self.instance.clear();
        self.solution = None;
        self.last_response = None;
        self.reset_replay();
    }

    pub fn build_request(&self, params: &SolveParameters) -> Result<SolveRequest, ValidationError> {
        SolveRequest::assemble(
            &self.instance,
            params,
            self.last_response.as_ref(),
            self.clock.value(),
            &self.ledger,
        )
    }

    /// Sends the instance and the current replay state to `client`. The
    /// returned solution is not committed; hand it to the replay controller.
    #[instrument(skip_all, level = "info", fields(clock = self.clock.value()))]
    pub fn solve(
        &mut self,
        client: &impl SolverClient,
        params: &SolveParameters,
    ) -> Result<SolveOutcome, SolveError> {
        let request = self.build_request(params)?;
        let response = client.solve(&request)?;

        Ok(self.accept_response(response)?)
    }

    /// Converts a solver reply into routes anchored at the vehicles' current
    /// positions. A reply that converts cleanly becomes the previous solution
    /// of the next request.
    pub fn accept_response(
        &mut self,
        response: SolverResponse,
    ) -> Result<SolveOutcome, ReplayError> {
        let outcome = match response.to_route_solution(self.instance.nodes())? {
            Some(solution) => {
                info!(routes = solution.len(), status = %response.status, "solver returned routes");
                SolveOutcome::Solved(solution)
            }
            None => {
                warn!(status = %response.status, "solver returned no routes");
                SolveOutcome::Unsolved {
                    status: response.status.clone(),
                }
            }
        };

        self.last_response = Some(response);
        Ok(outcome)
    }
}
