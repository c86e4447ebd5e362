use crate::json::{solve_request::SolveRequest, solver_response::SolverResponse};

/// Transport to the solver service. The replay core never talks to the
/// network itself; hosts plug in whatever reaches their solver.
pub trait SolverClient {
    fn solve(&self, request: &SolveRequest) -> anyhow::Result<SolverResponse>;
}

impl<F> SolverClient for F
where
    F: Fn(&SolveRequest) -> anyhow::Result<SolverResponse>,
{
    fn solve(&self, request: &SolveRequest) -> anyhow::Result<SolverResponse> {
        self(request)
    }
}
