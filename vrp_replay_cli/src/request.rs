use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;
use vrp_replay::{
    json::{
        solve_request::{
            DEFAULT_CAPACITY, DEFAULT_DEMAND, DEFAULT_SERVICE_TIME, SolveParameters,
        },
        solver_response::SolverResponse,
        types::JsonProblem,
    },
    session::Session,
};

use crate::{
    file_utils::{read_json, write_output},
    parsers,
};

/// Solver settings shared by every command that builds a request.
#[derive(Args, Debug, Clone)]
pub struct SolverArgs {
    /// Distance units travelled per time unit
    #[arg(long, default_value_t = 1.0, env = "VRP_SCALING_FACTOR", value_parser = parsers::parse_positive)]
    pub scaling_factor: f64,

    /// Search time granted to the solver (e.g. "10s", "1m")
    #[arg(long, default_value = "10s", env = "VRP_TIME_LIMIT", value_parser = parsers::parse_duration)]
    pub time_limit: jiff::SignedDuration,

    /// minSum or minLongest
    #[arg(long, default_value = "minSum", env = "VRP_OBJECTIVE")]
    pub objective: String,

    /// Ignore node time windows
    #[arg(long)]
    pub ignore_times: bool,

    #[arg(long, env = "VRP_RETURN_TO_DEPOT")]
    pub return_to_depot: bool,

    #[arg(long, default_value_t = 1_000_000, env = "VRP_MAX_ROUTE_LENGTH")]
    pub max_route_length: i64,

    #[arg(long, default_value_t = DEFAULT_DEMAND)]
    pub default_demand: i64,

    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub default_capacity: i64,

    #[arg(long, default_value_t = DEFAULT_SERVICE_TIME)]
    pub default_service_time: i64,
}

impl From<&SolverArgs> for SolveParameters {
    fn from(args: &SolverArgs) -> Self {
        SolveParameters {
            scaling_factor: args.scaling_factor,
            time_limit: args.time_limit.as_secs(),
            objective: args.objective.clone(),
            use_times: !args.ignore_times,
            return_to_depot: args.return_to_depot,
            max_route_length: args.max_route_length,
            default_demand: args.default_demand,
            default_capacity: args.default_capacity,
            default_service_time: args.default_service_time,
        }
    }
}

#[derive(Args)]
pub struct RequestArgs {
    /// Problem file, as written by `generate problem`
    #[arg(short, long)]
    problem: PathBuf,

    /// Last solver response, sent along as the previous solution
    #[arg(short, long)]
    response: Option<PathBuf>,

    #[command(flatten)]
    solver: SolverArgs,

    /// Output file, stdout when omitted
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

pub fn load_session(problem: &PathBuf) -> anyhow::Result<Session> {
    let json: JsonProblem = read_json(problem)?;
    let instance = json
        .build_problem()
        .with_context(|| format!("invalid problem in {}", problem.display()))?;

    Ok(Session::new(instance))
}

pub fn run(args: RequestArgs) -> anyhow::Result<()> {
    let mut session = load_session(&args.problem)?;

    if let Some(path) = &args.response {
        let response: SolverResponse = read_json(path)?;
        session.accept_response(response)?;
    }

    let request = session.build_request(&SolveParameters::from(&args.solver))?;
    info!(
        nodes = request.nodes.len(),
        cars = request.car_indices.len(),
        "request is valid"
    );

    write_output(args.out.as_ref(), &serde_json::to_string_pretty(&request)?)
}
