use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, bail};
use clap::Args;
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};
use vrp_replay::{
    json::{solve_request::SolveParameters, solver_response::SolverResponse},
    problem::{node::Node, pickup_delivery::PickupDeliveryPair},
    replay::{
        clock::SimulationClock,
        controller::{DEFAULT_INCREMENT, ReplayController, ReplayParams, ReplayState},
        renderer::Renderer,
    },
    session::{Session, SolveOutcome},
    solution::route_solution::RouteSolution,
};

use crate::{
    file_utils::{read_json, write_output},
    parsers,
    request::{SolverArgs, load_session},
};

#[derive(Args)]
pub struct ReplayArgs {
    /// Problem file, as written by `generate problem`
    #[arg(short, long)]
    problem: PathBuf,

    /// Solver response to replay
    #[arg(short, long)]
    response: PathBuf,

    /// Clock advance per tick, must be positive for the replay to end
    #[arg(long, default_value_t = DEFAULT_INCREMENT, env = "VRP_INCREMENT", value_parser = parsers::parse_positive)]
    increment: f64,

    /// Wall time between two ticks (e.g. "10ms")
    #[arg(long, default_value = "10ms", env = "VRP_TICK_DELAY", value_parser = parsers::parse_duration)]
    tick_delay: jiff::SignedDuration,

    /// Write every frame as a JSON line to this file
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Where to write the re-solve request when the replay is interrupted
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,

    #[command(flatten)]
    solver: SolverArgs,
}

#[derive(Serialize)]
struct Frame<'a> {
    clock: f64,
    vehicles: Vec<VehiclePosition>,
    routes: &'a RouteSolution,
}

#[derive(Serialize)]
struct VehiclePosition {
    vehicle: usize,
    x: f64,
    y: f64,
}

/// Renders the replay to a progress bar and, optionally, a JSON lines file.
struct FrameLog {
    bar: ProgressBar,
    clock: SimulationClock,
    writer: Option<BufWriter<File>>,
    error: Option<anyhow::Error>,
}

impl FrameLog {
    fn new(frames: Option<&PathBuf>, horizon: f64) -> anyhow::Result<Self> {
        let writer = frames
            .map(|path| {
                File::create(path)
                    .map(BufWriter::new)
                    .with_context(|| format!("cannot create {}", path.display()))
            })
            .transpose()?;

        let bar = ProgressBar::new(horizon.ceil() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40}] t = {pos}/{len} {msg}")
                .context("invalid progress bar template")?,
        );

        Ok(FrameLog {
            bar,
            clock: SimulationClock::ZERO,
            writer,
            error: None,
        })
    }

    fn write_frame(&mut self, nodes: &[Node], solution: &RouteSolution) -> anyhow::Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };

        let frame = Frame {
            clock: self.clock.value(),
            vehicles: nodes
                .iter()
                .filter(|node| node.kind().is_vehicle())
                .map(|node| VehiclePosition {
                    vehicle: node.index().get(),
                    x: node.location().x(),
                    y: node.location().y(),
                })
                .collect(),
            routes: solution,
        };

        serde_json::to_writer(&mut *writer, &frame)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Flushes the frames file and reports the first write error, if any.
    fn finish(mut self, message: &'static str) -> anyhow::Result<()> {
        self.bar.finish_with_message(message);

        if let Some(error) = self.error.take() {
            return Err(error);
        }

        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }

        Ok(())
    }
}

impl Renderer for FrameLog {
    fn draw_problem(&mut self, nodes: &[Node], pairs: &[PickupDeliveryPair]) {
        let vehicles = nodes.iter().filter(|node| node.kind().is_vehicle()).count();
        info!(nodes = nodes.len(), vehicles, pairs = pairs.len(), "loaded problem");
    }

    fn draw_route(&mut self, nodes: &[Node], solution: &RouteSolution) {
        if self.error.is_some() {
            return;
        }

        if let Err(error) = self.write_frame(nodes, solution) {
            warn!(%error, "cannot write frame, frames are no longer recorded");
            self.error = Some(error);
        }
    }

    fn show_clock(&mut self, clock: SimulationClock) {
        self.clock = clock;
        self.bar.set_position(clock.floored().max(0) as u64);
    }
}

pub async fn run(args: ReplayArgs) -> anyhow::Result<()> {
    let mut session = load_session(&args.problem)?;
    let response: SolverResponse = read_json(&args.response)?;

    let solution = match session.accept_response(response)? {
        SolveOutcome::Solved(solution) => solution,
        SolveOutcome::Unsolved { status } => bail!("solver returned no routes: {status}"),
    };

    let mut renderer = FrameLog::new(args.frames.as_ref(), solution.horizon())?;
    renderer.draw_problem(session.instance().nodes(), session.instance().pairs());

    let mut controller = ReplayController::new(ReplayParams {
        increment: args.increment,
        scaling_factor: args.solver.scaling_factor,
    });
    controller.load(&mut session, solution, &mut renderer)?;
    controller.start()?;

    let tick_delay: Duration = args.tick_delay.unsigned_abs();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while controller.is_running() {
        tokio::select! {
            signal = &mut ctrl_c => {
                signal?;
                controller.pause()?;
            }
            _ = tokio::time::sleep(tick_delay) => {
                controller.step(&mut session, &mut renderer)?;
            }
        }
    }

    if controller.state() == ReplayState::Finished {
        renderer.finish("done")?;
    } else {
        renderer.finish("paused")?;
        info!(clock = %session.clock(), "replay interrupted, writing re-solve request");

        let request = session.build_request(&SolveParameters::from(&args.solver))?;
        write_output(args.out.as_ref(), &serde_json::to_string_pretty(&request)?)?;
    }

    println!("{}", summary(&session));

    Ok(())
}

fn summary(session: &Session) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Vehicle",
        "Stops",
        "Visited",
        "Completion",
        "Position",
    ]);

    let nodes = session.instance().nodes();
    let Some(solution) = session.solution() else {
        return table;
    };

    for route in solution.routes() {
        let Some(vehicle) = route.vehicle() else {
            continue;
        };
        let visited = session
            .ledger()
            .visited()
            .iter()
            .filter(|record| record.vehicle == vehicle)
            .count();
        let location = nodes[vehicle].location();

        table.add_row(vec![
            vehicle.to_string(),
            (route.len() - 1).to_string(),
            visited.to_string(),
            route
                .completion_time()
                .map_or_else(|| "-".to_owned(), |time| format!("{time:.1}")),
            format!("({:.1}, {:.1})", location.x(), location.y()),
        ]);
    }

    table
}
