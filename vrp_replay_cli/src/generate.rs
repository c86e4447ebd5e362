use std::path::PathBuf;

use clap::Subcommand;
use rand::{SeedableRng, rngs::SmallRng};
use tracing::info;
use vrp_replay::{
    json::{schema, types::JsonProblem},
    problem::generator::{GeneratorParams, generate_random_problem},
};

use crate::file_utils::write_output;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    /// Random instance: one depot, some cars and pickup/delivery pairs
    Problem {
        #[arg(long, default_value_t = 3, env = "VRP_NUM_CARS")]
        cars: usize,

        #[arg(long, default_value_t = 10, env = "VRP_NUM_PAIRS")]
        pairs: usize,

        #[arg(long, default_value_t = 960)]
        width: u32,

        #[arg(long, default_value_t = 600)]
        height: u32,

        /// Seed for a reproducible instance
        #[arg(long)]
        seed: Option<u64>,

        /// Output file, stdout when omitted
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },
    JsonSchema {
        /// Output file for the schema
        #[arg(long, short = 'o')]
        out: PathBuf,

        /// Schema of the problem file instead of the solve request
        #[arg(long)]
        problem: bool,
    },
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::Problem {
            cars,
            pairs,
            width,
            height,
            seed,
            out,
        } => {
            let mut rng = match seed {
                Some(seed) => SmallRng::seed_from_u64(seed),
                None => SmallRng::from_os_rng(),
            };
            let instance = generate_random_problem(
                GeneratorParams {
                    width,
                    height,
                    num_cars: cars,
                    num_pairs: pairs,
                },
                &mut rng,
            );

            info!(nodes = instance.len(), "generated problem");
            let content = serde_json::to_string_pretty(&JsonProblem::from(&instance))?;
            write_output(out.as_ref(), &content)?;
        }
        GenerateSubcommands::JsonSchema { out, problem } => {
            let schema = if problem {
                schema::generate_problem_json_schema()?
            } else {
                schema::generate_json_schema()?
            };

            write_output(Some(&out), &schema)?;
        }
    }

    Ok(())
}
