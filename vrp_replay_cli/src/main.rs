use clap::{Parser, Subcommand};

use crate::{generate::GenerateSubcommands, replay::ReplayArgs, request::RequestArgs};

mod file_utils;
mod generate;
mod parsers;
mod replay;
mod request;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
    /// Assemble and validate the solve request for a problem
    Request {
        #[command(flatten)]
        args: RequestArgs,
    },
    /// Replay a solver response tick by tick; Ctrl-C pauses
    Replay {
        #[command(flatten)]
        args: ReplayArgs,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Generate { commands }) => generate::run(commands)?,
        Some(Commands::Request { args }) => request::run(args)?,
        Some(Commands::Replay { args }) => replay::run(args).await?,
        None => {}
    }

    Ok(())
}
