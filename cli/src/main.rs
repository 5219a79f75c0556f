//! team-assign-cli: command-line interface for the team assignment solver.
//!
//! # Commands
//!
//! - `solve`: normalize a roster and run the solver on it
//! - `validate`: validate a roster file without solving

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use team_assign_core::models::RawParticipant;
use team_assign_core::{assign_teams, normalizer, solver::State, SolverParams};

#[derive(Parser)]
#[command(name = "team-assign-cli")]
#[command(version = "0.1.0")]
#[command(about = "Team assignment solver CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a roster and run the solver on it
    Solve {
        /// Input JSON file path (an array of RawParticipant records); omit with --stdin
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Read input from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Time budget for the search, in seconds
        #[arg(long, default_value = "30")]
        max_time_seconds: u64,

        /// Number of independent annealing restarts
        #[arg(long, default_value = "6")]
        num_search_workers: u32,

        /// Log search progress at info level
        #[arg(long)]
        log_search_progress: bool,
    },

    /// Validate a roster file without solving
    Validate {
        /// Input JSON file path
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Read input from stdin instead of a file
        #[arg(long)]
        stdin: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            input,
            stdin,
            output,
            pretty,
            max_time_seconds,
            num_search_workers,
            log_search_progress,
        } => cmd_solve(input, stdin, output, pretty, max_time_seconds, num_search_workers, log_search_progress),

        Commands::Validate { input, stdin } => cmd_validate(input, stdin),
    }
}

fn read_input(file: Option<PathBuf>, use_stdin: bool) -> Result<String> {
    if use_stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("failed to read from stdin")?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).with_context(|| format!("failed to read file: {:?}", path))
    } else {
        anyhow::bail!("either provide an input file or use --stdin")
    }
}

fn cmd_solve(
    input: Option<PathBuf>,
    stdin: bool,
    output: Option<PathBuf>,
    pretty: bool,
    max_time_seconds: u64,
    num_search_workers: u32,
    log_search_progress: bool,
) -> Result<()> {
    let json_str = read_input(input, stdin)?;
    let records: Vec<RawParticipant> = serde_json::from_str(&json_str).context("failed to parse input JSON")?;

    let participants = normalizer::normalize(&records).map_err(|e| anyhow::anyhow!("normalization error: {e}"))?;

    eprintln!("Running solver on {} participants...", participants.len());
    let params = SolverParams::new(max_time_seconds)
        .num_search_workers(num_search_workers)
        .log_search_progress(log_search_progress);

    let partition = assign_teams(participants, params).map_err(|e| anyhow::anyhow!("solver error: {e}"))?;

    let output_json = if pretty {
        serde_json::to_string_pretty(&partition)?
    } else {
        serde_json::to_string(&partition)?
    };

    if let Some(output_path) = output {
        fs::write(&output_path, &output_json).with_context(|| format!("failed to write output to {:?}", output_path))?;
        eprintln!("Result written to {:?}", output_path);
    } else {
        println!("{output_json}");
    }

    Ok(())
}

fn cmd_validate(input: Option<PathBuf>, stdin: bool) -> Result<()> {
    let json_str = read_input(input, stdin)?;

    let records: Vec<RawParticipant> = match serde_json::from_str(&json_str) {
        Ok(records) => records,
        Err(e) => {
            println!("{{\"valid\": false, \"error\": \"JSON parse error: {}\"}}", e.to_string().replace('"', "\\\""));
            return Ok(());
        }
    };

    let participants = match normalizer::normalize(&records) {
        Ok(participants) => participants,
        Err(e) => {
            println!("{{\"valid\": false, \"error\": \"{}\"}}", e.to_string().replace('"', "\\\""));
            return Ok(());
        }
    };

    match State::new(&participants) {
        Ok(_) => println!("{{\"valid\": true, \"message\": \"roster is valid\"}}"),
        Err(e) => println!("{{\"valid\": false, \"error\": \"{}\"}}", e.to_string().replace('"', "\\\"")),
    }

    Ok(())
}
