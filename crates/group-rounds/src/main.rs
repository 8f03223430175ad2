//! Group assignment CLI.
//!
//! Commands:
//! - generate: produce rounds from flags
//! - interactive: prompt for member count, rounds, and seed on stdin

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use group_rounds::generator::{GeneratorConfig, RoundGenerator};
use group_rounds::results::RunResult;
use group_rounds::Member;

/// Generate a timestamped output path from the given path.
/// e.g., "results.json" -> "results-20260108-010530.json"
fn timestamped_path(path: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("results");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("json");
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!("{}-{}.{}", stem, timestamp, ext))
}

#[derive(Parser)]
#[command(name = "group-rounds")]
#[command(version)]
#[command(about = "Rotating group assignment generator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate group assignments from flags
    Generate {
        /// Member count (identities 1..=members)
        #[arg(long, default_value = "54")]
        members: Member,

        /// Number of rounds
        #[arg(long, default_value = "3")]
        rounds: usize,

        /// Random seed (omit for a random run)
        #[arg(long)]
        seed: Option<u64>,

        /// Write the full run result as JSON to a timestamped path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Prompt for member count, rounds, and seed interactively
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    match cli.command {
        Commands::Generate {
            members,
            rounds,
            seed,
            output,
        } => run_generation(members, rounds, seed, output),

        Commands::Interactive => {
            println!("=== Group assignment generator ===");
            println!("Enter member count (N), rounds (R), and an optional seed.");
            println!("Press Enter alone for the defaults: N=54, R=3, random seed.\n");

            let stdin = io::stdin();
            let mut lines = stdin.lock().lines();

            let members = read_number(
                &mut lines,
                "Members (>= 3) [default=54]",
                3,
                Member::MAX as u64,
                54,
            )?;
            let rounds =
                read_number(&mut lines, "Rounds (>= 1) [default=3]", 1, u64::MAX, 3)? as usize;
            let seed = read_optional_seed(&mut lines, "Seed (blank = random) [e.g. 12345]")?;

            run_generation(members as Member, rounds, seed, None)
        }
    }
}

fn run_generation(
    members: Member,
    rounds: usize,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = GeneratorConfig {
        members,
        rounds,
        seed,
    };

    let started_at = Utc::now();
    let mut generator = RoundGenerator::new(config.clone());
    let artifact = generator.generate()?;
    let ended_at = Utc::now();

    print!("{}", artifact);

    let residual = artifact.total_residual_conflicts();
    if residual > 0 {
        info!(
            residual,
            "some rounds kept unresolved conflicts; re-run with another seed if needed"
        );
    }

    if let Some(output) = output {
        let result = RunResult::new(config, artifact, started_at, ended_at);
        let output_path = timestamped_path(&output);
        result.save(&output_path)?;
        println!("Results saved to: {}", output_path.display());
    }

    Ok(())
}

/// Read a bounded integer, re-prompting on malformed or out-of-range
/// input. Blank input (or end of input) takes the default.
fn read_number(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    prompt: &str,
    min: u64,
    max: u64,
    default: u64,
) -> Result<u64> {
    loop {
        print!("{}: ", prompt);
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(default),
        };
        let line = line.trim();
        if line.is_empty() {
            return Ok(default);
        }
        match line.parse::<u64>() {
            Ok(value) if value >= min && value <= max => return Ok(value),
            _ => println!(
                "Invalid input. Enter an integer >= {}, or Enter alone for the default.",
                min
            ),
        }
    }
}

/// Read an optional seed: blank means random, otherwise any integer.
fn read_optional_seed(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    prompt: &str,
) -> Result<Option<u64>> {
    loop {
        print!("{}: ", prompt);
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(None),
        };
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        match line.parse::<u64>() {
            Ok(seed) => return Ok(Some(seed)),
            Err(_) => println!("Invalid input. Enter an integer seed, or Enter alone for random."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(inputs: &[&str]) -> impl Iterator<Item = io::Result<String>> {
        inputs
            .iter()
            .map(|s| Ok(s.to_string()))
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_blank_input_takes_default() {
        let mut lines = feed(&[""]);
        assert_eq!(read_number(&mut lines, "n", 3, u64::MAX, 54).unwrap(), 54);
    }

    #[test]
    fn test_reprompts_until_valid() {
        let mut lines = feed(&["abc", "1", "12"]);
        assert_eq!(read_number(&mut lines, "n", 3, u64::MAX, 54).unwrap(), 12);
    }

    #[test]
    fn test_end_of_input_takes_default() {
        let mut lines = feed(&[]);
        assert_eq!(read_number(&mut lines, "n", 1, u64::MAX, 3).unwrap(), 3);
    }

    #[test]
    fn test_blank_seed_is_random() {
        let mut lines = feed(&["  "]);
        assert_eq!(read_optional_seed(&mut lines, "seed").unwrap(), None);
    }

    #[test]
    fn test_seed_parses_after_reprompt() {
        let mut lines = feed(&["not-a-number", "12345"]);
        assert_eq!(
            read_optional_seed(&mut lines, "seed").unwrap(),
            Some(12345)
        );
    }
}
