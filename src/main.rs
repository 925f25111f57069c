//! Command-line entry point: build the roster model and print schedules.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use u_roster::cp::BacktrackingSolver;
use u_roster::enumerate::{EnumerationStatus, SolutionEnumerator};
use u_roster::roster::RosterConfig;

/// Enumerate fair staff-to-slot rosters.
#[derive(Debug, Parser)]
#[command(name = "u-roster", version, about)]
struct Cli {
    /// TOML configuration file. Flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Staff roster size.
    #[arg(long = "staff")]
    n_staff: Option<usize>,

    /// Slot types per day.
    #[arg(long = "slots")]
    n_slots: Option<usize>,

    /// Horizon length in days.
    #[arg(long = "days")]
    n_days: Option<usize>,

    /// Maximum number of solutions to print.
    #[arg(long)]
    solution_cap: Option<usize>,

    /// Seed for randomized branching.
    #[arg(long)]
    seed: Option<u64>,

    /// Do not seed the search with the cyclic rotation.
    #[arg(long)]
    no_hint: bool,

    /// Check each printed solution against every constraint family.
    #[arg(long)]
    verify: bool,
}

impl Cli {
    fn resolve(&self) -> u_roster::Result<RosterConfig> {
        let mut config = match &self.config {
            Some(path) => RosterConfig::load(path)?,
            None => RosterConfig::default(),
        };
        if let Some(n) = self.n_staff {
            config.n_staff = n;
        }
        if let Some(n) = self.n_slots {
            config.n_slots = n;
        }
        if let Some(n) = self.n_days {
            config.n_days = n;
        }
        if let Some(cap) = self.solution_cap {
            config.solution_cap = cap;
        }
        if let Some(seed) = self.seed {
            config.solver.seed = Some(seed);
        }
        if self.no_hint {
            config.round_robin_hint = false;
        }
        if self.verify {
            config.verify = true;
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> u_roster::Result<EnumerationStatus> {
    let config = cli.resolve()?;
    let enumerator = SolutionEnumerator::new(config.enumerator())?;
    let roster = config.builder()?.build();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = enumerator.enumerate(&roster, &BacktrackingSolver::new(), &mut out)?;
    Ok(outcome.status)
}

fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("u_roster=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    ExitCode::from(exit_status(&run(&cli)))
}

/// Process status for a finished run: 0 on success, 2 when the model is
/// infeasible, 1 on error. Errors are logged here and nowhere else.
fn exit_status(result: &u_roster::Result<EnumerationStatus>) -> u8 {
    match result {
        Ok(EnumerationStatus::Infeasible) => 2,
        Ok(_) => 0,
        Err(e) => {
            error!(event = "run_failed", error = %e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use u_roster::RosterError;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("u-roster").chain(args.iter().copied()))
    }

    #[test]
    fn test_exit_status_mapping() {
        assert_eq!(exit_status(&Ok(EnumerationStatus::CapReached)), 0);
        assert_eq!(exit_status(&Ok(EnumerationStatus::Exhausted)), 0);
        assert_eq!(exit_status(&Ok(EnumerationStatus::Infeasible)), 2);
        assert_eq!(exit_status(&Err(RosterError::Config("bad".into()))), 1);
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = cli(&["--staff", "6", "--slots", "2", "--no-hint", "--seed", "9"])
            .resolve()
            .unwrap();
        assert_eq!((config.n_staff, config.n_slots, config.n_days), (6, 2, 21));
        assert!(!config.round_robin_hint);
        assert_eq!(config.solver.seed, Some(9));
    }

    #[test]
    fn test_missing_config_file_fails_run() {
        let result = run(&cli(&["--config", "/definitely/not/here.toml"]));
        assert!(matches!(result, Err(RosterError::ConfigFile(_))));
        assert_eq!(exit_status(&result), 1);
    }

    #[test]
    fn test_oversized_horizon_fails_run() {
        let result = run(&cli(&["--staff", "100000", "--slots", "100000", "--days", "100000"]));
        assert!(matches!(result, Err(RosterError::Config(_))));
    }
}
