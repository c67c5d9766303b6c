use chaincryst::engine::config::RadiusPolicy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "chaincryst CLI - Builds candidate two-chain crystal packings of polymer repeat units by exhaustive translation/rotation search.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of worker threads.
    /// Defaults to the number of available logical cores minus one.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search two-chain crystal packings for one or more polymer units.
    Build(BuildArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    // --- Core Arguments ---
    /// Polymer unit files (POSCAR format). The `.vasp` extension may be omitted.
    #[arg(short, long, required = true, num_args(1..), value_name = "PATH")]
    pub input: Vec<PathBuf>,

    /// Directory receiving one sub-directory of crystals per unit.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Search Overrides ---
    /// Number of samples per grid axis; each unit is tried at n³ placements.
    #[arg(short = 'n', long, value_name = "INT")]
    pub n_samples: Option<usize>,

    /// Planar distance between the two chains: 'auto' or a positive number in Å.
    #[arg(short, long, value_name = "auto|FLOAT")]
    pub radius: Option<RadiusPolicy>,

    /// Minimum allowed interatomic distance between the chains, in Å.
    #[arg(long, value_name = "FLOAT")]
    pub clash_threshold: Option<f64>,

    /// Vacuum added to the in-plane lattice vectors, in Å.
    #[arg(long, value_name = "FLOAT")]
    pub padding: Option<f64>,

    /// Distance below which atom pairs of an accepted crystal are reported, in Å.
    #[arg(long, value_name = "FLOAT")]
    pub contact_threshold: Option<f64>,

    // --- Output Overrides ---
    /// Extension of the written structure files.
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Write the per-unit summary table to this CSV file.
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.n-samples=12
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_command_parses_multiple_inputs_and_overrides() {
        let cli = Cli::parse_from([
            "chaincryst",
            "-vv",
            "build",
            "-i",
            "PE.vasp",
            "PVC",
            "-o",
            "crystals",
            "-n",
            "10",
            "-r",
            "auto",
            "--padding",
            "3.0",
        ]);

        assert_eq!(cli.verbose, 2);
        let Commands::Build(args) = cli.command;
        assert_eq!(
            args.input,
            vec![PathBuf::from("PE.vasp"), PathBuf::from("PVC")]
        );
        assert_eq!(args.output, PathBuf::from("crystals"));
        assert_eq!(args.n_samples, Some(10));
        assert_eq!(args.radius, Some(RadiusPolicy::Auto));
        assert_eq!(args.padding, Some(3.0));
        assert!(args.config.is_none());
    }

    #[test]
    fn fixed_radius_is_parsed_as_number() {
        let cli = Cli::parse_from(["chaincryst", "build", "-i", "PE", "-o", "out", "-r", "6.5"]);
        let Commands::Build(args) = cli.command;
        assert_eq!(args.radius, Some(RadiusPolicy::Fixed(6.5)));
    }

    #[test]
    fn invalid_radius_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["chaincryst", "build", "-i", "PE", "-o", "out", "-r", "-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result =
            Cli::try_parse_from(["chaincryst", "-q", "-v", "build", "-i", "PE", "-o", "out"]);
        assert!(result.is_err());
    }
}
