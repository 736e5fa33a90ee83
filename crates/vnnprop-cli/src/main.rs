//! vnnprop CLI
//!
//! Generates VNNLIB local robustness properties for image classifiers.
//!
//! # Commands
//!
//! - `vnnprop plain` - Perturbation box around one sample
//! - `vnnprop join` - Hull of a prior region and the perturbation box
//! - `vnnprop meet` - Overlap of a prior region and the perturbation box
//! - `vnnprop export` - One property covering a batch of samples

mod input;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vnnprop_core::{validate_sample, Bound, PriorBounds, RegionMode, RegionSummary};
use vnnprop_emit::{emit, PropertyWriter, RobustnessQuery, WrittenProperty};

#[derive(Parser)]
#[command(name = "vnnprop")]
#[command(about = "Generate VNNLIB robustness properties for neural network verifiers")]
#[command(version)]
struct Cli {
    /// Directory receiving generated .vnnlib files
    #[arg(
        long,
        global = true,
        default_value = "benchmarks/vnnlib",
        env = "VNNPROP_OUT_DIR"
    )]
    out_dir: PathBuf,

    /// Number of classifier outputs
    #[arg(long, global = true, default_value = "10", env = "VNNPROP_NUM_CLASSES")]
    num_classes: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print a JSON summary instead of the written path
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Perturbation box around one sample
    Plain {
        #[command(flatten)]
        sample: SampleArgs,
    },
    /// Hull of a prior region and the sample's perturbation box
    Join {
        #[command(flatten)]
        sample: SampleArgs,
        /// Prior bounds JSON: [[low, high], ...]
        #[arg(long)]
        prior: PathBuf,
    },
    /// Overlap of a prior region and the sample's perturbation box
    Meet {
        #[command(flatten)]
        sample: SampleArgs,
        /// Prior bounds JSON: [[low, high], ...]
        #[arg(long)]
        prior: PathBuf,
    },
    /// One property covering a batch of samples
    Export {
        /// Ground-truth class shared by the batch
        #[arg(short, long)]
        label: usize,
        /// L-infinity perturbation budget
        #[arg(short, long)]
        epsilon: f64,
        /// Samples JSON; the region is the hull of their perturbation boxes
        #[arg(long, conflicts_with_all = ["lower", "upper"])]
        samples: Option<PathBuf>,
        /// Lower bounds JSON: [low, ...]
        #[arg(long, requires = "upper")]
        lower: Option<PathBuf>,
        /// Upper bounds JSON: [high, ...]
        #[arg(long, requires = "lower")]
        upper: Option<PathBuf>,
        /// Number of samples the explicit bounds cover (used in the file name)
        #[arg(long, default_value = "1")]
        num_samples: usize,
    },
}

#[derive(Args, Debug, Clone)]
struct SampleArgs {
    /// Sample JSON: [x0, x1, ...] or {"pixels": [...], "label": n, "id": n}
    #[arg(short, long)]
    sample: PathBuf,
    /// Sample identifier used in the file name (defaults to the file's "id", then 0)
    #[arg(long)]
    sample_id: Option<usize>,
    /// Ground-truth class (defaults to the file's "label")
    #[arg(short, long)]
    label: Option<usize>,
    /// L-infinity perturbation budget
    #[arg(short, long)]
    epsilon: f64,
    /// Reject samples with values outside [0, 1] instead of writing them as computed
    #[arg(long)]
    strict_range: bool,
    /// Write the property to stdout instead of the output directory
    #[arg(long)]
    stdout: bool,
}

/// Outcome of one command, printed on success.
enum Outcome {
    Written(WrittenProperty),
    Streamed(RegionSummary),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(outcome) => {
            if let Err(e) = report(&outcome, cli.json) {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<Outcome> {
    match &cli.command {
        Commands::Plain { sample } => run_sample(cli, RegionMode::Plain, sample, None),
        Commands::Join { sample, prior } => {
            run_sample(cli, RegionMode::Join, sample, Some(prior.as_path()))
        }
        Commands::Meet { sample, prior } => {
            run_sample(cli, RegionMode::Meet, sample, Some(prior.as_path()))
        }
        Commands::Export {
            label,
            epsilon,
            samples,
            lower,
            upper,
            num_samples,
        } => {
            let writer = output_writer(&cli.out_dir);
            let written = match (samples, lower, upper) {
                (Some(samples), _, _) => {
                    let samples = input::read_samples(samples)?;
                    info!(count = samples.len(), "Loaded batch samples");
                    writer.write_hull(&samples, cli.num_classes, *label, *epsilon)?
                }
                (None, Some(lower), Some(upper)) => {
                    let lower = input::read_values(lower)?;
                    let upper = input::read_values(upper)?;
                    writer.write_export(
                        &lower,
                        &upper,
                        *num_samples,
                        cli.num_classes,
                        *label,
                        *epsilon,
                    )?
                }
                _ => bail!("export needs either --samples or both --lower and --upper"),
            };
            Ok(Outcome::Written(written))
        }
    }
}

fn run_sample(
    cli: &Cli,
    mode: RegionMode,
    args: &SampleArgs,
    prior_path: Option<&Path>,
) -> anyhow::Result<Outcome> {
    let sample = input::read_sample(&args.sample)?;
    let true_label = args
        .label
        .or_else(|| sample.label())
        .context("No label given: pass --label or add \"label\" to the sample file")?;
    let sample_id = args.sample_id.or_else(|| sample.id()).unwrap_or(0);
    debug!(
        dims = sample.pixels().len(),
        sample_id,
        true_label,
        mode = %mode,
        "Loaded sample"
    );

    if args.strict_range {
        validate_sample(sample.pixels(), &Bound::UNIT)?;
    }

    let priors = prior_path.map(input::read_prior).transpose()?;
    let priors = priors.as_ref().map(|p| p as &dyn PriorBounds);

    let query = RobustnessQuery {
        sample: sample.pixels(),
        epsilon: args.epsilon,
        num_classes: cli.num_classes,
        true_label,
    };

    if args.stdout {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let summary = emit(&mut out, mode, &query, priors)?;
        out.flush()?;
        return Ok(Outcome::Streamed(summary));
    }

    let writer = output_writer(&cli.out_dir);
    let written = writer.write_sample(mode, sample_id, &query, priors)?;
    Ok(Outcome::Written(written))
}

/// The output directory is created only once a property has validated.
fn output_writer(out_dir: &Path) -> PropertyWriter {
    PropertyWriter::new(out_dir).create_missing_dir(true)
}

fn warn_empty(summary: &RegionSummary) {
    if summary.empty > 0 {
        eprintln!(
            "Warning: {} dimension(s) have lower > upper (sample values outside [0, 1]?)",
            summary.empty
        );
    }
}

fn report(outcome: &Outcome, json: bool) -> anyhow::Result<()> {
    match outcome {
        Outcome::Written(written) => {
            if json {
                println!("{}", serde_json::to_string_pretty(written)?);
            } else {
                println!("{}", written.path.display());
            }
            warn_empty(&written.summary);
        }
        Outcome::Streamed(summary) => {
            if json {
                eprintln!("{}", serde_json::to_string(summary)?);
            }
            warn_empty(summary);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
