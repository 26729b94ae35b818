//! Stop/move trajectory classification tool
//!
//! Reads trajectories from CSV files, labels every point as a stop or a move
//! with CB-SMoT, GB-SMoT or POSMIT, and reports descriptive or accuracy
//! statistics of labelled trajectories.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::FmtSubscriber;

use stopmove::stopmove::{
    ClassificationStats, PosmitParams, TrajectoryStats, cbsmot, gbsmot, posmit,
};
use stopmove::{Mode, Point, StopTrajectory, Trajectory};


#[derive(Parser)]
#[command(name = "stopmove")]
#[command(version, about = "Stop/move classification of trajectories", long_about = None)]
struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read the first two columns as latitude,longitude instead of x,y
    #[arg(long, global = true)]
    geographic: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Density/duration clustering (CB-SMoT)
    Cbsmot {
        /// Input CSV file with c0,c1,time_millis columns
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file with labelled points (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Distance budget either side of a seed
        #[arg(short, long)]
        eps: f64,

        /// Minimum stop duration in seconds
        #[arg(short = 't', long)]
        min_time: f64,
    },
    /// Grid region visits (GB-SMoT)
    Gbsmot {
        /// Input CSV file with c0,c1,time_millis columns
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file with labelled points (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Side of a square grid cell
        #[arg(short, long)]
        region_size: f64,

        /// Minimum stop duration in seconds
        #[arg(short = 't', long)]
        min_time: f64,
    },
    /// Probabilistic stop classification (POSMIT), missing parameters are estimated
    Posmit {
        /// Input CSV file with c0,c1,time_millis columns
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file with labelled points and probabilities (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Displacement a stop is still allowed to have
        #[arg(long)]
        stop_variance: Option<f64>,

        /// Index neighbours sampled either side of a point
        #[arg(long)]
        search_radius: Option<usize>,

        /// Minimum stop probability of a stop
        #[arg(long)]
        min_stop_pr: Option<f64>,
    },
    /// Print descriptive statistics of a labelled trajectory
    Stats {
        /// Input CSV file with c0,c1,time_millis,stop columns
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Compare a computed labelling against ground truth
    Evaluate {
        /// Ground truth CSV file with c0,c1,time_millis,stop columns
        #[arg(long)]
        truth: PathBuf,

        /// Computed CSV file with c0,c1,time_millis,stop columns
        #[arg(long)]
        computed: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn run(cli: Cli) -> Result<()> {
    let mode = if cli.geographic {
        Mode::Geographic
    } else {
        Mode::Cartesian
    };

    match cli.command {
        Commands::Cbsmot {
            input,
            output,
            eps,
            min_time,
        } => {
            let (traj, _) = read_trajectory(&input, mode)?;
            let stops = cbsmot::classify(&traj, eps, seconds_to_millis(min_time)?)
                .context("CB-SMoT failed")?;
            report_stops(&stops);
            write_output(output.as_deref(), &stops, None)
        }
        Commands::Gbsmot {
            input,
            output,
            region_size,
            min_time,
        } => {
            let (traj, _) = read_trajectory(&input, mode)?;
            let stops = gbsmot::classify(&traj, region_size, seconds_to_millis(min_time)?)
                .context("GB-SMoT failed")?;
            report_stops(&stops);
            write_output(output.as_deref(), &stops, None)
        }
        Commands::Posmit {
            input,
            output,
            stop_variance,
            search_radius,
            min_stop_pr,
        } => {
            let (traj, _) = read_trajectory(&input, mode)?;
            let params = PosmitParams {
                search_radius,
                stop_variance,
                min_stop_probability: min_stop_pr,
            };
            let outcome = posmit::classify(&traj, &params).context("POSMIT failed")?;
            info!(
                "POSMIT used search radius {}, stop variance {:.4}, min stop probability {:.4}",
                outcome.search_radius, outcome.stop_variance, outcome.min_stop_probability
            );
            report_stops(&outcome.stops);
            write_output(
                output.as_deref(),
                &outcome.stops,
                Some(outcome.probabilities.as_slice()),
            )
        }
        Commands::Stats { input } => {
            let stops = read_stop_trajectory(&input, mode)?;
            let stats = TrajectoryStats::compute(&stops).context("Failed to compute statistics")?;
            println!("{stats}");
            Ok(())
        }
        Commands::Evaluate { truth, computed } => {
            let stats = evaluate_files(&truth, &computed, mode)?;
            println!("{stats}");
            Ok(())
        }
    }
}

fn seconds_to_millis(seconds: f64) -> Result<i64> {
    if !seconds.is_finite() {
        bail!("Minimum stop duration must be a finite number of seconds, got {seconds}");
    }
    Ok((seconds * 1000.0).round() as i64)
}

fn report_stops(stops: &StopTrajectory) {
    info!("{} of {} points are stops", stops.n_stops(), stops.len());
}

fn evaluate_files(truth: &Path, computed: &Path, mode: Mode) -> Result<ClassificationStats> {
    let truth = read_stop_trajectory(truth, mode)?;
    let computed = read_stop_trajectory(computed, mode)?;
    stopmove::stopmove::evaluate(&truth, &computed).context("Failed to evaluate classification")
}

/// Reads a trajectory whose rows must all carry a stop label
fn read_stop_trajectory(path: &Path, mode: Mode) -> Result<StopTrajectory> {
    let (traj, labels) = read_trajectory(path, mode)?;
    let Some(labels) = labels else {
        bail!("{} has no stop column", path.display());
    };
    Ok(StopTrajectory::from_labels(traj, &labels)?)
}

/// Reads a trajectory from a CSV file
///
/// Expected format: `c0,c1,time_millis[,stop]` (header row is optional)
///
/// # Returns
///
/// A tuple `(trajectory, labels)` where `labels` is `Some` only if every
/// kept row has a stop column
fn read_trajectory(path: &Path, mode: Mode) -> Result<(Trajectory, Option<Vec<bool>>)> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    for result in reader.records() {
        records.push(result.with_context(|| format!("Failed to read {}", path.display()))?);
    }

    // a header is a first row whose first field is not a number
    let has_header = records
        .first()
        .and_then(|r| r.get(0))
        .is_some_and(|field| field.trim().parse::<f64>().is_err());
    let start_idx = if has_header { 1 } else { 0 };

    let mut points = Vec::new();
    let mut labels = Vec::new();
    for (row, record) in records.iter().enumerate().skip(start_idx) {
        match parse_row(record) {
            Some((point, label)) => {
                points.push(point);
                labels.push(label);
            }
            None => warn!("Skipping malformed row {} of {}", row + 1, path.display()),
        }
    }
    if points.is_empty() {
        bail!("No points found in {}", path.display());
    }
    debug!("Read {} points from {}", points.len(), path.display());

    let labels = if labels.iter().all(Option::is_some) {
        Some(labels.into_iter().flatten().collect())
    } else {
        if labels.iter().any(Option::is_some) {
            warn!("Some rows of {} have no stop column, ignoring labels", path.display());
        }
        None
    };
    let traj = Trajectory::new(points, mode)
        .with_context(|| format!("Invalid trajectory in {}", path.display()))?;
    Ok((traj, labels))
}

/// Parses `c0,c1,time_millis[,stop]`, `None` if a field is missing or malformed
fn parse_row(record: &csv::StringRecord) -> Option<(Point, Option<bool>)> {
    if record.len() < 3 {
        return None;
    }
    let c0 = record[0].trim().parse::<f64>().ok().filter(|c| c.is_finite())?;
    let c1 = record[1].trim().parse::<f64>().ok().filter(|c| c.is_finite())?;
    let time = record[2].trim().parse::<i64>().ok()?;
    let label = match record.get(3).map(str::trim) {
        None | Some("") => None,
        Some(field) => Some(parse_label(field)?),
    };
    Some((Point::new(c0, c1, time), label))
}

fn parse_label(field: &str) -> Option<bool> {
    match field.to_ascii_lowercase().as_str() {
        "true" | "1" | "stop" => Some(true),
        "false" | "0" | "move" => Some(false),
        _ => None,
    }
}

/// Writes labelled points to `output`, or to stdout when no file is given
fn write_output(
    output: Option<&Path>,
    stops: &StopTrajectory,
    probabilities: Option<&[f64]>,
) -> Result<()> {
    match output {
        None => write_stop_trajectory(io::stdout().lock(), stops, probabilities)
            .context("Failed to write to stdout"),
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            write_stop_trajectory(file, stops, probabilities)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Labelled points written to {}", path.display());
            Ok(())
        }
    }
}

/// Writes `c0,c1,time_millis,stop[,stop_probability]` rows with a header
fn write_stop_trajectory<W: io::Write>(
    writer: W,
    stops: &StopTrajectory,
    probabilities: Option<&[f64]>,
) -> Result<()> {
    let traj = stops.trajectory();
    let mut writer = WriterBuilder::new().from_writer(writer);

    let (c0, c1) = match traj.mode() {
        Mode::Geographic => ("lat", "lon"),
        Mode::Cartesian => ("x", "y"),
    };
    let mut header = vec![c0, c1, "time_millis", "stop"];
    if probabilities.is_some() {
        header.push("stop_probability");
    }
    writer.write_record(&header)?;

    for (i, stopped) in stops.labels().enumerate() {
        let p = traj.point(i);
        let mut record = vec![
            p.coords[0].to_string(),
            p.coords[1].to_string(),
            p.time.to_string(),
            stopped.to_string(),
        ];
        if let Some(prs) = probabilities {
            record.push(prs[i].to_string());
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
