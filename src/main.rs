use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use lift_tracker_rs::export::write_trace_csv;
use lift_tracker_rs::pipeline::{analyze, preview};
use lift_tracker_rs::{read_recording, AnalysisConfig, BoundaryPolicy, LiftParameters};

#[derive(Parser, Debug)]
#[command(name = "lift_tracker")]
#[command(about = "Barbell velocity and power from a motion recording", long_about = None)]
struct Args {
    /// Recording with acceleration and orientation sections (.csv or .csv.gz)
    #[arg(value_name = "RECORDING")]
    recording: PathBuf,

    /// Start of the lift window in seconds (velocity is zero here)
    #[arg(long)]
    start: Option<f64>,

    /// End of the lift window in seconds
    #[arg(long)]
    end: Option<f64>,

    /// Barbell weight in kg
    #[arg(long)]
    weight: Option<f64>,

    /// JSON analysis config; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Acceleration used where smoothing is undefined (corrected, hold)
    #[arg(long)]
    boundary: Option<BoundaryPolicy>,

    /// Write the per-sample trace as CSV
    #[arg(long)]
    trace_out: Option<PathBuf>,

    /// Print the summary and stage report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn prompt_f64(message: &str) -> Result<f64> {
    print!("{message}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    line.trim()
        .parse()
        .with_context(|| format!("'{}' is not a number", line.trim()))
}

fn load_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    config.start_time = args.start.or(config.start_time);
    config.end_time = args.end.or(config.end_time);
    config.barbell_weight_kg = args.weight.or(config.barbell_weight_kg);
    if let Some(policy) = args.boundary {
        config.boundary_policy = policy;
    }
    if args.trace_out.is_some() {
        config.trace_output = args.trace_out.clone();
    }
    Ok(config)
}

fn lift_parameters(config: &AnalysisConfig) -> Result<LiftParameters> {
    let start_time = match config.start_time {
        Some(value) => value,
        None => prompt_f64("Enter the start time (in seconds) for velocity and power calculation")?,
    };
    let end_time = match config.end_time {
        Some(value) => value,
        None => prompt_f64("Enter the end time (in seconds) for velocity and power calculation")?,
    };
    let mass_kg = match config.barbell_weight_kg {
        Some(value) => value,
        None => prompt_f64("Enter the weight of the barbell (in kg)")?,
    };
    Ok(LiftParameters::new(start_time, end_time, mass_kg))
}

fn format_stat(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3} {unit}"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = load_config(&args)?;

    let recording = read_recording(&args.recording)
        .with_context(|| format!("Failed to load recording {}", args.recording.display()))?;

    let preview = preview(&recording).context("Orientation correction failed")?;
    if let Some((first, last)) = preview.time_span() {
        log::info!("Corrected trace spans {:.3}s to {:.3}s", first, last);
    }

    let params = lift_parameters(&config)?;
    params.validate().context("Invalid lift parameters")?;

    let output = analyze(preview, &params, config.boundary_policy)
        .context("Velocity and power calculation failed")?;

    if args.json {
        println!("{}", output.summary_json()?);
    } else {
        let summary = &output.summary;
        println!("Peak velocity: {}", format_stat(summary.peak_velocity, "m/s"));
        println!("Mean velocity: {}", format_stat(summary.mean_velocity, "m/s"));
        println!("Peak power: {}", format_stat(summary.peak_power, "W"));
        println!("Mean power: {}", format_stat(summary.mean_power, "W"));
    }

    if let Some(path) = &config.trace_output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create trace file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_trace_csv(&mut writer, &output.samples)?;
        writer.flush()?;
        log::info!("Wrote {} samples to {}", output.samples.len(), path.display());
    }

    Ok(())
}
