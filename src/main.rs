//! @ai:module:intent CLI for telemetry analysis and configuration comparison
//! @ai:module:layer presentation

use anyhow::Result;
use clap::{Parser, Subcommand};
use rtcperf::{
    config::AnalyzerConfig,
    metrics::{compare_configurations, MetricAggregator, MetricAggregatorTrait},
    report::{ReportGenerator, TextReporter},
    session::{load_comparison, SessionLoader, SessionLoaderTrait, SessionSource},
};
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "rtcperf.toml";

#[derive(Parser)]
#[command(name = "rtcperf")]
#[command(about = "Aggregate WebRTC telemetry sessions and compare configurations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print statistics and plot time series for a single session file
    Analyze {
        /// Path to the session JSON file
        file: PathBuf,

        /// Output directory for plots
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip chart rendering
        #[arg(long)]
        no_charts: bool,
    },

    /// Compare baseline sessions against treatment sessions
    Compare {
        /// Directory containing session files
        dir: Option<PathBuf>,

        /// File name pattern for baseline sessions
        #[arg(long)]
        baseline: Option<String>,

        /// File name pattern for treatment sessions
        #[arg(long)]
        treatment: Option<String>,

        /// Baseline session file, used instead of the baseline pattern (repeatable)
        #[arg(long = "baseline-file")]
        baseline_files: Vec<PathBuf>,

        /// Treatment session file, used instead of the treatment pattern (repeatable)
        #[arg(long = "treatment-file")]
        treatment_files: Vec<PathBuf>,

        /// Display name for the baseline configuration
        #[arg(long)]
        baseline_label: Option<String>,

        /// Display name for the treatment configuration
        #[arg(long)]
        treatment_label: Option<String>,

        /// Search subdirectories as well
        #[arg(short, long)]
        recursive: bool,

        /// Output directory for reports
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip chart rendering
        #[arg(long)]
        no_charts: bool,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rtcperf=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            file,
            output,
            config,
            no_charts,
        } => analyze_session(file, output, config, no_charts),
        Commands::Compare {
            dir,
            baseline,
            treatment,
            baseline_files,
            treatment_files,
            baseline_label,
            treatment_label,
            recursive,
            output,
            config,
            no_charts,
        } => compare_sessions(CompareArgs {
            dir,
            baseline,
            treatment,
            baseline_files,
            treatment_files,
            baseline_label,
            treatment_label,
            recursive,
            output,
            config,
            no_charts,
        }),
        Commands::Init { output } => init_config(output),
    }
}

struct CompareArgs {
    dir: Option<PathBuf>,
    baseline: Option<String>,
    treatment: Option<String>,
    baseline_files: Vec<PathBuf>,
    treatment_files: Vec<PathBuf>,
    baseline_label: Option<String>,
    treatment_label: Option<String>,
    recursive: bool,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    no_charts: bool,
}

/// @ai:intent Summarize and plot one session file
/// @ai:effects fs:read, fs:write, io
fn analyze_session(
    file: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    no_charts: bool,
) -> Result<()> {
    let mut config = load_or_default_config(config_path)?;

    if no_charts {
        config.charts.enabled = false;
    }

    let loader = SessionLoader::new();
    let session = loader.load_file(&file)?;

    tracing::info!("Loaded session {} from {}", session.session_id, file.display());

    println!("{}", TextReporter::session_summary(&session));

    let output_dir = output.unwrap_or(config.paths.plots_dir);
    let generated = ReportGenerator::from_config(&config.charts).generate_session(&session, &output_dir)?;

    if !generated.is_empty() {
        println!("Plots saved to {}/", output_dir.display());
    }

    Ok(())
}

/// @ai:intent Aggregate both configurations, print the comparison and write reports
/// @ai:effects fs:read, fs:write, io
fn compare_sessions(args: CompareArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config.clone())?;
    apply_overrides(&mut config, &args);

    let loader = if config.patterns.recursive {
        SessionLoader::recursive()
    } else {
        SessionLoader::new()
    };

    let baseline_source = session_source(&config, &config.patterns.baseline, &args.baseline_files)?;
    let treatment_source =
        session_source(&config, &config.patterns.treatment, &args.treatment_files)?;

    let (baseline_sessions, treatment_sessions) =
        load_comparison(&loader, &baseline_source, &treatment_source)?;

    let aggregator = MetricAggregator::new();
    let baseline = aggregator.aggregate_configuration(&config.labels.baseline, &baseline_sessions);
    let treatment = aggregator.aggregate_configuration(&config.labels.treatment, &treatment_sessions);

    let report = compare_configurations(&baseline, &treatment);

    println!("{}", TextReporter::configuration_summary(&report.baseline));
    println!("{}", TextReporter::configuration_summary(&report.treatment));
    println!("{}", TextReporter::comparison_table(&report));

    let reporter = ReportGenerator::from_config(&config.charts);
    reporter.generate_comparison(&report, &config.paths.output_dir)?;

    println!("Reports written to {}", config.paths.output_dir.display());
    Ok(())
}

/// @ai:intent Fold command-line flags over the loaded configuration
/// @ai:effects pure
fn apply_overrides(config: &mut AnalyzerConfig, args: &CompareArgs) {
    if let Some(dir) = &args.dir {
        config.paths.data_dir = dir.clone();
    }

    if let Some(output) = &args.output {
        config.paths.output_dir = output.clone();
    }

    if let Some(pattern) = &args.baseline {
        config.patterns.baseline = pattern.clone();
    }

    if let Some(pattern) = &args.treatment {
        config.patterns.treatment = pattern.clone();
    }

    if let Some(label) = &args.baseline_label {
        config.labels.baseline = label.clone();
    }

    if let Some(label) = &args.treatment_label {
        config.labels.treatment = label.clone();
    }

    config.patterns.recursive |= args.recursive;

    if args.no_charts {
        config.charts.enabled = false;
    }
}

/// @ai:intent Explicit files when given, otherwise the pattern inside the data directory
/// @ai:effects pure
fn session_source(
    config: &AnalyzerConfig,
    pattern: &str,
    files: &[PathBuf],
) -> Result<SessionSource> {
    if files.is_empty() {
        Ok(SessionSource::pattern(&config.paths.data_dir, pattern)?)
    } else {
        Ok(SessionSource::files(files.iter().cloned()))
    }
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = AnalyzerConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<AnalyzerConfig> {
    match path {
        Some(p) => AnalyzerConfig::load(&p),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);

            if default_path.exists() {
                AnalyzerConfig::load(&default_path)
            } else {
                Ok(AnalyzerConfig::default())
            }
        }
    }
}
