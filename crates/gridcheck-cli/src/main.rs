//! gridcheck CLI - runs the planner harness over the registered scenarios.
//!
//! - `gridcheck [REPEATS]` / `gridcheck run` - run every scenario and print timings
//! - `gridcheck list` - show registered scenarios and whether their files exist
//! - `gridcheck init` - write a default `gridcheck.yaml`
//! - `gridcheck events` - show the tail of the harness event log

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use gridcheck_core::config::CONFIG_FILE_NAME;
use gridcheck_core::observability::EventLog;
use gridcheck_core::{render_report, HarnessConfig, Runner, ScenarioRegistry};
use gridcheck_map::{AStarPlanner, OccupancyGrid, PlannerParams};

#[derive(Parser)]
#[command(name = "gridcheck")]
#[command(about = "Verification oracle and timing harness for grid motion planners", version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Harness config file (defaults to ./gridcheck.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding map and case files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scenarios (default)
    Run(RunArgs),

    /// List registered scenarios
    List,

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Show recent harness events
    Events {
        /// Event log to read (defaults to `events_path` from the config)
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Only events of this scenario
        #[arg(long, value_name = "NAME")]
        scenario: Option<String>,

        /// Number of events to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct RunArgs {
    /// Planner calls per case; absent or non-positive means 1
    #[arg(value_name = "REPEATS", allow_negative_numbers = true)]
    repeats: Option<i64>,

    /// Only run the named scenario (repeatable)
    #[arg(long = "only", value_name = "NAME")]
    only: Vec<String>,

    /// Robot radius in meters used for the clearance check and the planner
    #[arg(long, value_name = "M")]
    radius: Option<f64>,

    /// Print the run report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Append harness events to this JSONL file
    #[arg(long, value_name = "FILE")]
    events: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = std::env::current_dir().context("Failed to get current directory")?;

    match cli.command {
        Some(Commands::Run(args)) => run(&root, cli.config.as_deref(), cli.data_dir, args),
        Some(Commands::List) => list(&root, cli.config.as_deref(), cli.data_dir),
        Some(Commands::Init { force }) => init(&root, cli.config.as_deref(), force),
        Some(Commands::Events {
            file,
            scenario,
            limit,
        }) => show_events(&root, cli.config.as_deref(), file, scenario.as_deref(), limit),
        None => run(&root, cli.config.as_deref(), cli.data_dir, cli.run),
    }
}

fn load_config(root: &Path, config: Option<&Path>, data_dir: Option<PathBuf>) -> Result<HarnessConfig> {
    let mut config = match config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::load_or_default(&root.join(CONFIG_FILE_NAME))?,
    };
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    config.resolve_paths(root);
    Ok(config)
}

fn run(root: &Path, config: Option<&Path>, data_dir: Option<PathBuf>, args: RunArgs) -> Result<()> {
    let mut config = load_config(root, config, data_dir)?;
    config.set_repeats_from_arg(args.repeats);
    if let Some(radius) = args.radius {
        anyhow::ensure!(
            radius.is_finite() && radius >= 0.0,
            "--radius must be a non-negative number, got {radius}"
        );
        config.robot_radius = radius;
    }
    if let Some(events) = args.events {
        config.events_path = Some(root.join(events));
    }

    let mut registry = ScenarioRegistry::from_config(&config);
    for name in registry.retain_named(&args.only) {
        tracing::warn!(scenario = %name, "No scenario with this name");
    }
    if registry.is_empty() {
        tracing::warn!("No scenarios selected; see `gridcheck list`");
    }

    eprintln!(
        "Running gridcheck with {} repeats for each planning problem.",
        config.repeats
    );
    if args.repeats.is_none() {
        eprintln!("To change this value, pass the repeat count as the first argument: gridcheck 5");
    }

    let params = PlannerParams {
        robot_radius: config.robot_radius,
    };
    let factory = move |grid: &OccupancyGrid| AStarPlanner::new(grid.clone(), params);

    let runner = Runner::from_config(&config);
    let report = runner.run_all(&registry, &factory).map_err(|err| {
        let hint = if err.is_resource_missing() {
            format!("Harness run aborted; check data_dir {}", config.data_dir.display())
        } else {
            "Harness run aborted".to_string()
        };
        anyhow::Error::new(err).context(hint)
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}

fn list(root: &Path, config: Option<&Path>, data_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config(root, config, data_dir)?;
    let registry = ScenarioRegistry::from_config(&config);

    println!("Scenarios ({}), data: {}", registry.len(), config.data_dir.display());
    for scenario in registry.iter() {
        let status = if scenario.resources_exist() { "ok" } else { "missing" };
        println!(
            "  {:<24} {:<8} {} + {}",
            scenario.name,
            status,
            scenario.map_path.display(),
            scenario.cases_path.display()
        );
    }

    Ok(())
}

fn init(root: &Path, config: Option<&Path>, force: bool) -> Result<()> {
    let config_path = match config {
        Some(path) => root.join(path),
        None => root.join(CONFIG_FILE_NAME),
    };

    if config_path.exists() && !force {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    std::fs::write(&config_path, HarnessConfig::default_yaml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Wrote {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Put map and case files under the configured data_dir");
    println!("  2. Run: gridcheck 5");

    Ok(())
}

fn show_events(
    root: &Path,
    config: Option<&Path>,
    file: Option<PathBuf>,
    scenario: Option<&str>,
    limit: usize,
) -> Result<()> {
    let path = match file {
        Some(file) => root.join(file),
        None => load_config(root, config, None)?
            .events_path
            .context("No event log configured; pass --file or set events_path")?,
    };

    let log = EventLog::new(&path);
    let events = log.tail(limit, scenario)?;

    println!("Events in {} ({} shown)", log.path().display(), events.len());
    for event in &events {
        println!(
            "  {} [{}] {}",
            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
            event.event_type,
            event.message
        );
    }

    Ok(())
}
