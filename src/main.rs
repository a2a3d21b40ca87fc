use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use u_gantt::config::EngineConfig;
use u_gantt::metrics::MetricField;
use u_gantt::models::RunConfig;
use u_gantt::stream::{
    ControlAction, Connector, ControllerState, ReplayConnector, StreamController, WsConnector,
};

#[derive(Parser)]
#[command(name = "u-gantt", version, about = "Live Gantt view of a simulation event stream")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (RUST_LOG overrides)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect to a live simulation feed
    Watch {
        /// Feed URL, e.g. ws://127.0.0.1:8000/ws/simulation-scheduling
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Replay a recorded feed, one JSON message per line
    Replay {
        file: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Scheduling algorithm (FIFO, SJF, SRT, RR, PS)
    #[arg(long, global = true)]
    algorithm: Option<String>,

    /// Round Robin quantum
    #[arg(long, global = true)]
    quantum: Option<u32>,

    /// Preemptive priority scheduling
    #[arg(long, global = true)]
    preemptive: bool,

    /// Synchronization mechanism (mutex, semaphore)
    #[arg(long, global = true)]
    mechanism: Option<String>,

    /// Sort metrics by column (pid, arrival, burst, priority, start, end, waiting)
    #[arg(long, global = true)]
    sort: Option<String>,

    /// Sort grid rows by numeric id suffix
    #[arg(long, global = true)]
    numeric_rows: bool,

    /// Visible grid columns
    #[arg(long, global = true)]
    columns: Option<usize>,

    /// Write a PNG capture at the end of the run
    #[arg(long, global = true)]
    export: Option<PathBuf>,
}

fn init_logging(level: &str) -> Result<()> {
    let level: tracing::Level = level.parse().context("Invalid log level")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

fn parse_field(name: &str) -> Result<MetricField> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "pid" => MetricField::ProcessId,
        "arrival" => MetricField::ArrivalTime,
        "burst" => MetricField::BurstTime,
        "priority" => MetricField::Priority,
        "start" => MetricField::StartTime,
        "end" => MetricField::EndTime,
        "waiting" => MetricField::WaitingTime,
        other => anyhow::bail!("unknown metrics column '{other}'"),
    })
}

fn apply_overrides(config: &mut EngineConfig, args: &RunArgs) {
    if let Some(algorithm) = &args.algorithm {
        config.run = RunConfig::new(algorithm.to_uppercase());
    }
    if let Some(quantum) = args.quantum {
        config.run = config.run.clone().with_quantum(quantum.to_string());
    }
    if args.preemptive {
        config.run = config.run.clone().with_preemptive(true);
    }
    if let Some(mechanism) = &args.mechanism {
        config.run = config.run.clone().with_mechanism(mechanism.clone());
    }
    if args.numeric_rows {
        config.numeric_rows = true;
    }
    if let Some(columns) = args.columns {
        config.viewport_columns = Some(columns);
    }
    if let Some(path) = &args.export {
        config.export_path = Some(path.clone());
    }
}

async fn drive<C: Connector>(connector: C, config: &EngineConfig, sort: Option<MetricField>) -> Result<()> {
    let mut controller = StreamController::new(connector, config.run.clone()).with_view(config.view());
    controller.connect().await.context("Failed to connect to feed")?;

    let (tx, mut rx) = mpsc::channel(4);
    if let Some(field) = sort {
        tx.send(ControlAction::SortMetrics(field)).await?;
    }
    drop(tx);

    let state = controller.run(&mut rx).await;
    let session = controller.session();

    println!("{}", session.visible());
    for line in session.status_lines() {
        println!("{line}");
    }
    println!();
    println!("{}", session.metrics_table());
    if let Some(report) = session.report() {
        println!(
            "Average turnaround: {:.2} | Average response: {:.2} | Processes: {}",
            report.avg_turnaround, report.avg_response, report.process_count
        );
        if report.matches_reported() == Some(false) {
            warn!(
                reported = ?report.reported_avg_waiting,
                local = report.avg_waiting,
                "backend waiting average differs"
            );
        }
    }
    for notification in &session.notifications {
        eprintln!("{notification}");
    }
    if session.dropped > 0 {
        eprintln!("{} undecodable message(s) dropped", session.dropped);
    }

    if let Some(path) = &config.export_path {
        export(&mut controller, path).await?;
    }

    if state != ControllerState::Finished {
        anyhow::bail!("feed ended before the run finished");
    }
    Ok(())
}

async fn export<C: Connector>(controller: &mut StreamController<C>, path: &Path) -> Result<()> {
    controller
        .apply_control(ControlAction::Export(path.to_path_buf()))
        .await
        .with_context(|| format!("Failed to export {}", path.display()))?;
    info!("capture written to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = EngineConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    apply_overrides(&mut config, &cli.run);
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    init_logging(&config.log_level)?;

    let sort = cli.run.sort.as_deref().map(parse_field).transpose()?;

    match cli.command {
        Command::Watch { endpoint } => {
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            let connector = WsConnector::new(&config.endpoint)?;
            drive(connector, &config, sort).await
        }
        Command::Replay { file } => {
            let connector = ReplayConnector::from_file(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            drive(connector, &config, sort).await
        }
    }
}
