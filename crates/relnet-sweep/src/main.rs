use clap::{Args, Parser, Subcommand, ValueEnum};
use relnet_core::SolverConfig;
use relnet_design::{HybridOptions, Topology, build_base, solve_topology};
use relnet_highs::HighsSolver;
use relnet_sweep::config::NetworkConfig;
use relnet_sweep::grid::{DEFAULT_COUNT, DEFAULT_END, DEFAULT_START, equidistant};
use relnet_sweep::logging::init_logging;
use relnet_sweep::report::{DesignRecord, write_design_table, write_sweep_table};
use relnet_sweep::sweep::{DEFAULT_NODE_COUNTS, SweepPlan, SweepSeries, run_sweep};
use std::fs::{File, create_dir_all};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Minimum-cost reliable network design with HiGHS"
)]
struct Cli {
    /// Tracing filter (overrides RELNET_TRACE), for example `info` or `relnet_design=debug`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Minimized cost over a grid of reliability targets
    Sweep(SweepArgs),
    /// Solve and print a single design
    Solve(SolveArgs),
}

#[derive(Args, Debug)]
struct NetworkArgs {
    /// Built-in cost scenario
    #[arg(long, default_value = "evaluation-2025", conflicts_with = "config")]
    preset: String,

    /// JSON file with cost_by_node_type, reliability_by_node_type and link_cost
    #[arg(long)]
    config: Option<PathBuf>,
}

impl NetworkArgs {
    fn load(&self) -> Result<NetworkConfig, Box<dyn std::error::Error>> {
        Ok(match &self.config {
            Some(path) => NetworkConfig::load(path)?,
            None => NetworkConfig::preset(&self.preset)?,
        })
    }
}

#[derive(Args, Debug)]
struct SolverArgs {
    /// Time limit per solve in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Relative MIP gap
    #[arg(long)]
    mip_gap: Option<f64>,

    /// Solver threads per solve
    #[arg(long)]
    threads: Option<u32>,

    /// Print HiGHS output
    #[arg(long)]
    solver_log: bool,

    /// Fewest nodes on the hybrid series backbone
    #[arg(long, default_value_t = 1)]
    min_series_nodes: usize,
}

impl SolverArgs {
    fn solver_config(&self) -> SolverConfig {
        let mut config = SolverConfig::new().with_log_to_console(self.solver_log);
        if let Some(seconds) = self.time_limit {
            config = config.with_time_limit(seconds);
        }
        if let Some(gap) = self.mip_gap {
            config = config.with_mip_gap(gap);
        }
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        config
    }

    fn hybrid_options(&self) -> HybridOptions {
        HybridOptions::default().with_min_series_nodes(self.min_series_nodes)
    }
}

#[derive(Parser, Debug)]
struct SweepArgs {
    #[command(flatten)]
    network: NetworkArgs,

    #[command(flatten)]
    solver: SolverArgs,

    /// Comma-separated node counts
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_NODE_COUNTS)]
    nodes: Vec<usize>,

    /// Topologies to solve
    #[arg(long = "topology", value_enum, value_delimiter = ',')]
    topologies: Option<Vec<TopologyArg>>,

    /// Number of targets strictly between --start and --end
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    targets: usize,

    #[arg(long, default_value_t = DEFAULT_START)]
    start: f64,

    #[arg(long, default_value_t = DEFAULT_END)]
    end: f64,

    /// JSONL artifact with one line per series
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct SolveArgs {
    #[command(flatten)]
    network: NetworkArgs,

    #[command(flatten)]
    solver: SolverArgs,

    /// Total nodes of the network
    #[arg(long)]
    nodes: usize,

    /// Required reliability in (0, 1)
    #[arg(long)]
    target: f64,

    #[arg(long, value_enum, default_value = "hybrid")]
    topology: TopologyArg,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Ndjson,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum TopologyArg {
    Series,
    Parallel,
    Hybrid,
}

impl From<TopologyArg> for Topology {
    fn from(arg: TopologyArg) -> Self {
        match arg {
            TopologyArg::Series => Topology::Series,
            TopologyArg::Parallel => Topology::Parallel,
            TopologyArg::Hybrid => Topology::Hybrid,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;
    match cli.command {
        Command::Sweep(args) => sweep_command(args),
        Command::Solve(args) => solve_command(args),
    }
}

fn sweep_command(args: SweepArgs) -> Result<(), Box<dyn std::error::Error>> {
    let network = args.network.load()?;
    let catalog = network.catalog()?;
    let targets = equidistant(args.start, args.end, args.targets)?;

    let mut plan = SweepPlan::new(args.nodes.clone(), targets)
        .with_options(args.solver.hybrid_options())
        .with_solver_config(args.solver.solver_config());
    if let Some(topologies) = &args.topologies {
        plan = plan.with_topologies(topologies.iter().copied().map(Topology::from).collect());
    }

    let series = run_sweep(&plan, &catalog, network.link_cost)?;

    if let Some(path) = &args.output {
        write_series_jsonl(path, &series)?;
    }
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Table => write_sweep_table(&mut out, &series)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&series)?)?,
        OutputFormat::Ndjson => {
            for entry in &series {
                writeln!(out, "{}", serde_json::to_string(entry)?)?;
            }
        }
    }
    if let Some(path) = &args.output {
        writeln!(out, "artifact: {}", path.display())?;
    }
    Ok(())
}

fn solve_command(args: SolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let network = args.network.load()?;
    let catalog = network.catalog()?;
    let base = build_base(args.nodes, &catalog)?;
    let mut solver = HighsSolver::with_config(args.solver.solver_config());
    let report = solve_topology(
        args.topology.into(),
        &base,
        &catalog,
        network.link_cost,
        args.target,
        &args.solver.hybrid_options(),
        &mut solver,
    )?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let record = DesignRecord::new(&report.outcome, report.status);
    match args.format {
        OutputFormat::Table => write_design_table(&mut out, &report.outcome)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?,
        OutputFormat::Ndjson => writeln!(out, "{}", serde_json::to_string(&record)?)?,
    }
    Ok(())
}

fn write_series_jsonl(
    path: &Path,
    series: &[SweepSeries],
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for entry in series {
        serde_json::to_writer(&mut writer, entry)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
