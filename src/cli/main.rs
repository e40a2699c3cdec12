#![warn(clippy::all, clippy::pedantic)]
use std::error::Error;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use csv::Writer;
use log::LevelFilter;
use logiflow::{
    Attribution, EdmondsKarp, FlowReport, Network, NodeRecord, PushRelabel, SimpleRoute,
    SolveOptions,
};
use serde::Serialize;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

type Amount = i64;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Algo {
    EdmondsKarp,
    PushRelabel,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Split {
    /// Sum over warehouses of the smaller of the two route flows
    Heuristic,
    /// Decompose the flow into source-to-sink paths
    Exact,
}

impl From<Split> for Attribution {
    fn from(s: Split) -> Self {
        match s {
            Split::Heuristic => Attribution::Heuristic,
            Split::Exact => Attribution::Exact,
        }
    }
}

/// Maximum flow through a terminal -> warehouse -> shop logistics network
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file declaring the nodes (columns: label,tier)
    #[arg(short, long)]
    nodes: PathBuf,

    /// CSV file listing the routes (columns: from,to,capacity; `inf` for unbounded)
    #[arg(short, long)]
    routes: PathBuf,

    /// Max flow algorithm
    #[arg(short, long, value_enum, default_value_t = Algo::EdmondsKarp)]
    algo: Algo,

    /// How flow is attributed to terminal/shop pairs
    #[arg(long, value_enum, default_value_t = Split::Heuristic)]
    attribution: Split,

    /// Output CSV for the terminal/shop flow table (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output CSV for the per-route flow assignments
    #[arg(long)]
    assignments: Option<PathBuf>,

    /// Verify capacity respect and flow conservation of the result
    #[arg(long)]
    check: bool,

    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct PairFlowRow<'a> {
    terminal: &'a str,
    shop: &'a str,
    flow: Amount,
}

// Function to read a CSV file of serde records
fn read_csv<T>(filepath: &Path) -> Result<Vec<T>, Box<dyn Error>>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(filepath)?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let rows: Result<Vec<T>, _> = rdr.deserialize().collect();
    Ok(rows?)
}

fn write_pair_flows<W: io::Write>(
    report: &FlowReport<String, Amount>,
    mut wtr: Writer<W>,
) -> Result<(), Box<dyn Error>> {
    for ((terminal, shop), flow) in &report.pair_flows {
        wtr.serialize(PairFlowRow {
            terminal,
            shop,
            flow: *flow,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_assignments(
    report: &FlowReport<String, Amount>,
    filepath: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_path(filepath)?;
    for assignment in &report.assignments {
        wtr.serialize(assignment)?;
    }
    wtr.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let nodes: Vec<NodeRecord<String>> = read_csv(&cli.nodes)?;
    let routes: Vec<SimpleRoute<String, Amount>> = read_csv(&cli.routes)?;
    log::debug!("read {} nodes and {} routes", nodes.len(), routes.len());

    let network = Network::from_records(nodes, routes)?;
    let options = SolveOptions {
        attribution: cli.attribution.into(),
        check: cli.check,
    };
    let report = match cli.algo {
        Algo::EdmondsKarp => network.solve(&mut EdmondsKarp::new(), options)?,
        Algo::PushRelabel => network.solve(&mut PushRelabel, options)?,
    };

    log::info!("max flow: {}", report.max_flow);
    for (from, to) in &report.bottlenecks {
        log::info!("bottleneck route {from} -> {to}");
    }

    match &cli.output {
        Some(path) => write_pair_flows(&report, Writer::from_path(path)?)?,
        None => write_pair_flows(&report, Writer::from_writer(io::stdout()))?,
    }
    if let Some(path) = &cli.assignments {
        write_assignments(&report, path)?;
    }

    Ok(())
}
