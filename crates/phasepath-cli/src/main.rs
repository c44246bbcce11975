//! phasepath CLI - shortest paths on graphs with periodic edge costs.
//!
//! # Usage
//!
//! ```bash
//! # Answer "source destination" lines from stdin, one path per line
//! phasepath query graph.txt < queries.txt
//!
//! # Same, as JSON lines, solving sources in parallel
//! phasepath query graph.txt --queries queries.txt --format json --parallel
//!
//! # Single query with cost
//! phasepath path graph.txt --from 0 --to 2
//!
//! # Graph statistics
//! phasepath stats graph.txt
//!
//! # Convert between text and JSON
//! phasepath convert graph.txt -o graph.json --format json
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use indicatif::ProgressBar;
use log::{info, warn};
use phasepath_core::config::DEFAULT_MAX_STATES;
use phasepath_core::formats::{parse_query_line, JsonGraph, PeriodicText};
use phasepath_core::{
    solve_batch, Cost, LoadConfig, PhaseGraph, QuerySession, ShortestPath, VertexId,
};
use serde::Serialize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "phasepath")]
#[command(about = "Shortest paths on graphs with periodic edge costs", long_about = None)]
struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Reject graphs with more than this many (vertex, phase) states
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_STATES)]
    max_states: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer "source destination" query lines
    Query {
        /// Graph file (text format, or JSON if it ends in .json)
        graph: PathBuf,

        /// Read queries from this file instead of stdin
        #[arg(short, long)]
        queries: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Line printed when the destination is unreachable
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        no_path: String,

        /// Read all queries first and solve distinct sources in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Find the cheapest path between two vertices
    Path {
        /// Graph file
        graph: PathBuf,

        /// Source vertex
        #[arg(long)]
        from: VertexId,

        /// Destination vertex
        #[arg(long)]
        to: VertexId,
    },

    /// Show statistics about a graph
    Stats {
        /// Graph file
        graph: PathBuf,
    },

    /// Convert a graph between text and JSON
    Convert {
        /// Graph file
        graph: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: GraphFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Space-separated vertices, one line per query
    Text,
    /// One JSON object per query
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum GraphFormat {
    /// `V N` header and edge records
    Text,
    /// JSON edge list
    Json,
}

/// One query answer in JSON output.
#[derive(Serialize)]
struct QueryRecord<'a> {
    source: VertexId,
    destination: VertexId,
    path: Option<&'a [VertexId]>,
    cost: Option<Cost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    let config = LoadConfig::default().with_max_states(cli.max_states);

    match cli.command {
        Commands::Query {
            graph,
            queries,
            format,
            no_path,
            parallel,
        } => cmd_query(&graph, &config, queries.as_deref(), format, &no_path, parallel),
        Commands::Path { graph, from, to } => cmd_path(&graph, &config, from, to),
        Commands::Stats { graph } => cmd_stats(&graph, &config),
        Commands::Convert {
            graph,
            output,
            format,
        } => cmd_convert(&graph, &config, &output, format),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")
}

fn load_graph(path: &Path, config: &LoadConfig) -> Result<PhaseGraph> {
    let start = Instant::now();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Loading {}...", path.display()));

    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let graph = if is_json {
        PhaseGraph::from_json_file(path, config)
            .with_context(|| format!("Failed to load JSON graph {}", path.display()))?
    } else {
        PhaseGraph::from_text_file(path, config)
            .with_context(|| format!("Failed to load {}", path.display()))?
    };

    pb.finish_with_message(format!("Loaded in {:.2?}", start.elapsed()));
    info!(
        "{}: {} vertices, {} edges, period {}",
        path.display(),
        graph.num_vertices(),
        graph.num_edges(),
        graph.period()
    );
    Ok(graph)
}

fn open_queries(queries: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match queries {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn cmd_query(
    graph_path: &Path,
    config: &LoadConfig,
    queries: Option<&Path>,
    format: OutputFormat,
    no_path: &str,
    parallel: bool,
) -> Result<()> {
    let graph = load_graph(graph_path, config)?;
    let reader = open_queries(queries)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut pairs = Vec::new();
    let mut session = QuerySession::new(&graph);

    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read query line")?;
        let Some((source, destination)) = parse_query_line(&line) else {
            if !line.trim().is_empty() {
                warn!("skipping query line {}: {:?}", idx + 1, line.trim());
            }
            continue;
        };

        if parallel {
            pairs.push((source, destination));
        } else {
            let result = session.route(source, destination);
            write_answer(&mut out, format, no_path, source, destination, result)?;
        }
    }

    if parallel {
        let start = Instant::now();
        let results = solve_batch(&graph, &pairs);
        info!("solved {} queries in {:.2?}", pairs.len(), start.elapsed());
        for (&(source, destination), result) in pairs.iter().zip(results) {
            write_answer(&mut out, format, no_path, source, destination, result)?;
        }
    } else {
        info!("{} searches run", session.runs());
    }

    out.flush()?;
    Ok(())
}

fn write_answer<W: Write>(
    out: &mut W,
    format: OutputFormat,
    no_path: &str,
    source: VertexId,
    destination: VertexId,
    result: phasepath_core::Result<ShortestPath>,
) -> Result<()> {
    let error = match &result {
        Err(err) if !err.is_no_path() => {
            eprintln!("error: query {source} {destination}: {err}");
            Some(err.to_string())
        }
        _ => None,
    };
    let path = result.as_ref().ok();

    match format {
        OutputFormat::Text => match path {
            Some(p) => {
                let line = p
                    .vertices
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(out, "{line}")?;
            }
            None => writeln!(out, "{no_path}")?,
        },
        OutputFormat::Json => {
            let record = QueryRecord {
                source,
                destination,
                path: path.map(|p| p.vertices.as_slice()),
                cost: path.map(|p| p.cost),
                error,
            };
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
        }
    }
    Ok(())
}

fn cmd_path(graph_path: &Path, config: &LoadConfig, from: VertexId, to: VertexId) -> Result<()> {
    let graph = load_graph(graph_path, config)?;
    let mut session = QuerySession::new(&graph);

    match session.route(from, to) {
        Ok(path) => {
            println!(
                "Path found (cost {}, {} hops, arrives in phase {}):",
                path.cost,
                path.hops(),
                path.arrival_phase
            );
            let vertices: Vec<_> = path.vertices.iter().map(ToString::to_string).collect();
            println!("  {}", vertices.join(" -> "));
        }
        Err(err) if err.is_no_path() => {
            println!("No path found between {} and {}", from, to);
        }
        Err(err) => return Err(err).context("Query failed"),
    }

    Ok(())
}

fn cmd_stats(graph_path: &Path, config: &LoadConfig) -> Result<()> {
    let graph = load_graph(graph_path, config)?;
    let stats = graph.stats();

    println!("Periodic Graph Statistics");
    println!("=========================");
    println!("Vertices:       {}", stats.vertex_count);
    println!("Period:         {}", stats.period);
    println!("Edges:          {}", stats.edge_count);
    println!("States:         {}", stats.state_count);
    println!("Max out-degree: {}", stats.max_out_degree);
    println!("Avg out-degree: {:.2}", stats.avg_out_degree);
    println!("Dead ends:      {}", stats.dead_ends);

    Ok(())
}

fn cmd_convert(
    graph_path: &Path,
    config: &LoadConfig,
    output: &Path,
    format: GraphFormat,
) -> Result<()> {
    let graph = load_graph(graph_path, config)?;

    let file =
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    match format {
        GraphFormat::Text => PeriodicText::write(&graph, &mut writer)?,
        GraphFormat::Json => JsonGraph::write(&graph, &mut writer)?,
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Converted {} -> {}", graph_path.display(), output.display());
    Ok(())
}
