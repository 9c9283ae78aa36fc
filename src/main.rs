use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use loadorder::analysis::{find_all_cycles, traverse};
use loadorder::config::{validate_max_depth, Config, DEFAULT_MAX_DEPTH};
use loadorder::export::{self, text::write_load_order, ExportData, ExportFormat, LoadOrderOutcome};
use loadorder::graph::DependencyGraph;
use loadorder::parser::{parse_file_with, BareLinePolicy, ParseOptions};

#[derive(Parser, Debug)]
#[command(name = "loadorder")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version = "0.1.0")]
#[command(
    about = "Dependency graph analyzer with cycle detection and load ordering",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format: text, json, or markdown
    #[arg(short, long, global = true, default_value = "text")]
    format: ExportFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Declaration file plus how to parse it.
#[derive(Args, Debug)]
struct Input {
    /// Dependency declaration file
    file: PathBuf,

    /// Treatment of lines without a separator: declare or ignore
    #[arg(long, default_value = "declare")]
    bare_lines: BareLinePolicy,
}

impl Input {
    fn options(&self) -> ParseOptions {
        ParseOptions::with_bare_lines(self.bare_lines)
    }

    fn load(&self) -> Result<DependencyGraph> {
        load_graph(&self.file, self.options())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Full analysis: graph, statistics, cycles and per-package traversal
    Analyze {
        #[command(flatten)]
        input: Input,

        /// Maximum traversal depth
        #[arg(
            short = 'd',
            long,
            default_value_t = DEFAULT_MAX_DEPTH,
            value_parser = parse_depth
        )]
        max_depth: usize,
    },
    /// Depth-bounded traversal from one package
    Traverse {
        #[command(flatten)]
        input: Input,

        /// Package to start from
        package: String,

        /// Maximum traversal depth
        #[arg(
            short = 'd',
            long,
            default_value_t = DEFAULT_MAX_DEPTH,
            value_parser = parse_depth
        )]
        max_depth: usize,
    },
    /// List every circular dependency
    Cycles {
        #[command(flatten)]
        input: Input,
    },
    /// Load order of a package and everything it depends on
    Order {
        #[command(flatten)]
        input: Input,

        /// Package to compute the load order for
        package: String,
    },
    /// Run the analysis described by a configuration file
    Run {
        /// Comma-separated key/value configuration file
        config: PathBuf,
    },
    /// Show version information
    Version,
}

fn parse_depth(value: &str) -> Result<usize, String> {
    validate_max_depth(value).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Executes the selected command. Returns `false` when the analysis
/// completed but found a blocking problem (cycle or unknown package).
fn run(cli: &Cli) -> Result<bool> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Analyze { input, max_depth }) => {
            let graph = input.load()?;
            let data = ExportData::analyze(input.file.display().to_string(), &graph, *max_depth);
            export::export(cli.format, &data, &mut out)?;
            Ok(true)
        }
        Some(Commands::Traverse {
            input,
            package,
            max_depth,
        }) => {
            let graph = input.load()?;
            if !graph.contains(package) {
                bail!("package '{}' not found in {}", package, input.file.display());
            }
            let result = traverse(&graph, package, *max_depth);
            match cli.format {
                ExportFormat::Json => {
                    let cycles: Vec<String> =
                        result.cycles.iter().map(|c| c.cycle_path()).collect();
                    let value = serde_json::json!({
                        "start": package,
                        "max_depth": max_depth,
                        "order": result.order,
                        "cycles": cycles,
                    });
                    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
                }
                _ => {
                    writeln!(out, "{}: [{}]", package, result.order.join(", "))?;
                    for cycle in &result.cycles {
                        writeln!(out, "  cycle: {}", cycle)?;
                    }
                }
            }
            Ok(true)
        }
        Some(Commands::Cycles { input }) => {
            let graph = input.load()?;
            let cycles = find_all_cycles(&graph);
            match cli.format {
                ExportFormat::Json => {
                    let paths: Vec<String> = cycles.iter().map(|c| c.cycle_path()).collect();
                    writeln!(out, "{}", serde_json::to_string_pretty(&paths)?)?;
                }
                _ if cycles.is_empty() => writeln!(out, "No circular dependencies found")?,
                _ => {
                    writeln!(out, "Found {} circular dependencies:", cycles.len())?;
                    for (i, cycle) in cycles.iter().enumerate() {
                        writeln!(out, "  {}. {}", i + 1, cycle)?;
                    }
                }
            }
            Ok(cycles.is_empty())
        }
        Some(Commands::Order { input, package }) => {
            let graph = input.load()?;
            let outcome = LoadOrderOutcome::compute(&graph, package);
            write_outcome(cli.format, &outcome, &mut out)?;
            Ok(outcome.is_ordered())
        }
        Some(Commands::Run { config }) => {
            let config = Config::from_file(config)
                .with_context(|| format!("failed to load configuration {}", config.display()))?;
            let Some(path) = config.local_path() else {
                bail!(
                    "source mode '{}' is not supported; set test_repo_mode to true",
                    config.source_mode
                );
            };

            let graph = load_graph(path, config.parse_options())?;
            let data = ExportData::analyze(config.repository_url.clone(), &graph, config.max_depth)
                .with_load_order(&graph, &config.package_name);
            export::export(cli.format, &data, &mut out)?;
            Ok(data.load_order.as_ref().is_some_and(LoadOrderOutcome::is_ordered))
        }
        Some(Commands::Version) => {
            writeln!(out, "loadorder v{}", env!("CARGO_PKG_VERSION"))?;
            Ok(true)
        }
        None => {
            writeln!(out, "loadorder - Dependency Graph Analyzer")?;
            writeln!(out, "Run 'loadorder analyze <FILE>' to analyze a declaration file")?;
            writeln!(out, "Run 'loadorder --help' for more information")?;
            Ok(true)
        }
    }
}

fn load_graph(path: &Path, options: ParseOptions) -> Result<DependencyGraph> {
    let outcome = parse_file_with(path, &options)
        .with_context(|| format!("failed to build dependency graph from {}", path.display()))?;
    Ok(outcome.graph)
}

fn write_outcome<W: Write>(
    format: ExportFormat,
    outcome: &LoadOrderOutcome,
    out: &mut W,
) -> Result<()> {
    match format {
        ExportFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(outcome)?)?,
        _ => write_load_order(outcome, out)?,
    }
    Ok(())
}
