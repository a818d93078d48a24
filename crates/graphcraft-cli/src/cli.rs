//! Command-line interface for the graphcraft utility
//!
//! Reads a graph description (DSL text or a JSON structured form), lays it
//! out and prints the render graph.

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use futures::executor::block_on;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::table::Table;
use graphcraft::assembler::RenderGraph;
use graphcraft::core::logging::{init_logging, LOG_FORMAT_ENV, LOG_LEVEL_ENV};
use graphcraft::graph::GraphDatabase;
use graphcraft::input::{InputFormat, InputModel};
use graphcraft::layout::available_backends;
use graphcraft::pipeline::Pipeline;
use graphcraft::{read_input, BackendKind, BuildConfig, CommandConfig, Database};

/// Graphcraft - Lay out graphs from lightweight descriptions
#[derive(Parser)]
#[command(name = "graphcraft")]
#[command(about = "Turn Nodes:/Edges: descriptions and structured rows into laid-out graphs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lay out a graph and print the render graph
    Build {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        build: BuildArgs,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How to print the result
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        output_format: OutputFormat,
    },

    /// Parse a graph without laying it out
    Parse {
        #[command(flatten)]
        input: InputArgs,

        /// How to print the result
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        output_format: OutputFormat,
    },

    /// Check a graph against the configured policies
    Validate {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        build: BuildArgs,
    },

    /// Print the request a layout backend would receive
    Request {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        build: BuildArgs,
    },

    /// Show available layout backends
    Backends {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Where the graph description comes from
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input file (use - for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Input shape; `auto` sniffs JSON forms and falls back to DSL
    #[arg(long, value_enum, default_value_t = FormatChoice::Auto)]
    pub format: FormatChoice,
}

/// Overrides applied on top of the config file
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Layout backend
    #[arg(long, value_enum)]
    pub backend: Option<BackendChoice>,

    /// External layout program and its arguments (implies --backend command)
    #[arg(long, num_args = 1.., allow_hyphen_values = true, value_name = "PROG")]
    pub command: Vec<String>,

    /// Deadline for the external layout program
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// JSON build config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reject dangling edges and duplicate nodes
    #[arg(long)]
    pub strict: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatChoice {
    Auto,
    Dsl,
    Adjacency,
    Pairs,
}

impl FormatChoice {
    fn format(self) -> Option<InputFormat> {
        match self {
            FormatChoice::Auto => None,
            FormatChoice::Dsl => Some(InputFormat::Dsl),
            FormatChoice::Adjacency => Some(InputFormat::Adjacency),
            FormatChoice::Pairs => Some(InputFormat::Pairs),
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum BackendChoice {
    Layered,
    LayeredLr,
    Levels,
    Command,
}

impl From<BackendChoice> for BackendKind {
    fn from(value: BackendChoice) -> Self {
        match value {
            BackendChoice::Layered => BackendKind::Layered,
            BackendChoice::LayeredLr => BackendKind::LayeredLr,
            BackendChoice::Levels => BackendKind::Levels,
            BackendChoice::Command => BackendKind::Command,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

fn describe_backend(kind: BackendKind) -> &'static str {
    match kind {
        BackendKind::Layered => "Layered layout with crossing reduction, top to bottom",
        BackendKind::LayeredLr => "Layered layout with crossing reduction, left to right",
        BackendKind::Levels => "Breadth-first levels from the root nodes",
        BackendKind::Command => "External program speaking ELK JSON on stdin/stdout",
    }
}

/// Main CLI application
#[derive(Default)]
pub struct GraphcraftApp;

impl GraphcraftApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Flags first, then environment, then a quiet default
        let log_level = cli
            .log_level
            .map(|level| level.as_str().to_string())
            .or_else(|| std::env::var(LOG_LEVEL_ENV).ok())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "warn".to_string());
        let log_format = cli
            .log_format
            .map(|format| format.as_str().to_string())
            .or_else(|| std::env::var(LOG_FORMAT_ENV).ok());

        if let Err(e) = init_logging(Some(&log_level), log_format.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Graphcraft v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Build {
                input,
                build,
                output,
                output_format,
            } => self.build_command(&input, &build, output, output_format, cli.verbose),
            Commands::Parse {
                input,
                output_format,
            } => self.parse_command(&input, output_format, cli.verbose),
            Commands::Validate { input, build } => self.validate_command(&input, &build, cli.verbose),
            Commands::Request { input, build } => self.request_command(&input, &build, cli.verbose),
            Commands::Backends { json } => self.backends_command(json, cli.verbose),
        }
    }

    /// Config file, then flag overrides
    pub fn load_config(&self, args: &BuildArgs) -> Result<BuildConfig> {
        let mut config = match &args.config {
            Some(path) => BuildConfig::from_json_file(path)?,
            None => BuildConfig::default(),
        };

        if let Some((program, rest)) = args.command.split_first() {
            config.command = Some(CommandConfig {
                program: program.clone(),
                args: rest.to_vec(),
                timeout_ms: config.command.as_ref().and_then(|c| c.timeout_ms),
            });
            config.backend = BackendKind::Command;
        }
        if let Some(backend) = args.backend {
            config.backend = backend.into();
        }
        if let Some(millis) = args.timeout_ms {
            if let Some(command) = config.command.as_mut() {
                command.timeout_ms = Some(millis);
            }
        }
        if args.strict {
            config = config.strict();
        }

        debug!(backend = %config.backend, "Build config loaded");
        Ok(config)
    }

    fn load_model(&self, args: &InputArgs, verbose: bool) -> Result<InputModel> {
        let content = self.read_input(args.input.clone())?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let model = read_input(&content, args.format.format())?;
        if verbose {
            eprintln!("Input format: {}", model.format());
        }
        Ok(model)
    }

    /// Handle the build command
    fn build_command(
        &self,
        input: &InputArgs,
        build: &BuildArgs,
        output: Option<PathBuf>,
        output_format: OutputFormat,
        verbose: bool,
    ) -> Result<()> {
        let model = self.load_model(input, verbose)?;
        let pipeline = Pipeline::new(self.load_config(build)?)?;
        let report = block_on(pipeline.build_report(&model))?;

        if verbose {
            eprintln!(
                "Built {} nodes and {} edges with the {} backend",
                report.graph.nodes.len(),
                report.graph.edges.len(),
                pipeline.adapter().backend().name()
            );
            for warning in &report.warnings {
                eprintln!("warning: {}", warning);
            }
        }

        let text = match output_format {
            OutputFormat::Json => report.graph.to_json_pretty()?,
            OutputFormat::Table => render_graph_table(&report.graph),
        };
        self.write_output(output, &text)
    }

    /// Handle the parse command
    fn parse_command(&self, input: &InputArgs, output_format: OutputFormat, verbose: bool) -> Result<()> {
        let model = self.load_model(input, verbose)?;
        let database = graphcraft::parsers::GraphParser::new().parse_model(&model)?;

        let text = match output_format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "nodes": database.node_specs(),
                "edges": database.edge_specs(),
                "warnings": database.warnings(),
            }))?,
            OutputFormat::Table => render_database_table(&database),
        };
        self.write_output(None, &text)
    }

    /// Handle the validate command
    fn validate_command(&self, input: &InputArgs, build: &BuildArgs, verbose: bool) -> Result<()> {
        let model = self.load_model(input, verbose)?;
        let pipeline = Pipeline::new(self.load_config(build)?)?;

        match pipeline.prepare(&model) {
            Ok(database) => {
                println!(
                    "✓ Valid graph: {} nodes, {} edges",
                    database.node_count(),
                    database.edge_count()
                );
                for warning in database.warnings() {
                    println!("  ⚠ {}", warning);
                }
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid graph: {}", e);
                Err(e)
            }
        }
    }

    /// Handle the request command
    fn request_command(&self, input: &InputArgs, build: &BuildArgs, verbose: bool) -> Result<()> {
        let model = self.load_model(input, verbose)?;
        let pipeline = Pipeline::new(self.load_config(build)?)?;
        let request = pipeline.layout_request(&model)?;
        self.write_output(None, &request.to_json_pretty()?)
    }

    /// Handle the backends command
    fn backends_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing layout backends");
        }

        let kinds = available_backends();
        if json {
            let backends: Vec<serde_json::Value> = kinds
                .iter()
                .map(|kind| {
                    serde_json::json!({
                        "name": kind.to_string(),
                        "description": describe_backend(*kind),
                    })
                })
                .collect();
            let listing = serde_json::json!({
                "backends": backends,
                "total": kinds.len(),
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            let mut table = Table::new(["backend", "description"]);
            for kind in &kinds {
                table.push_row([kind.to_string(), describe_backend(*kind).to_string()]);
            }
            println!("Layout backends:");
            print!("{}", table.render());
            println!();
            println!("Total: {} backends available", kinds.len());
        }

        Ok(())
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content)
                    .map_err(|e| anyhow!("Failed to write output file '{}': {}", path.display(), e))?;
            }
            _ => {
                let mut stdout = io::stdout();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

fn render_graph_table(graph: &RenderGraph) -> String {
    let mut nodes = Table::new(["node", "label", "x", "y"]);
    for node in &graph.nodes {
        nodes.push_row([
            node.id.clone(),
            node.data.label.clone(),
            format!("{:.1}", node.position.x),
            format!("{:.1}", node.position.y),
        ]);
    }

    let mut edges = Table::new(["edge", "source", "target", "type"]);
    for edge in &graph.edges {
        edges.push_row([
            edge.id.clone(),
            edge.source.clone(),
            edge.target.clone(),
            edge.edge_type.clone(),
        ]);
    }

    format!("{}\n{}", nodes.render(), edges.render())
}

fn render_database_table(database: &GraphDatabase) -> String {
    let mut nodes = Table::new(["node", "label"]);
    for node in database.node_specs() {
        nodes.push_row([node.id.clone(), node.display_label.clone()]);
    }

    let mut edges = Table::new(["edge", "source", "target"]);
    for edge in database.edge_specs() {
        edges.push_row([edge.id.clone(), edge.source.clone(), edge.target.clone()]);
    }

    let mut text = format!("{}\n{}", nodes.render(), edges.render());
    for warning in database.warnings() {
        text.push_str(&format!("warning: {}\n", warning));
    }
    text
}
