use clap::{Parser, Subcommand, ValueEnum};
use dify_dsl::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Inspect, validate and convert Dify workflow DSL documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log parsing and generation details
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Keep the payload of these node types as is instead of rejecting them
    #[arg(long = "passthrough", value_name = "TYPE", global = true)]
    passthrough: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a document and check its graph
    Validate {
        /// Path to the DSL document (.yml, .yaml or .json)
        path: PathBuf,
    },
    /// Re-emit a document, optionally in another format
    Convert {
        /// Path to the DSL document
        input: PathBuf,
        /// Output file; printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format; defaults to the output file's extension, or YAML
        #[arg(short, long, value_enum)]
        format: Option<FormatCli>,
        /// Write everything on a single line
        #[arg(long)]
        compact: bool,
    },
    /// List the nodes and edges of a document
    Inspect {
        /// Path to the DSL document
        path: PathBuf,
    },
}

/// Output formats accepted by `--format`.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatCli {
    Yaml,
    Json,
}

impl From<FormatCli> for DslFormat {
    fn from(format: FormatCli) -> Self {
        match format {
            FormatCli::Yaml => DslFormat::Yaml,
            FormatCli::Json => DslFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let parser = build_parser(&cli.passthrough);
    match cli.command {
        Command::Validate { path } => run_validate(&parser, &path),
        Command::Convert {
            input,
            output,
            format,
            compact,
        } => run_convert(&parser, &input, output.as_deref(), format, compact),
        Command::Inspect { path } => run_inspect(&parser, &path),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_parser(passthrough: &[String]) -> DslParser {
    passthrough
        .iter()
        .fold(DslParser::builder(), |builder, node_type| {
            builder.with_node_parser(Box::new(PassthroughParser::new(node_type.as_str())))
        })
        .build()
        .unwrap_or_else(|e| fail(&format!("Invalid node parser setup: {}", e)))
}

fn load(parser: &DslParser, path: &Path) -> App {
    parser
        .parse_file(path)
        .unwrap_or_else(|e| fail(&e.to_string()))
}

fn run_validate(parser: &DslParser, path: &Path) -> ExitCode {
    let app = load(parser, path);
    let problems = app.workflow.graph.validate();

    if problems.is_empty() {
        println!(
            "{}: OK ({} nodes, {} edges)",
            path.display(),
            app.workflow.graph.node_count(),
            app.workflow.graph.edge_count()
        );
        return ExitCode::SUCCESS;
    }

    println!("{}: {} problem(s)", path.display(), problems.len());
    for problem in &problems {
        println!("  - {}", problem);
    }
    ExitCode::FAILURE
}

fn run_convert(
    parser: &DslParser,
    input: &Path,
    output: Option<&Path>,
    format: Option<FormatCli>,
    compact: bool,
) -> ExitCode {
    let app = load(parser, input);

    let format = match (format, output) {
        (Some(format), _) => format.into(),
        (None, Some(path)) => DslFormat::from_path(path),
        (None, None) => DslFormat::Yaml,
    };
    let style = if compact {
        OutputStyle::Compact
    } else {
        OutputStyle::Pretty
    };
    let generator = DslGenerator::builder().format(format).style(style).build();

    match output {
        Some(path) => {
            generator
                .generate_to_file(&app, path)
                .unwrap_or_else(|e| fail(&format!("Failed to write '{}': {}", path.display(), e)));
            println!("Wrote {} ({})", path.display(), format);
        }
        None => {
            let text = generator
                .generate(&app)
                .unwrap_or_else(|e| fail(&e.to_string()));
            println!("{}", text.trim_end());
        }
    }
    ExitCode::SUCCESS
}

fn run_inspect(parser: &DslParser, path: &Path) -> ExitCode {
    let app = load(parser, path);
    let graph = &app.workflow.graph;

    println!("App:      {} ({})", app.name, app.mode);
    println!("Version:  {}", app.version);
    if !app.description.is_empty() {
        println!("About:    {}", app.description);
    }

    println!("\nNodes ({}):", graph.node_count());
    for node in graph.nodes() {
        println!("  {:<24} {:<12} {}", node.id(), node.node_type(), node.title());
    }

    println!("\nEdges ({}):", graph.edge_count());
    for edge in graph.edges() {
        println!("  {:<32} {} -> {}", edge.id, edge.source, edge.target);
    }

    let features: Vec<&str> = app.workflow.features.keys().map(String::as_str).collect();
    if !features.is_empty() {
        println!("\nFeatures: {}", features.join(", "));
    }
    ExitCode::SUCCESS
}

/// Prints `message` to stderr and exits with status 1.
fn fail(message: &str) -> ! {
    eprintln!("dify-dsl: {}", message);
    std::process::exit(1);
}
