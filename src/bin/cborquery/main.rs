//! cborquery CLI: run XPath queries against CBOR documents.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use cborquery::{parse_slice, Evaluated, QueryConfig, QueryEngine, Tree};

/// Exit codes
mod exit_codes {
    pub const SUCCESS: i32 = 0;
    /// With --exit-status: nothing matched, or the result was false/empty
    pub const NO_MATCH: i32 = 1;
}

#[derive(Debug, Parser)]
#[command(name = "cborquery")]
#[command(about = "Query CBOR documents with XPath expressions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every node matching an expression
    Query(QueryCommand),
    /// Print the XML rendering of a document
    Xml(XmlCommand),
    /// Evaluate an expression and print its value
    Eval(EvalCommand),
}

#[derive(Debug, Args)]
struct EngineArgs {
    /// Compile the expression without the expression cache
    #[arg(long)]
    no_cache: bool,

    /// Exit with status 1 when nothing matches
    #[arg(short, long)]
    exit_status: bool,
}

#[derive(Debug, Parser)]
struct QueryCommand {
    /// XPath expression
    expression: String,

    /// Input file (defaults to stdin)
    file: Option<PathBuf>,

    /// What to print for each match
    #[arg(short, long, default_value = "value")]
    output: OutputArg,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Debug, Parser)]
struct XmlCommand {
    /// Input file (defaults to stdin)
    file: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct EvalCommand {
    /// XPath expression
    expression: String,

    /// Input file (defaults to stdin)
    file: Option<PathBuf>,

    #[command(flatten)]
    engine: EngineArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputArg {
    /// Text content of the node
    Value,
    /// XML rendering of the node
    Xml,
    /// Node name
    Name,
}

impl EngineArgs {
    fn engine(&self) -> QueryEngine {
        QueryEngine::new(QueryConfig {
            cache_expressions: !self.no_cache,
        })
    }
}

/// Read the whole input from a file or stdin.
fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match file {
        Some(path) => {
            bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
        }
        None => {
            std::io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
        }
    }
    Ok(bytes)
}

fn load(file: Option<&Path>) -> Result<Tree> {
    let bytes = read_input(file)?;
    let source = file.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    parse_slice(&bytes).with_context(|| format!("failed to parse CBOR from {}", source))
}

fn run_query(cmd: QueryCommand) -> Result<i32> {
    let tree = load(cmd.file.as_deref())?;
    let engine = cmd.engine.engine();
    let nodes = engine.query_all(tree.root(), &cmd.expression)?;
    log::debug!("{} matched {} nodes", cmd.expression, nodes.len());

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for node in &nodes {
        match cmd.output {
            OutputArg::Value => writeln!(out, "{}", node.inner_text())?,
            OutputArg::Xml => writeln!(out, "{}", node.output_xml())?,
            OutputArg::Name => writeln!(out, "{}", node.name())?,
        }
    }
    out.flush()?;

    if cmd.engine.exit_status && nodes.is_empty() {
        return Ok(exit_codes::NO_MATCH);
    }
    Ok(exit_codes::SUCCESS)
}

fn run_xml(cmd: XmlCommand) -> Result<i32> {
    let tree = load(cmd.file.as_deref())?;
    println!("{}", tree.root().output_xml());
    Ok(exit_codes::SUCCESS)
}

fn run_eval(cmd: EvalCommand) -> Result<i32> {
    let tree = load(cmd.file.as_deref())?;
    let engine = cmd.engine.engine();
    let result = engine.evaluate(tree.root(), &cmd.expression)?;
    println!("{}", result);

    let truthy = match &result {
        Evaluated::Nodes(nodes) => !nodes.is_empty(),
        Evaluated::Boolean(b) => *b,
        Evaluated::Number(n) => *n != 0.0 && !n.is_nan(),
        Evaluated::String(s) => !s.is_empty(),
    };
    if cmd.engine.exit_status && !truthy {
        return Ok(exit_codes::NO_MATCH);
    }
    Ok(exit_codes::SUCCESS)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let code = match cli.command {
        Command::Query(cmd) => run_query(cmd)?,
        Command::Xml(cmd) => run_xml(cmd)?,
        Command::Eval(cmd) => run_eval(cmd)?,
    };

    if code != exit_codes::SUCCESS {
        std::process::exit(code);
    }
    Ok(())
}
