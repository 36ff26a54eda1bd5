//! mdtree CLI
//!
//! Parses Markdown files and prints the resulting document tree.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use marktree_ast::{AstArena, Node, dump, validate};
use marktree_parser::{MarkdownParser, ParserConfig};
use miette::{IntoDiagnostic, Result};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// mdtree - Inspect the document tree built from Markdown
#[derive(Parser)]
#[command(name = "mdtree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Parser configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Expand {{path}} include lines
    #[arg(long, global = true)]
    includes: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one line per node, indented by depth
    Dump {
        /// Markdown file to parse
        file: PathBuf,
    },

    /// Print the tree as JSON
    Json {
        /// Markdown file to parse
        file: PathBuf,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Check the tree's links and containment rules
    Check {
        /// Markdown files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns `Ok(false)` when a checked file is malformed.
fn run(cli: Cli) -> Result<bool> {
    let parser = MarkdownParser::with_config(load_config(&cli)?);

    match &cli.command {
        Commands::Dump { file } => {
            let arena = AstArena::new();
            let doc = parse(&parser, &arena, file)?;
            print!("{}", dump(doc));
            Ok(true)
        }
        Commands::Json { file, pretty } => {
            let arena = AstArena::new();
            let doc = parse(&parser, &arena, file)?;
            let json = if *pretty {
                serde_json::to_string_pretty(doc)
            } else {
                serde_json::to_string(doc)
            }
            .into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        Commands::Check { files } => {
            let mut all_valid = true;
            for file in files {
                let arena = AstArena::new();
                let doc = parse(&parser, &arena, file)?;
                match validate(doc) {
                    Ok(()) => println!("{}: ok", file.display()),
                    Err(e) => {
                        println!("{}: {}", file.display(), e);
                        all_valid = false;
                    }
                }
            }
            Ok(all_valid)
        }
    }
}

fn load_config(cli: &Cli) -> Result<ParserConfig> {
    let mut config = match &cli.config {
        Some(path) => ParserConfig::from_file(path).into_diagnostic()?,
        None => ParserConfig::default(),
    };
    if cli.includes {
        config.includes = true;
    }
    debug!(?config, "parser configuration");
    Ok(config)
}

fn parse<'a>(parser: &MarkdownParser, arena: &'a AstArena, file: &Path) -> Result<&'a Node<'a>> {
    let doc = parser.parse_file(arena, file).into_diagnostic()?;
    debug!(file = %file.display(), bytes = arena.allocated_bytes(), "parsed");
    Ok(doc)
}
