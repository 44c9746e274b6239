//! arjson command-line tool
//!
//! Validates, reformats and inspects JSON documents with the arena parser,
//! and generates starter documents with the arena builders.

mod template;

use arjson::{Arena, Error, NodeStats, ParseConfig, ParseError, Writer, WriterConfig};
use clap::{Args, Parser, Subcommand};
use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};
use template::TemplateKind;
use tracing_subscriber::EnvFilter;

/// Bytes of input shown on each side of a parse error
const CONTEXT_RADIUS: usize = 40;

#[derive(Parser)]
#[command(name = "arjson")]
#[command(about = "Validate, format and inspect JSON documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the input is well-formed JSON
    Validate(InputArgs),

    /// Pretty-print the input
    Format {
        #[command(flatten)]
        input: InputArgs,

        /// Spaces per nesting level
        #[arg(long, default_value_t = arjson::DEFAULT_INDENT)]
        indent: usize,
    },

    /// Print the input without any whitespace
    Minify(InputArgs),

    /// Print node counts and nesting depth
    Stats(InputArgs),

    /// Generate a starter document
    Template {
        /// Document shape
        #[arg(value_enum)]
        kind: TemplateKind,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print without any whitespace
        #[arg(short, long)]
        minify: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input file, or `-` for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Maximum container nesting depth
    #[arg(long, default_value_t = arjson::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl InputArgs {
    fn config(&self) -> ParseConfig {
        ParseConfig::default().with_max_depth(self.max_depth)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: &Commands) -> Result<(), Error> {
    match command {
        Commands::Validate(args) => with_document(args, |_, _| {
            println!("valid JSON");
            Ok(())
        }),
        Commands::Format { input, indent } => with_document(input, |root, _| {
            let config = WriterConfig::pretty().with_indent(*indent);
            emit(&Writer::with_config(config), root, &input.input)
        }),
        Commands::Minify(args) => {
            with_document(args, |root, _| emit(&Writer::new(false), root, &args.input))
        }
        Commands::Stats(args) => with_document(args, |root, arena| {
            let arena_stats = arena.stats();
            println!("{}", NodeStats::collect(root));
            println!(
                "Arena: {} bytes in {} blocks ({} dedicated)",
                arena_stats.bytes_allocated, arena_stats.blocks, arena_stats.large_blocks
            );
            Ok(())
        }),
        Commands::Template {
            kind,
            output,
            minify,
        } => write_template(*kind, output.as_deref(), *minify),
    }
}

fn write_template(kind: TemplateKind, output: Option<&Path>, minify: bool) -> Result<(), Error> {
    let arena = Arena::new();
    let root = kind.build(&arena);
    let writer = Writer::new(!minify);
    match output {
        None => emit(&writer, root, Path::new("<stdout>")),
        Some(path) => {
            let mut text = writer.write(root);
            text.push('\n');
            fs::write(path, text).map_err(|source| Error::io(path, source))?;
            tracing::debug!(?kind, path = %path.display(), "template written");
            println!("Written to: {}", path.display());
            Ok(())
        }
    }
}

/// Load and parse the input, then hand the tree to `action`
///
/// Parse failures are reported with a context window before returning.
fn with_document<F>(args: &InputArgs, action: F) -> Result<(), Error>
where
    F: FnOnce(&arjson::Node<'_>, &Arena) -> Result<(), Error>,
{
    let bytes = read_input(&args.input)?;
    tracing::debug!(input = %args.input.display(), bytes = bytes.len(), "loaded input");
    let arena = Arena::new();
    match arjson::parse_with_config(&bytes, &arena, args.config()) {
        Ok(root) => action(root, &arena),
        Err(err) => {
            eprint!("{}", describe_parse_error(&err, &bytes));
            Err(err.into())
        }
    }
}

/// Raw input bytes, or `-` for stdin
///
/// Kept separate from `arjson::read_file_to_arena` because error reports
/// need the bytes around the failing offset.
fn read_input(path: &Path) -> Result<Vec<u8>, Error> {
    if path.as_os_str() == "-" {
        let mut bytes = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .map_err(|source| Error::io("<stdin>", source))?;
        return Ok(bytes);
    }
    fs::read(path).map_err(|source| Error::io(path, source))
}

fn emit(writer: &Writer, root: &arjson::Node<'_>, path: &Path) -> Result<(), Error> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writer
        .write_to(root, &mut out)
        .and_then(|()| writeln!(out))
        .map_err(|source| Error::io(path, source))
}

/// Multi-line report with the input around the error offset and a caret
fn describe_parse_error(err: &ParseError, input: &[u8]) -> String {
    let mut report = format!(
        "JSON parse error:\n  Message: {}\n  Offset:  {}\n",
        err.message, err.offset
    );
    if err.offset <= input.len() {
        let start = err.offset.saturating_sub(CONTEXT_RADIUS);
        let end = (err.offset + CONTEXT_RADIUS).min(input.len());
        let before = printable(&input[start..err.offset]);
        let after = printable(&input[err.offset..end]);
        let column = before.chars().count();
        report.push_str(&format!("  Context: {before}{after}\n"));
        report.push_str(&format!("           {}^\n", " ".repeat(column)));
    }
    report
}

/// Lossy UTF-8 with control characters flattened to spaces
fn printable(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
