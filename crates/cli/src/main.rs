//! drender CLI
//!
//! Renders JSON documents in canonical deep-render form, one line per
//! document. Reads the named files in order, or stdin when none are given.
//! A file may hold several whitespace-separated documents.

use clap::Parser as ClapParser;
use deep_render::json::Json;
use deep_render::{RenderConfig, Renderer};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};

#[derive(ClapParser)]
#[command(name = "drender")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render JSON documents as deterministic, cycle-safe debug text", long_about = None)]
struct Cli {
    /// JSON files to render (defaults to stdin)
    files: Vec<PathBuf>,

    /// Render every address as TEXT instead of hexadecimal
    /// (overrides DEEP_RENDER_ADDRESS)
    #[arg(long, value_name = "TEXT")]
    address_token: Option<String>,
}

/// Failure while reading or rendering an input stream
#[derive(Debug)]
enum CliError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::Json(e) => write!(f, "invalid JSON: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

/// Render every JSON document in `reader` to `out`, one per line
///
/// Returns the number of documents rendered. Documents before a parse
/// error are still written.
fn render_stream<R: Read, W: Write>(
    reader: R,
    renderer: &Renderer,
    out: &mut W,
) -> Result<usize, CliError> {
    let mut count = 0;
    for doc in serde_json::Deserializer::from_reader(reader).into_iter::<serde_json::Value>() {
        let doc = doc?;
        writeln!(out, "{}", renderer.render(&Json::new(&doc)))?;
        count += 1;
    }
    Ok(count)
}

fn run(cli: &Cli) -> Result<usize, CliError> {
    let config = match &cli.address_token {
        Some(token) => RenderConfig::with_address_token(token.as_str()),
        None => RenderConfig::from_env(),
    };
    let renderer = Renderer::new(config);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut total = 0;

    if cli.files.is_empty() {
        total += render_stream(io::stdin().lock(), &renderer, &mut out)?;
    } else {
        for path in &cli.files {
            debug!("Rendering {}", path.display());
            let file = File::open(path).map_err(|e| {
                CliError::Io(io::Error::new(
                    e.kind(),
                    format!("{}: {}", path.display(), e),
                ))
            })?;
            total += render_stream(BufReader::new(file), &renderer, &mut out)?;
        }
    }

    out.flush()?;
    Ok(total)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("drender=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(count) => info!("Rendered {} document(s)", count),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
