//! emx-dxfrec CLI
//!
//! Encode payload files into DXF group-code records and compute the extent
//! of ACIS data.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use emx_dxfrec::{
    ChunkWidth, Encoder, EncoderConfig, Extent, ExtentScanner, ExtentSeed, ParsePolicy,
    PayloadKind, TranscodeTable,
};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Extension of ACIS text files picked up when walking directories
const SAT_EXTENSION: &str = "sat";

#[derive(Parser, Debug)]
#[command(name = "emx-dxfrec")]
#[command(author = "nzinfo <li.monan@gmail.com>")]
#[command(version)]
#[command(about = "DXF group-code record encoding tool")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a payload file into group-code records
    Encode {
        /// Payload file (default: stdin)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Payload kind
        #[arg(short, long, value_enum, default_value_t = Kind::Solid)]
        kind: Kind,

        /// Override the chunk width
        #[arg(short, long)]
        width: Option<usize>,

        /// Skip transcoding of solid data
        #[arg(long)]
        raw: bool,
    },

    /// Print the transcoded lines of a SAT file
    Transcode {
        /// SAT file (default: stdin)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Compute the extent of the points in SAT files
    Extent {
        /// SAT files or directories to scan
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Fail on malformed point records instead of reading them as 0
        #[arg(long)]
        strict: bool,

        /// Starting value of the extent
        #[arg(long, value_enum, default_value_t = Seed::Origin)]
        seed: Seed,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Solid,
    Mtext,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Seed {
    Origin,
    FirstPoint,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Encode { input, output, kind, width, raw } => {
            encode_payload(input, output, kind, width, raw)?;
        }
        Commands::Transcode { input, output } => {
            transcode_payload(input, output)?;
        }
        Commands::Extent { inputs, strict, seed } => {
            print_extent(inputs, strict, seed)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn write_output(output: Option<&Path>, data: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, data).with_context(|| format!("Failed to write: {}", path.display()))
        }
        None => {
            io::stdout().write_all(data)?;
            Ok(())
        }
    }
}

fn encode_payload(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    kind: Kind,
    width: Option<usize>,
    raw: bool,
) -> Result<()> {
    let text = read_input(input.as_deref())?;

    let kind = match kind {
        Kind::Solid => PayloadKind::Solid,
        Kind::Mtext => PayloadKind::RichText,
    };
    let mut config = EncoderConfig::for_kind(kind);
    if let Some(width) = width {
        config = config.with_chunk_width(ChunkWidth::new(width)?);
    }
    if raw {
        config = config.with_transcode(false);
    }
    let encoder = Encoder::new(config);

    let encoded = match kind {
        PayloadKind::Solid => encoder.encode(text.lines()),
        PayloadKind::RichText => encoder.encode([text.trim_end_matches(['\r', '\n'])]),
    };
    info!(bytes = encoded.len(), "encoded");

    write_output(output.as_deref(), &encoded)
}

fn transcode_payload(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let text = read_input(input.as_deref())?;

    let mut out = String::with_capacity(text.len());
    for line in TranscodeTable::shared().encode(text.lines()) {
        out.push_str(&line);
        out.push('\n');
    }

    write_output(output.as_deref(), out.as_bytes())
}

fn print_extent(inputs: Vec<PathBuf>, strict: bool, seed: Seed) -> Result<()> {
    let scanner = ExtentScanner::new()
        .with_policy(if strict { ParsePolicy::Strict } else { ParsePolicy::Permissive })
        .with_seed(match seed {
            Seed::Origin => ExtentSeed::Origin,
            Seed::FirstPoint => ExtentSeed::FirstPoint,
        });

    let mut files = Vec::new();
    for input in &inputs {
        if input.is_dir() {
            collect_sat_files(input, &mut files)?;
        } else {
            files.push(input.clone());
        }
    }

    let mut total: Option<Extent> = None;
    for path in &files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        let extent = scanner
            .scan(text.lines())
            .with_context(|| format!("Failed to scan: {}", path.display()))?;
        debug!(file = %path.display(), ?extent, "scanned");

        total = Some(match total {
            Some(total) => total.union(&extent),
            None => extent,
        });
    }

    let extent = total.unwrap_or_default();
    println!("min {} {} {}", extent.min[0], extent.min[1], extent.min[2]);
    println!("max {} {} {}", extent.max[0], extent.max[1], extent.max[2]);

    Ok(())
}

fn collect_sat_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SAT_EXTENSION))
        });

    let before = files.len();
    files.extend(entries.map(|e| e.into_path()));
    if files.len() == before {
        anyhow::bail!("No .{} files found in {}", SAT_EXTENSION, dir.display());
    }

    Ok(())
}
