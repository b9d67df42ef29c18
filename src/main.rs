//! texstream-extract - GLideN64 texture stream extractor.
//!
//! Converts every texture of a `.hts` cache file into a bitmap and writes
//! them as a tar archive.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use texstream_extract::util::format_size;
use texstream_extract::{extract, ExtractionOptions, InputKind};

/// Extracts GLideN64 texture stream caches into tar archives of bitmaps.
#[derive(Parser, Debug)]
#[command(name = "texstream-extract")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Texture stream file to read (e.g., "MUPEN64PLUS_HIRESTEXTURES.hts")
    #[arg(short, long)]
    input: PathBuf,

    /// Tar archive to write (default: standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Prefix for archive entry names, joined to the checksum with '#'
    #[arg(short, long)]
    prefix: Option<String>,

    /// Kind of texture stream ("hires" or "tex"), inferred when omitted
    #[arg(short = 't', long = "type")]
    input_kind: Option<InputKind>,

    /// Increase verbosity (-v: config header, -vv: record headers)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Skip textures that cannot be converted instead of aborting
    #[arg(short = 'e', long = "ignore-error")]
    ignore_errors: bool,

    /// Write V5 bitmaps with an alpha channel
    #[arg(short = 'b', long = "bitmapv5")]
    bitmap_v5: bool,
}

/// Exit status when arguments or files cannot be set up.
const EXIT_SETUP: u8 = 1;
/// Exit status when the conversion itself fails.
const EXIT_CONVERSION: u8 = 2;

fn main() -> ExitCode {
    let cli = match parse_cli(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return ExitCode::from(code),
    };
    setup_logging(cli.verbose);

    let (input, output) = match open_streams(&cli) {
        Ok(streams) => streams,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_SETUP);
        }
    };

    let options = ExtractionOptions {
        verbosity: cli.verbose,
        ignore_errors: cli.ignore_errors,
        bitmap_v5: cli.bitmap_v5,
        prefix: cli.prefix,
        input_kind: cli.input_kind,
    };

    let start = Instant::now();
    match extract(input, output, &options) {
        Ok(summary) => {
            info!(
                "Extracted {} of {} textures from {} ({} skipped) in {:.2}s",
                summary.written,
                summary.entries,
                cli.input.display(),
                summary.skipped,
                start.elapsed().as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to convert {}: {}", cli.input.display(), e);
            ExitCode::from(EXIT_CONVERSION)
        }
    }
}

/// Parses the command line, printing usage or errors on failure.
///
/// Help and version requests exit with 0, argument errors with 1.
fn parse_cli<I, T>(args: I) -> Result<Cli, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| {
        e.print().ok();
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
            _ => EXIT_SETUP,
        }
    })
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Opens the input file and the archive sink.
fn open_streams(cli: &Cli) -> Result<(BufReader<File>, BufWriter<Box<dyn Write>>)> {
    let file = File::open(&cli.input)
        .with_context(|| format!("Failed to open input: {}", cli.input.display()))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    info!("Reading {} ({})", cli.input.display(), format_size(size));

    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output: {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    Ok((BufReader::new(file), BufWriter::new(sink)))
}
