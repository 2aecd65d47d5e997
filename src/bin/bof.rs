//! bof CLI: convert between JSON, XML, CSV and the binary object format.

use clap::Parser;
use log::LevelFilter;
use serde_bof::adapter::{convert, Format};
use std::path::Path;
use std::process;

#[derive(Parser)]
#[command(
    name = "bof",
    version,
    about = "Convert between .json, .xml, .csv and binary object (.bf) files"
)]
struct Cli {
    /// Input file; the format is taken from its extension
    input: String,

    /// Output file; the format is taken from its extension
    output: String,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let from = format_of(&cli.input)?;
    let to = format_of(&cli.output)?;

    let input =
        std::fs::read(&cli.input).map_err(|e| format!("cannot read {}: {e}", cli.input))?;
    let output = convert(&input, from, to).map_err(|e| format!("{}: {e}", cli.input))?;

    if output.is_empty() {
        log::warn!("nothing to write, {} not created", cli.output);
        return Ok(());
    }
    std::fs::write(&cli.output, &output)
        .map_err(|e| format!("cannot write {}: {e}", cli.output))?;
    log::info!("wrote {} bytes to {}", output.len(), cli.output);
    Ok(())
}

fn format_of(path: &str) -> Result<Format, String> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    Format::from_extension(ext).ok_or_else(|| {
        format!("unsupported file type for {path} (expected .json, .xml, .csv or .bf)")
    })
}
