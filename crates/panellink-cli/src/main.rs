use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use panellink_core::{FrameDecoder, LinkMessage};

#[derive(Parser, Debug)]
#[command(name = "panellink")]
#[command(version)]
#[command(
    about = "Decoder for alarm-panel serial frames (PowerLink B0 and legacy).",
    long_about = None,
    after_help = "Examples:\n  panellink decode \"0d 02 02 02 43 f9 0a\"\n  panellink decode --file frames.txt --pretty\n  cat frames.txt | panellink decode"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode hex frames to JSON, one message per line of output.
    #[command(
        after_help = "Frames are hex strings, spaces optional. A missing start\nmarker (0x0d) is inserted automatically. Frames read from --file or stdin\nare one per line; blank lines and lines starting with '#' are skipped."
    )]
    Decode {
        /// Frames as hex strings; omit to read from --file or stdin
        frames: Vec<String>,

        /// Read frames from a file, one per line
        #[arg(short = 'f', long, conflicts_with = "frames")]
        file: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output on stderr
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            frames,
            file,
            pretty,
            compact,
            quiet,
        } => cmd_decode(frames, file, pretty, compact, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

fn cmd_decode(
    frames: Vec<String>,
    file: Option<PathBuf>,
    pretty: bool,
    compact: bool,
    quiet: bool,
) -> Result<(), CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }

    let inputs = collect_inputs(frames, file)?;
    if inputs.is_empty() {
        return Err(CliError::new(
            "no frames to decode",
            Some("pass hex frames as arguments, via --file, or on stdin".to_string()),
        ));
    }

    // One decoder for the whole batch so paged sequences reassemble.
    let mut decoder = FrameDecoder::new();
    let mut decoded = 0usize;

    for (line_no, input) in inputs.iter().enumerate() {
        let frame = parse_hex_frame(input).map_err(|reason| {
            CliError::new(
                format!("frame {}: {}", line_no + 1, reason),
                Some("frames are hex strings like '0d 02 02 02 43 f9 0a'".to_string()),
            )
        })?;
        let message = decoder.decode(&frame).map_err(|err| {
            CliError::new(
                format!("frame {}: {}", line_no + 1, err),
                Some("check the frame for truncation and the 0x0a end marker".to_string()),
            )
        })?;
        println!("{}", serialize_message(&message, pretty)?);
        decoded += 1;
    }

    if !quiet {
        eprintln!("OK: {} frame(s) decoded", decoded);
    }
    Ok(())
}

fn collect_inputs(frames: Vec<String>, file: Option<PathBuf>) -> Result<Vec<String>, CliError> {
    if !frames.is_empty() {
        return Ok(frames);
    }

    let lines: Vec<String> = if let Some(path) = file {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read frame file: {}", path.display()))?;
        text.lines().map(str::to_string).collect()
    } else {
        let stdin = io::stdin();
        let mut lines = Vec::new();
        for line in stdin.lock().lines() {
            lines.push(line.context("Failed to read stdin")?);
        }
        lines
    };

    Ok(lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect())
}

/// Parse a spaced or unspaced hex string into frame bytes, inserting the
/// start marker when the input omits it.
fn parse_hex_frame(input: &str) -> Result<Vec<u8>, String> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return Err("empty frame".to_string());
    }
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits ({})", digits.len()));
    }

    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.as_bytes().chunks(2) {
        let text = std::str::from_utf8(pair).map_err(|_| "invalid hex digits".to_string())?;
        let byte = u8::from_str_radix(text, 16)
            .map_err(|_| format!("invalid hex digits '{text}'"))?;
        bytes.push(byte);
    }

    if bytes.first() != Some(&0x0D) {
        bytes.insert(0, 0x0D);
    }
    Ok(bytes)
}

fn serialize_message(message: &LinkMessage, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(message)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(message)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}
