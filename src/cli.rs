//! Command line surface of the `hc` tool.

use std::io::Write;

use clap::{ArgAction, ArgGroup, Parser};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::errors::{Error, Result};
use crate::escaping::{escape, unescape};
use crate::shockwave::{b64, vl64};

#[derive(Parser, Debug, Clone)]
#[command(name = "hc")]
#[command(about = "Encode and decode Shockwave VL64 and B64 integers")]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["vl64", "vl64e", "b64", "b64e"])
))]
pub struct Cli {
    /// Decode a run of VL64 tokens
    #[arg(long)]
    pub vl64: bool,

    /// Encode integers as VL64
    #[arg(long)]
    pub vl64e: bool,

    /// Decode a B64 field
    #[arg(long)]
    pub b64: bool,

    /// Encode integers as B64
    #[arg(long)]
    pub b64e: bool,

    /// Print only values when decoding VL64
    #[arg(long)]
    pub values: bool,

    /// B64 field width in bytes
    #[arg(
        long,
        default_value_t = 2,
        value_parser = clap::value_parser!(u8).range(1..=b64::MAX_WIDTH as i64)
    )]
    pub width: u8,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Integers to encode, or escaped byte strings such as `@[127]` to decode
    #[arg(value_name = "INPUT", required = true, allow_negative_numbers = true)]
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    DecodeVl64,
    EncodeVl64,
    DecodeB64,
    EncodeB64,
}

impl Cli {
    /// The selected operation; the required `mode` group guarantees exactly one flag
    pub fn mode(&self) -> Mode {
        if self.vl64 {
            Mode::DecodeVl64
        } else if self.vl64e {
            Mode::EncodeVl64
        } else if self.b64 {
            Mode::DecodeB64
        } else {
            Mode::EncodeB64
        }
    }
}

pub fn init_logging(verbose: u8) {
    let max_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(max_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_int(input: &str) -> Result<i64> {
    input
        .parse()
        .map_err(|_| Error::NotAnInteger(input.to_string()))
}

/// Processes every input in order, writing one line per result to `out`.
///
/// Stops at the first failing input; lines already written stay written.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let mode = cli.mode();
    let width = usize::from(cli.width);
    info!(?mode, width, inputs = cli.inputs.len(), "starting");

    for input in &cli.inputs {
        debug!(input = %input, "processing");
        match mode {
            Mode::EncodeVl64 => {
                let token = vl64::encode_to_vec(parse_int(input)?)?;
                writeln!(out, "{}", escape(&token))?;
            }
            Mode::EncodeB64 => {
                // Negative values truncate through their two's complement form
                let field = b64::encode_to_vec(parse_int(input)? as u64, width);
                writeln!(out, "{}", escape(&field))?;
            }
            Mode::DecodeB64 => {
                let data = unescape(input)?;
                if data.len() != width {
                    return Err(Error::WidthMismatch {
                        width,
                        actual: data.len(),
                        input: input.clone(),
                    });
                }
                writeln!(out, "{}", b64::decode(&data)?)?;
            }
            Mode::DecodeVl64 => {
                let data = unescape(input)?;
                for token in vl64::tokens(&data) {
                    let token = token?;
                    if cli.values {
                        writeln!(out, "{}", token.value)?;
                    } else {
                        writeln!(out, "{}: {}", escape(token.bytes), token.value)?;
                    }
                }
            }
        }
    }
    Ok(())
}
