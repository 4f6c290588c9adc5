//! Configuration settings for regionhash
//!
//! Defines CLI arguments, the runtime configuration derived from them, and
//! the helpers that turn human-readable values into engine parameters.

use crate::hash::{
    find_descriptor, HashFactory, ParameterValues, BLAKE2_HASH_SIZES, DEFAULT_WINDOW_SIZE,
    TIGER_HASH_ROUNDS, TIGER_HASH_SIZES,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// regionhash - streaming digests over regions of large files
#[derive(Parser, Debug, Clone)]
#[command(name = "regionhash")]
#[command(args_conflicts_with_subcommands = true)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compute checksums and hashes over file regions without loading them into memory")]
#[command(long_about = r#"
regionhash streams a file region through a hash algorithm one window at a
time, so arbitrarily large files can be hashed with a fixed amount of memory.

Examples:
  regionhash disk.img -a crc32                         # Whole file
  regionhash disk.img -a sha256 --start 0x200 --end 4M # Region only
  regionhash a.bin b.bin -a siphash64 --key 000102...  # Keyed, in parallel
  regionhash disk.img -a blake2b --hash-size 256       # Sized variant
  regionhash list                                      # Available algorithms
"#)]
pub struct CliArgs {
    /// Files to hash
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Algorithm id or name (see `regionhash list`)
    #[arg(short = 'a', long, default_value = "crc32", value_name = "ALGO")]
    pub algorithm: String,

    /// First address of the region (e.g., 0x200, 4K)
    #[arg(long, value_name = "ADDR")]
    pub start: Option<String>,

    /// End of the region, exclusive (default: end of file)
    #[arg(long, value_name = "ADDR")]
    pub end: Option<String>,

    /// Bytes read per step (e.g., 1M, 64K)
    #[arg(short = 'w', long, default_value = "1M", value_name = "SIZE")]
    pub window_size: String,

    /// Key as hex text (keyed algorithms and BLAKE2)
    #[arg(long, value_name = "HEX")]
    pub key: Option<String>,

    /// BLAKE2 salt as hex text
    #[arg(long, value_name = "HEX")]
    pub salt: Option<String>,

    /// BLAKE2 personalization as hex text
    #[arg(long, value_name = "HEX")]
    pub personalization: Option<String>,

    /// Starting checksum value (decimal or 0x-prefixed hex)
    #[arg(long, value_name = "VALUE")]
    pub initial_value: Option<String>,

    /// Output size in bits (Tiger and BLAKE2)
    #[arg(long, value_name = "BITS")]
    pub hash_size: Option<usize>,

    /// Number of Tiger passes
    #[arg(long, value_name = "N")]
    pub rounds: Option<u32>,

    /// Load parameter values from a JSON record
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Show a progress bar
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List built-in algorithms and their parameters
    #[command(name = "list")]
    List,

    /// Measure throughput of every algorithm over an in-memory buffer
    #[command(name = "benchmark")]
    Benchmark {
        /// Buffer size (e.g., 16M)
        #[arg(short, long, default_value = "16M")]
        size: String,
    },
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `<hex digest>  <file>` per line
    #[default]
    Text,
    /// One JSON report per file
    Json,
}

/// Runtime configuration for a hash run
#[derive(Debug, Clone)]
pub struct HashConfig {
    /// Files to hash
    pub files: Vec<PathBuf>,
    /// Descriptor id
    pub algorithm: &'static str,
    /// Parameter values for the descriptor
    pub parameters: ParameterValues,
    /// Region start, if given
    pub start: Option<u64>,
    /// Region end, if given
    pub end: Option<u64>,
    /// Bytes per read
    pub window_size: usize,
    /// Output format
    pub output_format: OutputFormat,
    /// Show progress
    pub show_progress: bool,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            algorithm: "crc32",
            parameters: ParameterValues::None,
            start: None,
            end: None,
            window_size: DEFAULT_WINDOW_SIZE,
            output_format: OutputFormat::Text,
            show_progress: false,
        }
    }
}

/// Parse size string (e.g., "1M", "64K", "1G") to bytes
pub fn parse_size(size: &str) -> Result<u64, String> {
    let size = size.trim().to_uppercase();

    if size.is_empty() {
        return Err("Empty size string".to_string());
    }

    let (num_str, multiplier) = if size.ends_with("GB") || size.ends_with('G') {
        (size.trim_end_matches(|c| c == 'G' || c == 'B'), 1024u64 * 1024 * 1024)
    } else if size.ends_with("MB") || size.ends_with('M') {
        (size.trim_end_matches(|c| c == 'M' || c == 'B'), 1024u64 * 1024)
    } else if size.ends_with("KB") || size.ends_with('K') {
        (size.trim_end_matches(|c| c == 'K' || c == 'B'), 1024u64)
    } else if size.ends_with('B') {
        (size.trim_end_matches('B'), 1u64)
    } else {
        // Assume bytes if no suffix
        (size.as_str(), 1u64)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", num_str))?;

    if num < 0.0 {
        return Err(format!("Negative size: {}", size));
    }

    Ok((num * multiplier as f64) as u64)
}

/// Parse an address: `0x`-prefixed hex, or anything [`parse_size`] accepts
pub fn parse_address(text: &str) -> Result<u64, String> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(digits) => u64::from_str_radix(digits, 16).map_err(|_| format!("Invalid hex address: {}", text)),
        None => parse_size(text),
    }
}

/// Parse a 32-bit value given as decimal or `0x`-prefixed hex
pub fn parse_initial_value(text: &str) -> Result<u32, String> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(digits) => u32::from_str_radix(digits, 16),
        None => text.parse(),
    }
    .map_err(|_| format!("Invalid initial value: {}", text))
}

/// Map an output size in bits to its index in `table` (sizes in bytes)
pub fn size_choice(table: &[usize], bits: usize) -> Result<usize, String> {
    table
        .iter()
        .position(|bytes| bytes * 8 == bits)
        .ok_or_else(|| {
            let valid: Vec<String> = table.iter().map(|bytes| (bytes * 8).to_string()).collect();
            format!("Invalid hash size {} bits (expected one of {})", bits, valid.join(", "))
        })
}

/// Map a Tiger pass count to its index in the rounds table
pub fn rounds_choice(rounds: u32) -> Result<usize, String> {
    TIGER_HASH_ROUNDS
        .iter()
        .position(|r| r.count() == rounds)
        .ok_or_else(|| format!("Invalid number of rounds: {} (expected 3, 4, 5 or 8)", rounds))
}

/// Load a JSON parameter record
pub fn load_parameters(path: &Path) -> Result<ParameterValues, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read parameters from {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("Invalid parameters in {}: {}", path.display(), e))
}

/// Write a JSON parameter record
pub fn save_parameters(path: &Path, parameters: &ParameterValues) -> Result<(), String> {
    let text = serde_json::to_string_pretty(parameters).map_err(|e| e.to_string())?;
    std::fs::write(path, text).map_err(|e| format!("Cannot write parameters to {}: {}", path.display(), e))
}

fn reject(flag: &str, algorithm: &str) -> String {
    format!("{} does not apply to {}", flag, algorithm)
}

impl HashConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let descriptor = find_descriptor(&args.algorithm).map_err(|e| e.to_string())?;
        let name = descriptor.name();

        let mut parameters = match &args.params {
            Some(path) => load_parameters(path)?,
            None => descriptor.factory().default_parameters(),
        };

        match (descriptor.factory(), &mut parameters) {
            (HashFactory::Basic(_), ParameterValues::None) => {}
            (HashFactory::Keyed(_), ParameterValues::Key { key }) => {
                if let Some(k) = &args.key {
                    *key = k.clone();
                }
            }
            (HashFactory::InitialValue(_), ParameterValues::InitialValue { initial_value }) => {
                if let Some(value) = &args.initial_value {
                    *initial_value = parse_initial_value(value)?;
                }
            }
            (HashFactory::RoundsAndSize(_), ParameterValues::RoundsAndSize { hash_size, hash_rounds }) => {
                if let Some(bits) = args.hash_size {
                    *hash_size = size_choice(&TIGER_HASH_SIZES, bits)?;
                }
                if let Some(rounds) = args.rounds {
                    *hash_rounds = rounds_choice(rounds)?;
                }
            }
            (
                HashFactory::Blake2(_),
                ParameterValues::Blake2 {
                    key,
                    salt,
                    personalization,
                    hash_size,
                },
            ) => {
                if let Some(k) = &args.key {
                    *key = k.clone();
                }
                if let Some(s) = &args.salt {
                    *salt = s.clone();
                }
                if let Some(p) = &args.personalization {
                    *personalization = p.clone();
                }
                if let Some(bits) = args.hash_size {
                    *hash_size = size_choice(&BLAKE2_HASH_SIZES, bits)?;
                }
            }
            (factory, _) => {
                return Err(format!("{} takes {} parameters", name, factory.kind()));
            }
        }

        let uses_key = matches!(descriptor.factory(), HashFactory::Keyed(_) | HashFactory::Blake2(_));
        let uses_blake2 = matches!(descriptor.factory(), HashFactory::Blake2(_));
        let uses_size = matches!(descriptor.factory(), HashFactory::RoundsAndSize(_) | HashFactory::Blake2(_));
        if args.key.is_some() && !uses_key {
            return Err(reject("--key", name));
        }
        if (args.salt.is_some() || args.personalization.is_some()) && !uses_blake2 {
            return Err(reject("--salt/--personalization", name));
        }
        if args.initial_value.is_some() && !matches!(descriptor.factory(), HashFactory::InitialValue(_)) {
            return Err(reject("--initial-value", name));
        }
        if args.hash_size.is_some() && !uses_size {
            return Err(reject("--hash-size", name));
        }
        if args.rounds.is_some() && !matches!(descriptor.factory(), HashFactory::RoundsAndSize(_)) {
            return Err(reject("--rounds", name));
        }

        let start = args
            .start
            .as_deref()
            .map(parse_address)
            .transpose()
            .map_err(|e| format!("Invalid start: {}", e))?;
        let end = args
            .end
            .as_deref()
            .map(parse_address)
            .transpose()
            .map_err(|e| format!("Invalid end: {}", e))?;

        let window_size = parse_size(&args.window_size).map_err(|e| format!("Invalid window size: {}", e))?;
        if window_size == 0 {
            return Err("Window size must be greater than zero".to_string());
        }

        Ok(Self {
            files: args.files.clone(),
            algorithm: descriptor.id(),
            parameters,
            start,
            end,
            window_size: usize::try_from(window_size).map_err(|_| "Window size too large".to_string())?,
            output_format: args.output_format,
            show_progress: args.progress && !args.quiet,
        })
    }

    /// Whether an explicit region was requested
    pub fn has_region(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}
