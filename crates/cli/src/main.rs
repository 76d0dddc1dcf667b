//! Trace-driven cache simulator CLI.
//!
//! This binary is the single driver for the `cachesim-core` engine. It performs:
//! 1. **Argument parsing:** Block size, cache size(s), associativity, and
//!    write/allocation policy flags, a JSON settings file, or repeatable
//!    `--param NAME=VALUE` textual options applied via `CacheParam::from_name`.
//! 2. **Trace parsing:** Reads a Dinero-style trace file of `<type> <hex addr>`
//!    lines and feeds each reference to the ensemble in order.
//! 3. **Reporting:** Prints the bit-exact settings + statistics report to stdout.

use std::io::BufRead;
use std::{fs, io, process};

use clap::Parser;
use thiserror::Error;
use tracing::{debug, info};

use cachesim_core::config::{AllocPolicy, CacheParam, Settings, WritePolicy};
use cachesim_core::{AccessType, Ensemble};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven set-associative cache simulator",
    long_about = "Replays a Dinero-style memory trace through a configurable set-associative \
cache and prints a settings + statistics report.\n\n\
Trace lines are `<type> <hex address>`, where type is 0 (data load), 1 (data store), \
or 2 (instruction fetch).\n\n\
Examples:\n  \
cachesim --trace trace.txt\n  \
cachesim --trace trace.txt --block-size 32 --assoc 4 --write-through\n  \
cachesim --trace trace.txt --settings settings.json\n  \
cachesim --trace trace.txt --param ASSOC=4 --param WRITETHROUGH=0"
)]
struct Cli {
    /// Path to the trace file (`<type> <hex addr>` lines).
    #[arg(long)]
    trace: String,

    /// Optional JSON settings file; overridden by any flag given alongside it.
    #[arg(long)]
    settings: Option<String>,

    /// Cache block size in bytes.
    #[arg(long)]
    block_size: Option<usize>,

    /// Unified cache size in bytes; selects unified mode.
    #[arg(long)]
    usize_bytes: Option<usize>,

    /// Instruction cache size in bytes; selects split mode.
    #[arg(long)]
    isize_bytes: Option<usize>,

    /// Data cache size in bytes; selects split mode.
    #[arg(long)]
    dsize_bytes: Option<usize>,

    /// Associativity (ways per set).
    #[arg(long)]
    assoc: Option<usize>,

    /// Write-back policy (stores defer to eviction).
    #[arg(long, conflicts_with = "write_through")]
    write_back: bool,

    /// Write-through policy (stores propagate immediately).
    #[arg(long, conflicts_with = "write_back")]
    write_through: bool,

    /// Write-allocate policy (a store miss brings the block in).
    #[arg(long, conflicts_with = "no_write_alloc")]
    write_alloc: bool,

    /// No-write-allocate policy (a store miss writes straight through).
    #[arg(long, conflicts_with = "write_alloc")]
    no_write_alloc: bool,

    /// Textual configuration option (`NAME=VALUE`), mirroring the original
    /// driver's `set_cache_param`. Repeatable; applied after `--settings` and
    /// the typed flags above, in the order given. Recognised names:
    /// `BLOCK_SIZE`, `USIZE`, `ISIZE`, `DSIZE`, `ASSOC`, `WRITEBACK`,
    /// `WRITETHROUGH`, `WRITEALLOC`, `NOWRITEALLOC` (the last four ignore
    /// `VALUE`).
    #[arg(long = "param", value_name = "NAME=VALUE")]
    param: Vec<String>,
}

/// Errors a driver run can raise outside the core engine's own error types.
#[derive(Debug, Error)]
enum DriverError {
    /// The trace or settings file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The settings file was not valid JSON for [`Settings`].
    #[error("failed to parse settings file {path}: {source}")]
    SettingsParse {
        /// Path of the malformed settings file.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A trace line was not `<type> <hex addr>`.
    #[error("malformed trace line {line_no}: {text:?}")]
    MalformedTraceLine {
        /// 1-based line number within the trace file.
        line_no: usize,
        /// The offending line's raw text.
        text: String,
    },

    /// A trace line's type code was not 0, 1, or 2.
    #[error("trace line {line_no}: {source}")]
    BadAccessType {
        /// 1-based line number within the trace file.
        line_no: usize,
        /// Underlying access-type parse error.
        #[source]
        source: cachesim_core::common::AccessError,
    },

    /// A `--param` flag was not `NAME=VALUE` with an integer `VALUE`.
    #[error("malformed --param value {text:?}, expected NAME=VALUE")]
    MalformedParam {
        /// The offending flag's raw text.
        text: String,
    },

    /// Cache parameter validation failed during `init`, or a `--param` flag
    /// named an unrecognised option.
    #[error(transparent)]
    Config(#[from] cachesim_core::common::ConfigError),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("cachesim: {err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), DriverError> {
    let settings = load_settings(cli)?;
    let mut ensemble = Ensemble::from_settings(&settings);
    apply_param_flags(cli, &mut ensemble)?;
    ensemble.init()?;
    info!(
        block_size = settings.block_size,
        split = settings.split,
        "cache ensemble initialised"
    );

    replay_trace(&cli.trace, &mut ensemble)?;
    ensemble
        .flush()
        .expect("ensemble was initialised above, so flush cannot see NotInitialized");

    print!("{}", ensemble.report());
    Ok(())
}

/// Builds [`Settings`] from an optional JSON file, overridden field-by-field
/// by any CLI flag the user supplied.
fn load_settings(cli: &Cli) -> Result<Settings, DriverError> {
    let mut settings = match &cli.settings {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| DriverError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&text).map_err(|source| DriverError::SettingsParse {
                path: path.clone(),
                source,
            })?
        }
        None => Settings::default(),
    };

    if let Some(v) = cli.block_size {
        settings.block_size = v;
    }
    if let Some(v) = cli.usize_bytes {
        settings.split = false;
        settings.usize_bytes = v;
    }
    if let Some(v) = cli.isize_bytes {
        settings.split = true;
        settings.isize_bytes = v;
    }
    if let Some(v) = cli.dsize_bytes {
        settings.split = true;
        settings.dsize_bytes = v;
    }
    if let Some(v) = cli.assoc {
        settings.assoc = v;
    }
    if cli.write_back {
        settings.write_policy = WritePolicy::WriteBack;
    }
    if cli.write_through {
        settings.write_policy = WritePolicy::WriteThrough;
    }
    if cli.write_alloc {
        settings.alloc_policy = AllocPolicy::WriteAllocate;
    }
    if cli.no_write_alloc {
        settings.alloc_policy = AllocPolicy::NoWriteAllocate;
    }

    Ok(settings)
}

/// Applies each `--param NAME=VALUE` flag on top of `settings`/the typed
/// flags, in the order given, via [`CacheParam::from_name`] — the textual
/// configuration path `SPEC_FULL.md` places on the driver, mirroring the
/// original `set_cache_param(param, value)`.
fn apply_param_flags(cli: &Cli, ensemble: &mut Ensemble) -> Result<(), DriverError> {
    for raw in &cli.param {
        let (name, value) = raw.split_once('=').ok_or_else(|| DriverError::MalformedParam {
            text: raw.clone(),
        })?;
        let value: usize = value.parse().map_err(|_| DriverError::MalformedParam {
            text: raw.clone(),
        })?;
        let param = CacheParam::from_name(name, value)?;
        ensemble.set_param(param);
    }
    Ok(())
}

/// Reads `<type> <hex addr>` lines from `path` and feeds each to `ensemble`
/// in file order. Blank lines and lines starting with `#` are skipped.
fn replay_trace(path: &str, ensemble: &mut Ensemble) -> Result<(), DriverError> {
    let file = fs::File::open(path).map_err(|source| DriverError::Io {
        path: path.to_string(),
        source,
    })?;
    let reader = io::BufReader::new(file);

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.map_err(|source| DriverError::Io {
            path: path.to_string(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let (code, addr) = match (fields.next(), fields.next(), fields.next()) {
            (Some(code), Some(addr), None) => (code, addr),
            _ => {
                return Err(DriverError::MalformedTraceLine {
                    line_no,
                    text: line,
                });
            }
        };

        let code: u8 = code.parse().map_err(|_| DriverError::MalformedTraceLine {
            line_no,
            text: line.clone(),
        })?;
        let addr = u32::from_str_radix(addr.trim_start_matches("0x"), 16).map_err(|_| {
            DriverError::MalformedTraceLine {
                line_no,
                text: line.clone(),
            }
        })?;

        let access_type = AccessType::try_from(code)
            .map_err(|source| DriverError::BadAccessType { line_no, source })?;
        debug!(line_no, addr, ?access_type, "replaying trace line");

        ensemble
            .perform_access(addr, access_type)
            .expect("ensemble was initialised above, so perform_access cannot see NotInitialized");
    }

    Ok(())
}
