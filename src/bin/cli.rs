//! This is the command line tool that compresses or decompresses a file, or
//! standard input, in the gzip style.

extern crate clap;
extern crate env_logger;
extern crate log;

use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use plz::utils::signatures::{add_extension, strip_extension};
use plz::{
    compress_stream, decompress_stream, Context, MatchStrategy,
    DEFAULT_CHUNK_SIZE,
};

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::time::Instant;

const DESCRIPTION: &str = "Compress or decompress data with Lempel-Ziv. \
Given no file or given -, read from standard input and write to standard \
output. This program does not perform error correction (don't entrust your \
important data to it yet).";

/// A scoped utility struct for measuring and reporting time.
struct Timer {
    start: std::time::Instant,
}

impl Timer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let now = Instant::now();
        if let Some(duration) = now.checked_duration_since(self.start) {
            log::info!(
                "Operation completed in {:03} seconds",
                duration.as_secs_f32()
            );
        }
    }
}

fn build_cli() -> Command {
    Command::new("plz")
        .version("0.0.1")
        .about(DESCRIPTION)
        .arg(
            Arg::new("stdout")
                .short('c')
                .long("stdout")
                .help("Write to standard output instead of a file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("decompress")
                .short('d')
                .long("decompress")
                .help("Decompress the input instead")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("checked")
                .long("check")
                .help("Decompress the written file and compare it to the input")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["decompress", "stdout"]),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Path of the output file")
                .conflicts_with("stdout")
                .num_args(1),
        )
        .arg(
            Arg::new("matcher")
                .long("matcher")
                .value_name("matcher")
                .help("The algorithm used to search for matches")
                .value_parser(["naive", "indexed"])
                .num_args(1),
        )
        .arg(
            Arg::new("chunk-size")
                .long("chunk-size")
                .value_name("BYTES")
                .help("The number of bytes read from the input at a time")
                .value_parser(value_parser!(usize))
                .num_args(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print status messages to standard error")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("FILE").help("The file to read").index(1))
}

fn init_logger(verbose: bool) {
    let mut builder = env_logger::builder();
    builder.format_timestamp(None);
    if verbose {
        builder.filter_level(log::LevelFilter::Info);
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder.init();
}

fn build_context(matches: &ArgMatches) -> Context {
    let strategy = matches
        .get_one::<String>("matcher")
        .and_then(|name| MatchStrategy::from_name(name))
        .unwrap_or_default();
    let chunk_size = matches
        .get_one::<usize>("chunk-size")
        .copied()
        .unwrap_or(DEFAULT_CHUNK_SIZE);
    Context::new(strategy, chunk_size)
}

/// Pick the output path for 'input_path', or report a usage error.
fn output_path(
    cmd: &mut Command,
    input_path: &str,
    decompress: bool,
) -> String {
    let name = if decompress {
        strip_extension(input_path).map(String::from)
    } else {
        add_extension(input_path)
    };
    match name {
        Some(name) => name,
        None if decompress => cmd
            .error(
                ErrorKind::InvalidValue,
                format!("{}: unknown suffix -- ignored", input_path),
            )
            .exit(),
        None => cmd
            .error(
                ErrorKind::InvalidValue,
                format!("{} already has the suffix -- unchanged", input_path),
            )
            .exit(),
    }
}

/// Create 'path' for writing, refusing to replace an existing file.
fn create_output(cmd: &mut Command, path: &str) -> File {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => cmd
            .error(
                ErrorKind::InvalidValue,
                format!("{} already exists; not overwritten", path),
            )
            .exit(),
        Err(e) => fail(&format!("Can't create {}: {}", path, e)),
    }
}

fn fail(message: &str) -> ! {
    log::error!("{}", message);
    std::process::exit(1);
}

/// Remove the output file of a failed run, then exit.
fn discard_and_fail(path: &str, message: &str) -> ! {
    if let Err(e) = fs::remove_file(path) {
        log::warn!("Can't remove {}: {}", path, e);
    }
    fail(message)
}

fn describe_failure(decompress: bool, e: &plz::Error) -> String {
    if decompress {
        format!("Decompression failed: {}", e)
    } else {
        format!("Compression failed: {}", e)
    }
}

fn run<R: Read, W: Write>(
    decompress: bool,
    input: R,
    output: W,
    ctx: Context,
) -> plz::Result<(u64, u64)> {
    if decompress {
        decompress_stream(input, output, ctx)
    } else {
        compress_stream(input, output, ctx)
    }
}

/// Decompress 'compressed_path' in memory and compare it to 'input_path'.
/// The compressed file is removed if it does not reproduce the input.
fn check(input_path: &str, compressed_path: &str, ctx: Context) {
    let original = fs::read(input_path)
        .unwrap_or_else(|e| fail(&format!("Can't read {}: {}", input_path, e)));
    let compressed = File::open(compressed_path).unwrap_or_else(|e| {
        fail(&format!("Can't open {}: {}", compressed_path, e))
    });
    let mut decoded = Vec::new();
    let res = run(true, BufReader::new(compressed), &mut decoded, ctx);
    let (from, to) = res.unwrap_or_else(|e| {
        discard_and_fail(compressed_path, &describe_failure(true, &e))
    });
    log::info!("Decompressed from {} to {} bytes.", from, to);
    if original == decoded {
        log::info!("Correct!");
    } else {
        discard_and_fail(
            compressed_path,
            "Incorrect! The decompressed file differs from the input.",
        );
    }
}

fn main() {
    let mut cmd = build_cli();
    let matches = cmd.get_matches_mut();

    init_logger(matches.get_flag("verbose"));

    let decompress = matches.get_flag("decompress");
    let checked = matches.get_flag("checked");
    let ctx = build_context(&matches);

    // Reading standard input implies writing standard output.
    let input_path = matches
        .get_one::<String>("FILE")
        .filter(|path| path.as_str() != "-")
        .cloned();
    let explicit_output = matches.get_one::<String>("output").cloned();
    let to_stdout = matches.get_flag("stdout")
        || (input_path.is_none() && explicit_output.is_none());

    if checked && input_path.is_none() {
        cmd.error(ErrorKind::ArgumentConflict, "--check needs an input file")
            .exit();
    }

    let input: Box<dyn Read> = match &input_path {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                fail(&format!("Can't open the input file {}: {}", path, e))
            }
        },
        None => Box::new(io::stdin().lock()),
    };

    let out_path = if to_stdout {
        None
    } else if let Some(path) = explicit_output {
        Some(path)
    } else if let Some(path) = &input_path {
        Some(output_path(&mut cmd, path, decompress))
    } else {
        None
    };

    let timer = Timer::new();
    let (from, to) = match &out_path {
        Some(path) => {
            let file = create_output(&mut cmd, path);
            match run(decompress, input, BufWriter::new(file), ctx) {
                Ok(stat) => {
                    log::info!("Wrote {}.", path);
                    stat
                }
                Err(e) => {
                    discard_and_fail(path, &describe_failure(decompress, &e))
                }
            }
        }
        None => run(decompress, input, io::stdout().lock(), ctx)
            .unwrap_or_else(|e| fail(&describe_failure(decompress, &e))),
    };

    if decompress {
        log::info!("Decompressed from {} to {} bytes.", from, to);
    } else {
        log::info!("Compressed from {} to {} bytes.", from, to);
        if to > 0 {
            log::info!("Compression ratio is {:.4}x.", from as f64 / to as f64);
        }
    }

    if checked {
        if let (Some(input_path), Some(out_path)) = (&input_path, &out_path) {
            check(input_path, out_path, ctx);
        }
    }

    drop(timer);
}
