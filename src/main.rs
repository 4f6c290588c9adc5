//! regionhash CLI - streaming digests over file regions

use clap::Parser;
use regionhash::config::{parse_size, CliArgs, Commands, HashConfig, OutputFormat};
use regionhash::error::{HashError, IoResultExt, Result};
use regionhash::hash::{
    benchmark_descriptors, builtin_descriptors, find_descriptor, hash_files_parallel, HashExecutor,
    HashFactory,
};
use regionhash::progress::ProgressReporter;
use regionhash::source::Region;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG wins over -v
    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    // Handle subcommands
    if let Some(command) = &args.command {
        return handle_command(command);
    }

    if args.files.is_empty() {
        eprintln!("Usage: regionhash <FILES>... -a <ALGO> [OPTIONS]");
        eprintln!("       regionhash --help for more information");
        eprintln!("       regionhash list   - List available algorithms");
        std::process::exit(1);
    }

    // Build configuration
    let config = HashConfig::from_cli(&args).map_err(HashError::ConfigError)?;

    // Freeze parameters before any file is opened
    let mut descriptor = find_descriptor(config.algorithm)?;
    descriptor.set_parameters(config.parameters.clone())?;
    let execution = descriptor.snapshot()?;

    if args.verbose > 0 {
        print_config(&config, descriptor.name());
    }

    let files = resolve_regions(&config)?;

    let progress = Arc::new(if config.show_progress {
        ProgressReporter::new()
    } else {
        ProgressReporter::disabled()
    });
    progress.set_total_regions(files.len() as u64);
    progress.set_total_bytes(total_bytes(&files));
    progress.set_current_source(descriptor.name());

    let executor = HashExecutor::new(config.window_size)?.with_progress(progress.clone());
    let results = hash_files_parallel(&executor, &descriptor, &execution, &files);

    let mut failures = 0usize;
    for ((path, _), result) in files.iter().zip(results) {
        match result {
            Ok(report) => match config.output_format {
                OutputFormat::Text => println!("{}", report),
                OutputFormat::Json => println!("{}", serde_json::to_string(&report)?),
            },
            Err(e) => {
                failures += 1;
                eprintln!("{}: {}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        progress.finish_error(&format!("{} of {} files failed", failures, files.len()));
        std::process::exit(1);
    }

    progress.finish_success("Done");
    if progress.is_enabled() {
        progress.summary().print();
    }

    Ok(())
}

/// Pair every file with its region; `None` means the whole file
fn resolve_regions(config: &HashConfig) -> Result<Vec<(PathBuf, Option<Region>)>> {
    config
        .files
        .iter()
        .map(|path| {
            if !config.has_region() {
                return Ok((path.clone(), None));
            }
            let end = match config.end {
                Some(end) => end,
                None => std::fs::metadata(path).with_path(path)?.len(),
            };
            let region = Region::new(config.start.unwrap_or(0), end)?;
            Ok((path.clone(), Some(region)))
        })
        .collect()
}

fn total_bytes(files: &[(PathBuf, Option<Region>)]) -> u64 {
    files
        .iter()
        .map(|(path, region)| match region {
            Some(region) => region.len(),
            None => std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        })
        .sum()
}

fn print_config(config: &HashConfig, name: &str) {
    eprintln!("=== regionhash Configuration ===");
    eprintln!("Algorithm:   {}", name);
    eprintln!("Parameters:  {:?}", config.parameters);
    eprintln!("Files:       {}", config.files.len());
    match (config.start, config.end) {
        (None, None) => eprintln!("Region:      whole file"),
        (start, end) => eprintln!(
            "Region:      {:#x}..{}",
            start.unwrap_or(0),
            end.map(|e| format!("{:#x}", e)).unwrap_or_else(|| "EOF".to_string())
        ),
    }
    eprintln!(
        "Window:      {}",
        humansize::format_size(config.window_size as u64, humansize::BINARY)
    );
    eprintln!();
}

fn handle_command(command: &Commands) -> Result<()> {
    match command {
        Commands::List => cmd_list(),
        Commands::Benchmark { size } => cmd_benchmark(size),
    }
}

fn cmd_list() -> Result<()> {
    println!("{:<12} {:<26} PARAMETERS", "ID", "NAME");
    for descriptor in builtin_descriptors() {
        let parameters = match descriptor.factory() {
            HashFactory::Basic(_) => "-",
            HashFactory::Keyed(_) => "--key",
            HashFactory::InitialValue(_) => "--initial-value",
            HashFactory::RoundsAndSize(_) => "--hash-size 128|160|192, --rounds 3",
            HashFactory::Blake2(_) => "--key, --salt, --personalization, --hash-size",
        };
        println!("{:<12} {:<26} {}", descriptor.id(), descriptor.name(), parameters);
    }
    Ok(())
}

fn cmd_benchmark(size: &str) -> Result<()> {
    let size_bytes = parse_size(size).map_err(HashError::ConfigError)?;
    let data_size = usize::try_from(size_bytes).map_err(|_| HashError::config("Benchmark size too large"))?;

    println!("=== regionhash Benchmark ===");
    println!("Buffer size: {}\n", humansize::format_size(size_bytes, humansize::BINARY));

    let results = benchmark_descriptors(&builtin_descriptors(), data_size)?;

    println!("{:<26} {:>12} {:>14}", "ALGORITHM", "TIME", "THROUGHPUT");
    for (name, duration, throughput) in results {
        println!("{:<26} {:>12.2?} {:>10.1} MiB/s", name, duration, throughput);
    }

    println!("\nBenchmark complete.");
    Ok(())
}
