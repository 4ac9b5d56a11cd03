use anyhow::{Context, Result};
use comping::{logger, repl};
use comping_core::Catalog;

struct Options {
    seed: Option<u64>,
    catalog: Option<String>,
    verbose: bool,
}

/// Parse command-line arguments with plain `std::env::args()` matching.
fn parse_args() -> Result<Options> {
    let mut options = Options {
        seed: None,
        catalog: None,
        verbose: false,
    };
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let value = args.get(i).context("--seed requires a number")?;
                options.seed = Some(value.parse().context("--seed requires a number")?);
            }
            "--catalog" => {
                i += 1;
                options.catalog = Some(args.get(i).context("--catalog requires a file")?.clone());
            }
            "--verbose" | "-v" => options.verbose = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                print_usage();
                anyhow::bail!("Unknown argument: {}", other);
            }
        }
        i += 1;
    }

    Ok(options)
}

fn print_usage() {
    println!("Usage: comping [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --seed <N>          Seed questions for a reproducible session");
    println!("  --catalog <FILE>    Load templates from a JSON catalog");
    println!("  --verbose, -v       Debug logging (or set {})", logger::LOG_ENV);
    println!("  --help, -h          Show this help");
}

fn main() -> Result<()> {
    let options = parse_args()?;
    let env_level = std::env::var(logger::LOG_ENV).ok();
    logger::init(logger::level_from(options.verbose, env_level.as_deref()))?;

    let catalog = match &options.catalog {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog {}", path))?;
            Catalog::from_json(&json).with_context(|| format!("Invalid catalog {}", path))?
        }
        None => Catalog::jazz_standard(),
    };
    log::info!(
        "catalog: {} chords, {} scales, {} intervals, {} cadences",
        catalog.chords.len(),
        catalog.scales.len(),
        catalog.intervals.len(),
        catalog.cadences.len()
    );

    repl::start(&catalog, options.seed)
}
