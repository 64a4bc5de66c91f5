//! # chunkgen
//!
//! Generates a square of floating-terrain chunks around the origin and
//! prints statistics for each one.
//!
//! ```bash
//! # Defaults: seed 1337, 3x3 chunks, built-in tuning
//! chunkgen
//!
//! # Custom tuning, 5x5 chunks, verbose logging
//! RUST_LOG=debug chunkgen --config data/terrain.toml --radius 2 --seed 42
//! ```

use std::time::Instant;

use aerie::cli::{CliArgs, CliError, USAGE};
use aerie::report::ChunkStats;
use aerie_procedural::{ChunkCoord, TerrainConfig, WorldSeed};
use aerie_streaming::ChunkDispatcher;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(CliError::Help) => {
            println!("{USAGE}");
            return;
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    AERIE CHUNK GENERATOR v{}", env!("CARGO_PKG_VERSION"));
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    let config = match &args.config {
        Some(path) => match TerrainConfig::from_toml_file(path) {
            Ok(config) => {
                println!("  Config:   {}", path.display());
                config
            }
            Err(e) => {
                eprintln!("   ✗ FATAL: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("  Config:   built-in defaults");
            TerrainConfig::default()
        }
    };

    let workers = args.worker_count();
    println!("  Seed:     {}", args.seed);
    println!("  Chunk:    {} samples, LOD {}", config.chunk_size, config.lod);
    println!("  Square:   {0}x{0} chunks", 2 * args.radius + 1);
    println!("  Workers:  {workers}");
    println!();

    let mut dispatcher = match ChunkDispatcher::new(WorldSeed::new(args.seed), config, workers) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            eprintln!("   ✗ FATAL: {e}");
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    for y in -args.radius..=args.radius {
        for x in -args.radius..=args.radius {
            if let Err(e) = dispatcher.request(ChunkCoord::new(x, y)) {
                eprintln!("   ✗ FATAL: {e}");
                std::process::exit(1);
            }
        }
    }

    let mut stats: Vec<ChunkStats> = dispatcher
        .wait_all()
        .iter()
        .map(ChunkStats::from_chunk)
        .collect();
    let elapsed = start.elapsed();
    tracing::info!("Dispatcher stats: {:?}", dispatcher.stats());
    dispatcher.shutdown();

    stats.sort_by_key(|s| (s.coord.y, s.coord.x));
    for s in &stats {
        println!("  {s}");
    }

    let empty = stats.iter().filter(|s| s.is_empty()).count();
    let triangles: usize = stats.iter().map(|s| s.triangles).sum();

    println!();
    println!("═══════════════════════════════════════════════════════════════════");
    println!(
        "  {} chunks ({} empty), {} top triangles in {:.1?}",
        stats.len(),
        empty,
        triangles,
        elapsed
    );
    println!("═══════════════════════════════════════════════════════════════════");
}
