//! Pseudo-random box operations on a high-dimensional manager.
//!
//! Run with:
//! ```bash
//! cargo run --release --example soak -- --dims 100 --ops 10000
//! ```

use std::collections::HashMap;
use std::time::Instant;

use clap::Parser;
use idd_rs::interval::{Boundary, Interval};
use idd_rs::manager::{IddConfig, IddManager};
use log::info;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Parser)]
#[command(author, version, about = "Random intersections and unions of boxes")]
struct Cli {
    /// Number of dimensions
    #[arg(long, default_value = "100")]
    dims: usize,

    /// Number of operations
    #[arg(long, default_value = "10000")]
    ops: usize,

    /// Compact the unique table every that many operations (0 to disable)
    #[arg(long, default_value = "1000")]
    release_every: usize,

    /// Random seed
    #[arg(long, default_value = "3141526535")]
    seed: u64,

    /// Cache size in bits (size = 2^bits)
    #[arg(long, default_value = "10")]
    cache_bits: usize,
}

fn random_boundary(rng: &mut ChaCha8Rng) -> Boundary {
    if rng.random_bool(0.5) {
        Boundary::Open
    } else {
        Boundary::Closed
    }
}

fn random_box(rng: &mut ChaCha8Rng, dims: usize) -> HashMap<usize, Interval> {
    let mut b = HashMap::with_capacity(dims);
    for v in 0..dims {
        let mut low = rng.random_range(0.0..1000.0);
        if rng.random_bool(0.5) {
            low = -low;
        }
        let high = low + rng.random_range(0.0..1000.0);
        let interval = Interval::from_bounds(low, random_boundary(rng), high, random_boundary(rng));
        b.insert(v, interval);
    }
    b
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let cli = Cli::parse();
    info!("{:?}", cli);

    let config = IddConfig::default().with_cache_bits(cli.cache_bits);
    let manager = IddManager::<usize, bool>::with_config(config);
    for v in 0..cli.dims {
        manager.internalize_variable(v);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);
    let start = Instant::now();

    let mut dd = manager.from_box(&random_box(&mut rng, cli.dims), true, false);
    let (mut ands, mut ors) = (0, 0);
    for i in 0..cli.ops {
        let tmp = manager.from_box(&random_box(&mut rng, cli.dims), true, false);
        if rng.random_bool(0.5) {
            dd = manager.apply_and(&dd, &tmp);
            ands += 1;
        } else {
            dd = manager.apply_or(&dd, &tmp);
            ors += 1;
        }
        if cli.release_every > 0 && (i + 1) % cli.release_every == 0 {
            manager.release_except(&[dd.clone()]);
            info!(
                "after {} ops: size = {}, live nodes = {}",
                i + 1,
                manager.size(&dd),
                manager.num_nodes()
            );
        }
    }

    let elapsed = start.elapsed();
    println!(
        "random test with {} dimensions and {} operations ({} and, {} or) took {:.3} seconds",
        cli.dims,
        cli.ops,
        ands,
        ors,
        elapsed.as_secs_f64()
    );
    println!("result: size = {}, paths = {}", manager.size(&dd), manager.path_count(&dd));

    Ok(())
}
