//! Benchmark runner: prepare, multiply on N workers, dump C, report timings.

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::time::Instant;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use matmul_sync::config::Cli;
use matmul_sync::matrix::layout::prepare;
use matmul_sync::matrix::naive_ijk::multiply_naive;
use matmul_sync::report::dump::write_matrix_file;
use matmul_sync::report::profile::{OpCounts, Profile, Timings};
use matmul_sync::threaded::multiplier::SyncMultiplier;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cfg = Cli::parse().into_config();
    info!(dim = cfg.dim, threads = cfg.threads, "starting run");

    let t0 = Instant::now();
    let mut ops = prepare(cfg.dim);
    let t1 = Instant::now();

    let engine = SyncMultiplier::for_dim(cfg.dim, cfg.threads)?;
    for (w, range) in engine.ranges().iter().enumerate() {
        debug!(worker = w, rows = %range, "assigned");
    }
    info!(workers = engine.workers(), "multiplying");
    let stats = engine
        .run(&ops.a, &ops.b_t, &mut ops.c)
        .context("multiplication failed")?;

    let t2 = Instant::now();
    write_matrix_file(&ops.c, &cfg.output)
        .with_context(|| format!("writing result to {}", cfg.output.display()))?;
    let t3 = Instant::now();

    let profile = Profile::new(
        Timings {
            init: t1 - t0,
            mult: stats.elapsed,
            print: t3 - t2,
            total: t3 - t0,
        },
        OpCounts::for_dim(cfg.dim),
    );

    let mut stdout = io::stdout().lock();
    profile.write_summary(&mut stdout)?;
    stdout.flush()?;

    let file = File::create(&cfg.profile)
        .with_context(|| format!("creating {}", cfg.profile.display()))?;
    let mut report = BufWriter::new(file);
    profile.write_key_values(&mut report)?;
    report.flush()?;

    if cfg.verify {
        let expected = multiply_naive(&ops.a, &ops.b)?;
        ensure!(expected == ops.c, "result does not match the reference product");
        info!("result verified against reference product");
    }

    Ok(())
}
