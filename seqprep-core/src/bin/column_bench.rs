//! Column Benchmarking Tool
//!
//! Measures normalization throughput over a line-per-record text file,
//! such as a dump of review texts or subtitles.
//!
//! ## Usage
//!
//! ```bash
//! # Sequential driver only
//! ./target/release/column_bench /path/to/records.txt sequential
//!
//! # Rayon driver only
//! ./target/release/column_bench /path/to/records.txt parallel
//!
//! # Both (default)
//! ./target/release/column_bench /path/to/records.txt all
//! ```
//!
//! Set `RUST_LOG=seqprep_core=debug` to see the per-call driver events.
//!
//! ## Example Output
//!
//! ```text
//! === Sequential ===
//! --------------------------------
//! Mode        : Sequential
//! Elapsed     : 0.452 s
//! Throughput  : 218.40 MiB/s
//! Records     : 1_048_576
//! Records/sec : 2_319_858
//! --------------------------------
//! ```

use std::env;
use std::fs;
use std::process;
use std::time::{Duration, Instant};

use seqprep_core::column::{apply, apply_parallel};
use seqprep_core::TextNormalizer;
use tracing::info;
use tracing_subscriber::EnvFilter;

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Sequential,
    Parallel,
    All,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: column_bench <path> [sequential|parallel|all]");
        process::exit(1);
    }

    let path = &args[1];

    let mode = match args.get(2).map(String::as_str) {
        Some("sequential") => Mode::Sequential,
        Some("parallel") => Mode::Parallel,
        None | Some("all") => Mode::All,
        Some(other) => {
            eprintln!("Unknown mode: {other}");
            process::exit(1);
        }
    };

    println!("Loading file...");
    let bytes = fs::read(path)?;
    let input = std::str::from_utf8(&bytes)?;
    let records: Vec<&str> = input.lines().collect();
    info!(path = %path, records = records.len(), "loaded input");

    println!("File size: {}", fmt_bytes(input.len() as u64));
    println!("Records:   {}", fmt_count(records.len() as u64));
    println!("Mode:      {:?}\n", mode);

    let normalizer: TextNormalizer = TextNormalizer::default();

    if mode != Mode::Parallel {
        bench("Sequential", input.len(), records.len(), || {
            std::hint::black_box(apply(&normalizer, &records));
        });
    }
    if mode != Mode::Sequential {
        bench("Parallel", input.len(), records.len(), || {
            std::hint::black_box(apply_parallel(&normalizer, &records));
        });
    }

    Ok(())
}

fn bench<F: FnMut()>(label: &str, input_bytes: usize, records: usize, mut f: F) {
    println!("=== {label} ===");

    warmup(&mut f);
    let elapsed = measure(&mut f);

    print_perf(label, input_bytes, elapsed, records as u64);
}

fn warmup<F: FnMut()>(mut f: F) {
    for _ in 0..WARMUP_RUNS {
        f();
    }
}

fn measure<F: FnMut()>(mut f: F) -> Duration {
    let mut total = Duration::ZERO;

    for _ in 0..MEASURE_RUNS {
        let start = Instant::now();
        f();
        total += start.elapsed();
    }

    total / MEASURE_RUNS as u32
}

fn print_perf(label: &str, input_bytes: usize, elapsed: Duration, records: u64) {
    let secs = elapsed.as_secs_f64();
    let mib = input_bytes as f64 / (1024.0 * 1024.0);

    println!("--------------------------------");
    println!("Mode        : {}", label);
    println!("Elapsed     : {:.3} s", secs);
    println!("Throughput  : {:.2} MiB/s", mib / secs);

    if records > 0 {
        println!("Records     : {}", fmt_count(records));
        println!("Records/sec : {}", fmt_count((records as f64 / secs) as u64));
    }

    println!("--------------------------------\n");
}

fn fmt_bytes(b: u64) -> String {
    if b >= 1024 * 1024 * 1024 {
        format!("{:.2} GiB", b as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if b >= 1024 * 1024 {
        format!("{:.2} MiB", b as f64 / (1024.0 * 1024.0))
    } else if b >= 1024 {
        format!("{:.2} KiB", b as f64 / 1024.0)
    } else {
        format!("{} B", b)
    }
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
