use balanced_trees::avl_tree::{AvlSet, IterativeAvlSet};
use balanced_trees::red_black_tree::RedBlackSet;
use balanced_trees::OrderedSet;
use clap::Parser;
use log::{error, info, LevelFilter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simplelog::{Config, SimpleLogger};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

/// Times bulk insertion and removal for each tree and checks their contents against `BTreeSet`.
#[derive(Debug, Parser)]
#[command(name = "bst-compare")]
struct Opts {
    /// Number of random keys to insert and remove.
    #[arg(short, long, default_value_t = 1_000_000)]
    size: usize,

    /// Largest key that may be generated.
    #[arg(short, long, default_value_t = 10_000_000, value_parser = clap::value_parser!(i32).range(0..))]
    max_value: i32,

    /// Number of timing runs to average.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    runs: u32,

    /// Seed for the key generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

#[derive(Debug)]
struct MismatchError {
    trees: Vec<&'static str>,
}

impl Error for MismatchError {}

impl fmt::Display for MismatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "trees disagree with the reference set: {}", self.trees.join(", "))
    }
}

#[derive(Default)]
struct Timings {
    insert: Duration,
    remove: Duration,
}

impl Timings {
    fn report(&self, name: &str, runs: u32) {
        let millis = |duration: Duration| duration.as_secs_f64() * 1000.0 / f64::from(runs);
        info!(
            "{:<10}{:<20.3}{:<20.3}",
            name,
            millis(self.insert),
            millis(self.remove),
        );
    }
}

fn time_set<S: OrderedSet + Default>(keys: &[i32], timings: &mut Timings) {
    let mut set = S::default();

    let start = Instant::now();
    for key in keys {
        set.insert(*key);
    }
    timings.insert += start.elapsed();

    let start = Instant::now();
    for key in keys {
        set.remove(*key);
    }
    timings.remove += start.elapsed();
}

fn time_reference(keys: &[i32], timings: &mut Timings) {
    let mut set = BTreeSet::new();

    let start = Instant::now();
    for key in keys {
        set.insert(*key);
    }
    timings.insert += start.elapsed();

    let start = Instant::now();
    for key in keys {
        set.remove(key);
    }
    timings.remove += start.elapsed();
}

// Inserts every key, then removes the keys at even indices.
fn prepare<S: OrderedSet + Default>(keys: &[i32]) -> S {
    let mut set = S::default();
    for key in keys {
        set.insert(*key);
    }
    for key in keys.iter().step_by(2) {
        set.remove(*key);
    }
    set
}

fn check<S: OrderedSet + Default>(name: &'static str, keys: &[i32], expected: &[i32]) -> bool {
    let set = prepare::<S>(keys);
    let is_equal = set.to_sorted_vec() == expected;
    info!("Are {} and BTreeSet equal? {}", name, if is_equal { "yes" } else { "no" });

    match set.validate() {
        Ok(()) => is_equal,
        Err(err) => {
            error!("{} failed validation: {}", name, err);
            false
        },
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let opts = Opts::parse();
    SimpleLogger::init(opts.log_level, Config::default())?;

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let keys: Vec<i32> = (0..opts.size)
        .map(|_| rng.gen_range(0..=opts.max_value))
        .collect();

    let mut reference = Timings::default();
    let mut avl = Timings::default();
    let mut iterative_avl = Timings::default();
    let mut red_black = Timings::default();
    for run in 0..opts.runs {
        info!("Timing run {} of {}.", run + 1, opts.runs);
        time_reference(&keys, &mut reference);
        time_set::<AvlSet>(&keys, &mut avl);
        time_set::<IterativeAvlSet>(&keys, &mut iterative_avl);
        time_set::<RedBlackSet>(&keys, &mut red_black);
    }

    info!("Test insert/remove with {} elements", keys.len());
    info!("{:<10}{:<20}{:<20}", "tree", "insert, ms", "remove, ms");
    reference.report("BTreeSet", opts.runs);
    avl.report("avlRec", opts.runs);
    iterative_avl.report("avlIter", opts.runs);
    red_black.report("rb", opts.runs);

    let mut expected = BTreeSet::new();
    for key in &keys {
        expected.insert(*key);
    }
    for key in keys.iter().step_by(2) {
        expected.remove(key);
    }
    let expected: Vec<i32> = expected.into_iter().collect();

    let mut failed = Vec::new();
    if !check::<AvlSet>("avlRec", &keys, &expected) {
        failed.push("avlRec");
    }
    if !check::<IterativeAvlSet>("avlIter", &keys, &expected) {
        failed.push("avlIter");
    }
    if !check::<RedBlackSet>("rb", &keys, &expected) {
        failed.push("rb");
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(Box::new(MismatchError { trees: failed }))
    }
}
