//! Compares ARC, LRU and the offline optimum on a generated trace.
//!
//! Run with: cargo run --example compare_policies

use evictkit::compare::Comparison;
use evictkit::trace::{DEFAULT_SEED, TraceSpec};

fn main() {
    let spec = TraceSpec {
        count: 10_000,
        capacity: 50,
        low: 0,
        high: 100,
    };
    let trace = match spec.generate(DEFAULT_SEED) {
        Ok(trace) => trace,
        Err(err) => {
            eprintln!("{err}");
            return;
        },
    };

    let report = match Comparison::new(trace.capacity()).run(trace.keys(), |k| k.wrapping_mul(2)) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{err}");
            return;
        },
    };

    print!("{}", report.render_verbose());
    for outcome in report.outcomes() {
        println!("{:>5} hit ratio: {:.3}", outcome.policy, outcome.hit_ratio());
    }
}
