//! Named wall-clock timers, summarised at the end of a run.
//!
//! ```rust
//! # use portprobe::benchmark::{Benchmark, NamedTimer};
//! let mut bench = Benchmark::init();
//! let mut timer = NamedTimer::start("Scan");
//! timer.end();
//! bench.push(timer);
//! assert!(bench.summary().contains("Scan"));
//! ```
use std::time::Instant;

#[derive(Debug, Default)]
pub struct Benchmark {
    named_timers: Vec<NamedTimer>,
}

impl Benchmark {
    pub const fn init() -> Self {
        Self {
            named_timers: Vec::new(),
        }
    }

    pub fn push(&mut self, timer: NamedTimer) {
        self.named_timers.push(timer);
    }

    /// One line per finished timer. Timers never ended are left out.
    pub fn summary(&self) -> String {
        let mut summary = String::from("\nportprobe benchmark summary");
        for timer in &self.named_timers {
            if let (Some(start), Some(end)) = (timer.start, timer.end) {
                let elapsed = end.duration_since(start);
                summary.push_str(&format!(
                    "\n{:<15} | {:.3}s",
                    timer.name,
                    elapsed.as_secs_f32()
                ));
            }
        }
        summary
    }
}

#[derive(Debug)]
pub struct NamedTimer {
    name: &'static str,
    start: Option<Instant>,
    end: Option<Instant>,
}

impl NamedTimer {
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Some(Instant::now()),
            end: None,
        }
    }

    pub fn end(&mut self) {
        self.end = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::{Benchmark, NamedTimer};

    #[test]
    fn summary_lists_finished_timers_only() {
        let mut bench = Benchmark::init();
        let mut finished = NamedTimer::start("Parse");
        finished.end();
        bench.push(finished);
        bench.push(NamedTimer::start("Dangling"));

        let summary = bench.summary();
        assert!(summary.contains("Parse"));
        assert!(!summary.contains("Dangling"));
    }
}
