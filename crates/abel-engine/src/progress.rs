//! Progress reporting for long computations.
//!
//! The integrator walks one graph at a time across a rayon pool; a
//! [`ProgressSink`] receives a tick per finished graph. The default sink is
//! silent, the logging sink reports through the `log` facade so callers
//! keep control of the output channel.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::info;

/// Receiver of integration progress. Ticks arrive from worker threads.
pub trait ProgressSink: Sync {
    fn begin(&self, total_graphs: usize);
    fn graph_done(&self);
    fn finish(&self);
}

/// Sink that ignores all progress.
#[derive(Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin(&self, _total_graphs: usize) {}
    fn graph_done(&self) {}
    fn finish(&self) {}
}

/// Sink that reports through the `log` facade, throttled so large runs do
/// not flood the output.
pub struct LogProgress {
    total: AtomicUsize,
    done: AtomicUsize,
    every: usize,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::with_interval(500)
    }

    /// Reports every `every` finished graphs.
    pub fn with_interval(every: usize) -> Self {
        LogProgress {
            total: AtomicUsize::new(0),
            done: AtomicUsize::new(0),
            every: every.max(1),
        }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for LogProgress {
    fn begin(&self, total_graphs: usize) {
        self.total.store(total_graphs, Ordering::Relaxed);
        self.done.store(0, Ordering::Relaxed);
        info!("summing over {} fixed-locus graphs", total_graphs);
    }

    fn graph_done(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.every == 0 {
            info!(
                "processed {}/{} graphs",
                done,
                self.total.load(Ordering::Relaxed)
            );
        }
    }

    fn finish(&self) {
        info!(
            "processed all {} graphs",
            self.total.load(Ordering::Relaxed)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_counts() {
        let sink = LogProgress::with_interval(2);
        sink.begin(5);
        for _ in 0..5 {
            sink.graph_done();
        }
        sink.finish();
        assert_eq!(sink.done.load(Ordering::Relaxed), 5);
    }
}
