//! Periodic pass scheduling with prompt shutdown

use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

/// Runs a tick immediately, then once per interval, until shutdown
///
/// Ticks never overlap: the next one starts only after the previous one has
/// returned. When a tick overruns the interval the next one starts right away.
pub struct IntervalScheduler {
    interval: Duration,
    shutdown: Receiver<()>,
}

impl IntervalScheduler {
    pub const fn new(interval: Duration, shutdown: Receiver<()>) -> Self {
        Self { interval, shutdown }
    }

    /// Block until a shutdown message arrives or its sender is dropped
    ///
    /// Returns the number of ticks run.
    pub fn run<F: FnMut()>(&self, mut tick: F) -> usize {
        let mut ticks = 0;

        loop {
            match self.shutdown.try_recv() {
                Err(TryRecvError::Empty) => {}
                Ok(()) | Err(TryRecvError::Disconnected) => break,
            }

            let started = Instant::now();
            tick();
            ticks += 1;

            let wait = self.interval.saturating_sub(started.elapsed());
            match self.shutdown.recv_timeout(wait) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        ticks
    }
}
