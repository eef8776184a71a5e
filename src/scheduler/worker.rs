//! The analysis worker thread.
//!
//! Signals arrive over a channel; between signals the worker sleeps until
//! the next tick. The loop is strictly sequential, so at most one cycle is
//! ever in flight and a tick never starts before the previous publish.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::syntax::SourceProvider;

use super::backlog::Backlog;
use super::pipeline::{Phase, PhaseCell, Pipeline};
use super::publish::Publisher;

/// Messages from the service handle to the worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Signal {
    Dirty,
    RunNow,
    Pause,
    Resume,
    Shutdown,
}

/// State shared between the worker and the service handle.
#[derive(Default)]
pub struct Shared {
    pub publisher: Publisher,
    pub phase: PhaseCell,
    pub cycles: AtomicU64,
    pub classpath_reloads: AtomicU64,
}

pub struct Worker {
    signals: Receiver<Signal>,
    sources: Arc<dyn SourceProvider>,
    pipeline: Pipeline,
    backlog: Backlog,
    tick_interval: Duration,
    shared: Arc<Shared>,
}

impl Worker {
    pub fn new(
        signals: Receiver<Signal>,
        sources: Arc<dyn SourceProvider>,
        pipeline: Pipeline,
        backlog: Backlog,
        tick_interval: Duration,
        shared: Arc<Shared>,
    ) -> Self {
        Self {
            signals,
            sources,
            pipeline,
            backlog,
            tick_interval,
            shared,
        }
    }

    pub fn run(mut self) {
        tracing::debug!("[SCHEDULER] worker started, tick {:?}", self.tick_interval);
        let mut next_tick = Instant::now() + self.tick_interval;
        loop {
            let wait = next_tick.saturating_duration_since(Instant::now());
            match self.signals.recv_timeout(wait) {
                Ok(Signal::Dirty) => self.backlog.mark_dirty(),
                Ok(Signal::RunNow) => self.backlog.run_now(),
                Ok(Signal::Pause) => self.backlog.pause(),
                Ok(Signal::Resume) => self.backlog.resume(),
                Ok(Signal::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    self.tick();
                    next_tick = Instant::now() + self.tick_interval;
                }
            }
        }
        self.shared.phase.set(Phase::Idle);
        tracing::debug!("[SCHEDULER] worker stopped");
    }

    fn tick(&mut self) {
        if !self.backlog.should_run() {
            return;
        }
        let files = self.sources.files();
        let snapshot = self.pipeline.run_cycle(&files, &self.shared.phase);
        self.shared.publisher.publish(snapshot);
        self.shared.cycles.fetch_add(1, Ordering::AcqRel);
        self.shared.classpath_reloads.store(
            self.pipeline.classpath().reload_count() as u64,
            Ordering::Release,
        );
        self.shared.phase.set(Phase::Idle);
        self.backlog.cycle_finished();
    }
}
