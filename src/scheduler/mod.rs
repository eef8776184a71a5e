//! Background analysis scheduling.
//!
//! ## Key Types
//!
//! - [`AnalysisService`]: Owns the worker thread; the host's entry point
//! - [`AnalysisConfig`]: Settings the service is built from
//! - [`PauseGuard`]: Holds ticks off while the host batches edits
//!
//! ## Flow
//!
//! ```text
//! notify_edit ─┐
//! run_now ─────┼─ Signal ─→ worker: backlog → tick → Pipeline::run_cycle
//! pause/resume ┘                                        │
//!                                                       ▼
//! analysis() / current_diagnostics() ←── ArcSwap<Snapshot> (Publisher)
//! subscribe()                        ←── Receiver<Analysis> per publish
//! ```

mod backlog;
mod config;
mod pipeline;
mod publish;
mod worker;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;

use crate::base::FileId;
use crate::hir::{Diagnostic, Resolution};
use crate::ide::{Analysis, CompletionCandidate};
use crate::project::{ClassLoader, JarClassLoader};
use crate::syntax::SourceProvider;

pub use backlog::Backlog;
pub use config::{AnalysisConfig, ConfigError};
pub use pipeline::{Phase, PhaseCell, Pipeline};
pub use publish::Publisher;

use worker::{Shared, Signal, Worker};

/// Errors raised when starting an [`AnalysisService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to start the analysis worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Runs analysis cycles in the background and answers queries from the
/// last published snapshot.
///
/// Queries never wait for a cycle. Dropping the service stops the worker.
pub struct AnalysisService {
    signals: Sender<Signal>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl AnalysisService {
    /// Start a service that binds library jars with the [`JarClassLoader`].
    pub fn new(
        config: AnalysisConfig,
        sources: Arc<dyn SourceProvider>,
    ) -> Result<Self, ServiceError> {
        Self::with_loader(config, sources, JarClassLoader)
    }

    /// Start a service with a custom class loader.
    pub fn with_loader(
        config: AnalysisConfig,
        sources: Arc<dyn SourceProvider>,
        loader: impl ClassLoader + 'static,
    ) -> Result<Self, ServiceError> {
        config.validate()?;
        let (signals, receiver) = mpsc::channel();
        let shared = Arc::new(Shared::default());
        let worker = Worker::new(
            receiver,
            sources,
            Pipeline::new(&config, loader),
            Backlog::new(config.max_backlog),
            config.tick_interval,
            shared.clone(),
        );
        let handle = thread::Builder::new()
            .name("sketch-analysis".into())
            .spawn(move || worker.run())?;
        tracing::info!(
            "[SCHEDULER] analysis service started for {}",
            config.class_name
        );
        Ok(Self {
            signals,
            shared,
            worker: Some(handle),
        })
    }

    fn send(&self, signal: Signal) {
        if self.signals.send(signal).is_err() {
            tracing::warn!("[SCHEDULER] worker gone, dropped {signal:?}");
        }
    }

    // ==================== Control ====================

    /// Record that some file changed.
    pub fn notify_edit(&self) {
        self.send(Signal::Dirty);
    }

    /// Make the next tick run a cycle whatever the backlog holds.
    pub fn run_now(&self) {
        self.send(Signal::RunNow);
    }

    /// Turn ticks into no-ops until the returned guard is resumed or dropped.
    pub fn pause(&self) -> PauseGuard {
        self.send(Signal::Pause);
        PauseGuard {
            signals: Some(self.signals.clone()),
        }
    }

    /// Stop the worker and wait for it to exit. A running cycle finishes
    /// first.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };
        let _ = self.signals.send(Signal::Shutdown);
        if handle.join().is_err() {
            tracing::error!("[SCHEDULER] worker thread panicked");
        }
    }

    // ==================== Queries ====================

    /// A handle on the current snapshot.
    pub fn analysis(&self) -> Analysis {
        Analysis::new(self.shared.publisher.load())
    }

    pub fn current_diagnostics(&self) -> Vec<Diagnostic> {
        self.analysis().diagnostics().to_vec()
    }

    pub fn find_declaration(&self, file: FileId, line: usize, col: usize, name: &str) -> Resolution {
        self.analysis().find_declaration(file, line, col, name)
    }

    pub fn completions_for(
        &self,
        file: FileId,
        line: usize,
        col: usize,
        prefix: &str,
    ) -> Vec<CompletionCandidate> {
        self.analysis().completions_for(file, line, col, prefix)
    }

    // ==================== Status ====================

    /// Receive a handle on every snapshot published from now on, in order.
    pub fn subscribe(&self) -> Receiver<Analysis> {
        self.shared.publisher.subscribe()
    }

    /// Block until a cycle numbered `generation` or later has published.
    pub fn wait_for_generation(&self, generation: u64, timeout: Duration) -> bool {
        self.shared.publisher.wait_for_generation(generation, timeout)
    }

    /// Generation of the current snapshot.
    pub fn generation(&self) -> u64 {
        self.shared.publisher.generation()
    }

    pub fn phase(&self) -> Phase {
        self.shared.phase.get()
    }

    /// Number of cycles run so far.
    pub fn cycles_run(&self) -> u64 {
        self.shared.cycles.load(Ordering::Acquire)
    }

    /// Number of times the classpath was re-resolved and rebound.
    pub fn classpath_reloads(&self) -> u64 {
        self.shared.classpath_reloads.load(Ordering::Acquire)
    }
}

impl Drop for AnalysisService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Keeps the scheduler paused. Resuming schedules exactly one cycle.
#[must_use = "the scheduler resumes as soon as the guard is dropped"]
pub struct PauseGuard {
    signals: Option<Sender<Signal>>,
}

impl PauseGuard {
    pub fn resume(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(signals) = self.signals.take() {
            let _ = signals.send(Signal::Resume);
        }
    }
}

impl Drop for PauseGuard {
    fn drop(&mut self) {
        self.release();
    }
}
