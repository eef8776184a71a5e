//! Sketch fixtures and one-shot analysis.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use sketchcheck::project::{
    ClassLoader, ClassLookup, ClasspathEntry, ClasspathError, JarClassLoader,
};
use sketchcheck::scheduler::{PhaseCell, Pipeline};
use sketchcheck::{
    Analysis, AnalysisConfig, Diagnostic, FileId, SharedSources, SourceFile, SourceProvider,
};

/// Source files in tab order.
pub fn sources(texts: &[&str]) -> Vec<SourceFile> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| SourceFile::new(FileId::from(i), format!("tab{i}.pde"), *text))
        .collect()
}

/// Run one synchronous cycle over `texts` and return a query handle.
pub fn analyze(texts: &[&str]) -> Analysis {
    analyze_with(&AnalysisConfig::default(), texts)
}

pub fn analyze_with(config: &AnalysisConfig, texts: &[&str]) -> Analysis {
    let mut pipeline = Pipeline::new(config, JarClassLoader);
    let snapshot = pipeline.run_cycle(&sources(texts), &PhaseCell::default());
    Analysis::new(Arc::new(snapshot))
}

/// Codes of all diagnostics, in publication order.
pub fn codes(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.code.as_ref()).collect()
}

/// A configuration that ticks fast enough for tests.
pub fn fast_config() -> AnalysisConfig {
    AnalysisConfig::default().with_tick_interval(Duration::from_millis(20))
}

pub const WAIT: Duration = Duration::from_secs(5);

/// A [`JarClassLoader`] that counts how often it binds.
#[derive(Clone, Default)]
pub struct CountingLoader {
    pub binds: Arc<AtomicUsize>,
}

impl CountingLoader {
    pub fn count(&self) -> usize {
        self.binds.load(Ordering::SeqCst)
    }
}

impl ClassLoader for CountingLoader {
    fn bind(&self, entries: &[ClasspathEntry]) -> Result<Arc<dyn ClassLookup>, ClasspathError> {
        self.binds.fetch_add(1, Ordering::SeqCst);
        JarClassLoader.bind(entries)
    }
}

/// A one-tab [`SourceProvider`] that records when each cycle reads it and
/// holds the read for a moment, widening the window in which two cycles
/// could overlap.
pub struct TimedSources {
    inner: SharedSources,
    reads: Mutex<Vec<Instant>>,
}

impl TimedSources {
    pub fn new(text: &str) -> Self {
        Self {
            inner: SharedSources::from_files([("main.pde", text)]),
            reads: Mutex::new(Vec::new()),
        }
    }

    pub fn reads(&self) -> Vec<Instant> {
        self.reads.lock().clone()
    }
}

impl SourceProvider for TimedSources {
    fn files(&self) -> Vec<SourceFile> {
        self.reads.lock().push(Instant::now());
        thread::sleep(Duration::from_millis(1));
        self.inner.files()
    }
}
