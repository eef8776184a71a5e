//! The background analysis service, end to end.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use sketchcheck::hir::codes;
use sketchcheck::scheduler::ConfigError;
use sketchcheck::{
    Analysis, AnalysisConfig, AnalysisService, FileId, Phase, Resolution, ServiceError,
    SharedSources,
};

use crate::helpers::sketch_helpers::{CountingLoader, TimedSources, WAIT, fast_config};

const BROKEN: &str = "void setup() {\n  undefinedThing(3);\n}\n";
const CLEAN: &str = "void setup() {\n  ellipse(1, 2, 3, 4);\n}\n";

fn start(config: AnalysisConfig, text: &str) -> (AnalysisService, Arc<SharedSources>) {
    let sources = Arc::new(SharedSources::from_files([("main.pde", text)]));
    let service = AnalysisService::new(config, sources.clone()).unwrap();
    (service, sources)
}

/// Poll the published snapshot until `done` holds or [`WAIT`] elapses.
fn wait_until(service: &AnalysisService, done: impl Fn(&Analysis) -> bool) -> bool {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        if done(&service.analysis()) {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

fn edit(service: &AnalysisService, sources: &SharedSources, text: &str) {
    assert!(sources.set_text(FileId::new(0), text));
    service.notify_edit();
}

// =============================================================================
// TICKS
// =============================================================================

#[test]
fn test_first_tick_publishes_without_edits() {
    let (service, _sources) = start(fast_config(), BROKEN);
    assert!(service.wait_for_generation(1, WAIT));
    let diagnostics = service.current_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_ref(), codes::UNDEFINED_METHOD);
    assert_eq!((diagnostics[0].line, diagnostics[0].col), (1, 2));
}

#[test]
fn test_edit_is_picked_up() {
    let (service, sources) = start(fast_config(), BROKEN);
    assert!(service.wait_for_generation(1, WAIT));
    edit(&service, &sources, CLEAN);
    assert!(wait_until(&service, |a| a.diagnostics().is_empty()));
}

#[test]
fn test_idle_sketch_is_not_reanalyzed() {
    let (service, _sources) = start(fast_config(), CLEAN);
    assert!(service.wait_for_generation(1, WAIT));
    thread::sleep(Duration::from_millis(150));
    assert_eq!(service.generation(), 1);
}

#[test]
fn test_run_now_forces_a_cycle() {
    let (service, _sources) = start(fast_config(), CLEAN);
    assert!(service.wait_for_generation(1, WAIT));
    service.run_now();
    assert!(service.wait_for_generation(2, WAIT));
}

#[test]
fn test_burst_of_edits_is_coalesced() {
    let config = fast_config().with_tick_interval(Duration::from_millis(200));
    let (service, sources) = start(config, BROKEN);
    assert!(service.wait_for_generation(1, WAIT));

    for i in 0..10 {
        let text = if i == 9 { CLEAN } else { BROKEN };
        edit(&service, &sources, text);
    }
    assert!(wait_until(&service, |a| a.diagnostics().is_empty()));

    thread::sleep(Duration::from_millis(700));
    // One initial cycle plus at most `max_backlog` for the burst.
    assert!(service.generation() <= 3, "ran {}", service.generation());
    assert!(service.current_diagnostics().is_empty());
}

#[test]
fn test_cycles_never_overlap_under_concurrent_signals() {
    let sources = Arc::new(TimedSources::new(BROKEN));
    let config = AnalysisConfig::default()
        .with_tick_interval(Duration::from_millis(1))
        .with_max_backlog(3);
    let mut service = AnalysisService::new(config, sources.clone()).unwrap();
    let published = service.subscribe();

    thread::scope(|scope| {
        for sender in 0..4 {
            let service = &service;
            scope.spawn(move || {
                let deadline = Instant::now() + Duration::from_millis(300);
                while Instant::now() < deadline {
                    if sender % 2 == 0 {
                        service.notify_edit();
                    } else {
                        service.run_now();
                    }
                    thread::sleep(Duration::from_micros(200));
                }
            });
        }
    });
    service.shutdown();

    // Cycle `g` read the sources at `reads[g - 1]`.
    let reads = sources.reads();
    assert_eq!(reads.len() as u64, service.generation());
    let snapshots: Vec<Analysis> = published.try_iter().collect();
    assert!(snapshots.len() > 5, "only {} cycles", snapshots.len());

    for pair in snapshots.windows(2) {
        assert_eq!(pair[1].generation(), pair[0].generation() + 1);
    }
    for analysis in &snapshots {
        let generation = analysis.generation() as usize;
        let timing = analysis.timing().unwrap();
        assert!(reads[generation - 1] <= timing.started);
        if let Some(next_read) = reads.get(generation) {
            assert!(
                *next_read >= timing.finished,
                "cycle {} started before cycle {generation} finished",
                generation + 1
            );
        }
    }
}

// =============================================================================
// PAUSE
// =============================================================================

#[test]
fn test_resume_after_paused_edits_runs_exactly_once() {
    let (service, sources) = start(fast_config(), CLEAN);
    assert!(service.wait_for_generation(1, WAIT));

    let guard = service.pause();
    for i in 0..50 {
        edit(&service, &sources, if i % 2 == 0 { BROKEN } else { CLEAN });
    }
    edit(&service, &sources, BROKEN);
    thread::sleep(Duration::from_millis(150));
    assert_eq!(service.generation(), 1);

    guard.resume();
    assert!(service.wait_for_generation(2, WAIT));
    thread::sleep(Duration::from_millis(150));
    assert_eq!(service.generation(), 2);
    assert_eq!(service.current_diagnostics().len(), 1);
}

#[test]
fn test_dropping_the_guard_resumes() {
    let (service, sources) = start(fast_config(), CLEAN);
    assert!(service.wait_for_generation(1, WAIT));
    {
        let _guard = service.pause();
        edit(&service, &sources, BROKEN);
    }
    assert!(wait_until(&service, |a| a.diagnostics().len() == 1));
}

// =============================================================================
// CLASSPATH
// =============================================================================

#[test]
fn test_moving_an_import_does_not_rebind() {
    let loader = CountingLoader::default();
    let sources = Arc::new(SharedSources::from_files([(
        "main.pde",
        "import java.util.List;\nvoid setup() {}\n",
    )]));
    let service =
        AnalysisService::with_loader(fast_config(), sources.clone(), loader.clone()).unwrap();
    assert!(service.wait_for_generation(1, WAIT));
    assert_eq!(loader.count(), 1);

    edit(
        &service,
        &sources,
        "// moved\n\n  import java.util.List;\nvoid setup() {}\n",
    );
    assert!(service.wait_for_generation(2, WAIT));
    assert_eq!(loader.count(), 1);

    edit(&service, &sources, "import java.util.Map;\nvoid setup() {}\n");
    let deadline = Instant::now() + WAIT;
    while loader.count() < 2 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(loader.count(), 2);
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn test_queries_answer_before_the_first_cycle() {
    let config = AnalysisConfig::default().with_tick_interval(Duration::from_secs(30));
    let (service, _sources) = start(config, BROKEN);
    let analysis = service.analysis();
    assert_eq!(analysis.generation(), 0);
    assert!(analysis.diagnostics().is_empty());
    assert_eq!(
        service.find_declaration(FileId::new(0), 1, 2, "undefinedThing"),
        Resolution::Unresolved
    );
    assert!(service.completions_for(FileId::new(0), 1, 5, "  und").is_empty());
}

#[test]
fn test_shutdown_stops_ticking() {
    let (mut service, sources) = start(fast_config(), CLEAN);
    assert!(service.wait_for_generation(1, WAIT));
    service.shutdown();
    assert_eq!(service.phase(), Phase::Idle);

    edit(&service, &sources, BROKEN);
    service.run_now();
    thread::sleep(Duration::from_millis(100));
    assert_eq!(service.generation(), 1);
    assert!(service.current_diagnostics().is_empty());
    service.shutdown();
}

#[test]
fn test_invalid_config_is_rejected() {
    let sources = Arc::new(SharedSources::new());
    let result = AnalysisService::new(fast_config().with_max_backlog(0), sources);
    assert!(matches!(
        result,
        Err(ServiceError::Config(ConfigError::ZeroBacklog))
    ));
}
