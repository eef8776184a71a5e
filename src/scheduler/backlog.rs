//! The coalesced dirty counter driving the worker.
//!
//! Pure state: the worker feeds it signals and asks it on every tick
//! whether a cycle should run.

/// Pending-cycle counter with pause support.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Backlog {
    pending: usize,
    max: usize,
    pauses: usize,
    dirty_while_paused: bool,
}

impl Backlog {
    /// A backlog holding one pending cycle, so the first tick checks the
    /// sketch as loaded.
    pub fn new(max: usize) -> Self {
        Self {
            pending: 1,
            max: max.max(1),
            pauses: 0,
            dirty_while_paused: false,
        }
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_paused(&self) -> bool {
        self.pauses > 0
    }

    /// Whether an edit arrived while paused.
    pub fn dirty_while_paused(&self) -> bool {
        self.dirty_while_paused
    }

    /// An edit happened.
    pub fn mark_dirty(&mut self) {
        if self.is_paused() {
            self.dirty_while_paused = true;
        } else {
            self.pending = (self.pending + 1).min(self.max);
        }
    }

    /// Make sure the next tick runs a cycle.
    pub fn run_now(&mut self) {
        self.pending = self.pending.max(1);
    }

    pub fn pause(&mut self) {
        self.pauses += 1;
    }

    /// Undo one [`pause`](Self::pause). Leaving the last pause schedules
    /// exactly one cycle.
    pub fn resume(&mut self) {
        if self.pauses == 0 {
            tracing::warn!("[SCHEDULER] resume without matching pause");
            return;
        }
        self.pauses -= 1;
        if self.pauses == 0 {
            tracing::debug!(
                "[SCHEDULER] resumed (dirty while paused: {})",
                self.dirty_while_paused
            );
            self.pending = 1;
            self.dirty_while_paused = false;
        }
    }

    /// Whether this tick runs a cycle.
    pub fn should_run(&self) -> bool {
        !self.is_paused() && self.pending > 0
    }

    /// A cycle has been published.
    pub fn cycle_finished(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Cycles run by ticking until the backlog drains.
    fn drain(backlog: &mut Backlog) -> usize {
        let mut cycles = 0;
        while backlog.should_run() {
            backlog.cycle_finished();
            cycles += 1;
        }
        cycles
    }

    #[rstest]
    #[case(1, 2, 1)]
    #[case(2, 2, 2)]
    #[case(10, 2, 2)]
    #[case(10, 3, 3)]
    fn test_edits_coalesce_to_bounded_cycles(
        #[case] edits: usize,
        #[case] max: usize,
        #[case] expected: usize,
    ) {
        let mut backlog = Backlog::new(max);
        drain(&mut backlog);
        for _ in 0..edits {
            backlog.mark_dirty();
        }
        assert_eq!(drain(&mut backlog), expected.min(edits));
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut backlog = Backlog::new(2);
        assert_eq!(drain(&mut backlog), 1);
        assert!(!backlog.should_run());
    }

    #[test]
    fn test_decrement_not_reset() {
        let mut backlog = Backlog::new(2);
        backlog.mark_dirty();
        assert_eq!(backlog.pending(), 2);
        backlog.cycle_finished();
        assert!(backlog.should_run());
    }

    #[test]
    fn test_run_now() {
        let mut backlog = Backlog::new(2);
        drain(&mut backlog);
        backlog.run_now();
        assert_eq!(backlog.pending(), 1);
        backlog.mark_dirty();
        backlog.run_now();
        assert_eq!(backlog.pending(), 2);
    }

    #[test]
    fn test_resume_schedules_exactly_one_cycle() {
        let mut backlog = Backlog::new(3);
        drain(&mut backlog);
        backlog.pause();
        for _ in 0..5 {
            backlog.mark_dirty();
        }
        assert!(backlog.dirty_while_paused());
        assert!(!backlog.should_run());
        backlog.resume();
        assert!(!backlog.dirty_while_paused());
        assert_eq!(drain(&mut backlog), 1);
    }

    #[test]
    fn test_nested_pauses() {
        let mut backlog = Backlog::new(2);
        drain(&mut backlog);
        backlog.pause();
        backlog.pause();
        backlog.resume();
        assert!(!backlog.should_run());
        backlog.resume();
        assert!(backlog.should_run());
        backlog.resume();
        assert_eq!(drain(&mut backlog), 1);
    }
}
