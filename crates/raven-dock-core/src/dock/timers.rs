use std::time::Duration;

use crate::platform::{Scheduler, TimerId};

/// Kinds of single-shot timers a dock owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockTimer {
    /// End of the running slide transition
    Slide,
    /// Grace period before the barrier is dropped after showing
    RemoveBarrier,
    /// Pointer has rested on the edge long enough
    Dwell,
    /// Check whether the pointer left the dock after a pressure show
    PressurePoll,
    /// Dead time between scroll-driven workspace switches
    ScrollDeadTime,
    /// Hide the number overlay again
    NumberOverlay,
}

const KINDS: [DockTimer; 6] = [
    DockTimer::Slide,
    DockTimer::RemoveBarrier,
    DockTimer::Dwell,
    DockTimer::PressurePoll,
    DockTimer::ScrollDeadTime,
    DockTimer::NumberOverlay,
];

/// At most one pending timer per kind
#[derive(Debug, Default)]
pub struct DockTimers {
    pending: [Option<TimerId>; 6],
}

fn slot(kind: DockTimer) -> usize {
    kind as usize
}

impl DockTimers {
    pub fn is_pending(&self, kind: DockTimer) -> bool {
        self.pending[slot(kind)].is_some()
    }

    /// Arm `kind`, cancelling the previous timer of that kind
    pub fn arm<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, kind: DockTimer, delay: Duration) {
        self.cancel(scheduler, kind);
        self.pending[slot(kind)] = Some(scheduler.schedule(delay));
    }

    pub fn cancel<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, kind: DockTimer) {
        if let Some(id) = self.pending[slot(kind)].take() {
            scheduler.cancel(id);
        }
    }

    pub fn cancel_all<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        for kind in KINDS {
            self.cancel(scheduler, kind);
        }
    }

    /// Resolve a fired timer; unknown or stale ids yield None
    pub fn fire(&mut self, id: TimerId) -> Option<DockTimer> {
        let kind = KINDS
            .into_iter()
            .find(|kind| self.pending[slot(*kind)] == Some(id))?;
        self.pending[slot(kind)] = None;
        Some(kind)
    }
}
