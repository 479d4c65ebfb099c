use std::f64::consts::PI;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

/// Period of the shared icon timeline
pub const DANCE_PERIOD: Duration = Duration::from_millis(3000);

/// Launcher-side identifier of an animated icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    /// Wiggle of an icon demanding attention
    Dance,
}

/// Rotation in degrees for a timeline progress in [0, 1)
pub fn dance_rotation(progress: f64) -> f64 {
    if progress < 1.0 / 6.0 {
        15.0 * (progress * 24.0 * PI).sin()
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    icon: IconId,
    kind: AnimationKind,
}

/// Repeating timeline with an optional start time
#[derive(Debug, Clone)]
struct Timeline {
    period: Duration,
    started_at: Option<Duration>,
}

impl Timeline {
    fn start(&mut self, now: Duration) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    fn stop(&mut self) {
        self.started_at = None;
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    fn progress(&self, now: Duration) -> f64 {
        let Some(start) = self.started_at else {
            return 0.0;
        };
        let period = self.period.as_secs_f64();
        if period <= 0.0 {
            return 0.0;
        }
        let elapsed = now.saturating_sub(start).as_secs_f64();
        (elapsed % period) / period
    }
}

/// Drives long-running icon animations in sync with each other and pauses
/// them while the dock is hidden.
#[derive(Debug, Clone)]
pub struct IconAnimator {
    timeline: Timeline,
    started: bool,
    animations: Vec<Registration>,
}

impl Default for IconAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl IconAnimator {
    pub fn new() -> Self {
        Self {
            timeline: Timeline {
                period: DANCE_PERIOD,
                started_at: None,
            },
            started: false,
            animations: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.animations.len()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// True while frames have to be delivered
    pub fn is_running(&self) -> bool {
        self.timeline.is_playing()
    }

    pub fn start(&mut self, now: Duration) {
        if !self.started && self.count() > 0 {
            self.timeline.start(now);
        }
        self.started = true;
    }

    pub fn pause(&mut self) {
        if self.started && self.count() > 0 {
            self.timeline.stop();
        }
        self.started = false;
    }

    /// Icons with at least one registered animation
    pub fn icons(&self) -> impl Iterator<Item = IconId> + '_ {
        self.animations.iter().map(|a| a.icon)
    }

    pub fn add_animation(&mut self, icon: IconId, kind: AnimationKind, now: Duration) {
        if self.animations.iter().any(|a| a.icon == icon && a.kind == kind) {
            return;
        }
        if self.started && self.count() == 0 {
            self.timeline.start(now);
        }
        self.animations.push(Registration { icon, kind });
        debug!("Icon {:?} joined {:?} animation", icon, kind);
    }

    pub fn remove_animation(&mut self, icon: IconId, kind: AnimationKind) {
        let Some(pos) = self
            .animations
            .iter()
            .position(|a| a.icon == icon && a.kind == kind)
        else {
            return;
        };

        self.animations.remove(pos);
        if self.started && self.count() == 0 {
            self.timeline.stop();
        }
    }

    /// Values to apply to every registered target for the frame at `now`
    pub fn frame(&self, now: Duration) -> SmallVec<[(IconId, f64); 4]> {
        if !self.timeline.is_playing() {
            return SmallVec::new();
        }
        let rotation = dance_rotation(self.timeline.progress(now));
        self.animations
            .iter()
            .filter(|a| a.kind == AnimationKind::Dance)
            .map(|a| (a.icon, rotation))
            .collect()
    }

    pub fn destroy(&mut self) {
        self.timeline.stop();
        self.animations.clear();
        self.started = false;
    }
}
