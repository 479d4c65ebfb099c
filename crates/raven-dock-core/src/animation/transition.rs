use std::time::Duration;

/// Quadratic ease-out on t in [0, 1]
pub fn ease_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

/// A timed slide of the dock fraction from `from` to `to`.
///
/// The transition itself is a value; completion is reported by the
/// single-shot timer armed alongside it, so sampling never has side effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideTransition {
    pub from: f64,
    pub to: f64,
    pub start: Duration,
    pub delay: Duration,
    pub duration: Duration,
}

impl SlideTransition {
    pub fn new(from: f64, to: f64, start: Duration, delay: Duration, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            delay,
            duration,
        }
    }

    /// Time at which the transition settles on `to`
    pub fn end(&self) -> Duration {
        self.start + self.delay + self.duration
    }

    /// Time left until the transition settles, measured from `now`
    pub fn remaining(&self, now: Duration) -> Duration {
        self.end().saturating_sub(now)
    }

    /// Progress in [0, 1] before easing
    pub fn progress(&self, now: Duration) -> f64 {
        let begin = self.start + self.delay;
        if now <= begin {
            return 0.0;
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        ((now - begin).as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, now: Duration) -> f64 {
        self.from + (self.to - self.from) * ease_out_quad(self.progress(now))
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.end()
    }
}
