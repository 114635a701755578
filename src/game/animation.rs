//! Terminal animations: the victory flight and the splash.
//!
//! Both are purely time-parameterized: given the start timestamp and the
//! current one they always yield the same values, so the renderer and the
//! state machine can query them independently without drift.

/// Horizontal fly-away after the last word is solved. Ease-in quadratic over
/// the configured duration; completion fires exactly once.
#[derive(Clone, Copy, Debug)]
pub struct VictoryFlight {
    start_ms: f64,
    duration_ms: f64,
    start_position: f64,
    completed: bool,
}

impl VictoryFlight {
    /// How far past the start position the flight carries the bird.
    const TRAVEL: f64 = 0.6;

    pub fn new(start_ms: f64, duration_ms: f64, start_position: f64) -> Self {
        Self {
            start_ms,
            duration_ms,
            start_position,
            completed: false,
        }
    }

    pub fn progress(&self, now: f64) -> f64 {
        ((now - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Bird position at this instant, accelerating away from the start.
    pub fn position(&self, now: f64) -> f64 {
        let eased = self.progress(now).powi(2);
        self.start_position + eased * Self::TRAVEL
    }

    /// True exactly once, the first time progress reaches 1.
    pub fn try_complete(&mut self, now: f64) -> bool {
        if !self.completed && self.progress(now) >= 1.0 {
            self.completed = true;
            true
        } else {
            false
        }
    }
}

/// Ripple where the bird hit the water. Radius grows linearly, alpha fades
/// linearly; no game-state side effects beyond its own lifetime.
#[derive(Clone, Copy, Debug)]
pub struct Splash {
    start_ms: f64,
    duration_ms: f64,
    /// Grid row the bird occupied at impact.
    pub bird_row: u32,
    /// Horizontal progress fraction at impact.
    pub bird_position: f64,
}

impl Splash {
    const RIPPLE_GROWTH: f64 = 1.5;
    const BASE_ALPHA: f64 = 0.8;

    pub fn new(start_ms: f64, duration_ms: f64, bird_row: u32, bird_position: f64) -> Self {
        Self {
            start_ms,
            duration_ms,
            bird_row,
            bird_position,
        }
    }

    fn progress(&self, now: f64) -> f64 {
        ((now - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn finished(&self, now: f64) -> bool {
        now - self.start_ms > self.duration_ms
    }

    /// Ripple radius as a multiple of the renderer's base splash size.
    pub fn ripple_scale(&self, now: f64) -> f64 {
        1.0 + self.progress(now) * Self::RIPPLE_GROWTH
    }

    pub fn ripple_alpha(&self, now: f64) -> f64 {
        (Self::BASE_ALPHA - self.progress(now)).max(0.0)
    }
}

/// The at-most-one terminal animation owned by the state machine.
#[derive(Clone, Copy, Debug)]
pub enum ActiveAnimation {
    VictoryFlight(VictoryFlight),
    Splash(Splash),
}
