//! Wall-clock interval tracking for the fall and word timers.
//!
//! Timestamps are `performance.now()`-style f64 milliseconds. The clock is
//! frame-rate independent: each threshold fires at most once per poll and its
//! reference resets to the poll time, so a long stall (backgrounded tab) costs
//! one step on resume rather than one per missed interval.

/// What a single `poll` observed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockEvents {
    pub fall: bool,
    pub word_timeout: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct GameClock {
    fall_interval_ms: f64,
    word_interval_ms: f64,
    last_fall_ms: f64,
    word_start_ms: f64,
    running: bool,
}

impl GameClock {
    pub fn new(fall_interval_ms: f64, word_interval_ms: f64) -> Self {
        Self {
            fall_interval_ms,
            word_interval_ms,
            last_fall_ms: 0.0,
            word_start_ms: 0.0,
            running: false,
        }
    }

    pub fn start(&mut self, now: f64) {
        self.running = true;
        self.last_fall_ms = now;
        self.word_start_ms = now;
    }

    /// Idempotent; a stopped clock never fires.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Restart only the word timer (new word, retry after a miss, timeout).
    pub fn reset_word(&mut self, now: f64) {
        self.word_start_ms = now;
    }

    /// Check both thresholds against `now`. Each fires at most once per call.
    pub fn poll(&mut self, now: f64) -> ClockEvents {
        let mut events = ClockEvents::default();
        if !self.running {
            return events;
        }
        if now - self.last_fall_ms >= self.fall_interval_ms {
            self.last_fall_ms = now;
            events.fall = true;
        }
        if now - self.word_start_ms >= self.word_interval_ms {
            self.word_start_ms = now;
            events.word_timeout = true;
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_fires_before_the_thresholds() {
        let mut clock = GameClock::new(5_000.0, 15_000.0);
        clock.start(1_000.0);
        assert_eq!(clock.poll(5_999.0), ClockEvents::default());
    }

    #[test]
    fn fall_fires_once_per_interval() {
        let mut clock = GameClock::new(5_000.0, 15_000.0);
        clock.start(0.0);
        assert!(clock.poll(5_000.0).fall);
        assert!(!clock.poll(5_001.0).fall);
        assert!(clock.poll(10_000.0).fall);
    }

    #[test]
    fn a_long_stall_costs_a_single_step() {
        let mut clock = GameClock::new(5_000.0, 15_000.0);
        clock.start(0.0);
        // Four missed intervals still produce one event, and the reference
        // resets to the poll time, not to the last threshold crossing.
        let events = clock.poll(21_000.0);
        assert!(events.fall);
        assert!(!clock.poll(25_999.0).fall);
        assert!(clock.poll(26_000.0).fall);
    }

    #[test]
    fn word_timer_resets_independently() {
        let mut clock = GameClock::new(5_000.0, 15_000.0);
        clock.start(0.0);
        clock.reset_word(10_000.0);
        let events = clock.poll(20_000.0);
        assert!(events.fall);
        assert!(!events.word_timeout);
        assert!(clock.poll(25_000.0).word_timeout);
    }

    #[test]
    fn stopped_clock_is_silent() {
        let mut clock = GameClock::new(5_000.0, 15_000.0);
        clock.start(0.0);
        clock.stop();
        assert_eq!(clock.poll(60_000.0), ClockEvents::default());
    }
}
