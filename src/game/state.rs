//! The game state machine: owns the session, and orchestrates spelling rounds,
//! the clock, and the terminal animations.
//!
//! All mutation happens synchronously inside these methods, from either an
//! input call (`select_letter`) or the per-frame `tick`; the renderer only
//! ever reads. The machine itself never touches the DOM or audio: it queues
//! `Cue`s and defers the end-of-game report for the shell to pick up.

use rand::Rng;

use super::animation::{ActiveAnimation, Splash, VictoryFlight};
use super::clock::GameClock;
use super::config::{Difficulty, DifficultySetting, GameConfig};
use super::round::SpellingRound;
use super::scenery::{self, Cloud};
use super::words::{GameError, Word, WordBank};

/// Sound cues queued for the shell to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Correct,
    Wrong,
    Success,
    Failure,
}

/// Canonical per-session values, reset wholesale by `start`.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub bird_row: u32,
    /// Horizontal progress fraction; runs past 1.0 during the victory flight.
    pub bird_position: f64,
    /// Sun position across the sky, 0..1; drifts left as progress grows.
    pub sun_position: f64,
    /// 0 calm, 1 smiling, 2 beaming.
    pub sun_expression: u8,
    pub current_word_index: usize,
    pub game_over: bool,
    pub game_won: bool,
}

impl GameSession {
    fn new(config: &GameConfig) -> Self {
        Self {
            bird_row: config.bird_initial_row,
            bird_position: 0.0,
            sun_position: 2.0 / 3.0,
            sun_expression: 0,
            current_word_index: 0,
            game_over: false,
            game_won: false,
        }
    }
}

/// Drives `NotStarted -> Playing -> {Won, Lost}`.
pub struct GameStateMachine {
    config: GameConfig,
    difficulty: DifficultySetting,
    /// Latest successful import; becomes active at the next `start`.
    bank: WordBank,
    /// The list the running session was started with. A mid-session import
    /// replaces `bank` but leaves this snapshot alone, which is what keeps
    /// the bank read-only once a round has started.
    words: WordBank,
    session: GameSession,
    round: Option<SpellingRound>,
    clock: GameClock,
    animation: Option<ActiveAnimation>,
    clouds: Vec<Cloud>,
    cues: Vec<Cue>,
    /// `(due timestamp, won)` for the deferred end-of-game report.
    pending_result: Option<(f64, bool)>,
    started: bool,
    last_tick_ms: Option<f64>,
}

impl GameStateMachine {
    pub fn new(config: GameConfig, bank: WordBank, rng: &mut impl Rng) -> Self {
        let difficulty = Difficulty::default().settings();
        Self {
            difficulty,
            bank,
            words: WordBank::default(),
            session: GameSession::new(&config),
            round: None,
            clock: GameClock::new(difficulty.fall_interval_ms as f64, config.word_interval_ms),
            animation: None,
            clouds: scenery::generate(rng),
            cues: Vec::new(),
            pending_result: None,
            started: false,
            last_tick_ms: None,
            config,
        }
    }

    /// Replace the imported word list. Takes effect at the next `start`; a
    /// session already in progress keeps the list it started with.
    pub fn set_bank(&mut self, bank: WordBank) {
        self.bank = bank;
    }

    pub fn bank(&self) -> &WordBank {
        &self.bank
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn difficulty(&self) -> DifficultySetting {
        self.difficulty
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn splash(&self) -> Option<&Splash> {
        match &self.animation {
            Some(ActiveAnimation::Splash(splash)) => Some(splash),
            _ => None,
        }
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.words.get(self.session.current_word_index)
    }

    /// The incomplete word with the letters picked so far filled in.
    pub fn display_word(&self) -> Option<String> {
        let word = self.current_word()?;
        Some(match &self.round {
            Some(round) => round.current_display(word),
            None => word.incomplete.clone(),
        })
    }

    pub fn option_pool(&self) -> &[char] {
        self.round.as_ref().map_or(&[], |round| round.option_pool())
    }

    pub fn playing(&self) -> bool {
        self.started && !self.session.game_over
    }

    /// True while the post-game epilogue (splash, deferred result) still needs
    /// frames after the machine has left `Playing`.
    pub fn epilogue_active(&self) -> bool {
        self.pending_result.is_some()
            || matches!(self.animation, Some(ActiveAnimation::Splash(_)))
    }

    /// Reset everything and begin a session with the given difficulty.
    /// Fails without touching any state when no words are available.
    pub fn start(
        &mut self,
        difficulty: Difficulty,
        now: f64,
        rng: &mut impl Rng,
    ) -> Result<(), GameError> {
        if self.bank.is_empty() {
            return Err(GameError::EmptyWordBank);
        }
        self.difficulty = difficulty.settings();
        self.words = self.bank.clone();
        self.session = GameSession::new(&self.config);
        self.animation = None;
        self.cues.clear();
        self.pending_result = None;
        self.clock = GameClock::new(
            self.difficulty.fall_interval_ms as f64,
            self.config.word_interval_ms,
        );
        self.clock.start(now);
        self.started = true;
        self.begin_round(rng);
        log::info!(
            "session started: {} words, fall every {}ms, wrong-answer penalty {}",
            self.words.len(),
            self.difficulty.fall_interval_ms,
            self.difficulty.wrong_answer_falls,
        );
        Ok(())
    }

    /// Player picked the letter at `pool_index`. Silently ignored when no
    /// session is active, the game is over, or the index is stale. The DOM
    /// can race a round restart, and that is a policy no-op, not an error.
    pub fn select_letter(&mut self, letter: char, pool_index: usize, now: f64, rng: &mut impl Rng) {
        if !self.playing() {
            return;
        }
        let Some(word) = self.current_word().cloned() else {
            return;
        };
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if round.option_pool().get(pool_index) != Some(&letter) {
            return;
        }
        round.select(letter, pool_index);
        if !round.is_complete() {
            return;
        }
        if round.is_correct(&word) {
            self.advance_word(now, rng);
        } else {
            self.penalize(now, rng);
        }
    }

    /// Advance the simulation: clock-triggered transitions first, then the
    /// active animation, then cloud drift. Call once per frame; input arrives
    /// between ticks, never during one.
    pub fn tick(&mut self, now: f64, rng: &mut impl Rng) {
        let events = self.clock.poll(now);
        if events.fall && self.playing() {
            self.on_fall(now);
        }
        if events.word_timeout && self.playing() {
            // Neither right nor wrong: fresh shuffle, no penalty.
            self.begin_round(rng);
        }
        self.advance_animation(now);

        let dt = self.last_tick_ms.map_or(0.0, |last| (now - last).max(0.0));
        self.last_tick_ms = Some(now);
        scenery::drift(&mut self.clouds, dt, rng);
    }

    /// Sound cues accumulated since the last drain, in the order they fired.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    /// The deferred end-of-game report. Yields exactly once, after the
    /// win/lose presentation delay has passed, so the splash can play out
    /// before the result modal appears.
    pub fn poll_result(&mut self, now: f64) -> Option<bool> {
        match self.pending_result {
            Some((due, won)) if now >= due => {
                self.pending_result = None;
                Some(won)
            }
            _ => None,
        }
    }

    fn begin_round(&mut self, rng: &mut impl Rng) {
        self.round = self
            .words
            .get(self.session.current_word_index)
            .map(|word| SpellingRound::start(word, rng));
    }

    fn advance_word(&mut self, now: f64, rng: &mut impl Rng) {
        self.cues.push(Cue::Correct);
        let total = self.words.len();
        let session = &mut self.session;
        session.bird_row = session.bird_row.saturating_sub(1);
        session.current_word_index += 1;
        let index = session.current_word_index;

        if index >= total {
            // Last word: park exactly at the screen edge and let the flight
            // carry the bird out. Won is only finalized when it completes.
            session.bird_position = 1.0;
            self.animation = Some(ActiveAnimation::VictoryFlight(VictoryFlight::new(
                now,
                self.config.victory_flight_ms,
                1.0,
            )));
            self.round = None;
        } else {
            session.bird_position = index as f64 / (total - 1).max(1) as f64;
        }

        let ratio = index as f64 / total.max(1) as f64;
        self.session.sun_position = 2.0 / 3.0 - (1.0 / 3.0) * ratio;
        self.session.sun_expression = ((ratio * 3.0).floor()).min(2.0) as u8;

        if index < total {
            self.begin_round(rng);
            self.clock.reset_word(now);
        }
    }

    fn penalize(&mut self, now: f64, rng: &mut impl Rng) {
        self.cues.push(Cue::Wrong);
        if self.difficulty.wrong_answer_falls {
            self.session.bird_row += 1;
            if self.session.bird_row >= self.config.penalty_loss_row() {
                self.end_game(false, now);
                return;
            }
        }
        self.begin_round(rng);
        self.clock.reset_word(now);
    }

    fn on_fall(&mut self, now: f64) {
        self.session.bird_row += 1;
        if self.session.bird_row >= self.config.max_safe_row() {
            self.end_game(false, now);
        }
    }

    fn end_game(&mut self, won: bool, now: f64) {
        if self.session.game_over {
            return;
        }
        self.session.game_over = true;
        self.session.game_won = won;
        self.clock.stop();
        self.round = None;
        if won {
            self.cues.push(Cue::Success);
            self.pending_result = Some((now + self.config.win_result_delay_ms, true));
        } else {
            self.cues.push(Cue::Failure);
            self.animation = Some(ActiveAnimation::Splash(Splash::new(
                now,
                self.config.splash_ms,
                self.session.bird_row,
                self.session.bird_position,
            )));
            self.pending_result = Some((now + self.config.lose_result_delay_ms, false));
        }
        log::info!("session ended: won={won}");
    }

    fn advance_animation(&mut self, now: f64) {
        let mut flight_done = false;
        let mut splash_done = false;
        match self.animation.as_mut() {
            Some(ActiveAnimation::VictoryFlight(flight)) => {
                if !self.session.game_over {
                    self.session.bird_position = flight.position(now);
                    flight_done = flight.try_complete(now);
                }
            }
            Some(ActiveAnimation::Splash(splash)) => {
                splash_done = splash.finished(now);
            }
            None => {}
        }
        if flight_done {
            self.animation = None;
            self.end_game(true, now);
        }
        if splash_done {
            self.animation = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn two_word_bank() -> WordBank {
        WordBank::new(vec![
            Word::new("kite", "风筝", "k_te"),
            Word::new("river", "河流", "r_ver"),
        ])
    }

    fn machine(bank: WordBank) -> (GameStateMachine, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(42);
        let machine = GameStateMachine::new(GameConfig::default(), bank, &mut rng);
        (machine, rng)
    }

    fn solve_current_word(machine: &mut GameStateMachine, now: f64, rng: &mut SmallRng) {
        let missing: Vec<char> = machine
            .current_word()
            .map(|word| {
                word.incomplete
                    .chars()
                    .zip(word.word.chars())
                    .filter(|(slot, _)| *slot == '_')
                    .map(|(_, letter)| letter)
                    .collect()
            })
            .unwrap_or_default();
        for letter in missing {
            let index = machine
                .option_pool()
                .iter()
                .position(|&option| option == letter)
                .unwrap();
            machine.select_letter(letter, index, now, rng);
        }
    }

    #[test]
    fn start_with_empty_bank_fails_without_state_change() {
        let (mut machine, mut rng) = machine(WordBank::default());
        let err = machine.start(Difficulty::Medium, 0.0, &mut rng);
        assert_eq!(err, Err(GameError::EmptyWordBank));
        assert!(!machine.playing());
        assert_eq!(machine.session().bird_row, 3);
    }

    #[test]
    fn selections_before_start_are_ignored() {
        let (mut machine, mut rng) = machine(two_word_bank());
        machine.select_letter('i', 0, 0.0, &mut rng);
        assert!(machine.display_word().is_none());
    }

    #[test]
    fn correct_word_climbs_and_advances() {
        let (mut machine, mut rng) = machine(two_word_bank());
        machine.start(Difficulty::Medium, 0.0, &mut rng).unwrap();
        assert_eq!(machine.display_word().as_deref(), Some("k_te"));

        solve_current_word(&mut machine, 100.0, &mut rng);
        let session = machine.session();
        assert_eq!(session.bird_row, 2);
        assert_eq!(session.current_word_index, 1);
        assert!((session.bird_position - 1.0).abs() < 1e-9);
        assert_eq!(machine.drain_cues(), vec![Cue::Correct]);
        assert_eq!(machine.display_word().as_deref(), Some("r_ver"));
    }

    #[test]
    fn wrong_answer_restarts_the_round_without_penalty_on_medium() {
        let bank = WordBank::new(vec![Word::new("ab", "甲乙", "__")]);
        let (mut machine, mut rng) = machine(bank);
        machine.start(Difficulty::Medium, 0.0, &mut rng).unwrap();

        // Select in reverse placeholder order to force an incorrect spell.
        let wrong_first = machine.current_word().unwrap().word.chars().nth(1).unwrap();
        let index = machine
            .option_pool()
            .iter()
            .position(|&c| c == wrong_first)
            .unwrap();
        machine.select_letter(wrong_first, index, 10.0, &mut rng);
        let other = machine.option_pool()[0];
        machine.select_letter(other, 0, 20.0, &mut rng);

        assert_eq!(machine.session().bird_row, 3);
        assert_eq!(machine.drain_cues(), vec![Cue::Wrong]);
        assert_eq!(machine.option_pool().len(), 2);
    }

    #[test]
    fn mid_session_import_keeps_the_running_list() {
        let (mut machine, mut rng) = machine(two_word_bank());
        machine.start(Difficulty::Medium, 0.0, &mut rng).unwrap();
        machine.set_bank(WordBank::new(vec![Word::new("sunny", "晴朗的", "s_nny")]));
        assert_eq!(machine.display_word().as_deref(), Some("k_te"));
        // The next start picks up the new bank.
        machine.start(Difficulty::Medium, 0.0, &mut rng).unwrap();
        assert_eq!(machine.display_word().as_deref(), Some("s_nny"));
    }

    #[test]
    fn word_timeout_reshuffles_and_clears_selections() {
        let (mut machine, mut rng) = machine(two_word_bank());
        machine.start(Difficulty::Medium, 0.0, &mut rng).unwrap();
        let letter = machine.option_pool()[0];
        machine.select_letter(letter, 0, 10.0, &mut rng);
        assert_eq!(machine.option_pool().len(), 0);

        machine.tick(15_000.0, &mut rng);
        // Fresh round: pool restored to the full missing set.
        assert_eq!(machine.option_pool().len(), 1);
        assert_eq!(machine.display_word().as_deref(), Some("k_te"));
        assert!(machine.playing());
    }
}
