//! Sound effects and background music, backed by `HtmlAudioElement`.
//!
//! Element creation can fail outside a browser; every handle is optional and
//! a missing one silently skips playback.

use web_sys::HtmlAudioElement;

use super::state::Cue;

const SOUND_DIR: &str = "assets/sounds";

pub struct SoundBank {
    background: Option<HtmlAudioElement>,
    correct: Option<HtmlAudioElement>,
    wrong: Option<HtmlAudioElement>,
    success: Option<HtmlAudioElement>,
    failure: Option<HtmlAudioElement>,
    enabled: bool,
}

fn load(name: &str) -> Option<HtmlAudioElement> {
    HtmlAudioElement::new_with_src(&format!("{SOUND_DIR}/{name}.mp3")).ok()
}

impl SoundBank {
    pub fn load() -> Self {
        let background = load("background");
        if let Some(bg) = &background {
            bg.set_loop(true);
        }
        Self {
            background,
            correct: load("correct"),
            wrong: load("wrong"),
            success: load("success"),
            failure: load("failure"),
            enabled: true,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the sound flag; disabling also silences the background track.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.stop_background();
        }
        self.enabled
    }

    pub fn play_cue(&self, cue: Cue) {
        if !self.enabled {
            return;
        }
        let element = match cue {
            Cue::Correct => &self.correct,
            Cue::Wrong => &self.wrong,
            Cue::Success => &self.success,
            Cue::Failure => &self.failure,
        };
        if let Some(el) = element {
            el.set_current_time(0.0);
            let _ = el.play();
        }
    }

    pub fn start_background(&self) {
        if !self.enabled {
            return;
        }
        if let Some(bg) = &self.background {
            let _ = bg.play();
        }
    }

    pub fn stop_background(&self) {
        if let Some(bg) = &self.background {
            bg.pause().ok();
            bg.set_current_time(0.0);
        }
    }
}
