//! Wasm/DOM shell around the gameplay core.
//!
//! Everything browser-specific lives here and in `render`/`audio`: the canvas,
//! the HTML overlays (word, meaning, letter buttons, modal), the two
//! `requestAnimationFrame` loops and the JS-facing action surface. The core
//! modules below never touch `web_sys` and are exercised by native tests.
//!
//! Loop structure mirrors the original game: an ambient background animation
//! (clouds drifting, sun pulsing) runs while no session is active; starting a
//! game hands the frames over to the game loop, which keeps running after a
//! loss just long enough for the splash and the result modal, then yields
//! back. A per-loop running flag guarantees at most one scheduled callback.

pub mod animation;
pub mod audio;
pub mod clock;
pub mod config;
pub mod render;
pub mod round;
pub mod scenery;
pub mod state;
pub mod words;

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlButtonElement, HtmlCanvasElement, window,
};

use audio::SoundBank;
use config::{Difficulty, GameConfig};
use state::{Cue, GameStateMachine};
use words::{GameError, ImportSummary, RawRow, WordBank};

struct Shell {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    machine: GameStateMachine,
    rng: SmallRng,
    sounds: SoundBank,
    difficulty: Difficulty,
    game_loop_running: bool,
    background_loop_running: bool,
    // Last values pushed into the DOM overlays, so they are only rebuilt when
    // something actually changed.
    shown_word: String,
    shown_meaning: String,
    shown_options: Vec<char>,
}

thread_local! {
    static SHELL: RefCell<Option<Shell>> = RefCell::new(None);
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

// --- Bootstrap ---------------------------------------------------------------

pub(crate) fn init() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas = get_or_create_canvas(&doc)?;
    let ctx: CanvasRenderingContext2d = canvas.get_context("2d")?.unwrap().dyn_into()?;

    ensure_overlays(&doc)?;

    let mut rng = SmallRng::from_entropy();
    let machine = GameStateMachine::new(GameConfig::default(), WordBank::builtin(), &mut rng);

    SHELL.with(|cell| {
        cell.replace(Some(Shell {
            canvas,
            ctx,
            machine,
            rng,
            sounds: SoundBank::load(),
            difficulty: Difficulty::default(),
            game_loop_running: false,
            background_loop_running: false,
            shown_word: String::new(),
            shown_meaning: String::new(),
            shown_options: Vec::new(),
        }))
    });

    attach_listeners(&doc)?;
    set_start_enabled(&doc, true);
    update_difficulty_button(&doc, Difficulty::default());
    start_background_loop();
    Ok(())
}

fn get_or_create_canvas(doc: &Document) -> Result<HtmlCanvasElement, JsValue> {
    if let Some(el) = doc.get_element_by_id("wb-canvas") {
        return Ok(el.dyn_into()?);
    }
    let canvas: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
    canvas.set_id("wb-canvas");
    canvas.set_width(960);
    canvas.set_height(540);
    canvas.set_attribute("style", "position:fixed; left:50%; top:40%; transform:translate(-50%,-50%); border-radius:12px; box-shadow:0 0 24px rgba(0,0,0,0.25); background:#87CEEB; z-index:10;").ok();
    doc.body()
        .ok_or_else(|| JsValue::from_str("no body"))?
        .append_child(&canvas)?;
    Ok(canvas)
}

fn ensure_overlays(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id("wb-hud").is_some() {
        return Ok(());
    }
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let hud = doc.create_element("div")?;
    hud.set_id("wb-hud");
    hud.set_attribute("style", "position:fixed; left:50%; bottom:16px; transform:translateX(-50%); display:flex; flex-direction:column; align-items:center; gap:8px; font-family:sans-serif; z-index:30;").ok();

    let style = doc.create_element("style")?;
    style.set_text_content(Some(
        ".letter-option { cursor:pointer; user-select:none; background:#4CAF50; color:#fff; \
         border-radius:8px; padding:10px 14px; font-size:22px; font-weight:bold; } \
         .letter-option:hover { background:#43A047; }",
    ));
    hud.append_child(&style)?;

    let word = doc.create_element("div")?;
    word.set_id("wb-word");
    word.set_attribute(
        "style",
        "font-size:32px; letter-spacing:6px; color:#234; font-weight:bold; min-height:40px;",
    )
    .ok();
    hud.append_child(&word)?;

    let meaning = doc.create_element("div")?;
    meaning.set_id("wb-meaning");
    meaning
        .set_attribute("style", "font-size:18px; color:#567; min-height:24px;")
        .ok();
    hud.append_child(&meaning)?;

    let letters = doc.create_element("div")?;
    letters.set_id("wb-letters");
    letters
        .set_attribute("style", "display:flex; gap:10px; min-height:48px;")
        .ok();
    hud.append_child(&letters)?;

    let controls = doc.create_element("div")?;
    controls
        .set_attribute("style", "display:flex; gap:12px;")
        .ok();
    for (id, label) in [
        ("wb-start", "开始游戏"),
        ("wb-sound", "音效：开"),
        ("wb-difficulty", Difficulty::default().label()),
    ] {
        let button = doc.create_element("button")?;
        button.set_id(id);
        button.set_text_content(Some(label));
        button.set_attribute("style", "padding:8px 18px; border:none; border-radius:8px; background:#4CAF50; color:#fff; font-size:16px; cursor:pointer;").ok();
        controls.append_child(&button)?;
    }
    hud.append_child(&controls)?;

    body.append_child(&hud)?;
    Ok(())
}

fn attach_listeners(doc: &Document) -> Result<(), JsValue> {
    // Letter picks are delegated through the container so the per-letter
    // elements can be rebuilt freely.
    if let Some(letters) = doc.get_element_by_id("wb-letters") {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let Some(target) = evt.target() else { return };
            let Some(el) = target.dyn_ref::<Element>() else {
                return;
            };
            if el.class_name() != "letter-option" {
                return;
            }
            let Some(index) = el
                .get_attribute("data-index")
                .and_then(|value| value.parse::<usize>().ok())
            else {
                return;
            };
            let Some(letter) = el.text_content().and_then(|text| text.chars().next()) else {
                return;
            };
            handle_select(letter, index);
        }) as Box<dyn FnMut(_)>);
        letters.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(button) = doc.get_element_by_id("wb-start") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            do_start();
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(button) = doc.get_element_by_id("wb-sound") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            toggle_sound();
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(button) = doc.get_element_by_id("wb-difficulty") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            cycle_difficulty();
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

// --- JS action surface -------------------------------------------------------

/// Import rows the host page extracted from a CSV/XLSX file: an array of
/// `{word, meaning, incomplete}` objects. Returns `{imported, skipped}`.
#[wasm_bindgen]
pub fn import_words(rows: JsValue) -> Result<JsValue, JsValue> {
    let rows: Vec<RawRow> = serde_wasm_bindgen::from_value(rows)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    let (bank, summary) = WordBank::from_rows(rows);
    apply_import(bank, summary)
}

/// Same as `import_words` for raw CSV text.
#[wasm_bindgen]
pub fn import_words_csv(text: &str) -> Result<JsValue, JsValue> {
    let (bank, summary) = WordBank::from_csv(text);
    apply_import(bank, summary)
}

fn apply_import(bank: WordBank, summary: ImportSummary) -> Result<JsValue, JsValue> {
    SHELL.with(|cell| {
        if let Some(shell) = cell.borrow_mut().as_mut() {
            shell.machine.set_bank(bank);
        }
    });
    if let Some(doc) = window().and_then(|w| w.document()) {
        set_start_enabled(&doc, summary.imported > 0);
        let text = if summary.skipped > 0 {
            format!(
                "成功导入 {} 个单词（跳过 {} 行）！",
                summary.imported, summary.skipped
            )
        } else {
            format!("成功导入 {} 个单词！", summary.imported)
        };
        show_message(&doc, &text, "导入成功", false);
    }
    serde_wasm_bindgen::to_value(&summary).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Start (or restart) a session. With an empty bank this shows a blocking
/// message and changes nothing, it never throws.
#[wasm_bindgen]
pub fn start_game() {
    do_start();
}

/// Letter pick from the host; invalid or late calls are no-ops.
#[wasm_bindgen]
pub fn select_letter(letter: &str, index: usize) {
    if let Some(ch) = letter.chars().next() {
        handle_select(ch, index);
    }
}

/// Flip the sound flag; returns the new state.
#[wasm_bindgen]
pub fn toggle_sound() -> bool {
    let enabled = SHELL.with(|cell| {
        cell.borrow_mut()
            .as_mut()
            .map(|shell| {
                let enabled = shell.sounds.toggle();
                if enabled && shell.machine.playing() {
                    shell.sounds.start_background();
                }
                enabled
            })
            .unwrap_or(false)
    });
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(el) = doc.get_element_by_id("wb-sound") {
            el.set_text_content(Some(if enabled { "音效：开" } else { "音效：关" }));
        }
    }
    enabled
}

/// Cycle Low -> Medium -> High -> Low. The new level applies from the next
/// `start_game`; returns its display label.
#[wasm_bindgen]
pub fn cycle_difficulty() -> String {
    let difficulty = SHELL.with(|cell| {
        cell.borrow_mut()
            .as_mut()
            .map(|shell| {
                shell.difficulty = shell.difficulty.next();
                shell.difficulty
            })
            .unwrap_or_default()
    });
    if let Some(doc) = window().and_then(|w| w.document()) {
        update_difficulty_button(&doc, difficulty);
    }
    difficulty.label().to_string()
}

// --- Input plumbing ----------------------------------------------------------

fn do_start() {
    let now = performance_now();
    let started = SHELL.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let Some(shell) = borrow.as_mut() else {
            return None;
        };
        match shell.machine.start(shell.difficulty, now, &mut shell.rng) {
            Ok(()) => {
                shell.sounds.start_background();
                Some(true)
            }
            Err(GameError::EmptyWordBank) => Some(false),
        }
    });
    match started {
        Some(true) => start_game_loop(),
        Some(false) => {
            if let Some(doc) = window().and_then(|w| w.document()) {
                show_message(&doc, "请先导入单词！", "提示", false);
            }
        }
        None => {}
    }
}

fn handle_select(letter: char, pool_index: usize) {
    let now = performance_now();
    SHELL.with(|cell| {
        if let Some(shell) = cell.borrow_mut().as_mut() {
            shell.machine.select_letter(letter, pool_index, now, &mut shell.rng);
            play_pending_cues(shell);
            sync_overlays(shell);
        }
    });
}

fn play_pending_cues(shell: &mut Shell) {
    for cue in shell.machine.drain_cues() {
        if matches!(cue, Cue::Success | Cue::Failure) {
            shell.sounds.stop_background();
        }
        shell.sounds.play_cue(cue);
    }
}

// --- Frame loops -------------------------------------------------------------

fn request_frame(f: &FrameCallback) {
    if let Some(w) = window() {
        let _ = w.request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}

fn start_game_loop() {
    let proceed = SHELL.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(shell) if !shell.game_loop_running => {
                shell.game_loop_running = true;
                true
            }
            _ => false, // a game loop is already scheduled
        }
    });
    if !proceed {
        return;
    }

    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let keep = SHELL.with(|cell| {
            let mut borrow = cell.borrow_mut();
            borrow
                .as_mut()
                .map(|shell| game_frame(shell, ts))
                .unwrap_or(false)
        });
        if keep {
            request_frame(&f);
        } else {
            SHELL.with(|cell| {
                if let Some(shell) = cell.borrow_mut().as_mut() {
                    shell.game_loop_running = false;
                }
            });
            start_background_loop();
        }
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn start_background_loop() {
    let proceed = SHELL.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(shell) if !shell.background_loop_running && !shell.game_loop_running => {
                shell.background_loop_running = true;
                true
            }
            _ => false,
        }
    });
    if !proceed {
        return;
    }

    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let keep = SHELL.with(|cell| {
            let mut borrow = cell.borrow_mut();
            match borrow.as_mut() {
                // The game loop has taken over; bow out.
                Some(shell) if shell.game_loop_running => {
                    shell.background_loop_running = false;
                    false
                }
                Some(shell) => {
                    background_frame(shell, ts);
                    true
                }
                None => false,
            }
        });
        if keep {
            request_frame(&f);
        }
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

/// One game-loop frame. Returns whether the loop should keep running.
fn game_frame(shell: &mut Shell, now: f64) -> bool {
    shell.machine.tick(now, &mut shell.rng);
    play_pending_cues(shell);
    if let Some(won) = shell.machine.poll_result(now) {
        show_result_modal(won);
    }
    sync_overlays(shell);
    render::draw(&shell.ctx, &shell.canvas, &shell.machine, now);
    shell.machine.playing() || shell.machine.epilogue_active()
}

/// Ambient frame while no session runs: clouds keep drifting, the sun keeps
/// pulsing, the overlays stay in sync.
fn background_frame(shell: &mut Shell, now: f64) {
    shell.machine.tick(now, &mut shell.rng);
    sync_overlays(shell);
    render::draw(&shell.ctx, &shell.canvas, &shell.machine, now);
}

// --- DOM overlays ------------------------------------------------------------

fn sync_overlays(shell: &mut Shell) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };

    let word = shell.machine.display_word().unwrap_or_default();
    if word != shell.shown_word {
        if let Some(el) = doc.get_element_by_id("wb-word") {
            el.set_text_content(Some(&word));
        }
        shell.shown_word = word;
    }

    let meaning = shell
        .machine
        .current_word()
        .map(|w| w.meaning.clone())
        .unwrap_or_default();
    if meaning != shell.shown_meaning {
        if let Some(el) = doc.get_element_by_id("wb-meaning") {
            el.set_text_content(Some(&meaning));
        }
        shell.shown_meaning = meaning;
    }

    let options = shell.machine.option_pool().to_vec();
    if options != shell.shown_options {
        if let Some(el) = doc.get_element_by_id("wb-letters") {
            let mut html = String::new();
            for (index, letter) in options.iter().enumerate() {
                html.push_str(&format!(
                    "<div class=\"letter-option\" data-index=\"{index}\">{letter}</div>"
                ));
            }
            el.set_inner_html(&html);
        }
        shell.shown_options = options;
    }
}

fn set_start_enabled(doc: &Document, enabled: bool) {
    if let Some(button) = doc
        .get_element_by_id("wb-start")
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
    {
        button.set_disabled(!enabled);
    }
}

fn update_difficulty_button(doc: &Document, difficulty: Difficulty) {
    if let Some(el) = doc.get_element_by_id("wb-difficulty") {
        el.set_text_content(Some(difficulty.label()));
        let color = match difficulty {
            Difficulty::Low => "#4CAF50",
            Difficulty::Medium => "#FF9800",
            Difficulty::High => "#F44336",
        };
        el.set_attribute("style", &format!("padding:8px 18px; border:none; border-radius:8px; background:{color}; color:#fff; font-size:16px; cursor:pointer;")).ok();
    }
}

fn show_result_modal(won: bool) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let (title, message) = if won {
        ("恭喜你！", "你已成功完成所有单词拼写！")
    } else {
        ("游戏结束", "小鸟掉海里了，再接再厉！")
    };
    show_message(&doc, message, title, true);
}

const BUTTON_STYLE: &str = "margin:4px 6px 0; padding:8px 20px; border:none; border-radius:8px; background:#4CAF50; color:#fff; font-size:16px; cursor:pointer;";
const CLOSE_STYLE: &str = "margin:4px 6px 0; padding:8px 20px; border:none; border-radius:8px; background:#777; color:#fff; font-size:16px; cursor:pointer;";

/// Blocking message modal; with `play_again` it carries a restart button next
/// to a plain close button, the way the end-of-game dialog works.
fn show_message(doc: &Document, message: &str, title: &str, play_again: bool) {
    if let Some(existing) = doc.get_element_by_id("wb-modal") {
        existing.remove();
    }
    let Ok(modal) = doc.create_element("div") else {
        return;
    };
    modal.set_id("wb-modal");
    modal.set_attribute("style", "position:fixed; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.45); z-index:100;").ok();

    let Ok(content) = doc.create_element("div") else {
        return;
    };
    content.set_attribute("style", "background:#fff; border-radius:12px; padding:24px 32px; min-width:260px; text-align:center; font-family:sans-serif; box-shadow:0 8px 32px rgba(0,0,0,0.25);").ok();

    if let Ok(heading) = doc.create_element("h2") {
        heading.set_text_content(Some(title));
        content.append_child(&heading).ok();
    }
    if let Ok(body) = doc.create_element("p") {
        body.set_text_content(Some(message));
        content.append_child(&body).ok();
    }

    if let Ok(button) = doc.create_element("button") {
        button.set_text_content(Some(if play_again { "再玩一次" } else { "确定" }));
        button.set_attribute("style", BUTTON_STYLE).ok();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            close_modal();
            if play_again {
                do_start();
            }
        }) as Box<dyn FnMut(_)>);
        button
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
        content.append_child(&button).ok();
    }
    if play_again {
        if let Ok(button) = doc.create_element("button") {
            button.set_text_content(Some("关闭"));
            button.set_attribute("style", CLOSE_STYLE).ok();
            let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
                close_modal();
            }) as Box<dyn FnMut(_)>);
            button
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                .ok();
            closure.forget();
            content.append_child(&button).ok();
        }
    }

    modal.append_child(&content).ok();
    if let Some(body) = doc.body() {
        body.append_child(&modal).ok();
    }
}

fn close_modal() {
    if let Some(doc) = window().and_then(|w| w.document()) {
        if let Some(modal) = doc.get_element_by_id("wb-modal") {
            modal.remove();
        }
    }
}
