//! Word Bird core crate.
//!
//! A spelling game: a bird climbs a vertical grid toward the sun as the player
//! fills in the missing letters of each word, and sinks row by row while the
//! player hesitates. The gameplay core (`game::state` and friends) is pure Rust
//! and tested natively; the wasm shell in `game` owns the canvas, audio and DOM
//! overlays and is only exercised in a browser.

use wasm_bindgen::prelude::*;

pub mod game;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// Built-in starter word list: (word, meaning, incomplete).
// `incomplete` is the word with the letters to supply replaced by '_'.
// Imported lists replace this one for the rest of the session.
// -----------------------------------------------------------------------------

pub const DEFAULT_WORDS: &[(&str, &str, &str)] = &[
    ("apple", "苹果", "a_ple"),
    ("banana", "香蕉", "b_n_na"),
    ("cloud", "云", "cl_ud"),
    ("dream", "梦", "dr_am"),
    ("eagle", "老鹰", "e_gl_"),
    ("flower", "花", "fl_w_r"),
    ("garden", "花园", "g_rden"),
    ("happy", "快乐的", "h_ppy"),
    ("island", "岛", "isl_nd"),
    ("jungle", "丛林", "j_ngl_"),
    ("kite", "风筝", "k_te"),
    ("lemon", "柠檬", "le_on"),
    ("mountain", "山", "mo_nt_in"),
    ("night", "夜晚", "ni_ht"),
    ("ocean", "海洋", "oc_an"),
    ("planet", "行星", "pl_n_t"),
    ("quiet", "安静的", "qu_et"),
    ("river", "河流", "r_ver"),
    ("sunny", "晴朗的", "s_nny"),
    ("tiger", "老虎", "t_g_r"),
    ("umbrella", "雨伞", "umbr_lla"),
    ("violin", "小提琴", "v_ol_n"),
    ("window", "窗户", "w_nd_w"),
    ("yellow", "黄色", "ye_low"),
];

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

/// Boot the game shell: canvas, overlays, listeners and the ambient
/// background animation. Call once from the host page after the wasm module
/// loads; actual play starts through `start_game()`.
#[wasm_bindgen]
pub fn init_game() -> Result<(), JsValue> {
    game::init()
}
