//! WebAssembly bindings for the Twenty48 engine.
//!
//! This module exposes the engine to JavaScript through wasm-bindgen. The
//! page owns durable storage: it seeds the engine with whatever it saved and
//! reads the texts back after each call.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::game::Engine;
#[cfg(feature = "wasm")]
use crate::moves::Direction;
#[cfg(feature = "wasm")]
use crate::storage::{MemoryStore, SessionStore};

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    engine: Engine<MemoryStore>,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create an engine from previously saved texts (either may be absent)
    #[wasm_bindgen(constructor)]
    pub fn new(session: Option<String>, best_score: Option<String>) -> Result<WasmGame, JsValue> {
        let mut store = MemoryStore::new();
        if let Some(text) = session {
            store
                .write_session(&text)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
        }
        if let Some(text) = best_score {
            store
                .write_best_score(&text)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
        }

        Ok(WasmGame {
            engine: Engine::new(store),
        })
    }

    /// Start a new game, returns events JSON
    #[wasm_bindgen(js_name = newGame)]
    pub fn new_game(&mut self) -> String {
        let events = self.engine.new_game();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Resume the saved game, returns events JSON or error
    #[wasm_bindgen(js_name = loadGame)]
    pub fn load_game(&mut self) -> Result<String, JsValue> {
        match self.engine.load_game() {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Load failed: {}", e))),
        }
    }

    /// Move by direction code (1 up, 2 right, 3 down, 4 left), returns events JSON
    #[wasm_bindgen(js_name = makeMove)]
    pub fn make_move(&mut self, code: u8) -> Result<String, JsValue> {
        let direction = Direction::from_code(code).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let events = self.engine.make_move(direction);
        Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string()))
    }

    /// Undo the last move
    #[wasm_bindgen(js_name = undoMove)]
    pub fn undo_move(&mut self) -> bool {
        self.engine.undo_move()
    }

    /// Get the session view as JSON (for rendering)
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.engine.view()).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u32 {
        self.engine.score()
    }

    #[wasm_bindgen(js_name = getBestScore)]
    pub fn get_best_score(&self) -> u32 {
        self.engine.best_score()
    }

    /// Board as 16 values, row-major
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> Vec<u32> {
        self.engine.board().rows().iter().flatten().copied().collect()
    }

    #[wasm_bindgen(js_name = hasResumableGame)]
    pub fn has_resumable_game(&self) -> bool {
        self.engine.has_resumable_game()
    }

    /// Snapshot text to save, or `None` if the saved game should be removed
    #[wasm_bindgen(js_name = getSessionText)]
    pub fn get_session_text(&self) -> Option<String> {
        self.engine.store().session_text().map(str::to_string)
    }

    /// Best-score record text to save
    #[wasm_bindgen(js_name = getBestScoreText)]
    pub fn get_best_score_text(&self) -> Option<String> {
        self.engine.store().best_score_text().map(str::to_string)
    }
}
