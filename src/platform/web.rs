//! Browser bindings
//!
//! The page owns the canvas, DOM screens and event listeners; it forwards
//! raw key/pointer events to [`WebGame`], calls [`WebGame::frame`] from
//! `requestAnimationFrame` and draws the returned command list.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::game::Game;
use crate::persistence::LocalStorageStore;
use crate::render::DrawList;
use crate::sim::GameEvent;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Brickfall starting...");
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("Failed to serialize frame data: {}", e);
        fallback.to_string()
    })
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
    draw: DrawList,
    events: Rc<RefCell<Vec<GameEvent>>>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let mut game = Game::new(
            width,
            height,
            rand::random(),
            Box::new(LocalStorageStore::new()),
            Box::new(WebAudio::new()),
        );
        let events = Rc::new(RefCell::new(Vec::new()));
        let queue = events.clone();
        game.subscribe(move |e: &GameEvent| queue.borrow_mut().push(e.clone()));
        WebGame {
            game,
            draw: DrawList::new(),
            events,
        }
    }

    pub fn start(&mut self) {
        self.game.start();
    }

    pub fn select_level(&mut self, level: u32) {
        self.game.select_level(level);
    }

    pub fn restart(&mut self) {
        self.game.restart();
    }

    pub fn open_level_select(&mut self) {
        self.game.open_level_select();
    }

    pub fn back_to_menu(&mut self) {
        self.game.back_to_menu();
    }

    pub fn pause(&mut self) {
        self.game.pause();
    }

    pub fn resume(&mut self) {
        self.game.resume();
    }

    pub fn toggle_pause(&mut self) {
        self.game.toggle_pause();
    }

    pub fn is_running(&self) -> bool {
        self.game.is_running()
    }

    /// Phase name for screen switching ("Start", "Playing", ...)
    pub fn phase(&self) -> String {
        format!("{:?}", self.game.phase())
    }

    /// Returns true when the event should be `preventDefault`ed
    pub fn key_down(&mut self, code: &str, key: &str) -> bool {
        let phase = self.game.phase();
        self.game.input_mut().key_down(code, key, phase)
    }

    pub fn key_up(&mut self, code: &str, key: &str) -> bool {
        self.game.input_mut().key_up(code, key)
    }

    pub fn pointer_down(&mut self, x: f32) {
        let phase = self.game.phase();
        self.game.input_mut().pointer_down(x, phase);
    }

    pub fn pointer_move(&mut self, x: f32) {
        let phase = self.game.phase();
        self.game.input_mut().pointer_move(x, phase);
    }

    pub fn pointer_up(&mut self) {
        self.game.input_mut().pointer_up();
    }

    pub fn pointer_cancel(&mut self) {
        self.game.input_mut().pointer_cancel();
    }

    /// Advance one tick and return the frame's draw commands as JSON
    pub fn frame(&mut self) -> String {
        self.game.frame();
        self.draw.clear();
        self.game.render(&mut self.draw);
        to_json(&self.draw.commands, "[]")
    }

    pub fn hud(&self) -> String {
        to_json(&self.game.hud(), "{}")
    }

    /// Events raised since the last call, as a JSON array
    pub fn take_events(&mut self) -> String {
        let events = std::mem::take(&mut *self.events.borrow_mut());
        to_json(&events, "[]")
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.game.resize(width, height);
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.game.set_sound_enabled(enabled);
    }

    pub fn sound_enabled(&self) -> bool {
        self.game.settings().sound_enabled
    }
}
