//! Game facade
//!
//! Owns the session and its collaborators (progress store, audio, event
//! listeners) and exposes the hooks a UI layer needs: start, level select,
//! pause/resume, restart, per-frame stepping and rendering. Simulation
//! events are fanned out after every call that can raise them.

use serde::Serialize;

use crate::audio::{AudioGate, AudioSink, SoundEffect};
use crate::persistence::ProgressStore;
use crate::platform::InputState;
use crate::render::{RenderSink, draw_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameSession, PhaseCommand, TickInput, tick};
use crate::tuning::Tuning;

/// Subscriber to domain events (screen changes, HUD updates)
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> EventSink for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Values shown by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub level: u32,
    pub balls: usize,
    pub score: u64,
    pub lives: u32,
    pub unlocked_level: u32,
}

pub struct Game {
    session: GameSession,
    input: InputState,
    store: Box<dyn ProgressStore>,
    audio: AudioGate,
    settings: Settings,
    listeners: Vec<Box<dyn EventSink>>,
}

impl Game {
    /// Game sized for the screen with default balance
    pub fn new(
        width: f32,
        height: f32,
        seed: u64,
        store: Box<dyn ProgressStore>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        Self::with_tuning(Tuning::default(), width, height, seed, store, audio)
    }

    /// Game with custom balance. Size fields the caller left at their
    /// defaults follow the screen; explicit sizes are kept.
    pub fn with_tuning(
        tuning: Tuning,
        width: f32,
        height: f32,
        seed: u64,
        store: Box<dyn ProgressStore>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let mut session = GameSession::new(tuning, width, height, seed);

        session.unlocked_level = match store.load_unlocked_level() {
            Ok(level) => session.tuning.clamp_level(level),
            Err(e) => {
                log::warn!("Could not load progress, starting from level 1: {}", e);
                1
            }
        };
        log::info!("Highest unlocked level: {}", session.unlocked_level);

        let settings = Settings::load();
        Self {
            session,
            input: InputState::new(),
            store,
            audio: AudioGate::new(audio, settings.sound_enabled),
            settings,
            listeners: Vec::new(),
        }
    }

    /// Register an event listener
    pub fn subscribe(&mut self, listener: impl EventSink + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    /// Event-layer input state; sampled by [`Game::frame`]
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    /// True only while the simulation advances
    pub fn is_running(&self) -> bool {
        self.session.phase.is_running()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn hud(&self) -> Hud {
        Hud {
            level: self.session.level,
            balls: self.session.balls.len(),
            score: self.session.score,
            lives: self.session.lives,
            unlocked_level: self.session.unlocked_level,
        }
    }

    // === Screen hooks ===

    /// Start a new run on level 1 from the title screen
    pub fn start(&mut self) {
        self.begin(1, PhaseCommand::Start);
    }

    /// Start a new run on a chosen level. The index is clamped to the level
    /// range and then to the highest unlocked level.
    pub fn select_level(&mut self, level: u32) {
        let level = self
            .session
            .tuning
            .clamp_level(level)
            .min(self.session.unlocked_level);
        self.begin(level, PhaseCommand::Start);
    }

    /// New run on level 1 after a win or game over
    pub fn restart(&mut self) {
        self.begin(1, PhaseCommand::Restart);
    }

    pub fn open_level_select(&mut self) {
        self.command(PhaseCommand::OpenLevelSelect);
    }

    pub fn back_to_menu(&mut self) {
        self.command(PhaseCommand::ToMenu);
    }

    pub fn pause(&mut self) {
        self.command(PhaseCommand::Pause);
    }

    pub fn resume(&mut self) {
        self.command(PhaseCommand::Resume);
    }

    pub fn toggle_pause(&mut self) {
        self.command(PhaseCommand::TogglePause);
    }

    // === Frame loop ===

    /// Sample the input state and advance one tick
    pub fn frame(&mut self) {
        let input = self.input.sample();
        self.step(&input);
    }

    /// Advance one tick with explicit input
    pub fn step(&mut self, input: &TickInput) {
        tick(&mut self.session, input);
        self.dispatch();
    }

    /// Draw the current state; call after the tick
    pub fn render(&self, sink: &mut dyn RenderSink) {
        draw_frame(&self.session, sink);
    }

    /// New screen size; a level on screen is regenerated to fit
    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(width, height);
        self.dispatch();
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.settings.sound_enabled = enabled;
        self.audio.set_enabled(enabled);
        self.settings.save();
    }

    // === Internals ===

    fn begin(&mut self, level: u32, cmd: PhaseCommand) {
        if self.session.phase.apply(cmd).is_none() {
            log::debug!("Ignoring {:?} in phase {:?}", cmd, self.session.phase);
            return;
        }
        self.input.clear();
        self.session.begin_run(level);
        self.session.transition(cmd);
        log::info!("Run started on level {}", self.session.level);
        self.dispatch();
    }

    fn command(&mut self, cmd: PhaseCommand) {
        if self.session.transition(cmd) {
            self.dispatch();
        }
    }

    /// Route queued simulation events to audio, storage and listeners
    fn dispatch(&mut self) {
        for event in self.session.drain_events() {
            if let Some(effect) = SoundEffect::for_event(&event) {
                self.audio.play(effect);
            }

            match &event {
                GameEvent::LevelUnlocked(level) => self.save_progress(*level),
                GameEvent::PhaseChanged { to, .. } if !to.is_running() => self.input.clear(),
                _ => {}
            }

            for listener in &mut self.listeners {
                listener.on_event(&event);
            }
        }
    }

    /// Best effort; a failed save never interrupts play
    fn save_progress(&mut self, level: u32) {
        if let Err(e) = self.store.save_unlocked_level(level) {
            log::warn!("Could not save progress (level {}): {}", level, e);
        }
    }
}
