//! Game phase state machine
//!
//! The UI layer drives the outer transitions (start, pause, menus); the
//! simulation drives the terminal ones (win, game over).

use serde::{Deserialize, Serialize};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    #[default]
    Start,
    /// Choosing an unlocked level
    LevelSelect,
    /// Active gameplay
    Playing,
    /// Simulation frozen, last frame stays on screen
    Paused,
    /// Final level cleared
    Win,
    /// Lives exhausted
    GameOver,
}

/// Requested phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseCommand {
    /// Begin a run from the title or level-select screen
    Start,
    Pause,
    Resume,
    TogglePause,
    OpenLevelSelect,
    /// Back to the title screen
    ToMenu,
    /// Start a fresh run from a finished one
    Restart,
    /// Raised by the simulation when the final level is cleared
    LevelsCleared,
    /// Raised by the simulation when the last life is lost
    LivesExhausted,
}

impl GamePhase {
    /// Phase reached by applying `cmd`, or `None` if the transition is not allowed
    pub fn apply(self, cmd: PhaseCommand) -> Option<GamePhase> {
        use GamePhase::*;
        use PhaseCommand as C;

        match (self, cmd) {
            (Start | LevelSelect, C::Start) => Some(Playing),
            (Win | GameOver, C::Restart) => Some(Playing),
            (Start | Win | GameOver, C::OpenLevelSelect) => Some(LevelSelect),
            (LevelSelect | Paused | Win | GameOver, C::ToMenu) => Some(Start),
            (Playing, C::Pause | C::TogglePause) => Some(Paused),
            (Paused, C::Resume | C::TogglePause) => Some(Playing),
            (Playing, C::LevelsCleared) => Some(Win),
            (Playing, C::LivesExhausted) => Some(GameOver),
            _ => None,
        }
    }

    /// True only while the simulation advances
    #[inline]
    pub fn is_running(self) -> bool {
        self == GamePhase::Playing
    }
}
