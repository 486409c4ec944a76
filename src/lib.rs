//! Sinapsis - the temple of the sequence (Simon Says drums)
//!
//! Core modules:
//! - `sim`: Deterministic game core (sequence engine, playback timing, session)
//! - `tuning`: Data-driven timing and scoring

pub mod sim;
pub mod tuning;

pub use sim::{GameEvent, GamePhase, GameState, Session, Symbol, SymbolError};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Number of drums (distinct symbols)
    pub const DEFAULT_DRUM_COUNT: u8 = 4;
    /// Upper bound accepted for a tuned drum count
    pub const MAX_DRUM_COUNT: u8 = 16;

    /// Wait before each playback step lights its drum
    pub const STEP_DELAY_MS: u32 = 800;
    /// How long a playback step keeps its drum lit
    pub const STEP_HOLD_MS: u32 = 400;
    /// Flash length when the player hits a drum
    pub const INPUT_FLASH_MS: u32 = 400;

    /// "Level up" message time before the next playback
    pub const LEVEL_UP_DELAY_MS: u32 = 1500;
    /// "Wrong sequence" message time before returning to the start screen
    pub const FAILURE_DELAY_MS: u32 = 2000;

    /// Points per completed level, multiplied by the level number
    pub const POINTS_PER_LEVEL: u64 = 100;

    /// Display names of the default drums, by index
    pub const DRUM_NAMES: [&str; 4] = ["Red", "Amber", "Orange", "Gold"];
}
