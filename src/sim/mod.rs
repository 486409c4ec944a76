//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual clock only (the host feeds elapsed time)
//! - Injected, seedable symbol source only
//! - No rendering or platform dependencies

pub mod engine;
pub mod playback;
pub mod rng;
pub mod session;
pub mod state;
pub mod symbol;
pub mod timer;

pub use engine::{Failure, InputOutcome, Playback, SequenceEngine};
pub use playback::{PlaybackScheduler, TimerAction};
pub use rng::{PcgSymbolSource, ScriptedSymbols, SymbolSource};
pub use session::Session;
pub use state::{FlashEvent, GameEvent, GamePhase, GameState};
pub use symbol::{Symbol, SymbolError};
pub use timer::{Scheduler, TimerQueue};
