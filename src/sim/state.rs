//! Game state and host-facing event types

use serde::{Deserialize, Serialize};

use super::symbol::Symbol;

/// Current phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No game running (before the first start, and after every failure)
    #[default]
    Idle,
    /// Sequence is being revealed, player input is dropped
    Showing,
    /// Waiting for the player to repeat the sequence
    AwaitingInput,
    /// Sequence repeated, waiting for the next level to begin
    LevelComplete,
}

/// A transient highlight of one drum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashEvent {
    pub symbol: Symbol,
    pub duration_ms: u32,
}

/// Notifications drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Light a drum
    Flash(FlashEvent),
    /// Revert a drum lit by an earlier `Flash`
    FlashEnd(Symbol),
    PlaybackStarted { generation: u64, length: usize },
    PlaybackFinished { generation: u64 },
    ScoreChanged { score: u64, level: u32 },
    LevelComplete { score: u64, level: u32 },
    /// Wrong drum; carries what the player had reached before the reset
    Failure { level: u32, score: u64 },
    /// Failure message is done, host goes back to its start screen
    ReturnToIdle,
}

/// Authoritative state of one game session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Target sequence (length == level while a level is played)
    pub sequence: Vec<Symbol>,
    /// What the player entered so far for the current attempt
    pub player_input: Vec<Symbol>,
    pub level: u32,
    pub score: u64,
    pub phase: GamePhase,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            sequence: Vec::new(),
            player_input: Vec::new(),
            level: 1,
            score: 0,
            phase: GamePhase::Idle,
        }
    }

    /// Back to a fresh game (level 1, score 0, nothing entered)
    pub fn reset(&mut self) {
        self.sequence.clear();
        self.player_input.clear();
        self.level = 1;
        self.score = 0;
        self.phase = GamePhase::Idle;
    }

    #[inline]
    pub fn is_showing_sequence(&self) -> bool {
        self.phase == GamePhase::Showing
    }

    /// Drum the player must hit next, if any
    pub fn expected_next(&self) -> Option<Symbol> {
        self.sequence.get(self.player_input.len()).copied()
    }

    /// Inputs still needed to finish the current sequence
    pub fn remaining_inputs(&self) -> usize {
        self.sequence.len().saturating_sub(self.player_input.len())
    }
}
