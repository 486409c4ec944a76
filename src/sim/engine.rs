//! Sequence engine
//!
//! Owns the `GameState` and every rule of the game: growing the sequence,
//! validating input, scoring and resetting. No timing lives here; a playback
//! is handed out as a lazy iterator and its end is reported back through
//! `finish_playback`.

use super::rng::SymbolSource;
use super::state::{FlashEvent, GamePhase, GameState};
use super::symbol::{Symbol, SymbolError};
use crate::tuning::Tuning;

/// Lazy, ordered reveal of a sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    generation: u64,
    symbols: Vec<Symbol>,
    cursor: usize,
    hold_ms: u32,
}

impl Playback {
    pub fn new(generation: u64, symbols: Vec<Symbol>, hold_ms: u32) -> Self {
        Self {
            generation,
            symbols,
            cursor: 0,
            hold_ms,
        }
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Full length of the revealed sequence
    pub fn step_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Steps not yet yielded
    pub fn remaining(&self) -> usize {
        self.symbols.len() - self.cursor
    }
}

impl Iterator for Playback {
    type Item = FlashEvent;

    fn next(&mut self) -> Option<FlashEvent> {
        let symbol = *self.symbols.get(self.cursor)?;
        self.cursor += 1;
        Some(FlashEvent {
            symbol,
            duration_ms: self.hold_ms,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl ExactSizeIterator for Playback {}

/// What the player reached before a wrong drum reset the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failure {
    pub level: u32,
    pub score: u64,
}

/// Result of one accepted-or-dropped drum hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Dropped: sequence showing, no game running, or level already complete
    Ignored,
    /// Correct so far, more drums expected
    Continue { remaining: usize },
    /// Whole sequence repeated; score and level already updated
    LevelComplete { score: u64, level: u32 },
    /// Wrong drum; the game has been reset
    Failed(Failure),
}

/// Authoritative game rules over an injected symbol source
#[derive(Debug, Clone)]
pub struct SequenceEngine<R> {
    state: GameState,
    source: R,
    symbol_count: u8,
    points_per_level: u64,
    hold_ms: u32,
    /// Bumped by every playback and reset; stale playbacks are ignored
    generation: u64,
}

impl<R: SymbolSource> SequenceEngine<R> {
    pub fn new(source: R, tuning: &Tuning) -> Self {
        Self {
            state: GameState::new(),
            source,
            symbol_count: tuning.drum_count,
            points_per_level: tuning.points_per_level,
            hold_ms: tuning.step_hold_ms,
            generation: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn symbol_count(&self) -> u8 {
        self.symbol_count
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a drum hit would be considered right now
    pub fn accepts_input(&self) -> bool {
        self.state.phase == GamePhase::AwaitingInput
    }

    /// Validate a raw drum index against this board
    pub fn symbol(&self, index: usize) -> Result<Symbol, SymbolError> {
        Symbol::new(index, self.symbol_count)
    }

    /// Fresh game: reset everything, draw the first drum and reveal it
    pub fn start(&mut self) -> Playback {
        self.state.reset();
        self.generation += 1;
        let first = self.push_random_symbol();
        log::info!("Game started, first drum {}", first);
        self.reveal()
    }

    /// Append one random drum, only while the sequence is one short of the level.
    ///
    /// That holds in `Idle` after a reset and in `LevelComplete`; anywhere
    /// else the call is refused so the sequence never outgrows the level.
    pub fn append_random_symbol(&mut self) -> Option<Symbol> {
        let one_short = self.state.sequence.len() + 1 == self.state.level as usize;
        let growable = matches!(
            self.state.phase,
            GamePhase::Idle | GamePhase::LevelComplete
        );
        if !(one_short && growable) {
            log::warn!(
                "append_random_symbol ignored in {:?} ({} drums at level {})",
                self.state.phase,
                self.state.sequence.len(),
                self.state.level
            );
            return None;
        }
        Some(self.push_random_symbol())
    }

    /// Enter `Showing` and hand out the reveal of the current sequence.
    ///
    /// Refused unless the sequence holds exactly `level` drums. A playback
    /// requested while another is in flight supersedes it.
    pub fn begin_playback(&mut self) -> Option<Playback> {
        let len = self.state.sequence.len();
        if len == 0 || len != self.state.level as usize {
            log::warn!(
                "begin_playback ignored: {} drums at level {}",
                len,
                self.state.level
            );
            return None;
        }
        Some(self.reveal())
    }

    fn push_random_symbol(&mut self) -> Symbol {
        let symbol = self.source.next_symbol(self.symbol_count);
        self.state.sequence.push(symbol);
        symbol
    }

    fn reveal(&mut self) -> Playback {
        self.generation += 1;
        self.state.phase = GamePhase::Showing;
        self.state.player_input.clear();
        log::debug!(
            "Playback {} of {} drums",
            self.generation,
            self.state.sequence.len()
        );
        Playback::new(self.generation, self.state.sequence.clone(), self.hold_ms)
    }

    /// Leave `Showing` once the playback of `generation` has fully played.
    ///
    /// Returns false for a stale playback.
    pub fn finish_playback(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.state.phase != GamePhase::Showing {
            log::debug!("Dropping stale playback {}", generation);
            return false;
        }
        self.state.phase = GamePhase::AwaitingInput;
        true
    }

    /// Validate and submit a raw drum index
    pub fn submit_input(&mut self, index: usize) -> Result<InputOutcome, SymbolError> {
        let symbol = self.symbol(index)?;
        self.submit_symbol(symbol)
    }

    /// Submit a drum; symbols built for a larger board are rejected untouched
    pub fn submit_symbol(&mut self, symbol: Symbol) -> Result<InputOutcome, SymbolError> {
        let symbol = self.symbol(symbol.index())?;
        Ok(self.judge(symbol))
    }

    fn judge(&mut self, symbol: Symbol) -> InputOutcome {
        if !self.accepts_input() {
            return InputOutcome::Ignored;
        }

        self.state.player_input.push(symbol);
        let step = self.state.player_input.len() - 1;

        if self.state.sequence.get(step) != Some(&symbol) {
            return InputOutcome::Failed(self.reset_on_failure());
        }

        let remaining = self.state.remaining_inputs();
        if remaining > 0 {
            return InputOutcome::Continue { remaining };
        }

        let points = self.points_per_level.saturating_mul(u64::from(self.state.level));
        self.state.score = self.state.score.saturating_add(points);
        self.state.level = self.state.level.saturating_add(1);
        self.state.phase = GamePhase::LevelComplete;
        log::info!(
            "Level complete: score {}, now level {}",
            self.state.score,
            self.state.level
        );
        InputOutcome::LevelComplete {
            score: self.state.score,
            level: self.state.level,
        }
    }

    /// Grow the sequence by one and reveal it. Only valid after a completed level.
    pub fn advance_level(&mut self) -> Option<Playback> {
        if self.state.phase != GamePhase::LevelComplete {
            log::warn!("advance_level ignored in {:?}", self.state.phase);
            return None;
        }
        self.push_random_symbol();
        Some(self.reveal())
    }

    /// Wipe the game back to `Idle`. A new `start` is needed to play again.
    pub fn reset_on_failure(&mut self) -> Failure {
        let failure = Failure {
            level: self.state.level,
            score: self.state.score,
        };
        self.state.reset();
        self.generation += 1;
        log::info!(
            "Wrong drum at level {}, {} points lost",
            failure.level,
            failure.score
        );
        failure
    }
}
