//! Host-facing game session
//!
//! Glues the engine to the playback scheduler and one virtual clock, and
//! turns every state change into `GameEvent`s for the host to drain.

use super::engine::{InputOutcome, Playback, SequenceEngine};
use super::playback::{PlaybackScheduler, TimerAction};
use super::rng::{PcgSymbolSource, SymbolSource};
use super::state::{FlashEvent, GameEvent, GameState};
use super::symbol::SymbolError;
use super::timer::{Scheduler, TimerQueue};
use crate::tuning::Tuning;

/// One player's game, driven by host calls and clock advances
#[derive(Debug, Clone)]
pub struct Session<R = PcgSymbolSource> {
    engine: SequenceEngine<R>,
    playback: PlaybackScheduler<TimerQueue<TimerAction>>,
    tuning: Tuning,
    events: Vec<GameEvent>,
}

impl Session<PcgSymbolSource> {
    /// Session drawing drums from a seeded PCG source
    pub fn seeded(seed: u64, tuning: Tuning) -> Self {
        Self::new(PcgSymbolSource::new(seed), tuning)
    }
}

impl<R: SymbolSource> Session<R> {
    pub fn new(source: R, tuning: Tuning) -> Self {
        Self {
            engine: SequenceEngine::new(source, &tuning),
            playback: PlaybackScheduler::new(
                TimerQueue::new(),
                tuning.step_delay_ms,
                tuning.step_hold_ms,
            ),
            tuning,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    #[inline]
    pub fn engine(&self) -> &SequenceEngine<R> {
        &self.engine
    }

    #[inline]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Current value of the virtual clock
    pub fn now_ms(&self) -> u64 {
        self.playback.timers().now_ms()
    }

    /// Begin a fresh game, abandoning anything in flight
    pub fn start(&mut self) {
        self.playback.cancel_all(&mut self.events);
        let playback = self.engine.start();
        self.push_score();
        self.play(playback);
    }

    /// Player hit drum `index`
    pub fn submit_input(&mut self, index: usize) -> Result<InputOutcome, SymbolError> {
        let symbol = self.engine.symbol(index)?;
        if self.engine.accepts_input() {
            let flash = FlashEvent {
                symbol,
                duration_ms: self.tuning.input_flash_ms,
            };
            self.playback.flash(flash, &mut self.events);
        }

        let outcome = self.engine.submit_symbol(symbol)?;
        match outcome {
            InputOutcome::Ignored => {
                log::debug!("Drum {} ignored in {:?}", symbol, self.state().phase);
            }
            InputOutcome::Continue { .. } => {}
            InputOutcome::LevelComplete { score, level } => {
                self.events.push(GameEvent::LevelComplete { score, level });
                self.push_score();
                if self.tuning.auto_advance {
                    let generation = self.engine.generation();
                    self.playback.timers_mut().schedule_after(
                        self.tuning.level_up_delay_ms,
                        TimerAction::LevelUpElapsed { generation },
                    );
                }
            }
            InputOutcome::Failed(failure) => {
                self.events.push(GameEvent::Failure {
                    level: failure.level,
                    score: failure.score,
                });
                self.push_score();
                let generation = self.engine.generation();
                self.playback.timers_mut().schedule_after(
                    self.tuning.failure_delay_ms,
                    TimerAction::FailureElapsed { generation },
                );
            }
        }
        Ok(outcome)
    }

    /// Grow the sequence and reveal it. Returns false outside `LevelComplete`.
    pub fn advance_level(&mut self) -> bool {
        match self.engine.advance_level() {
            Some(playback) => {
                self.play(playback);
                true
            }
            None => false,
        }
    }

    /// Move the clock forward, firing every timer that comes due
    pub fn advance(&mut self, elapsed_ms: u64) {
        let target = self.now_ms().saturating_add(elapsed_ms);
        while let Some(action) = self.playback.timers_mut().pop_due(target) {
            self.fire(action);
        }
        self.playback.timers_mut().advance_to(target);
    }

    /// Hand all pending notifications to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn fire(&mut self, action: TimerAction) {
        match action {
            TimerAction::LevelUpElapsed { generation } => {
                if generation == self.engine.generation() {
                    self.advance_level();
                }
            }
            TimerAction::FailureElapsed { generation } => {
                if generation == self.engine.generation() {
                    self.events.push(GameEvent::ReturnToIdle);
                }
            }
            _ => {
                if let Some(generation) = self.playback.on_timer(action, &mut self.events) {
                    self.engine.finish_playback(generation);
                }
            }
        }
    }

    fn play(&mut self, playback: Playback) {
        self.events.push(GameEvent::PlaybackStarted {
            generation: playback.generation(),
            length: playback.step_count(),
        });
        self.playback.play_sequence(playback);
    }

    fn push_score(&mut self) {
        let state = self.engine.state();
        self.events.push(GameEvent::ScoreChanged {
            score: state.score,
            level: state.level,
        });
    }
}
