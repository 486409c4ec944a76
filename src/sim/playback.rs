//! Playback scheduling
//!
//! Turns a `Playback` into time-spaced flashes: wait the step delay, light the
//! drum, hold it, move on. Steps are chained one at a time so a superseded
//! playback simply stops scheduling.

use super::engine::Playback;
use super::state::{FlashEvent, GameEvent};
use super::symbol::Symbol;
use super::timer::Scheduler;

/// Everything that can sit in the game's timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Step delay elapsed: light the next drum of the playback
    StepStart { generation: u64 },
    /// Step hold elapsed: chain the next step or finish
    StepEnd { generation: u64 },
    /// Turn a flashed drum back off
    Revert { symbol: Symbol },
    /// Level-up message done, start the next level
    LevelUpElapsed { generation: u64 },
    /// Failure message done, host returns to idle
    FailureElapsed { generation: u64 },
}

/// Drives playback timing and flash reverts through a `Scheduler`
#[derive(Debug, Clone)]
pub struct PlaybackScheduler<S> {
    timers: S,
    step_delay_ms: u32,
    step_hold_ms: u32,
    current: Option<Playback>,
}

impl<S: Scheduler<TimerAction>> PlaybackScheduler<S> {
    pub fn new(timers: S, step_delay_ms: u32, step_hold_ms: u32) -> Self {
        Self {
            timers,
            step_delay_ms,
            step_hold_ms,
            current: None,
        }
    }

    #[inline]
    pub fn timers(&self) -> &S {
        &self.timers
    }

    #[inline]
    pub fn timers_mut(&mut self) -> &mut S {
        &mut self.timers
    }

    /// Start revealing `playback`, superseding any playback in flight
    pub fn play_sequence(&mut self, playback: Playback) {
        let generation = playback.generation();
        let (delay, first) = if playback.is_empty() {
            (0, TimerAction::StepEnd { generation })
        } else {
            (self.step_delay_ms, TimerAction::StepStart { generation })
        };
        self.timers.schedule_after(delay, first);
        self.current = Some(playback);
    }

    /// Light a drum now and schedule its revert
    pub fn flash(&mut self, event: FlashEvent, out: &mut Vec<GameEvent>) {
        out.push(GameEvent::Flash(event));
        self.timers.schedule_after(
            event.duration_ms,
            TimerAction::Revert {
                symbol: event.symbol,
            },
        );
    }

    /// Handle a fired timer.
    ///
    /// Returns the generation of a playback that just played its last step.
    /// Transition timers are not ours and are ignored.
    pub fn on_timer(&mut self, action: TimerAction, out: &mut Vec<GameEvent>) -> Option<u64> {
        match action {
            TimerAction::Revert { symbol } => {
                out.push(GameEvent::FlashEnd(symbol));
                None
            }
            TimerAction::StepStart { generation } => {
                let step = self.current_for(generation)?.next();
                match step {
                    Some(event) => {
                        log::debug!("Playback {} flashes drum {}", generation, event.symbol);
                        self.flash(event, out);
                        self.timers
                            .schedule_after(self.step_hold_ms, TimerAction::StepEnd { generation });
                        None
                    }
                    None => self.finish(generation, out),
                }
            }
            TimerAction::StepEnd { generation } => {
                let remaining = self.current_for(generation)?.remaining();
                if remaining > 0 {
                    self.timers
                        .schedule_after(self.step_delay_ms, TimerAction::StepStart { generation });
                    None
                } else {
                    self.finish(generation, out)
                }
            }
            TimerAction::LevelUpElapsed { .. } | TimerAction::FailureElapsed { .. } => None,
        }
    }

    /// Drop every pending timer and the playback in flight.
    ///
    /// Pending reverts are applied immediately so no drum stays lit.
    pub fn cancel_all(&mut self, out: &mut Vec<GameEvent>) {
        self.current = None;
        for action in self.timers.cancel_all() {
            if let TimerAction::Revert { symbol } = action {
                out.push(GameEvent::FlashEnd(symbol));
            }
        }
    }

    fn current_for(&mut self, generation: u64) -> Option<&mut Playback> {
        self.current
            .as_mut()
            .filter(|playback| playback.generation() == generation)
    }

    fn finish(&mut self, generation: u64, out: &mut Vec<GameEvent>) -> Option<u64> {
        self.current = None;
        out.push(GameEvent::PlaybackFinished { generation });
        Some(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::timer::TimerQueue;

    type Timeline = Vec<(u64, GameEvent)>;

    fn symbols(indices: &[u32]) -> Vec<Symbol> {
        indices.iter().map(|&i| Symbol::wrapping(i, 4)).collect()
    }

    /// Run every pending timer, stamping events with the clock
    fn run_to_end(scheduler: &mut PlaybackScheduler<TimerQueue<TimerAction>>) -> (Timeline, Vec<u64>) {
        let mut timeline = Vec::new();
        let mut finished = Vec::new();
        while let Some(action) = scheduler.timers_mut().pop_due(u64::MAX) {
            let now = scheduler.timers().now_ms();
            let mut out = Vec::new();
            if let Some(generation) = scheduler.on_timer(action, &mut out) {
                finished.push(generation);
            }
            timeline.extend(out.into_iter().map(|e| (now, e)));
        }
        (timeline, finished)
    }

    #[test]
    fn test_play_sequence_timeline() {
        let mut scheduler = PlaybackScheduler::new(TimerQueue::new(), 800, 400);
        scheduler.play_sequence(Playback::new(1, symbols(&[0, 1, 2]), 400));

        let (timeline, finished) = run_to_end(&mut scheduler);
        let flash = |i| {
            GameEvent::Flash(FlashEvent {
                symbol: Symbol::wrapping(i, 4),
                duration_ms: 400,
            })
        };
        let revert = |i| GameEvent::FlashEnd(Symbol::wrapping(i, 4));

        assert_eq!(
            timeline,
            vec![
                (800, flash(0)),
                (1200, revert(0)),
                (2000, flash(1)),
                (2400, revert(1)),
                (3200, flash(2)),
                (3600, revert(2)),
                (3600, GameEvent::PlaybackFinished { generation: 1 }),
            ]
        );
        assert_eq!(finished, vec![1]);
        assert!(scheduler.current.is_none());
    }

    #[test]
    fn test_empty_playback_finishes_immediately() {
        let mut scheduler = PlaybackScheduler::new(TimerQueue::new(), 800, 400);
        scheduler.play_sequence(Playback::new(3, Vec::new(), 400));
        let (timeline, finished) = run_to_end(&mut scheduler);
        assert_eq!(timeline, vec![(0, GameEvent::PlaybackFinished { generation: 3 })]);
        assert_eq!(finished, vec![3]);
    }

    #[test]
    fn test_superseded_playback_stops() {
        let mut scheduler = PlaybackScheduler::new(TimerQueue::new(), 800, 400);
        scheduler.play_sequence(Playback::new(1, symbols(&[3, 3, 3]), 400));
        scheduler.play_sequence(Playback::new(2, symbols(&[1]), 400));

        let (timeline, finished) = run_to_end(&mut scheduler);
        let flashes: Vec<Symbol> = timeline
            .iter()
            .filter_map(|(_, e)| match e {
                GameEvent::Flash(f) => Some(f.symbol),
                _ => None,
            })
            .collect();
        assert_eq!(flashes, symbols(&[1]));
        assert_eq!(finished, vec![2]);
    }

    #[test]
    fn test_flash_reverts_after_duration() {
        let mut scheduler = PlaybackScheduler::new(TimerQueue::new(), 800, 400);
        let mut out = Vec::new();
        let event = FlashEvent {
            symbol: Symbol::wrapping(2, 4),
            duration_ms: 250,
        };
        scheduler.flash(event, &mut out);
        assert_eq!(out, vec![GameEvent::Flash(event)]);

        let (timeline, finished) = run_to_end(&mut scheduler);
        assert_eq!(timeline, vec![(250, GameEvent::FlashEnd(event.symbol))]);
        assert!(finished.is_empty());
    }

    #[test]
    fn test_cancel_all_flushes_reverts() {
        let mut scheduler = PlaybackScheduler::new(TimerQueue::new(), 800, 400);
        scheduler.play_sequence(Playback::new(1, symbols(&[0, 1]), 400));

        // Run up to the first lit drum
        let action = scheduler.timers_mut().pop_due(800).unwrap();
        let mut out = Vec::new();
        scheduler.on_timer(action, &mut out);
        assert!(matches!(out[0], GameEvent::Flash(_)));

        let mut out = Vec::new();
        scheduler.cancel_all(&mut out);
        assert_eq!(out, vec![GameEvent::FlashEnd(Symbol::wrapping(0, 4))]);
        assert!(scheduler.timers_mut().cancel_all().is_empty());
        assert!(scheduler.current.is_none());
    }

    #[test]
    fn test_transition_timers_ignored() {
        let mut scheduler = PlaybackScheduler::new(TimerQueue::new(), 800, 400);
        let mut out = Vec::new();
        assert_eq!(
            scheduler.on_timer(TimerAction::LevelUpElapsed { generation: 1 }, &mut out),
            None
        );
        assert!(out.is_empty());
    }
}
