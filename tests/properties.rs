//! Property tests for the game rules and playback timing

use proptest::prelude::*;

use sinapsis::Tuning;
use sinapsis::sim::{
    GameEvent, GamePhase, InputOutcome, PcgSymbolSource, SequenceEngine, Session,
};

fn engine(seed: u64) -> SequenceEngine<PcgSymbolSource> {
    SequenceEngine::new(PcgSymbolSource::new(seed), &Tuning::default())
}

/// Run the session clock until it waits for the player
fn settle(session: &mut Session) {
    while session.state().phase != GamePhase::AwaitingInput {
        session.advance(50);
    }
}

proptest! {
    #[test]
    fn score_and_level_grow_per_completed_level(seed in any::<u64>(), levels in 1u32..12) {
        let mut engine = engine(seed);
        let playback = engine.start();
        engine.finish_playback(playback.generation());

        for level in 1..=levels {
            let score_before = engine.state().score;
            prop_assert_eq!(engine.state().sequence.len(), level as usize);

            let sequence = engine.state().sequence.clone();
            let mut last = InputOutcome::Ignored;
            for symbol in sequence {
                last = engine.submit_symbol(symbol).unwrap();
            }
            prop_assert!(matches!(last, InputOutcome::LevelComplete { .. }), "outcome was {:?}", last);
            prop_assert_eq!(engine.state().score, score_before + 100 * u64::from(level));
            prop_assert_eq!(engine.state().level, level + 1);

            let playback = engine.advance_level().unwrap();
            prop_assert_eq!(engine.state().sequence.len() as u32, engine.state().level);
            engine.finish_playback(playback.generation());
        }
    }

    #[test]
    fn mismatch_anywhere_resets(seed in any::<u64>(), levels in 1usize..8, miss_at in 0usize..8) {
        let mut engine = engine(seed);
        let playback = engine.start();
        engine.finish_playback(playback.generation());
        for _ in 1..levels {
            for symbol in engine.state().sequence.clone() {
                engine.submit_symbol(symbol).unwrap();
            }
            let playback = engine.advance_level().unwrap();
            engine.finish_playback(playback.generation());
        }

        let sequence = engine.state().sequence.clone();
        let miss_at = miss_at % sequence.len();
        for symbol in &sequence[..miss_at] {
            engine.submit_symbol(*symbol).unwrap();
        }
        let wrong = (sequence[miss_at].index() + 1) % 4;
        let outcome = engine.submit_input(wrong).unwrap();

        prop_assert!(matches!(outcome, InputOutcome::Failed(_)));
        let state = engine.state();
        prop_assert!(state.sequence.is_empty());
        prop_assert!(state.player_input.is_empty());
        prop_assert_eq!(state.level, 1);
        prop_assert_eq!(state.score, 0);
        prop_assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn input_while_showing_is_dropped(seed in any::<u64>(), hits in prop::collection::vec(0usize..4, 1..10)) {
        let mut session = Session::seeded(seed, Tuning::default());
        session.start();
        let before = session.state().clone();
        for index in hits {
            prop_assert_eq!(session.submit_input(index).unwrap(), InputOutcome::Ignored);
        }
        prop_assert_eq!(session.state(), &before);
    }

    #[test]
    fn start_always_yields_fresh_state(seed in any::<u64>(), levels in 0usize..5) {
        let mut session = Session::seeded(seed, Tuning::default());
        session.start();
        for _ in 0..levels {
            settle(&mut session);
            for symbol in session.state().sequence.clone() {
                session.submit_input(symbol.index()).unwrap();
            }
        }

        session.start();
        let state = session.state();
        prop_assert_eq!(state.score, 0);
        prop_assert_eq!(state.level, 1);
        prop_assert_eq!(state.sequence.len(), 1);
        prop_assert!(state.player_input.is_empty());
    }

    #[test]
    fn playback_flashes_follow_sequence(seed in any::<u64>(), levels in 1usize..6) {
        let mut session = Session::seeded(seed, Tuning::default());
        session.start();
        for _ in 1..levels {
            settle(&mut session);
            for symbol in session.state().sequence.clone() {
                session.submit_input(symbol.index()).unwrap();
            }
        }
        settle(&mut session);
        session.drain_events();

        // Same seed again, stamping the last playback at 1 ms resolution
        let mut replay = Session::seeded(seed, Tuning::default());
        replay.start();
        for _ in 1..levels {
            settle(&mut replay);
            for symbol in replay.state().sequence.clone() {
                replay.submit_input(symbol.index()).unwrap();
            }
            replay.drain_events();
        }
        let mut playback_start = replay.now_ms();
        let mut stamped = Vec::new();
        loop {
            for event in replay.drain_events() {
                match event {
                    GameEvent::PlaybackStarted { .. } => playback_start = replay.now_ms(),
                    GameEvent::Flash(flash) => {
                        stamped.push((replay.now_ms() - playback_start, flash.symbol));
                    }
                    _ => {}
                }
            }
            if replay.state().phase == GamePhase::AwaitingInput {
                break;
            }
            replay.advance(1);
        }

        let sequence = replay.state().sequence.clone();
        prop_assert_eq!(stamped.len(), sequence.len());
        for (i, (at, symbol)) in stamped.iter().enumerate() {
            prop_assert_eq!(*symbol, sequence[i]);
            prop_assert_eq!(*at, 800 + 1200 * i as u64);
        }
        prop_assert_eq!(session.state().sequence.clone(), sequence);
    }
}
