//! Data-driven game tuning
//!
//! Timings and scoring. Persisted separately in LocalStorage so the board can
//! be retuned without a rebuild; any missing field falls back to its default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("drum_count must be between 1 and {max}, got {got}")]
    DrumCount { got: u8, max: u8 },
    #[error("a playback step must last longer than 0 ms")]
    ZeroStep,
}

/// Timing and scoring knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Number of drums on the board
    pub drum_count: u8,

    // === Playback ===
    /// Wait before each step lights its drum
    pub step_delay_ms: u32,
    /// How long each step stays lit
    pub step_hold_ms: u32,

    // === Input ===
    /// Flash length when the player hits a drum
    pub input_flash_ms: u32,

    // === Transitions ===
    /// Level-up message time before the next playback
    pub level_up_delay_ms: u32,
    /// Failure message time before `ReturnToIdle`
    pub failure_delay_ms: u32,
    /// Start the next level by itself once the level-up delay runs out
    pub auto_advance: bool,

    // === Scoring ===
    pub points_per_level: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            drum_count: DEFAULT_DRUM_COUNT,

            step_delay_ms: STEP_DELAY_MS,
            step_hold_ms: STEP_HOLD_MS,

            input_flash_ms: INPUT_FLASH_MS,

            level_up_delay_ms: LEVEL_UP_DELAY_MS,
            failure_delay_ms: FAILURE_DELAY_MS,
            auto_advance: true,

            points_per_level: POINTS_PER_LEVEL,
        }
    }
}

impl Tuning {
    /// Length of one playback step (delay + hold)
    pub fn step_duration_ms(&self) -> u64 {
        u64::from(self.step_delay_ms) + u64::from(self.step_hold_ms)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.drum_count == 0 || self.drum_count > MAX_DRUM_COUNT {
            return Err(TuningError::DrumCount {
                got: self.drum_count,
                max: MAX_DRUM_COUNT,
            });
        }
        if self.step_duration_ms() == 0 {
            return Err(TuningError::ZeroStep);
        }
        Ok(())
    }

    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "sinapsis_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
