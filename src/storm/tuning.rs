//! Probabilities, intervals and counts that shape how busy the storm looks.
//!
//! Defaults are the hand-tuned values of the stock effect. A JSON file may
//! override any subset of fields.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV: &str = "TERMINAL_LIGHTNING_CONFIG";

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("reading tuning file {} failed", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing tuning file {} failed", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Shortest gap between timed strikes.
    pub strike_interval_min_ms: u64,
    /// Uniform extra gap added on top of the minimum.
    pub strike_interval_jitter_ms: u64,
    /// Detail level of timed strikes.
    pub random_strike_detail: i32,
    /// Chance per timed strike of a second, smaller flash shortly after.
    pub double_strike_chance: f64,
    pub double_strike_delay_min_ms: u64,
    pub double_strike_delay_jitter_ms: u64,
    /// Chance per frame of a strike aimed at the pointer.
    pub pointer_strike_chance: f64,
    /// Chance per frame, per hovered element, of a burst.
    pub hover_burst_chance: f64,
    /// Chance of an immediate burst when the pointer enters an element.
    pub hover_enter_burst_chance: f64,
    pub burst_bolts_min: usize,
    pub burst_bolts_max: usize,
    pub burst_stagger_ms: u64,
    /// Chance that a burst member carries a branch.
    pub burst_branch_chance: f64,
    /// Chance that a burst also calls down a long strike onto its centre.
    pub burst_strike_toward_chance: f64,
    /// Bursts fired when an element is activated.
    pub activate_bursts: usize,
    pub activate_stagger_ms: u64,
    /// Two timed strikes shortly after start-up.
    pub intro_strikes: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            strike_interval_min_ms: 800,
            strike_interval_jitter_ms: 4_000,
            random_strike_detail: 7,
            double_strike_chance: 0.4,
            double_strike_delay_min_ms: 50,
            double_strike_delay_jitter_ms: 100,
            pointer_strike_chance: 0.005,
            hover_burst_chance: 0.02,
            hover_enter_burst_chance: 0.5,
            burst_bolts_min: 8,
            burst_bolts_max: 13,
            burst_stagger_ms: 30,
            burst_branch_chance: 0.3,
            burst_strike_toward_chance: 0.7,
            activate_bursts: 3,
            activate_stagger_ms: 100,
            intro_strikes: true,
        }
    }
}

impl Tuning {
    pub const INTRO_STRIKES_AT: [Duration; 2] =
        [Duration::from_millis(500), Duration::from_millis(1_200)];

    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let content = fs::read_to_string(path).map_err(|source| TuningError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning: Self = serde_json::from_str(&content).map_err(|source| TuningError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let chances = [
            ("double_strike_chance", self.double_strike_chance),
            ("pointer_strike_chance", self.pointer_strike_chance),
            ("hover_burst_chance", self.hover_burst_chance),
            ("hover_enter_burst_chance", self.hover_enter_burst_chance),
            ("burst_branch_chance", self.burst_branch_chance),
            ("burst_strike_toward_chance", self.burst_strike_toward_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Invalid(format!(
                    "{name} must be within 0..=1, got {value}"
                )));
            }
        }
        if self.burst_bolts_min == 0 || self.burst_bolts_min > self.burst_bolts_max {
            return Err(TuningError::Invalid(format!(
                "burst size range {}..={} is empty",
                self.burst_bolts_min, self.burst_bolts_max
            )));
        }
        if self.strike_interval_min_ms == 0 && self.strike_interval_jitter_ms == 0 {
            return Err(TuningError::Invalid(
                "strike interval must be longer than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn strike_interval_min(&self) -> Duration {
        Duration::from_millis(self.strike_interval_min_ms)
    }
}

/// Tuning from `explicit`, else from the file named by `TERMINAL_LIGHTNING_CONFIG`,
/// else defaults.
pub fn resolve(explicit: Option<&Path>) -> Result<Tuning, TuningError> {
    resolve_from(explicit, std::env::var_os(CONFIG_ENV))
}

fn resolve_from(explicit: Option<&Path>, env_path: Option<OsString>) -> Result<Tuning, TuningError> {
    if let Some(path) = explicit {
        return Tuning::load(path);
    }
    match env_path {
        Some(path) if !path.is_empty() => Tuning::load(Path::new(&path)),
        _ => Ok(Tuning::default()),
    }
}
