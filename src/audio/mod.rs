//! Optional thunder cue played alongside timed strikes.
//!
//! Sound is best effort: every failure surfaces as an [`AudioError`] that the
//! storm logs and drops.

#[cfg(feature = "audio")]
mod device;

use std::time::Duration;

use rand::Rng;
use thiserror::Error;

#[cfg(feature = "audio")]
pub use device::ThunderCue;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device")]
    NoDevice,
    #[error("unsupported sample format {0}")]
    UnsupportedFormat(String),
    #[error("audio stream failed: {0}")]
    Stream(String),
    #[error("audio worker is not running")]
    WorkerGone,
}

/// A short low rumble: a sine tone with an exponential swell and fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThunderTone {
    pub frequency_hz: f32,
    pub peak_gain: f32,
}

impl ThunderTone {
    pub const DURATION: Duration = Duration::from_secs(2);
    const ATTACK_SECS: f32 = 0.04;
    const FLOOR_GAIN: f32 = 0.0001;
    const TAIL_GAIN: f32 = 0.001;

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            frequency_hz: 50.0 + rng.random::<f32>() * 20.0,
            peak_gain: 0.03 + rng.random::<f32>() * 0.03,
        }
    }

    /// Envelope gain `t` seconds into the tone; silent outside the tone.
    pub fn gain_at(&self, t: f32) -> f32 {
        let total = Self::DURATION.as_secs_f32();
        if !(0.0..total).contains(&t) {
            return 0.0;
        }
        if t < Self::ATTACK_SECS {
            let progress = t / Self::ATTACK_SECS;
            Self::FLOOR_GAIN * (self.peak_gain / Self::FLOOR_GAIN).powf(progress)
        } else {
            let progress = (t - Self::ATTACK_SECS) / (total - Self::ATTACK_SECS);
            self.peak_gain * (Self::TAIL_GAIN / self.peak_gain).powf(progress)
        }
    }
}

pub trait AudioCue: std::fmt::Debug {
    fn play_thunder(&self, tone: ThunderTone) -> Result<(), AudioError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl AudioCue for SilentCue {
    fn play_thunder(&self, _tone: ThunderTone) -> Result<(), AudioError> {
        Ok(())
    }
}

/// The cue for this build: silent when muted or built without `audio`.
pub fn default_cue(muted: bool) -> Box<dyn AudioCue> {
    if muted {
        return Box::new(SilentCue);
    }
    output_cue()
}

#[cfg(feature = "audio")]
fn output_cue() -> Box<dyn AudioCue> {
    match ThunderCue::spawn() {
        Ok(cue) => Box::new(cue),
        Err(err) => {
            log::info!("thunder disabled: {err}");
            Box::new(SilentCue)
        }
    }
}

#[cfg(not(feature = "audio"))]
fn output_cue() -> Box<dyn AudioCue> {
    log::debug!("built without audio support; thunder is silent");
    Box::new(SilentCue)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn envelope_swells_then_fades() {
        let tone = ThunderTone {
            frequency_hz: 60.0,
            peak_gain: 0.05,
        };
        assert!((tone.gain_at(0.0) - 0.0001).abs() < 1e-7);
        assert!((tone.gain_at(0.04) - 0.05).abs() < 1e-5);
        assert!(tone.gain_at(0.02) < tone.gain_at(0.039));
        assert!(tone.gain_at(1.0) < tone.gain_at(0.5));
        assert!((tone.gain_at(1.999_99) - 0.001).abs() < 1e-4);
        assert_eq!(tone.gain_at(2.0), 0.0);
        assert_eq!(tone.gain_at(-0.1), 0.0);
    }

    #[test]
    fn random_tones_stay_low_and_quiet() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let tone = ThunderTone::random(&mut rng);
            assert!((50.0..70.0).contains(&tone.frequency_hz));
            assert!((0.03..0.06).contains(&tone.peak_gain));
        }
    }

    #[test]
    fn muted_cue_always_succeeds() {
        let cue = default_cue(true);
        let tone = ThunderTone {
            frequency_hz: 55.0,
            peak_gain: 0.04,
        };
        assert!(cue.play_thunder(tone).is_ok());
    }
}
