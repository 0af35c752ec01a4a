use std::{
    f32::consts::TAU,
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::{AudioCue, AudioError, ThunderTone};

/// Plays thunder on a dedicated thread that owns the output stream.
///
/// Requests that arrive while a tone is playing are dropped.
#[derive(Debug)]
pub struct ThunderCue {
    tx: Sender<ThunderTone>,
}

impl ThunderCue {
    pub fn spawn() -> Result<Self, AudioError> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("thunder".to_string())
            .spawn(move || run_worker(&rx))
            .map_err(|err| AudioError::Stream(err.to_string()))?;
        Ok(Self { tx })
    }
}

impl AudioCue for ThunderCue {
    fn play_thunder(&self, tone: ThunderTone) -> Result<(), AudioError> {
        self.tx.send(tone).map_err(|_| AudioError::WorkerGone)
    }
}

fn run_worker(rx: &Receiver<ThunderTone>) {
    while let Ok(tone) = rx.recv() {
        if let Err(err) = play_blocking(tone) {
            log::debug!("thunder cue failed: {err}");
        }
        while rx.try_recv().is_ok() {}
    }
}

fn play_blocking(tone: ThunderTone) -> Result<(), AudioError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
    let supported = device
        .default_output_config()
        .map_err(|err| AudioError::Stream(err.to_string()))?;
    if supported.sample_format() != cpal::SampleFormat::F32 {
        return Err(AudioError::UnsupportedFormat(format!(
            "{:?}",
            supported.sample_format()
        )));
    }

    let config: cpal::StreamConfig = supported.into();
    let sample_rate = config.sample_rate.0 as f32;
    let channels = usize::from(config.channels).max(1);
    let mut frame: u64 = 0;

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for samples in data.chunks_mut(channels) {
                    let t = frame as f32 / sample_rate;
                    let value = (TAU * tone.frequency_hz * t).sin() * tone.gain_at(t);
                    samples.fill(value);
                    frame += 1;
                }
            },
            |err| log::debug!("thunder stream error: {err}"),
            None,
        )
        .map_err(|err| AudioError::Stream(err.to_string()))?;
    stream
        .play()
        .map_err(|err| AudioError::Stream(err.to_string()))?;
    thread::sleep(ThunderTone::DURATION);
    Ok(())
}
