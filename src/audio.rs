//! Synthesized sound cues.

use crate::session::Event;
use anyhow::{Context, Result};
use fundsp::prelude::*;
use log::debug;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

const SAMPLE_RATE: u32 = 44100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Jump,
    Point,
    Crash,
}

impl Cue {
    pub fn for_event(event: &Event) -> Option<Cue> {
        match event {
            Event::Jumped => Some(Cue::Jump),
            Event::Scored(_) => Some(Cue::Point),
            Event::Ended { .. } => Some(Cue::Crash),
            _ => None,
        }
    }

    fn samples(self) -> Vec<f32> {
        match self {
            // short upward chirp
            Cue::Jump => {
                let freq = lfo(|t: f32| 500.0 + 400.0 * (t / 0.08).min(1.0));
                let gain = lfo(|t: f32| 0.12 * (1.0 - t / 0.1).max(0.0));
                render(freq >> sine::<f32>() * gain, 0.1)
            }
            // two-note ding
            Cue::Point => {
                let freq = lfo(|t: f32| if t < 0.06 { 880.0 } else { 1320.0 });
                let gain = lfo(|t: f32| 0.1 * (1.0 - t / 0.18).max(0.0));
                render(freq >> sine::<f32>() * gain, 0.18)
            }
            // falling saw sweep, 400Hz to 80Hz
            Cue::Crash => {
                let freq = lfo(|t: f32| 400.0 - 320.0 * (t / 0.4).min(1.0));
                let gain = lfo(|t: f32| 0.15 * (1.0 - t / 0.5).max(0.0));
                render(freq >> saw() * gain, 0.5)
            }
        }
    }
}

fn render(mut node: impl AudioUnit, secs: f32) -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * secs) as usize;
    node.set_sample_rate(SAMPLE_RATE as f64);
    (0..n).map(|_| node.get_mono()).collect()
}

/// Open audio output. Dropping it silences everything.
pub struct Audio {
    stream: OutputStream,
}

impl Audio {
    pub fn open() -> Result<Self> {
        let mut stream =
            OutputStreamBuilder::open_default_stream().context("Failed to open audio output")?;
        // the drop notice would land on the restored terminal
        stream.log_on_drop(false);
        Ok(Self { stream })
    }

    pub fn play(&self, cue: Cue) {
        debug!("Playing {:?}", cue);
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, cue.samples()));
        sink.detach();
    }
}
