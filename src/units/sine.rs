//! Sine wave oscillator

use dasp_graph::{Buffer, Input};

use crate::format::ProcessContext;
use crate::unit::AudioUnit;

/// Messages to control a [`SineUnit`]
#[derive(Clone, Copy, Debug)]
pub enum SineMessage {
    SetFrequency(f32),
    SetAmplitude(f32),
}

/// A sine wave oscillator (mono generator)
pub struct SineUnit {
    frequency: f32,
    phase: f32,
    amplitude: f32,
}

impl SineUnit {
    pub fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            frequency: frequency.max(0.0),
            phase: 0.0,
            amplitude: amplitude.clamp(0.0, 1.0),
        }
    }
}

impl AudioUnit for SineUnit {
    type Message = SineMessage;

    fn process(
        &mut self,
        ctx: &ProcessContext,
        messages: impl Iterator<Item = SineMessage>,
        _inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        for msg in messages {
            match msg {
                SineMessage::SetFrequency(f) => self.frequency = f.max(0.0),
                SineMessage::SetAmplitude(a) => self.amplitude = a.clamp(0.0, 1.0),
            }
        }

        let Some((first, rest)) = outputs.split_first_mut() else {
            return;
        };

        let phase_inc = self.frequency / ctx.sample_rate as f32;
        let amplitude = self.amplitude;

        for sample in first.iter_mut() {
            *sample = (self.phase * core::f32::consts::TAU).sin() * amplitude;

            self.phase += phase_inc;
            self.phase -= self.phase.floor();
        }

        for buffer in rest.iter_mut() {
            buffer.copy_from_slice(first);
        }
    }
}
