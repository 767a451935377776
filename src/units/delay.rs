//! Delay line with feedback and a low-pass filter in the loop

use dasp_graph::{Buffer, Input};

use crate::format::{Format, ProcessContext};
use crate::unit::AudioUnit;
use crate::units::{mix_inputs, one_pole_coefficient};

/// Longest delay the unit can hold, in seconds.
pub const MAX_DELAY_TIME: f32 = 2.0;

/// Messages to control a [`DelayUnit`]. Feedback and mix are in percent.
#[derive(Clone, Copy, Debug)]
pub enum DelayMessage {
    /// Delay time in seconds, 0 to 2
    SetTime(f32),
    /// Feedback in percent, -100 to 100
    SetFeedback(f32),
    /// Cutoff of the low-pass in the feedback path, 10 Hz to Nyquist
    SetLowPassCutoff(f32),
    /// Wet share of the output in percent, 0 to 100
    SetWetDryMix(f32),
}

struct Line {
    buffer: Vec<f32>,
    write: usize,
    lowpass: f32,
}

/// A fixed built-in delay effect.
pub struct DelayUnit {
    lines: Vec<Line>,
    sample_rate: f32,
    time: f32,
    feedback: f32,
    cutoff: f32,
    wet_dry_mix: f32,
}

impl DelayUnit {
    pub fn new(format: &Format) -> Self {
        let len = (MAX_DELAY_TIME * format.sample_rate as f32) as usize + 1;
        let lines = (0..format.channels)
            .map(|_| Line {
                buffer: vec![0.0; len],
                write: 0,
                lowpass: 0.0,
            })
            .collect();

        Self {
            lines,
            sample_rate: format.sample_rate as f32,
            time: 1.0,
            feedback: 50.0,
            cutoff: 15000.0,
            wet_dry_mix: 100.0,
        }
    }

    fn delay_samples(&self, capacity: usize) -> usize {
        ((self.time * self.sample_rate) as usize).clamp(1, capacity - 1)
    }
}

impl AudioUnit for DelayUnit {
    type Message = DelayMessage;

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        messages: impl Iterator<Item = DelayMessage>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        let nyquist = (self.sample_rate / 2.0).max(10.0);
        for msg in messages {
            match msg {
                DelayMessage::SetTime(t) => self.time = t.clamp(0.0, MAX_DELAY_TIME),
                DelayMessage::SetFeedback(f) => self.feedback = f.clamp(-100.0, 100.0),
                DelayMessage::SetLowPassCutoff(c) => self.cutoff = c.clamp(10.0, nyquist),
                DelayMessage::SetWetDryMix(m) => self.wet_dry_mix = m.clamp(0.0, 100.0),
            }
        }

        mix_inputs(inputs, outputs);

        let wet = self.wet_dry_mix / 100.0;
        let feedback = self.feedback / 100.0;
        let a = one_pole_coefficient(self.cutoff, self.sample_rate);
        let capacity = self.lines.first().map_or(2, |line| line.buffer.len());
        let delay = self.delay_samples(capacity);

        for (line, buffer) in self.lines.iter_mut().zip(outputs.iter_mut()) {
            for sample in buffer.iter_mut() {
                let dry = *sample;
                let read = (line.write + capacity - delay) % capacity;
                let delayed = line.buffer[read];

                line.lowpass = (1.0 - a) * delayed + a * line.lowpass;
                line.buffer[line.write] = dry + line.lowpass * feedback;
                line.write = (line.write + 1) % capacity;

                *sample = dry * (1.0 - wet) + delayed * wet;
            }
        }
    }

    #[inline]
    fn num_inputs(&self) -> usize {
        1
    }

    #[inline]
    fn num_outputs(&self) -> usize {
        self.lines.len()
    }
}
