//! Summing gain stage: the unit behind mixers and the engine output.

use dasp_graph::{Buffer, Input};

use crate::format::ProcessContext;
use crate::unit::AudioUnit;
use crate::units::mix_inputs;

/// Messages to control a [`Gain`]
#[derive(Clone, Copy, Debug)]
pub enum GainMessage {
    /// Set the volume multiplier (1.0 = unity, 0.0 = silence)
    SetVolume(f32),
}

/// Sums every input, then scales by a smoothed volume.
///
/// Mono inputs are upmixed to all `channels` outputs.
pub struct Gain {
    channels: usize,
    volume: f32,
    /// Smoothing to prevent clicks on rapid volume changes
    smoothed: f32,
    /// Smoothing coefficient (0.0 = instant, 1.0 = no change)
    smooth_coeff: f32,
}

impl Gain {
    pub fn new(channels: usize, volume: f32) -> Self {
        Self {
            channels,
            volume,
            smoothed: volume,
            smooth_coeff: 0.995, // ~5ms at 44.1kHz
        }
    }

    /// Disable smoothing for instant volume changes
    pub fn without_smoothing(mut self) -> Self {
        self.smooth_coeff = 0.0;
        self
    }
}

impl AudioUnit for Gain {
    type Message = GainMessage;

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        messages: impl Iterator<Item = GainMessage>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        for msg in messages {
            match msg {
                GainMessage::SetVolume(v) => self.volume = v.max(0.0),
            }
        }

        mix_inputs(inputs, outputs);

        let target = self.volume;
        let coeff = self.smooth_coeff;
        let mut settled = self.smoothed;

        for (ch, buffer) in outputs.iter_mut().enumerate() {
            // Every channel follows the same envelope
            let mut gain = self.smoothed;
            for sample in buffer.iter_mut() {
                gain = target + coeff * (gain - target);
                *sample *= gain;
            }
            if ch == 0 {
                settled = gain;
            }
        }

        self.smoothed = settled;
    }

    #[inline]
    fn num_inputs(&self) -> usize {
        usize::MAX
    }

    #[inline]
    fn num_outputs(&self) -> usize {
        self.channels
    }
}
