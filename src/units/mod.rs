//! Built-in processing units.
//!
//! These are the opaque components the node layer configures. Nodes never
//! reach into them; they talk through message queues (direct units) or a
//! [`ParameterTree`](crate::ParameterTree) (automatable kernels).
//!
//! ## Direct units
//! - [`Gain`] - Sums any number of inputs, scaled by a volume
//! - [`SineUnit`] - Sine oscillator
//! - [`DelayUnit`] - Delay line with feedback and a low-pass in the loop
//! - [`Biquad`] - Low-pass filter with resonance
//!
//! ## Automatable kernels
//! - [`StringResonatorKernel`], [`CostelloReverbKernel`], [`CombFilterReverbKernel`],
//!   [`PannerKernel`], [`LowShelfKernel`]

use dasp_graph::{Buffer, Input};

pub mod biquad;
pub mod delay;
pub mod gain;
pub mod panner;
pub mod resonator;
pub mod reverb;
pub mod sine;

pub use biquad::{Biquad, BiquadMessage, LowShelfKernel};
pub use delay::{DelayMessage, DelayUnit};
pub use gain::{Gain, GainMessage};
pub use panner::PannerKernel;
pub use resonator::StringResonatorKernel;
pub use reverb::{CombFilterReverbKernel, CostelloReverbKernel};
pub use sine::{SineMessage, SineUnit};

/// Sum every input onto `outputs`, overwriting what was there.
///
/// Mono inputs are copied to every output channel. Inputs with more channels
/// than outputs lose the extra channels; inputs with fewer repeat their last.
pub fn mix_inputs(inputs: &[Input], outputs: &mut [Buffer]) {
    for buf in outputs.iter_mut() {
        buf.iter_mut().for_each(|s| *s = 0.0);
    }

    for input in inputs {
        let in_buffers = input.buffers();
        if in_buffers.is_empty() {
            continue;
        }

        for (out_ch, out_buf) in outputs.iter_mut().enumerate() {
            let in_buf = &in_buffers[out_ch.min(in_buffers.len() - 1)];
            for (out_sample, in_sample) in out_buf.iter_mut().zip(in_buf.iter()) {
                *out_sample += *in_sample;
            }
        }
    }
}

/// One-pole low-pass coefficient for `cutoff` Hz.
#[inline]
pub(crate) fn one_pole_coefficient(cutoff: f32, sample_rate: f32) -> f32 {
    (-core::f32::consts::TAU * cutoff / sample_rate).exp()
}
