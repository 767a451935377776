//! Second-order IIR filters: a resonant low-pass unit and a low-shelf kernel.
//!
//! Coefficients follow the RBJ audio-EQ cookbook.

use core::f32::consts::{FRAC_1_SQRT_2, TAU};

use dasp_graph::{Buffer, Input};

use crate::automation::Kernel;
use crate::format::{Format, ProcessContext};
use crate::parameter::{ParameterAddress, ParameterSpec};
use crate::unit::AudioUnit;
use crate::units::mix_inputs;

#[derive(Clone, Copy, Debug, Default)]
struct Coefficients {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}

impl Coefficients {
    fn normalized(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    fn low_pass(cutoff: f32, q: f32, sample_rate: f32) -> Self {
        let w0 = TAU * cutoff / sample_rate;
        let (sin, cos) = w0.sin_cos();
        let alpha = sin / (2.0 * q);

        Self::normalized(
            (1.0 - cos) / 2.0,
            1.0 - cos,
            (1.0 - cos) / 2.0,
            1.0 + alpha,
            -2.0 * cos,
            1.0 - alpha,
        )
    }

    /// `gain` is linear amplitude at DC.
    fn low_shelf(corner: f32, gain: f32, q: f32, sample_rate: f32) -> Self {
        let a = gain.max(1e-4).sqrt();
        let w0 = TAU * corner / sample_rate;
        let (sin, cos) = w0.sin_cos();
        let alpha = sin / (2.0 * q.max(0.01));
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        Self::normalized(
            a * ((a + 1.0) - (a - 1.0) * cos + two_sqrt_a_alpha),
            2.0 * a * ((a - 1.0) - (a + 1.0) * cos),
            a * ((a + 1.0) - (a - 1.0) * cos - two_sqrt_a_alpha),
            (a + 1.0) + (a - 1.0) * cos + two_sqrt_a_alpha,
            -2.0 * ((a - 1.0) + (a + 1.0) * cos),
            (a + 1.0) + (a - 1.0) * cos - two_sqrt_a_alpha,
        )
    }
}

/// Transposed direct form II state for one channel.
#[derive(Clone, Copy, Debug, Default)]
struct State {
    z1: f32,
    z2: f32,
}

impl State {
    #[inline]
    fn tick(&mut self, c: &Coefficients, x: f32) -> f32 {
        let y = c.b0 * x + self.z1;
        self.z1 = c.b1 * x - c.a1 * y + self.z2;
        self.z2 = c.b2 * x - c.a2 * y;
        y
    }
}

fn filter_in_place(coefficients: &Coefficients, states: &mut [State], outputs: &mut [Buffer]) {
    for (state, buffer) in states.iter_mut().zip(outputs.iter_mut()) {
        for sample in buffer.iter_mut() {
            *sample = state.tick(coefficients, *sample);
        }
    }
}

/// Messages to control a [`Biquad`] low-pass.
#[derive(Clone, Copy, Debug)]
pub enum BiquadMessage {
    /// Cutoff in Hz, 10 to Nyquist
    SetCutoff(f32),
    /// Resonance in dB, -20 to 40
    SetResonance(f32),
}

/// A resonant low-pass filter.
pub struct Biquad {
    cutoff: f32,
    resonance: f32,
    sample_rate: f32,
    coefficients: Coefficients,
    states: Vec<State>,
}

impl Biquad {
    pub fn low_pass(format: &Format, cutoff: f32, resonance: f32) -> Self {
        let mut filter = Self {
            cutoff: cutoff.clamp(10.0, format.nyquist().max(10.0)),
            resonance: resonance.clamp(-20.0, 40.0),
            sample_rate: format.sample_rate as f32,
            coefficients: Coefficients::default(),
            states: vec![State::default(); format.channels],
        };
        filter.update();
        filter
    }

    fn update(&mut self) {
        // 0 dB of resonance is a flat Butterworth response.
        let q = FRAC_1_SQRT_2 * 10f32.powf(self.resonance / 20.0);
        // Stay just below Nyquist; at exactly Nyquist the filter degenerates.
        let cutoff = self.cutoff.min(self.sample_rate * 0.499);
        self.coefficients = Coefficients::low_pass(cutoff, q, self.sample_rate);
    }
}

impl AudioUnit for Biquad {
    type Message = BiquadMessage;

    fn process(
        &mut self,
        _ctx: &ProcessContext,
        messages: impl Iterator<Item = BiquadMessage>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        let nyquist = (self.sample_rate / 2.0).max(10.0);
        let mut dirty = false;
        for msg in messages {
            match msg {
                BiquadMessage::SetCutoff(c) => self.cutoff = c.clamp(10.0, nyquist),
                BiquadMessage::SetResonance(r) => self.resonance = r.clamp(-20.0, 40.0),
            }
            dirty = true;
        }
        if dirty {
            self.update();
        }

        mix_inputs(inputs, outputs);
        filter_in_place(&self.coefficients, &mut self.states, outputs);
    }

    #[inline]
    fn num_inputs(&self) -> usize {
        1
    }

    #[inline]
    fn num_outputs(&self) -> usize {
        self.states.len()
    }
}

pub static LOW_SHELF_PARAMETERS: [ParameterSpec; 3] = [
    ParameterSpec::new("cornerFrequency", 12.0, 20000.0, 1000.0),
    ParameterSpec::new("gain", 0.0, 10.0, 1.0),
    ParameterSpec::new("q", 0.0, 2.0, 0.707),
];

/// Low-shelf parametric equalizer.
///
/// `gain` is a linear amplitude applied below the corner frequency.
pub struct LowShelfKernel {
    values: [f32; 3],
    sample_rate: f32,
    coefficients: Coefficients,
    states: Vec<State>,
}

impl LowShelfKernel {
    pub fn new(format: &Format) -> Self {
        let mut kernel = Self {
            values: LOW_SHELF_PARAMETERS.map(|spec| spec.default as f32),
            sample_rate: format.sample_rate as f32,
            coefficients: Coefficients::default(),
            states: vec![State::default(); format.channels],
        };
        kernel.update();
        kernel
    }

    fn update(&mut self) {
        let [corner, gain, q] = self.values;
        let corner = corner.min(self.sample_rate * 0.499);
        self.coefficients = Coefficients::low_shelf(corner, gain, q, self.sample_rate);
    }
}

impl Kernel for LowShelfKernel {
    fn parameters(&self) -> &'static [ParameterSpec] {
        &LOW_SHELF_PARAMETERS
    }

    fn set_parameter(&mut self, address: ParameterAddress, value: f32) {
        let i = address.0 as usize;
        if let Some(spec) = LOW_SHELF_PARAMETERS.get(i) {
            let value = spec.clamp(value as f64) as f32;
            if self.values[i] != value {
                self.values[i] = value;
                self.update();
            }
        }
    }

    fn parameter(&self, address: ParameterAddress) -> f32 {
        self.values.get(address.0 as usize).copied().unwrap_or_default()
    }

    fn process(&mut self, _ctx: &ProcessContext, inputs: &[Input], outputs: &mut [Buffer]) {
        mix_inputs(inputs, outputs);
        filter_in_place(&self.coefficients, &mut self.states, outputs);
    }

    fn num_outputs(&self) -> usize {
        self.states.len()
    }
}
