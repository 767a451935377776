//! Reverb kernels: an 8-line feedback delay network and a single comb.

use dasp_graph::{Buffer, Input};

use crate::automation::Kernel;
use crate::format::{Format, ProcessContext};
use crate::parameter::{ParameterAddress, ParameterSpec};
use crate::units::{mix_inputs, one_pole_coefficient};

pub static COSTELLO_REVERB_PARAMETERS: [ParameterSpec; 2] = [
    ParameterSpec::new("feedback", 0.0, 1.0, 0.6),
    ParameterSpec::new("cutoffFrequency", 12.0, 20000.0, 4000.0),
];

const FEEDBACK: usize = 0;
const CUTOFF: usize = 1;

/// Line lengths in samples at 44.1 kHz; mutually prime to avoid stacked echoes.
const LINE_LENGTHS: [f32; 8] = [2473.0, 2767.0, 3217.0, 3557.0, 3907.0, 4127.0, 2143.0, 1933.0];

const OUTPUT_GAIN: f32 = 0.35;

struct Waveguide {
    buffer: Vec<f32>,
    write: usize,
    lowpass: f32,
}

impl Waveguide {
    #[inline]
    fn read(&self) -> f32 {
        self.buffer[self.write]
    }

    #[inline]
    fn write(&mut self, value: f32) {
        self.buffer[self.write] = value;
        self.write = (self.write + 1) % self.buffer.len();
    }
}

/// Stereo reverb built from 8 lossless waveguides meeting at a scattering
/// junction of equal impedance. Each line is damped by a one-pole low-pass.
///
/// A feedback of exactly 1 never decays; the range stops there.
pub struct CostelloReverbKernel {
    values: [f32; 2],
    sample_rate: f32,
    lines: Vec<Waveguide>,
}

impl CostelloReverbKernel {
    pub fn new(format: &Format) -> Self {
        let scale = format.sample_rate as f32 / 44100.0;
        Self {
            values: COSTELLO_REVERB_PARAMETERS.map(|spec| spec.default as f32),
            sample_rate: format.sample_rate as f32,
            lines: LINE_LENGTHS
                .iter()
                .map(|len| Waveguide {
                    buffer: vec![0.0; ((len * scale) as usize).max(1)],
                    write: 0,
                    lowpass: 0.0,
                })
                .collect(),
        }
    }
}

impl Kernel for CostelloReverbKernel {
    fn parameters(&self) -> &'static [ParameterSpec] {
        &COSTELLO_REVERB_PARAMETERS
    }

    fn set_parameter(&mut self, address: ParameterAddress, value: f32) {
        let i = address.0 as usize;
        if let Some(spec) = COSTELLO_REVERB_PARAMETERS.get(i) {
            self.values[i] = spec.clamp(value as f64) as f32;
        }
    }

    fn parameter(&self, address: ParameterAddress) -> f32 {
        self.values.get(address.0 as usize).copied().unwrap_or_default()
    }

    fn process(&mut self, _ctx: &ProcessContext, inputs: &[Input], outputs: &mut [Buffer]) {
        mix_inputs(inputs, outputs);

        let feedback = self.values[FEEDBACK];
        let cutoff = self.values[CUTOFF].min(self.sample_rate * 0.499);
        let a = one_pole_coefficient(cutoff, self.sample_rate);
        let junction_gain = 2.0 / self.lines.len() as f32;
        let channels = outputs.len();
        if channels == 0 {
            return;
        }

        for i in 0..outputs[0].len() {
            let left = outputs[0][i];
            let right = outputs[channels - 1][i];

            let mut taps = [0.0f32; 8];
            for (tap, line) in taps.iter_mut().zip(self.lines.iter_mut()) {
                line.lowpass = (1.0 - a) * line.read() + a * line.lowpass;
                *tap = line.lowpass;
            }
            let junction = junction_gain * taps.iter().sum::<f32>();

            let (mut wet_left, mut wet_right) = (0.0, 0.0);
            for (n, (tap, line)) in taps.iter().zip(self.lines.iter_mut()).enumerate() {
                let input = if n % 2 == 0 { left } else { right };
                line.write((junction - tap) * feedback + input);
                if n % 2 == 0 {
                    wet_left += tap;
                } else {
                    wet_right += tap;
                }
            }

            outputs[0][i] = wet_left * OUTPUT_GAIN;
            if channels > 1 {
                outputs[channels - 1][i] = wet_right * OUTPUT_GAIN;
            }
        }
    }
}

pub static COMB_FILTER_REVERB_PARAMETERS: [ParameterSpec; 1] =
    [ParameterSpec::new("reverbDuration", 0.0, 10.0, 1.0)];

/// Comb loop length in seconds. A construction property, not automatable.
pub static COMB_LOOP_DURATION: ParameterSpec =
    ParameterSpec::new("loopDuration", 0.0, 10.0, 0.1);

struct Comb {
    buffer: Vec<f32>,
    write: usize,
}

/// A feedback comb whose loop gain gives a 60 dB decay in `reverbDuration`
/// seconds. The loop length is a construction property (`loopDuration`).
pub struct CombFilterReverbKernel {
    reverb_duration: f32,
    loop_duration: f32,
    sample_rate: f32,
    combs: Vec<Comb>,
}

impl CombFilterReverbKernel {
    pub fn new(format: &Format) -> Self {
        let mut kernel = Self {
            reverb_duration: COMB_FILTER_REVERB_PARAMETERS[0].default as f32,
            loop_duration: COMB_LOOP_DURATION.default as f32,
            sample_rate: format.sample_rate as f32,
            combs: (0..format.channels)
                .map(|_| Comb {
                    buffer: Vec::new(),
                    write: 0,
                })
                .collect(),
        };
        kernel.set_loop_duration(COMB_LOOP_DURATION.default as f32);
        kernel
    }

    /// Resize the comb, clamping to `loopDuration`'s range. Allocates, so only
    /// call before the unit is attached.
    pub fn set_loop_duration(&mut self, seconds: f32) {
        let seconds = COMB_LOOP_DURATION.clamp(seconds as f64) as f32;
        self.loop_duration = seconds.max(1.0 / self.sample_rate);
        let len = ((self.loop_duration * self.sample_rate) as usize).max(1);
        for comb in self.combs.iter_mut() {
            comb.buffer = vec![0.0; len];
            comb.write = 0;
        }
    }

    fn loop_gain(&self) -> f32 {
        if self.reverb_duration <= 0.0 {
            0.0
        } else {
            0.001f32.powf(self.loop_duration / self.reverb_duration)
        }
    }
}

impl Kernel for CombFilterReverbKernel {
    fn parameters(&self) -> &'static [ParameterSpec] {
        &COMB_FILTER_REVERB_PARAMETERS
    }

    fn set_parameter(&mut self, address: ParameterAddress, value: f32) {
        if address.0 == 0 {
            self.reverb_duration = COMB_FILTER_REVERB_PARAMETERS[0].clamp(value as f64) as f32;
        }
    }

    fn parameter(&self, address: ParameterAddress) -> f32 {
        if address.0 == 0 {
            self.reverb_duration
        } else {
            0.0
        }
    }

    fn set_property(&mut self, name: &str, value: f32) -> bool {
        match name {
            "loopDuration" => {
                self.set_loop_duration(value);
                true
            }
            _ => false,
        }
    }

    fn process(&mut self, _ctx: &ProcessContext, inputs: &[Input], outputs: &mut [Buffer]) {
        mix_inputs(inputs, outputs);

        let gain = self.loop_gain();
        for (comb, buffer) in self.combs.iter_mut().zip(outputs.iter_mut()) {
            let len = comb.buffer.len();
            for sample in buffer.iter_mut() {
                let delayed = comb.buffer[comb.write];
                comb.buffer[comb.write] = *sample + delayed * gain;
                comb.write = (comb.write + 1) % len;
                *sample = delayed;
            }
        }
    }

    fn num_outputs(&self) -> usize {
        self.combs.len()
    }
}
