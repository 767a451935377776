//! String resonator: a tuned comb with a damping low-pass in the loop.

use dasp_graph::{Buffer, Input};

use crate::automation::Kernel;
use crate::format::{Format, ProcessContext};
use crate::parameter::{ParameterAddress, ParameterSpec};
use crate::units::mix_inputs;

pub static STRING_RESONATOR_PARAMETERS: [ParameterSpec; 2] = [
    ParameterSpec::new("fundamentalFrequency", 12.0, 10000.0, 100.0),
    ParameterSpec::new("feedback", 0.0, 1.0, 0.95),
];

const FUNDAMENTAL: usize = 0;
const FEEDBACK: usize = 1;

struct Line {
    buffer: Vec<f32>,
    write: usize,
    last: f32,
}

/// Passes the input through a Karplus-Strong style string model tuned to
/// `fundamentalFrequency`. Feedback near 1 rings longer.
pub struct StringResonatorKernel {
    values: [f32; 2],
    sample_rate: f32,
    lines: Vec<Line>,
}

impl StringResonatorKernel {
    pub fn new(format: &Format) -> Self {
        let min_frequency = STRING_RESONATOR_PARAMETERS[FUNDAMENTAL].min as f32;
        let len = (format.sample_rate as f32 / min_frequency).ceil() as usize + 2;
        Self {
            values: STRING_RESONATOR_PARAMETERS.map(|spec| spec.default as f32),
            sample_rate: format.sample_rate as f32,
            lines: (0..format.channels)
                .map(|_| Line {
                    buffer: vec![0.0; len],
                    write: 0,
                    last: 0.0,
                })
                .collect(),
        }
    }
}

impl Kernel for StringResonatorKernel {
    fn parameters(&self) -> &'static [ParameterSpec] {
        &STRING_RESONATOR_PARAMETERS
    }

    fn set_parameter(&mut self, address: ParameterAddress, value: f32) {
        let i = address.0 as usize;
        if let Some(spec) = STRING_RESONATOR_PARAMETERS.get(i) {
            self.values[i] = spec.clamp(value as f64) as f32;
        }
    }

    fn parameter(&self, address: ParameterAddress) -> f32 {
        self.values.get(address.0 as usize).copied().unwrap_or_default()
    }

    fn process(&mut self, _ctx: &ProcessContext, inputs: &[Input], outputs: &mut [Buffer]) {
        mix_inputs(inputs, outputs);

        let period = self.sample_rate / self.values[FUNDAMENTAL];
        let feedback = self.values[FEEDBACK];

        for (line, buffer) in self.lines.iter_mut().zip(outputs.iter_mut()) {
            let capacity = line.buffer.len();
            let period = period.clamp(1.0, (capacity - 2) as f32);
            let whole = period.floor() as usize;
            let frac = period - whole as f32;

            for sample in buffer.iter_mut() {
                // Fractional read for tuning between whole-sample periods
                let a = line.buffer[(line.write + capacity - whole) % capacity];
                let b = line.buffer[(line.write + capacity - whole - 1) % capacity];
                let delayed = a + (b - a) * frac;

                // Two-point average damps the highs on every pass
                let damped = 0.5 * (delayed + line.last);
                line.last = delayed;

                let y = *sample + damped * feedback;
                line.buffer[line.write] = y;
                line.write = (line.write + 1) % capacity;
                *sample = y;
            }
        }
    }

    fn num_outputs(&self) -> usize {
        self.lines.len()
    }
}
