//! Equal-power stereo panner

use core::f32::consts::FRAC_PI_4;

use dasp_graph::{Buffer, Input};

use crate::automation::Kernel;
use crate::format::ProcessContext;
use crate::parameter::{ParameterAddress, ParameterSpec};
use crate::units::mix_inputs;

pub static PANNER_PARAMETERS: [ParameterSpec; 1] =
    [ParameterSpec::new("pan", -1.0, 1.0, 0.0)];

/// -1 is hard left, 1 is hard right, 0 is center.
pub struct PannerKernel {
    pan: f32,
}

impl PannerKernel {
    pub fn new() -> Self {
        Self {
            pan: PANNER_PARAMETERS[0].default as f32,
        }
    }

    /// (left, right) gains for the current position.
    pub fn gains(&self) -> (f32, f32) {
        let theta = (self.pan + 1.0) * FRAC_PI_4;
        (theta.cos(), theta.sin())
    }
}

impl Default for PannerKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for PannerKernel {
    fn parameters(&self) -> &'static [ParameterSpec] {
        &PANNER_PARAMETERS
    }

    fn set_parameter(&mut self, address: ParameterAddress, value: f32) {
        if address.0 == 0 {
            self.pan = PANNER_PARAMETERS[0].clamp(value as f64) as f32;
        }
    }

    fn parameter(&self, address: ParameterAddress) -> f32 {
        if address.0 == 0 {
            self.pan
        } else {
            0.0
        }
    }

    fn process(&mut self, _ctx: &ProcessContext, inputs: &[Input], outputs: &mut [Buffer]) {
        mix_inputs(inputs, outputs);

        let (left, right) = self.gains();
        if let [l, r] = outputs {
            l.iter_mut().for_each(|s| *s *= left);
            r.iter_mut().for_each(|s| *s *= right);
        }
    }
}
