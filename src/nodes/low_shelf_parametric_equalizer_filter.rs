//! Low-shelf parametric equalizer node

use crate::automation::Kernel;
use crate::engine::Engine;
use crate::error::Result;
use crate::format::Format;
use crate::node::Node;
use crate::nodes::automated::{Automated, Component};
use crate::parameter::Parameter;
use crate::unit::ComponentDescription;
use crate::units::biquad::LOW_SHELF_PARAMETERS;
use crate::units::LowShelfKernel;

pub const DESCRIPTION: ComponentDescription = ComponentDescription::effect(b"peq1");

const CORNER_FREQUENCY: usize = 0;
const GAIN: usize = 1;
const Q: usize = 2;
const NAMES: [&str; 3] = ["cornerFrequency", "gain", "q"];

fn factory(format: &Format) -> Result<Box<dyn Kernel>> {
    Ok(Box::new(LowShelfKernel::new(format)))
}

const COMPONENT: Component = Component {
    description: DESCRIPTION,
    name: "Local: LowShelfParametricEqualizerFilter",
    version: u32::MAX,
    factory,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LowShelfParametricEqualizerFilterSettings {
    /// Hz, 12 to 20000
    pub corner_frequency: f64,
    /// Linear, 0 to 10
    pub gain: f64,
    /// 0 to 2
    pub q: f64,
}

impl Default for LowShelfParametricEqualizerFilterSettings {
    fn default() -> Self {
        Self {
            corner_frequency: LOW_SHELF_PARAMETERS[CORNER_FREQUENCY].default,
            gain: LOW_SHELF_PARAMETERS[GAIN].default,
            q: LOW_SHELF_PARAMETERS[Q].default,
        }
    }
}

/// Boosts or cuts everything below a corner frequency.
pub struct LowShelfParametricEqualizerFilter {
    inner: Automated,
    corner_frequency: Parameter,
    gain: Parameter,
    q: Parameter,
}

impl LowShelfParametricEqualizerFilter {
    pub fn new(engine: &mut Engine, input: &mut impl AsMut<Node>) -> Self {
        Self::with_settings(
            engine,
            input,
            LowShelfParametricEqualizerFilterSettings::default(),
        )
    }

    pub fn with_settings(
        engine: &mut Engine,
        input: &mut impl AsMut<Node>,
        settings: LowShelfParametricEqualizerFilterSettings,
    ) -> Self {
        let inner = Automated::build(engine, input.as_mut(), &COMPONENT, &NAMES, &[]);
        let mut node = Self {
            inner,
            corner_frequency: Parameter::new(&LOW_SHELF_PARAMETERS[CORNER_FREQUENCY]),
            gain: Parameter::new(&LOW_SHELF_PARAMETERS[GAIN]),
            q: Parameter::new(&LOW_SHELF_PARAMETERS[Q]),
        };
        node.set_corner_frequency(settings.corner_frequency);
        node.set_gain(settings.gain);
        node.set_q(settings.q);
        node
    }
}

automated_node!(LowShelfParametricEqualizerFilter {
    corner_frequency, set_corner_frequency, ramp_corner_frequency => CORNER_FREQUENCY;
    /// Linear shelf gain
    gain, set_gain, ramp_gain => GAIN;
    q, set_q, ramp_q => Q;
});
