//! Feedback-delay-network reverb node

use crate::automation::Kernel;
use crate::engine::Engine;
use crate::error::Result;
use crate::format::Format;
use crate::node::Node;
use crate::nodes::automated::{Automated, Component};
use crate::parameter::Parameter;
use crate::unit::ComponentDescription;
use crate::units::reverb::COSTELLO_REVERB_PARAMETERS;
use crate::units::CostelloReverbKernel;

pub const DESCRIPTION: ComponentDescription = ComponentDescription::effect(b"rvsc");

const FEEDBACK: usize = 0;
const CUTOFF_FREQUENCY: usize = 1;
const NAMES: [&str; 2] = ["feedback", "cutoffFrequency"];

fn factory(format: &Format) -> Result<Box<dyn Kernel>> {
    Ok(Box::new(CostelloReverbKernel::new(format)))
}

const COMPONENT: Component = Component {
    description: DESCRIPTION,
    name: "Local: CostelloReverb",
    version: u32::MAX,
    factory,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CostelloReverbSettings {
    /// 0 to 1. At 1 the tail never decays.
    pub feedback: f64,
    /// Hz, 12 to 20000
    pub cutoff_frequency: f64,
}

impl Default for CostelloReverbSettings {
    fn default() -> Self {
        Self {
            feedback: COSTELLO_REVERB_PARAMETERS[FEEDBACK].default,
            cutoff_frequency: COSTELLO_REVERB_PARAMETERS[CUTOFF_FREQUENCY].default,
        }
    }
}

/// An 8 delay-line stereo reverb.
///
/// A `feedback` of 1 is accepted and rings forever.
pub struct CostelloReverb {
    inner: Automated,
    feedback: Parameter,
    cutoff_frequency: Parameter,
}

impl CostelloReverb {
    pub fn new(engine: &mut Engine, input: &mut impl AsMut<Node>) -> Self {
        Self::with_settings(engine, input, CostelloReverbSettings::default())
    }

    pub fn with_settings(
        engine: &mut Engine,
        input: &mut impl AsMut<Node>,
        settings: CostelloReverbSettings,
    ) -> Self {
        let inner = Automated::build(engine, input.as_mut(), &COMPONENT, &NAMES, &[]);
        let mut node = Self {
            inner,
            feedback: Parameter::new(&COSTELLO_REVERB_PARAMETERS[FEEDBACK]),
            cutoff_frequency: Parameter::new(&COSTELLO_REVERB_PARAMETERS[CUTOFF_FREQUENCY]),
        };
        node.set_feedback(settings.feedback);
        node.set_cutoff_frequency(settings.cutoff_frequency);
        node
    }
}

automated_node!(CostelloReverb {
    feedback, set_feedback, ramp_feedback => FEEDBACK;
    cutoff_frequency, set_cutoff_frequency, ramp_cutoff_frequency => CUTOFF_FREQUENCY;
});
