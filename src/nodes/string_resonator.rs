//! Tuned string resonator node

use crate::automation::Kernel;
use crate::engine::Engine;
use crate::error::Result;
use crate::format::Format;
use crate::node::Node;
use crate::nodes::automated::{Automated, Component};
use crate::parameter::Parameter;
use crate::unit::ComponentDescription;
use crate::units::resonator::STRING_RESONATOR_PARAMETERS;
use crate::units::StringResonatorKernel;

pub const DESCRIPTION: ComponentDescription = ComponentDescription::effect(b"stre");

const FUNDAMENTAL_FREQUENCY: usize = 0;
const FEEDBACK: usize = 1;
const NAMES: [&str; 2] = ["fundamentalFrequency", "feedback"];

fn factory(format: &Format) -> Result<Box<dyn Kernel>> {
    Ok(Box::new(StringResonatorKernel::new(format)))
}

const COMPONENT: Component = Component {
    description: DESCRIPTION,
    name: "Local: StringResonator",
    version: u32::MAX,
    factory,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StringResonatorSettings {
    /// Hz, 12 to 10000
    pub fundamental_frequency: f64,
    /// 0 to 1
    pub feedback: f64,
}

impl Default for StringResonatorSettings {
    fn default() -> Self {
        Self {
            fundamental_frequency: STRING_RESONATOR_PARAMETERS[FUNDAMENTAL_FREQUENCY].default,
            feedback: STRING_RESONATOR_PARAMETERS[FEEDBACK].default,
        }
    }
}

/// Rings its input at a fundamental frequency, like a plucked string.
pub struct StringResonator {
    inner: Automated,
    fundamental_frequency: Parameter,
    feedback: Parameter,
}

impl StringResonator {
    pub fn new(engine: &mut Engine, input: &mut impl AsMut<Node>) -> Self {
        Self::with_settings(engine, input, StringResonatorSettings::default())
    }

    pub fn with_settings(
        engine: &mut Engine,
        input: &mut impl AsMut<Node>,
        settings: StringResonatorSettings,
    ) -> Self {
        let inner = Automated::build(engine, input.as_mut(), &COMPONENT, &NAMES, &[]);
        let mut node = Self {
            inner,
            fundamental_frequency: Parameter::new(
                &STRING_RESONATOR_PARAMETERS[FUNDAMENTAL_FREQUENCY],
            ),
            feedback: Parameter::new(&STRING_RESONATOR_PARAMETERS[FEEDBACK]),
        };
        node.set_fundamental_frequency(settings.fundamental_frequency);
        node.set_feedback(settings.feedback);
        node
    }
}

automated_node!(StringResonator {
    /// Hz, 12 to 10000
    fundamental_frequency, set_fundamental_frequency, ramp_fundamental_frequency => FUNDAMENTAL_FREQUENCY;
    feedback, set_feedback, ramp_feedback => FEEDBACK;
});
