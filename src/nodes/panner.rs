//! Stereo panner node

use crate::automation::Kernel;
use crate::engine::Engine;
use crate::error::Result;
use crate::format::Format;
use crate::node::Node;
use crate::nodes::automated::{Automated, Component};
use crate::parameter::Parameter;
use crate::unit::ComponentDescription;
use crate::units::panner::PANNER_PARAMETERS;
use crate::units::PannerKernel;

pub const DESCRIPTION: ComponentDescription = ComponentDescription::effect(b"pan2");

const PAN: usize = 0;

fn factory(_format: &Format) -> Result<Box<dyn Kernel>> {
    Ok(Box::new(PannerKernel::new()))
}

const COMPONENT: Component = Component {
    description: DESCRIPTION,
    name: "Local: Panner",
    version: u32::MAX,
    factory,
};

/// Places its input between the left and right channels.
pub struct Panner {
    inner: Automated,
    pan: Parameter,
}

impl Panner {
    /// A centered panner.
    pub fn new(engine: &mut Engine, input: &mut impl AsMut<Node>) -> Self {
        Self::with_pan(engine, input, PANNER_PARAMETERS[PAN].default)
    }

    pub fn with_pan(engine: &mut Engine, input: &mut impl AsMut<Node>, pan: f64) -> Self {
        let inner = Automated::build(engine, input.as_mut(), &COMPONENT, &["pan"], &[]);
        let mut node = Self {
            inner,
            pan: Parameter::new(&PANNER_PARAMETERS[PAN]),
        };
        node.set_pan(pan);
        node
    }
}

automated_node!(Panner {
    /// -1 is hard left, 1 is hard right.
    pan, set_pan, ramp_pan => PAN;
});
