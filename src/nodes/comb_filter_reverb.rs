//! Single-comb reverb node

use crate::automation::Kernel;
use crate::engine::Engine;
use crate::error::Result;
use crate::format::Format;
use crate::node::Node;
use crate::nodes::automated::{Automated, Component};
use crate::parameter::Parameter;
use crate::unit::ComponentDescription;
use crate::units::reverb::{COMB_FILTER_REVERB_PARAMETERS, COMB_LOOP_DURATION};
use crate::units::CombFilterReverbKernel;

pub const DESCRIPTION: ComponentDescription = ComponentDescription::effect(b"comb");

const REVERB_DURATION: usize = 0;

fn factory(format: &Format) -> Result<Box<dyn Kernel>> {
    Ok(Box::new(CombFilterReverbKernel::new(format)))
}

const COMPONENT: Component = Component {
    description: DESCRIPTION,
    name: "Local: CombFilterReverb",
    version: u32::MAX,
    factory,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombFilterReverbSettings {
    /// Seconds for the tail to fall by 60 dB, 0 to 10
    pub reverb_duration: f64,
    /// Comb length in seconds, 0 to 10; fixed once the node is built
    pub loop_duration: f64,
}

impl Default for CombFilterReverbSettings {
    fn default() -> Self {
        Self {
            reverb_duration: COMB_FILTER_REVERB_PARAMETERS[REVERB_DURATION].default,
            loop_duration: COMB_LOOP_DURATION.default,
        }
    }
}

/// A feedback comb filter reverb.
pub struct CombFilterReverb {
    inner: Automated,
    reverb_duration: Parameter,
    loop_duration: f64,
}

impl CombFilterReverb {
    pub fn new(engine: &mut Engine, input: &mut impl AsMut<Node>) -> Self {
        Self::with_settings(engine, input, CombFilterReverbSettings::default())
    }

    pub fn with_settings(
        engine: &mut Engine,
        input: &mut impl AsMut<Node>,
        settings: CombFilterReverbSettings,
    ) -> Self {
        let loop_duration = COMB_LOOP_DURATION.clamp(settings.loop_duration);
        let inner = Automated::build(
            engine,
            input.as_mut(),
            &COMPONENT,
            &["reverbDuration"],
            &[("loopDuration", loop_duration as f32)],
        );
        let mut node = Self {
            inner,
            reverb_duration: Parameter::new(&COMB_FILTER_REVERB_PARAMETERS[REVERB_DURATION]),
            loop_duration,
        };
        node.set_reverb_duration(settings.reverb_duration);
        node
    }

    /// Comb length in seconds, fixed at construction.
    #[inline]
    pub fn loop_duration(&self) -> f64 {
        self.loop_duration
    }
}

automated_node!(CombFilterReverb {
    /// Seconds for the tail to fall by 60 dB
    reverb_duration, set_reverb_duration, ramp_reverb_duration => REVERB_DURATION;
});
