//! Feedback delay node

use crate::engine::Engine;
use crate::node::{Bypass, Node, Toggleable};
use crate::parameter::{Parameter, ParameterSpec, UnitScale};
use crate::unit::UnitHandle;
use crate::units::{DelayMessage, DelayUnit};

/// Seconds
pub const TIME: ParameterSpec = ParameterSpec::new("time", 0.0, 2.0, 1.0);
pub const FEEDBACK: ParameterSpec =
    ParameterSpec::new("feedback", 0.0, 1.0, 0.5).with_scale(UnitScale::Percent);
/// Hz
pub const LOW_PASS_CUTOFF: ParameterSpec =
    ParameterSpec::new("lowPassCutoff", 10.0, 22050.0, 15000.0);
pub const DRY_WET_MIX: ParameterSpec =
    ParameterSpec::new("dryWetMix", 0.0, 1.0, 0.5).with_scale(UnitScale::Percent);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelaySettings {
    pub time: f64,
    pub feedback: f64,
    pub low_pass_cutoff: f64,
    pub dry_wet_mix: f64,
}

impl Default for DelaySettings {
    fn default() -> Self {
        Self {
            time: TIME.default,
            feedback: FEEDBACK.default,
            low_pass_cutoff: LOW_PASS_CUTOFF.default,
            dry_wet_mix: DRY_WET_MIX.default,
        }
    }
}

/// Delays its input, feeding a low-passed copy of the output back in.
///
/// Feedback and mix are fractions here; the unit takes them in percent.
/// Stopping drives the mix to fully dry.
pub struct Delay {
    node: Node,
    handle: UnitHandle<DelayMessage>,
    time: Parameter,
    feedback: Parameter,
    low_pass_cutoff: Parameter,
    dry_wet_mix: Parameter,
    bypass: Bypass,
}

impl Delay {
    pub fn new(engine: &mut Engine, input: &mut impl AsMut<Node>) -> Self {
        Self::with_settings(engine, input, DelaySettings::default())
    }

    pub fn with_settings(
        engine: &mut Engine,
        input: &mut impl AsMut<Node>,
        settings: DelaySettings,
    ) -> Self {
        let format = engine.format();
        let handle = engine.attach(DelayUnit::new(&format));
        let node = Node::attached(handle.id());
        input.as_mut().add_connection_point(engine, &node);

        let dry_wet_mix = Parameter::with_value(&DRY_WET_MIX, settings.dry_wet_mix);
        let mut delay = Self {
            node,
            handle,
            time: Parameter::with_value(&TIME, settings.time),
            feedback: Parameter::with_value(&FEEDBACK, settings.feedback),
            low_pass_cutoff: Parameter::with_value(&LOW_PASS_CUTOFF, settings.low_pass_cutoff),
            bypass: Bypass::started(dry_wet_mix.get()),
            dry_wet_mix,
        };
        delay.set_time(delay.time());
        delay.set_feedback(delay.feedback());
        delay.set_low_pass_cutoff(delay.low_pass_cutoff());
        delay.apply_dry_wet_mix(delay.dry_wet_mix());
        delay
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time.get()
    }

    pub fn set_time(&mut self, time: f64) {
        self.time.set(time);
        self.handle.post(DelayMessage::SetTime(self.time.unit_value()));
    }

    #[inline]
    pub fn feedback(&self) -> f64 {
        self.feedback.get()
    }

    pub fn set_feedback(&mut self, feedback: f64) {
        self.feedback.set(feedback);
        self.handle
            .post(DelayMessage::SetFeedback(self.feedback.unit_value()));
    }

    #[inline]
    pub fn low_pass_cutoff(&self) -> f64 {
        self.low_pass_cutoff.get()
    }

    pub fn set_low_pass_cutoff(&mut self, cutoff: f64) {
        self.low_pass_cutoff.set(cutoff);
        self.handle
            .post(DelayMessage::SetLowPassCutoff(self.low_pass_cutoff.unit_value()));
    }

    /// 0 is all dry, 1 is all wet. Reads 0 while stopped.
    #[inline]
    pub fn dry_wet_mix(&self) -> f64 {
        self.dry_wet_mix.get()
    }

    /// While stopped, only changes what `start` restores.
    pub fn set_dry_wet_mix(&mut self, mix: f64) {
        let mix = DRY_WET_MIX.clamp(mix);
        if !self.bypass.defer(mix) {
            self.apply_dry_wet_mix(mix);
        }
    }

    fn apply_dry_wet_mix(&mut self, mix: f64) {
        self.dry_wet_mix.set(mix);
        self.handle
            .post(DelayMessage::SetWetDryMix(self.dry_wet_mix.unit_value()));
    }
}

impl Toggleable for Delay {
    fn is_started(&self) -> bool {
        self.bypass.is_started()
    }

    fn start(&mut self) {
        if let Some(mix) = self.bypass.start() {
            self.apply_dry_wet_mix(mix);
        }
    }

    fn stop(&mut self) {
        if self.bypass.stop(self.dry_wet_mix.get()) {
            self.apply_dry_wet_mix(0.0);
        }
    }
}

impl_as_node!(Delay, node);
