//! Resonant low-pass with a dry/wet control.
//!
//! The biquad unit has no mix of its own, so the node is a small subgraph:
//!
//! ```text
//! input ──> dry ─────────────> output
//!       └─> wet ──> filter ──┘
//! ```
//!
//! `dry` and `wet` are gain stages at `1 - mix` and `mix`.

use crate::engine::Engine;
use crate::node::{Bypass, Node, Toggleable};
use crate::nodes::Mixer;
use crate::parameter::{Parameter, ParameterSpec};
use crate::unit::UnitHandle;
use crate::units::{Biquad, BiquadMessage};

/// Hz
pub const CUTOFF_FREQUENCY: ParameterSpec =
    ParameterSpec::new("cutoffFrequency", 10.0, 22050.0, 6900.0);
/// dB
pub const RESONANCE: ParameterSpec = ParameterSpec::new("resonance", -20.0, 40.0, 0.0);
pub const DRY_WET_MIX: ParameterSpec = ParameterSpec::new("dryWetMix", 0.0, 1.0, 1.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LowPassFilterSettings {
    pub cutoff_frequency: f64,
    pub resonance: f64,
    pub dry_wet_mix: f64,
}

impl Default for LowPassFilterSettings {
    fn default() -> Self {
        Self {
            cutoff_frequency: CUTOFF_FREQUENCY.default,
            resonance: RESONANCE.default,
            dry_wet_mix: DRY_WET_MIX.default,
        }
    }
}

pub struct LowPassFilter {
    output: Mixer,
    dry: Mixer,
    wet: Mixer,
    filter: Node,
    handle: UnitHandle<BiquadMessage>,
    cutoff_frequency: Parameter,
    resonance: Parameter,
    dry_wet_mix: Parameter,
    bypass: Bypass,
}

impl LowPassFilter {
    pub fn new(engine: &mut Engine, input: &mut impl AsMut<Node>) -> Self {
        Self::with_settings(engine, input, LowPassFilterSettings::default())
    }

    pub fn with_settings(
        engine: &mut Engine,
        input: &mut impl AsMut<Node>,
        settings: LowPassFilterSettings,
    ) -> Self {
        let cutoff_frequency = Parameter::with_value(&CUTOFF_FREQUENCY, settings.cutoff_frequency);
        let resonance = Parameter::with_value(&RESONANCE, settings.resonance);
        let dry_wet_mix = Parameter::with_value(&DRY_WET_MIX, settings.dry_wet_mix);

        let mut dry = Mixer::new(engine, &mut [input.as_mut()]);
        let output = Mixer::new(engine, &mut [dry.as_mut()]);
        let mut wet = Mixer::new(engine, &mut [input.as_mut()]);

        let format = engine.format();
        let handle = engine.attach(Biquad::low_pass(
            &format,
            cutoff_frequency.unit_value(),
            resonance.unit_value(),
        ));
        let mut filter = Node::attached(handle.id());

        wet.as_mut().add_connection_point(engine, &filter);
        filter.add_connection_point(engine, output.as_ref());

        let mut node = Self {
            output,
            dry,
            wet,
            filter,
            handle,
            cutoff_frequency,
            resonance,
            bypass: Bypass::started(dry_wet_mix.get()),
            dry_wet_mix,
        };
        node.apply_dry_wet_mix(node.dry_wet_mix());
        node
    }

    #[inline]
    pub fn cutoff_frequency(&self) -> f64 {
        self.cutoff_frequency.get()
    }

    /// Clamped to 10..=22050 Hz.
    pub fn set_cutoff_frequency(&mut self, cutoff: f64) {
        self.cutoff_frequency.set(cutoff);
        self.handle
            .post(BiquadMessage::SetCutoff(self.cutoff_frequency.unit_value()));
    }

    #[inline]
    pub fn resonance(&self) -> f64 {
        self.resonance.get()
    }

    /// Clamped to -20..=40 dB.
    pub fn set_resonance(&mut self, resonance: f64) {
        self.resonance.set(resonance);
        self.handle
            .post(BiquadMessage::SetResonance(self.resonance.unit_value()));
    }

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
        let mix = self.dry_wet_mix.set(mix);
        self.dry.set_volume(1.0 - mix);
        self.wet.set_volume(mix);
    }

    /// The biquad inside the wet path.
    #[inline]
    pub fn filter(&self) -> &Node {
        &self.filter
    }
}

impl Toggleable for LowPassFilter {
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

impl_as_node!(LowPassFilter, output);
