//! Sine generator node

use crate::engine::Engine;
use crate::node::{Bypass, Node, Toggleable};
use crate::parameter::{Parameter, ParameterSpec};
use crate::unit::UnitHandle;
use crate::units::{SineMessage, SineUnit};

pub const FREQUENCY: ParameterSpec = ParameterSpec::new("frequency", 0.0, 20000.0, 440.0);
pub const AMPLITUDE: ParameterSpec = ParameterSpec::new("amplitude", 0.0, 1.0, 0.5);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OscillatorSettings {
    /// Hz, 0 to 20000
    pub frequency: f64,
    /// 0 to 1
    pub amplitude: f64,
}

impl Default for OscillatorSettings {
    fn default() -> Self {
        Self {
            frequency: FREQUENCY.default,
            amplitude: AMPLITUDE.default,
        }
    }
}

/// A sine generator. It has no input.
///
/// Oscillators are created stopped (silent); `start` brings the amplitude up
/// to the configured value.
pub struct Oscillator {
    node: Node,
    handle: UnitHandle<SineMessage>,
    frequency: Parameter,
    amplitude: Parameter,
    bypass: Bypass,
}

impl Oscillator {
    pub fn new(engine: &mut Engine) -> Self {
        Self::with_settings(engine, OscillatorSettings::default())
    }

    pub fn with_settings(engine: &mut Engine, settings: OscillatorSettings) -> Self {
        let frequency = Parameter::with_value(&FREQUENCY, settings.frequency);
        let amplitude = AMPLITUDE.clamp(settings.amplitude);

        let handle = engine.attach(SineUnit::new(frequency.unit_value(), 0.0));

        Self {
            node: Node::attached(handle.id()),
            handle,
            frequency,
            amplitude: Parameter::with_value(&AMPLITUDE, 0.0),
            bypass: Bypass::stopped(amplitude),
        }
    }

    #[inline]
    pub fn frequency(&self) -> f64 {
        self.frequency.get()
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency.set(frequency);
        self.handle
            .post(SineMessage::SetFrequency(self.frequency.unit_value()));
    }

    /// Current amplitude; 0 while stopped.
    #[inline]
    pub fn amplitude(&self) -> f64 {
        self.amplitude.get()
    }

    /// While stopped, only changes what `start` restores.
    pub fn set_amplitude(&mut self, amplitude: f64) {
        let amplitude = AMPLITUDE.clamp(amplitude);
        if !self.bypass.defer(amplitude) {
            self.apply_amplitude(amplitude);
        }
    }

    fn apply_amplitude(&mut self, amplitude: f64) {
        self.amplitude.set(amplitude);
        self.handle
            .post(SineMessage::SetAmplitude(self.amplitude.unit_value()));
    }
}

impl Toggleable for Oscillator {
    fn is_started(&self) -> bool {
        self.bypass.is_started()
    }

    fn start(&mut self) {
        if let Some(amplitude) = self.bypass.start() {
            self.apply_amplitude(amplitude);
        }
    }

    fn stop(&mut self) {
        if self.bypass.stop(self.amplitude.get()) {
            self.apply_amplitude(0.0);
        }
    }
}

impl_as_node!(Oscillator, node);
