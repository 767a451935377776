//! Summing mixer with a master volume

use crate::engine::Engine;
use crate::node::{Bypass, Node, Toggleable};
use crate::parameter::{Parameter, ParameterSpec};
use crate::unit::UnitHandle;
use crate::units::{Gain, GainMessage};

pub const VOLUME: ParameterSpec = ParameterSpec::new("volume", 0.0, 10.0, 1.0);

/// Sums any number of inputs and scales the result.
///
/// Stopping drives the volume to 0; starting restores it.
pub struct Mixer {
    node: Node,
    handle: UnitHandle<GainMessage>,
    volume: Parameter,
    bypass: Bypass,
}

impl Mixer {
    /// A mixer fed by every node in `inputs`.
    pub fn new(engine: &mut Engine, inputs: &mut [&mut Node]) -> Self {
        let volume = Parameter::new(&VOLUME);
        let channels = engine.format().channels;
        let handle = engine.attach(Gain::new(channels, volume.unit_value()));
        let node = Node::attached(handle.id());

        for input in inputs.iter_mut() {
            input.add_connection_point(engine, &node);
        }

        Self {
            node,
            handle,
            bypass: Bypass::started(volume.get()),
            volume,
        }
    }

    /// Add one more input.
    pub fn connect(&mut self, engine: &mut Engine, input: &mut impl AsMut<Node>) {
        input.as_mut().add_connection_point(engine, &self.node);
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.volume.get()
    }

    /// Clamped to 0..=10. While stopped, only changes what `start` restores.
    pub fn set_volume(&mut self, volume: f64) {
        let volume = VOLUME.clamp(volume);
        if !self.bypass.defer(volume) {
            self.apply_volume(volume);
        }
    }

    fn apply_volume(&mut self, volume: f64) {
        self.volume.set(volume);
        self.handle.post(GainMessage::SetVolume(self.volume.unit_value()));
    }
}

impl Toggleable for Mixer {
    fn is_started(&self) -> bool {
        self.bypass.is_started()
    }

    fn start(&mut self) {
        if let Some(volume) = self.bypass.start() {
            self.apply_volume(volume);
        }
    }

    fn stop(&mut self) {
        if self.bypass.stop(self.volume.get()) {
            self.apply_volume(0.0);
        }
    }
}

impl_as_node!(Mixer, node);
