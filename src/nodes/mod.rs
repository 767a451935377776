//! Client-facing nodes.
//!
//! Every node is built against an [`Engine`](crate::Engine), attaches its unit
//! before wiring anything, and then connects its input to itself.
//!
//! ## Direct
//! Parameters are written straight into a fixed built-in unit.
//! - [`Mixer`], [`Oscillator`], [`Delay`], [`LowPassFilter`]
//!
//! ## Automated
//! Parameters go through the unit's [`ParameterTree`](crate::ParameterTree);
//! changes the unit makes on its own are picked up by `sync()`.
//! - [`StringResonator`], [`CostelloReverb`], [`CombFilterReverb`], [`Panner`],
//!   [`LowShelfParametricEqualizerFilter`]

/// `AsRef<Node>`/`AsMut<Node>` through the field holding the node.
macro_rules! impl_as_node {
    ($ty:ty, $field:ident) => {
        impl AsRef<$crate::node::Node> for $ty {
            fn as_ref(&self) -> &$crate::node::Node {
                self.$field.as_ref()
            }
        }

        impl AsMut<$crate::node::Node> for $ty {
            fn as_mut(&mut self) -> &mut $crate::node::Node {
                self.$field.as_mut()
            }
        }
    };
}

/// The parameter surface shared by nodes backed by an automatable unit.
///
/// Each entry names the cached [`Parameter`](crate::Parameter) field, its
/// setter and ramp, and the index it was registered under. Expects the node's
/// `Automated` in a field called `inner`.
macro_rules! automated_node {
    ($ty:ident {
        $($(#[$doc:meta])* $field:ident, $setter:ident, $ramp:ident => $index:ident;)+
    }) => {
        impl $ty {
            delegate::delegate! {
                to self.inner {
                    #[call(tree)]
                    pub fn parameter_tree(&self) -> Option<&$crate::automation::ParameterTree>;
                    #[call(tree_mut)]
                    pub fn parameter_tree_mut(&mut self) -> Option<&mut $crate::automation::ParameterTree>;
                }
            }

            $(
                $(#[$doc])*
                #[inline]
                pub fn $field(&self) -> f64 {
                    self.$field.get()
                }

                pub fn $setter(&mut self, value: f64) {
                    self.$field.set(value);
                    self.inner.push($index, &self.$field);
                }

                pub fn $ramp(&mut self, value: f64, frames: u32) {
                    self.inner.ramp($index, &self.$field, value, frames);
                }
            )+

            /// Take in values the unit changed on its own (ramps, host automation).
            pub fn sync(&mut self) {
                for (index, value) in self.inner.drain() {
                    $(
                        if index == $index {
                            self.$field.set(value);
                        }
                    )+
                }
            }
        }

        impl $crate::node::Toggleable for $ty {
            delegate::delegate! {
                to self.inner {
                    fn is_started(&self) -> bool;
                    fn start(&mut self);
                    fn stop(&mut self);
                }
            }
        }

        impl_as_node!($ty, inner);
    };
}

mod automated;
pub mod comb_filter_reverb;
pub mod costello_reverb;
pub mod delay;
pub mod low_pass_filter;
pub mod low_shelf_parametric_equalizer_filter;
pub mod mixer;
pub mod oscillator;
pub mod panner;
pub mod string_resonator;

pub use crate::node::Toggleable;
pub use comb_filter_reverb::{CombFilterReverb, CombFilterReverbSettings};
pub use costello_reverb::{CostelloReverb, CostelloReverbSettings};
pub use delay::{Delay, DelaySettings};
pub use low_pass_filter::{LowPassFilter, LowPassFilterSettings};
pub use low_shelf_parametric_equalizer_filter::{
    LowShelfParametricEqualizerFilter, LowShelfParametricEqualizerFilterSettings,
};
pub use mixer::Mixer;
pub use oscillator::{Oscillator, OscillatorSettings};
pub use panner::Panner;
pub use string_resonator::{StringResonator, StringResonatorSettings};
