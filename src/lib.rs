//! # Knoten
//!
//! An audio node graph with bounded, automatable effect parameters.
//!
//! ## Quick Start
//!
//! ```
//! use knoten::{Engine, EngineConfig};
//! use knoten::nodes::{CostelloReverb, LowPassFilter, Oscillator, Toggleable};
//!
//! let mut engine = Engine::new(EngineConfig::default()).unwrap();
//!
//! // Build bottom-up: every node takes its input at construction
//! let mut osc = Oscillator::new(&mut engine);
//! let mut filter = LowPassFilter::new(&mut engine, &mut osc);
//! let mut reverb = CostelloReverb::new(&mut engine, &mut filter);
//! engine.set_output(&mut reverb);
//!
//! filter.set_cutoff_frequency(50_000.0); // clamped
//! assert_eq!(filter.cutoff_frequency(), 22050.0);
//!
//! osc.start();
//! reverb.stop(); // bypassed, still connected
//!
//! for _ in 0..16 {
//!     let _block = engine.process();
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`Engine`] owns the graph, the unit factory and the shared [`Format`].
//!   There is no global instance; pass it to every constructor.
//! - [`Node`] is a vertex: one processing unit and its output connections.
//! - [`nodes`] holds the typed wrappers. Direct nodes write straight into a
//!   built-in unit; automated nodes go through a [`ParameterTree`].
//! - [`units`] are the processing units themselves.
//! - [`Operation`] describes generator expressions for an external interpreter.

pub mod automation;
pub mod engine;
pub mod error;
pub mod format;
mod graph;
pub mod node;
pub mod nodes;
pub mod operation;
pub mod parameter;
pub mod unit;
pub mod units;

pub use automation::{AutomatedUnit, Kernel, ObserverToken, ParameterEvent, ParameterTree};
pub use engine::{Engine, Fanout, KernelFactory};
pub use error::{Error, Result};
pub use format::{EngineConfig, Format, ProcessContext, BLOCK_SIZE};
pub use node::{ConnectionPoint, Node, Toggleable};
pub use operation::Operation;
pub use parameter::{Parameter, ParameterAddress, ParameterSpec, UnitScale};
pub use unit::{AudioUnit, ComponentDescription, ComponentType, FourCC, UnitHandle, UnitId};
