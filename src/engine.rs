//! Engine: graph topology, unit factory and block rendering
//!
//! Every node constructor takes the engine explicitly; there is no global
//! instance. The application builds one engine at startup and keeps it for as
//! long as audio runs.

use dasp_graph::Buffer;
use hashbrown::HashMap;
use tracing::debug;

use crate::automation::{self, AutomatedUnit, Kernel, ParameterTree};
use crate::error::{Error, Result};
use crate::format::{EngineConfig, Format};
use crate::graph::AudioGraph;
use crate::node::{ConnectionPoint, Node};
use crate::unit::{AudioUnit, ComponentDescription, UnitHandle, UnitId};
use crate::units::Gain;

/// Builds a kernel for a registered component.
pub type KernelFactory = fn(&Format) -> Result<Box<dyn Kernel>>;

struct Registration {
    name: String,
    version: u32,
    factory: KernelFactory,
}

/// The complete output fan-out last applied to a unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Fanout {
    pub points: Vec<ConnectionPoint>,
    pub from_bus: usize,
    pub format: Format,
}

/// The audio engine: attaches units, wires them, renders blocks.
///
/// ```
/// use knoten::{Engine, EngineConfig};
/// use knoten::nodes::{Delay, Oscillator, Toggleable};
///
/// let mut engine = Engine::new(EngineConfig::default()).unwrap();
///
/// let mut osc = Oscillator::new(&mut engine);
/// let mut delay = Delay::new(&mut engine, &mut osc);
/// engine.set_output(&mut delay);
///
/// osc.start();
/// let block = engine.process();
/// assert_eq!(block.len(), 2);
/// ```
pub struct Engine {
    graph: AudioGraph,
    config: EngineConfig,
    output: UnitId,
    registry: HashMap<ComponentDescription, Registration>,
    fanouts: HashMap<UnitId, Fanout>,
    blocks_processed: u64,
}

impl Engine {
    /// Build an engine and its output mixer.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let format = config.format;

        let mut graph = AudioGraph::new(format.sample_rate);
        let output = graph
            .attach(
                Gain::new(format.channels, 1.0).without_smoothing(),
                config.message_queue_size,
            )
            .id();
        graph.set_terminal(output);

        debug!(?format, "engine started");

        Ok(Self {
            graph,
            config,
            output,
            registry: HashMap::new(),
            fanouts: HashMap::new(),
            blocks_processed: 0,
        })
    }

    /// The shared sample format.
    #[inline]
    pub fn format(&self) -> Format {
        self.config.format
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The output mixer every audible chain ends at.
    #[inline]
    pub fn output(&self) -> UnitId {
        self.output
    }

    /// Route `node` to the output mixer (in addition to its other outputs).
    pub fn set_output(&mut self, node: &mut impl AsMut<Node>) {
        let output = Node::attached(self.output);
        node.as_mut().add_connection_point(self, &output);
    }

    /// Attach a unit so it can take part in connections.
    pub fn attach<U: AudioUnit>(&mut self, unit: U) -> UnitHandle<U::Message> {
        let handle = self.graph.attach(unit, self.config.message_queue_size);
        debug!(unit = ?handle.id(), "attached unit");
        handle
    }

    #[inline]
    pub fn is_attached(&self, unit: UnitId) -> bool {
        self.graph.contains(unit)
    }

    /// Replace the complete output fan-out of `source`.
    ///
    /// Always pass every destination, not just the new one: the previous set
    /// is discarded.
    ///
    /// # Panics
    ///
    /// Panics if `source` or any destination is not attached.
    pub fn connect(
        &mut self,
        source: UnitId,
        points: &[ConnectionPoint],
        from_bus: usize,
        format: Format,
    ) {
        self.graph
            .set_outputs(source, points.iter().map(|point| point.node));
        debug!(?source, edges = points.len(), from_bus, "connected fan-out");

        self.fanouts.insert(
            source,
            Fanout {
                points: points.to_vec(),
                from_bus,
                format,
            },
        );
    }

    /// The fan-out last applied to `source`, if it was ever connected.
    pub fn fanout(&self, source: UnitId) -> Option<&Fanout> {
        self.fanouts.get(&source)
    }

    /// Number of live graph edges leaving `source`.
    pub fn edge_count(&self, source: UnitId) -> usize {
        self.graph.out_degree(source)
    }

    /// Number of live graph edges arriving at `unit`.
    pub fn input_count(&self, unit: UnitId) -> usize {
        self.graph.in_degree(unit)
    }

    /// Register a custom unit type with the factory.
    ///
    /// Idempotent: the first registration for a description wins and later
    /// calls return `false`.
    pub fn register_unit(
        &mut self,
        description: ComponentDescription,
        name: &str,
        version: u32,
        factory: KernelFactory,
    ) -> bool {
        if self.registry.contains_key(&description) {
            return false;
        }

        debug!(%description, name, version, "registered unit");
        self.registry.insert(
            description,
            Registration {
                name: name.to_owned(),
                version,
                factory,
            },
        );
        true
    }

    #[inline]
    pub fn is_registered(&self, description: &ComponentDescription) -> bool {
        self.registry.contains_key(description)
    }

    /// Name and version a description was registered under.
    pub fn registration(&self, description: &ComponentDescription) -> Option<(&str, u32)> {
        self.registry
            .get(description)
            .map(|r| (r.name.as_str(), r.version))
    }

    /// Build a live instance of a registered unit.
    ///
    /// The unit comes back unattached; attach it before wiring anything to it.
    pub fn instantiate(
        &self,
        description: &ComponentDescription,
    ) -> Result<(AutomatedUnit, ParameterTree)> {
        let registration = self
            .registry
            .get(description)
            .ok_or(Error::ComponentNotRegistered(*description))?;

        let kernel = (registration.factory)(&self.config.format)?;
        debug!(%description, name = %registration.name, "instantiated unit");

        Ok(automation::split(
            kernel,
            self.config.message_queue_size,
            self.config.event_queue_size,
        ))
    }

    /// Render one block and return the output mixer's buffers.
    pub fn process(&mut self) -> &[Buffer] {
        #[cfg(feature = "warn_on_empty")]
        if self.input_count(self.output) == 0 {
            tracing::warn!("processing with nothing connected to the output");
        }

        self.graph.process();
        self.blocks_processed += 1;
        self.graph.terminal_buffers()
    }

    /// Blocks rendered so far.
    #[inline]
    pub fn blocks_processed(&self) -> u64 {
        self.blocks_processed
    }
}
