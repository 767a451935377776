//! Shared plumbing for nodes backed by an automatable unit.

use tracing::{debug, warn};

use crate::automation::{ObserverToken, ParameterTree};
use crate::engine::{Engine, KernelFactory};
use crate::node::Node;
use crate::parameter::{Parameter, ParameterAddress};
use crate::unit::ComponentDescription;

/// What a node needs to get its unit built.
pub(crate) struct Component {
    pub description: ComponentDescription,
    pub name: &'static str,
    pub version: u32,
    pub factory: KernelFactory,
}

/// A node plus the tree of the unit behind it.
///
/// Parameters are addressed by their position in the owning node's list of
/// names. A node whose unit failed to build, or whose tree lacks one of those
/// names, keeps working on its cached values and simply doesn't propagate.
pub(crate) struct Automated {
    node: Node,
    tree: Option<ParameterTree>,
    token: Option<ObserverToken>,
    addresses: Vec<Option<ParameterAddress>>,
}

impl Automated {
    /// Register, instantiate, attach and wire `input` into the new unit.
    ///
    /// `properties` are applied before the unit is attached.
    pub fn build(
        engine: &mut Engine,
        input: &mut Node,
        component: &Component,
        names: &[&str],
        properties: &[(&str, f32)],
    ) -> Self {
        engine.register_unit(
            component.description,
            component.name,
            component.version,
            component.factory,
        );

        let (mut unit, mut tree) = match engine.instantiate(&component.description) {
            Ok(parts) => parts,
            Err(err) => {
                warn!(name = component.name, %err, "unit failed to instantiate, node stays disconnected");
                return Self {
                    node: Node::inert(),
                    tree: None,
                    token: None,
                    addresses: vec![None; names.len()],
                };
            }
        };

        for &(name, value) in properties {
            if !unit.set_property(name, value) {
                debug!(name = component.name, property = name, "unit ignored property");
            }
        }

        let handle = engine.attach(unit);
        let node = Node::attached(handle.id());
        input.add_connection_point(engine, &node);

        let token = tree.add_observer();
        let addresses = names.iter().map(|name| tree.parameter(name)).collect();

        Self {
            node,
            tree: Some(tree),
            token: Some(token),
            addresses,
        }
    }

    /// Forward the cached value of parameter `index`.
    pub fn push(&mut self, index: usize, parameter: &Parameter) {
        let Some(address) = self.address(index) else { return };
        if let (Some(tree), Some(token)) = (self.tree.as_mut(), self.token) {
            tree.set_value(address, parameter.unit_value(), token);
        }
    }

    /// Ramp parameter `index` to `value` over `frames` frames.
    pub fn ramp(&mut self, index: usize, parameter: &Parameter, value: f64, frames: u32) {
        let Some(address) = self.address(index) else { return };
        if let (Some(tree), Some(token)) = (self.tree.as_mut(), self.token) {
            let value = parameter.spec().clamp(value);
            tree.start_ramp(address, parameter.spec().scale.to_unit(value), frames, token);
        }
    }

    /// Changes made to the unit by anyone but this node, as (index, value).
    pub fn drain(&mut self) -> Vec<(usize, f64)> {
        let (Some(tree), Some(token)) = (self.tree.as_mut(), self.token) else {
            return Vec::new();
        };
        let addresses = &self.addresses;
        let specs = tree.specs();
        tree.poll(token)
            .filter_map(|event| {
                let index = addresses.iter().position(|a| *a == Some(event.address))?;
                let scale = specs.get(event.address.0 as usize)?.scale;
                Some((index, scale.from_unit(event.value)))
            })
            .collect()
    }

    #[inline]
    pub fn tree(&self) -> Option<&ParameterTree> {
        self.tree.as_ref()
    }

    #[inline]
    pub fn tree_mut(&mut self) -> Option<&mut ParameterTree> {
        self.tree.as_mut()
    }

    /// Live state of the unit; an inert node is never started.
    pub fn is_started(&self) -> bool {
        self.tree.as_ref().is_some_and(ParameterTree::is_playing)
    }

    pub fn start(&self) {
        self.live_tree().start();
    }

    pub fn stop(&self) {
        self.live_tree().stop();
    }

    fn live_tree(&self) -> &ParameterTree {
        self.tree
            .as_ref()
            .expect("start/stop on a node whose unit was never instantiated")
    }

    fn address(&self, index: usize) -> Option<ParameterAddress> {
        self.addresses.get(index).copied().flatten()
    }
}

impl AsRef<Node> for Automated {
    fn as_ref(&self) -> &Node {
        &self.node
    }
}

impl AsMut<Node> for Automated {
    fn as_mut(&mut self) -> &mut Node {
        &mut self.node
    }
}
