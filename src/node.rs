//! Graph vertices and the start/stop capability.

use tracing::warn;

use crate::engine::Engine;
use crate::unit::UnitId;

/// A directed edge from a node's output to `node`'s input `bus`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ConnectionPoint {
    pub node: UnitId,
    pub bus: usize,
}

/// A vertex in the audio graph.
///
/// Holds the id of the processing unit it wraps and every output connection
/// made from it, in the order they were made. A node whose unit could not be
/// built is *inert*: it has no unit and never takes part in a connection.
///
/// Every node wrapper in [`nodes`](crate::nodes) implements `AsRef<Node>` and
/// `AsMut<Node>`, so any of them can be handed to another node as its input.
#[derive(Debug, Default)]
pub struct Node {
    unit: Option<UnitId>,
    connection_points: Vec<ConnectionPoint>,
}

impl Node {
    /// A node wrapping an attached unit.
    pub fn attached(unit: UnitId) -> Self {
        Self {
            unit: Some(unit),
            connection_points: Vec::new(),
        }
    }

    /// A node with no unit behind it.
    pub fn inert() -> Self {
        Self::default()
    }

    #[inline]
    pub fn unit(&self) -> Option<UnitId> {
        self.unit
    }

    #[inline]
    pub fn is_inert(&self) -> bool {
        self.unit.is_none()
    }

    /// Output connections, oldest first.
    #[inline]
    pub fn connection_points(&self) -> &[ConnectionPoint] {
        &self.connection_points
    }

    /// Route this node's output into `target`'s input bus 0.
    ///
    /// The new edge is appended and the complete fan-out is re-applied to the
    /// engine, so calling this repeatedly accumulates destinations. An inert
    /// node logs and does nothing.
    ///
    /// # Panics
    ///
    /// Panics if `target` is inert or its unit is not attached to `engine`.
    pub fn add_connection_point(&mut self, engine: &mut Engine, target: &Node) {
        let target_unit = match target.unit {
            Some(unit) if engine.is_attached(unit) => unit,
            _ => panic!("connection target must be attached before anything is wired to it"),
        };

        let Some(source) = self.unit else {
            warn!(target = ?target_unit, "inert node has no output to connect");
            return;
        };

        self.connection_points.push(ConnectionPoint {
            node: target_unit,
            bus: 0,
        });

        let format = engine.format();
        engine.connect(source, &self.connection_points, 0, format);
    }
}

impl AsRef<Node> for Node {
    fn as_ref(&self) -> &Node {
        self
    }
}

impl AsMut<Node> for Node {
    fn as_mut(&mut self) -> &mut Node {
        self
    }
}

/// Start/stop without removing the node from the graph.
///
/// Implementors provide [`is_started`](Self::is_started), [`start`](Self::start)
/// and [`stop`](Self::stop); both transitions are idempotent.
pub trait Toggleable {
    fn is_started(&self) -> bool;

    fn start(&mut self);

    fn stop(&mut self);

    #[inline]
    fn is_playing(&self) -> bool {
        self.is_started()
    }

    #[inline]
    fn is_stopped(&self) -> bool {
        !self.is_started()
    }

    #[inline]
    fn is_bypassed(&self) -> bool {
        !self.is_started()
    }

    fn play(&mut self) {
        self.start()
    }

    fn bypass(&mut self) {
        self.stop()
    }
}

/// Start/stop bookkeeping for nodes that bypass by driving a mix to zero.
///
/// While stopped, the mix the node had before stopping is kept here and
/// handed back on the next start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Bypass {
    started: bool,
    last_known_mix: f64,
}

impl Bypass {
    pub fn started(mix: f64) -> Self {
        Self {
            started: true,
            last_known_mix: mix,
        }
    }

    /// Stopped, restoring to `mix` on the first start.
    pub fn stopped(mix: f64) -> Self {
        Self {
            started: false,
            last_known_mix: mix,
        }
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Returns the mix to restore if this call actually starts.
    pub fn start(&mut self) -> Option<f64> {
        if self.started {
            return None;
        }
        self.started = true;
        Some(self.last_known_mix)
    }

    /// Saves `current_mix`; returns `true` if this call actually stops.
    pub fn stop(&mut self, current_mix: f64) -> bool {
        if !self.started {
            return false;
        }
        self.started = false;
        self.last_known_mix = current_mix;
        true
    }

    /// While stopped, a new mix only replaces what the next start restores.
    /// Returns `true` if the mix was deferred that way.
    pub fn defer(&mut self, mix: f64) -> bool {
        if self.started {
            return false;
        }
        self.last_known_mix = mix;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bypass_round_trip() {
        let mut bypass = Bypass::started(0.5);
        assert!(bypass.stop(0.3));
        assert!(!bypass.stop(0.0));
        assert_eq!(bypass.start(), Some(0.3));
        assert_eq!(bypass.start(), None);
    }

    #[test]
    fn deferred_mix_is_restored() {
        let mut bypass = Bypass::stopped(0.5);
        assert!(bypass.defer(0.8));
        assert_eq!(bypass.start(), Some(0.8));
        assert!(!bypass.defer(0.1));
    }
}
