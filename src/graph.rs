//! Audio graph - owns units, message queues and the live connection topology

use core::marker::PhantomData;

use dasp_graph::{Buffer, Input, NodeData, Processor};
use hashbrown::HashMap;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rtrb::{Consumer, RingBuffer};

use crate::format::{ProcessContext, BLOCK_SIZE};
use crate::unit::{AudioUnit, UnitHandle, UnitId};

// Type-erased wrapper so we can store heterogeneous units
trait ErasedUnit: Send {
    fn process_erased(&mut self, ctx: &ProcessContext, inputs: &[Input], outputs: &mut [Buffer]);
}

struct UnitWrapper<U: AudioUnit> {
    unit: U,
    receiver: Consumer<U::Message>,
}

impl<U: AudioUnit> ErasedUnit for UnitWrapper<U> {
    fn process_erased(&mut self, ctx: &ProcessContext, inputs: &[Input], outputs: &mut [Buffer]) {
        // Split borrow to avoid conflict between receiver and unit
        let receiver = &mut self.receiver;
        let unit = &mut self.unit;

        // Draining iterator straight off the consumer, no allocation
        let messages = core::iter::from_fn(|| receiver.pop().ok());
        unit.process(ctx, messages, inputs, outputs);
    }
}

// Adapter for dasp_graph
struct DaspAdapter {
    unit: Box<dyn ErasedUnit>,
    ctx: ProcessContext,
}

impl dasp_graph::Node for DaspAdapter {
    fn process(&mut self, inputs: &[Input], outputs: &mut [Buffer]) {
        self.unit.process_erased(&self.ctx, inputs, outputs);
    }
}

type InnerGraph = petgraph::graph::Graph<NodeData<DaspAdapter>, ()>;

/// An audio processing graph at a fixed sample rate
pub(crate) struct AudioGraph {
    graph: InnerGraph,
    processor: Processor<InnerGraph>,
    ctx: ProcessContext,

    unit_indices: HashMap<UnitId, NodeIndex>,
    next_unit_id: u32,

    terminal: Option<NodeIndex>,
}

impl AudioGraph {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            graph: InnerGraph::with_capacity(64, 64),
            processor: Processor::with_capacity(64),
            ctx: ProcessContext {
                sample_rate,
                buffer_size: BLOCK_SIZE,
            },
            unit_indices: HashMap::new(),
            next_unit_id: 0,
            terminal: None,
        }
    }

    /// Attach a unit, returns a handle for sending messages
    pub fn attach<U: AudioUnit>(&mut self, unit: U, queue_size: usize) -> UnitHandle<U::Message> {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;

        let (producer, consumer) = RingBuffer::new(queue_size);

        // Sinks with no outputs still need a buffer for dasp_graph to hand them
        let num_outputs = unit.num_outputs().max(1);
        let wrapper = UnitWrapper {
            unit,
            receiver: consumer,
        };
        let adapter = DaspAdapter {
            unit: Box::new(wrapper),
            ctx: self.ctx,
        };

        let idx = self
            .graph
            .add_node(NodeData::new(adapter, vec![Buffer::default(); num_outputs]));
        self.unit_indices.insert(id, idx);

        UnitHandle {
            id,
            sender: producer,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn contains(&self, id: UnitId) -> bool {
        self.unit_indices.contains_key(&id)
    }

    /// Replace every outgoing edge of `from` with edges to `to`.
    ///
    /// Panics if any unit is not attached.
    pub fn set_outputs(&mut self, from: UnitId, to: impl IntoIterator<Item = UnitId>) {
        let from_idx = self.index(from);
        let targets: Vec<NodeIndex> = to.into_iter().map(|id| self.index(id)).collect();

        let mut stale: Vec<_> = self
            .graph
            .edges_directed(from_idx, Direction::Outgoing)
            .map(|edge| edge.id())
            .collect();
        // Removing swaps the last edge into the hole, so go from the top down
        stale.sort_unstable_by(|a, b| b.cmp(a));
        for edge in stale {
            self.graph.remove_edge(edge);
        }

        for to_idx in targets {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Number of edges leaving `id`.
    pub fn out_degree(&self, id: UnitId) -> usize {
        self.graph
            .edges_directed(self.index(id), Direction::Outgoing)
            .count()
    }

    /// Number of edges arriving at `id`.
    pub fn in_degree(&self, id: UnitId) -> usize {
        self.graph
            .edges_directed(self.index(id), Direction::Incoming)
            .count()
    }

    /// Set which unit to process to (typically the output)
    pub fn set_terminal(&mut self, id: UnitId) {
        self.terminal = Some(self.index(id));
    }

    /// Process one block through everything reachable from the terminal
    pub fn process(&mut self) {
        if let Some(terminal) = self.terminal {
            self.processor.process(&mut self.graph, terminal);
        }
    }

    /// Output buffers of the terminal as of the last [`process`](Self::process).
    pub fn terminal_buffers(&self) -> &[Buffer] {
        match self.terminal {
            Some(idx) => &self.graph[idx].buffers,
            None => &[],
        }
    }

    fn index(&self, id: UnitId) -> NodeIndex {
        match self.unit_indices.get(&id) {
            Some(idx) => *idx,
            None => panic!("unit {:?} is not attached to this engine", id),
        }
    }
}
