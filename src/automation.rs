//! Parameter trees for automatable units.
//!
//! An automatable unit is split in two halves when it is instantiated:
//!
//! - [`AutomatedUnit`] is attached to the graph and runs on the audio side. It
//!   wraps a [`Kernel`], applies queued writes and ramps, and reports values it
//!   changed on its own (ramps) back over a lock-free event queue.
//! - [`ParameterTree`] stays with the node on the control plane. It resolves
//!   parameter names to addresses, forwards writes, and fans unit-reported
//!   changes out to observers when they [`poll`](ParameterTree::poll).
//!
//! Observers are mailboxes rather than callbacks: events are only ever read on
//! the thread that owns the tree, which keeps every cached value single-writer.
//! A mailbox holds at most one pending event per parameter.
//!
//! Every write or ramp bumps a per-parameter generation. Ramp progress is
//! tagged with the generation that started the ramp, and progress from a
//! superseded generation is discarded when it reaches the tree.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dasp_graph::{Buffer, Input};
use rtrb::{Consumer, Producer};
use tracing::warn;

use crate::format::ProcessContext;
use crate::parameter::{ParameterAddress, ParameterSpec};
use crate::unit::AudioUnit;
use crate::units::mix_inputs;

/// The DSP core of an automatable unit.
///
/// Kernels address their parameters by index into [`Kernel::parameters`] and
/// clamp every write to the declared range themselves.
pub trait Kernel: Send + 'static {
    fn parameters(&self) -> &'static [ParameterSpec];

    fn set_parameter(&mut self, address: ParameterAddress, value: f32);

    fn parameter(&self, address: ParameterAddress) -> f32;

    /// Apply a construction-time property (e.g. a buffer length).
    ///
    /// Only called while the unit is still unattached, so it may allocate.
    /// Returns `false` for properties the kernel doesn't know.
    fn set_property(&mut self, _name: &str, _value: f32) -> bool {
        false
    }

    /// Render one block. `inputs` may be empty.
    fn process(&mut self, ctx: &ProcessContext, inputs: &[Input], outputs: &mut [Buffer]);

    fn num_outputs(&self) -> usize {
        2
    }
}

/// Control-plane → unit messages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParameterMessage {
    /// Jump to `value` at the start of the next block
    Set { address: ParameterAddress, value: f32 },
    /// Move linearly to `value` over `frames` frames
    Ramp {
        address: ParameterAddress,
        value: f32,
        frames: u32,
        generation: u32,
    },
}

/// Unit → control-plane ramp progress.
#[derive(Clone, Copy, Debug)]
struct UnitEvent {
    address: ParameterAddress,
    value: f32,
    generation: u32,
}

/// A change to a parameter observed by the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterEvent {
    pub address: ParameterAddress,
    pub value: f32,
}

/// Identifies an observer (and the originator of a write).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ObserverToken(u32);

struct Observer {
    token: ObserverToken,
    pending: VecDeque<ParameterEvent>,
}

impl Observer {
    /// Queue `event`, replacing a pending event for the same parameter.
    fn deliver(&mut self, event: ParameterEvent) {
        match self.pending.iter_mut().find(|e| e.address == event.address) {
            Some(pending) => pending.value = event.value,
            None => self.pending.push_back(event),
        }
    }

    fn retract(&mut self, address: ParameterAddress) {
        self.pending.retain(|e| e.address != address);
    }
}

/// Linear block-granular ramp toward a goal.
#[derive(Clone, Copy, Debug)]
struct Ramper {
    value: f32,
    goal: f32,
    frames_left: u32,
    generation: u32,
}

impl Ramper {
    fn new(from: f32, goal: f32, frames: u32, generation: u32) -> Self {
        Self {
            value: from,
            goal,
            frames_left: frames,
            generation,
        }
    }

    /// Advance by `frames`; returns the new value.
    fn step(&mut self, frames: u32) -> f32 {
        if frames >= self.frames_left {
            self.frames_left = 0;
            self.value = self.goal;
        } else {
            let t = frames as f32 / self.frames_left as f32;
            self.value += (self.goal - self.value) * t;
            self.frames_left -= frames;
        }
        self.value
    }

    fn done(&self) -> bool {
        self.frames_left == 0
    }
}

/// The audio-side half of an automatable unit.
pub struct AutomatedUnit {
    kernel: Box<dyn Kernel>,
    commands: Consumer<ParameterMessage>,
    events: Producer<UnitEvent>,
    started: Arc<AtomicBool>,
    rampers: Vec<Option<Ramper>>,
}

impl AutomatedUnit {
    /// Forward a construction-time property to the kernel.
    ///
    /// Only meaningful before the unit is attached.
    pub fn set_property(&mut self, name: &str, value: f32) -> bool {
        self.kernel.set_property(name, value)
    }

    fn apply(&mut self, msg: ParameterMessage) {
        match msg {
            ParameterMessage::Set { address, value } => {
                if let Some(slot) = self.rampers.get_mut(address.0 as usize) {
                    *slot = None;
                    self.kernel.set_parameter(address, value);
                }
            }
            ParameterMessage::Ramp {
                address,
                value,
                frames,
                generation,
            } => {
                let from = self.kernel.parameter(address);
                if let Some(slot) = self.rampers.get_mut(address.0 as usize) {
                    *slot = Some(Ramper::new(from, value, frames, generation));
                }
            }
        }
    }

    fn advance_ramps(&mut self, frames: u32) {
        for (i, slot) in self.rampers.iter_mut().enumerate() {
            let Some(ramper) = slot else { continue };
            let address = ParameterAddress(i as u32);
            let value = ramper.step(frames);
            self.kernel.set_parameter(address, value);
            // Read back so observers see the kernel's clamped value.
            let value = self.kernel.parameter(address);
            // Dropped events are fine: the next block reports a fresher value.
            let _ = self.events.push(UnitEvent {
                address,
                value,
                generation: ramper.generation,
            });
            if ramper.done() {
                *slot = None;
            }
        }
    }
}

impl AudioUnit for AutomatedUnit {
    type Message = ();

    fn process(
        &mut self,
        ctx: &ProcessContext,
        _messages: impl Iterator<Item = ()>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    ) {
        while let Ok(msg) = self.commands.pop() {
            self.apply(msg);
        }
        self.advance_ramps(ctx.buffer_size as u32);

        if self.started.load(Ordering::Acquire) {
            self.kernel.process(ctx, inputs, outputs);
        } else {
            // Bypassed: pass the input through untouched.
            mix_inputs(inputs, outputs);
        }
    }

    fn num_inputs(&self) -> usize {
        1
    }

    fn num_outputs(&self) -> usize {
        self.kernel.num_outputs()
    }
}

/// The control-plane half of an automatable unit.
pub struct ParameterTree {
    specs: &'static [ParameterSpec],
    values: Vec<f32>,
    generations: Vec<u32>,
    commands: Producer<ParameterMessage>,
    events: Consumer<UnitEvent>,
    started: Arc<AtomicBool>,
    observers: Vec<Observer>,
    next_token: u32,
}

/// Split a kernel into its audio-side unit and control-plane tree.
pub(crate) fn split(
    kernel: Box<dyn Kernel>,
    message_queue_size: usize,
    event_queue_size: usize,
) -> (AutomatedUnit, ParameterTree) {
    let (command_tx, command_rx) = rtrb::RingBuffer::new(message_queue_size);
    let (event_tx, event_rx) = rtrb::RingBuffer::new(event_queue_size);
    let started = Arc::new(AtomicBool::new(true));

    let specs = kernel.parameters();
    let values = (0..specs.len() as u32)
        .map(|i| kernel.parameter(ParameterAddress(i)))
        .collect();

    let unit = AutomatedUnit {
        rampers: vec![None; specs.len()],
        kernel,
        commands: command_rx,
        events: event_tx,
        started: Arc::clone(&started),
    };
    let tree = ParameterTree {
        specs,
        values,
        generations: vec![0; specs.len()],
        commands: command_tx,
        events: event_rx,
        started,
        observers: Vec::new(),
        next_token: 0,
    };
    (unit, tree)
}

impl ParameterTree {
    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<ParameterAddress> {
        self.specs
            .iter()
            .position(|spec| spec.name == name)
            .map(|i| ParameterAddress(i as u32))
    }

    pub fn spec(&self, address: ParameterAddress) -> Option<&'static ParameterSpec> {
        self.specs.get(address.0 as usize)
    }

    pub fn specs(&self) -> &'static [ParameterSpec] {
        self.specs
    }

    /// Last value written or observed for `address`.
    pub fn value(&self, address: ParameterAddress) -> Option<f32> {
        self.values.get(address.0 as usize).copied()
    }

    /// Register an observer; its mailbox starts empty.
    pub fn add_observer(&mut self) -> ObserverToken {
        let token = ObserverToken(self.next_token);
        self.next_token += 1;
        self.observers.push(Observer {
            token,
            pending: VecDeque::new(),
        });
        token
    }

    pub fn remove_observer(&mut self, token: ObserverToken) {
        self.observers.retain(|o| o.token != token);
    }

    /// Write a value on behalf of `originator`.
    ///
    /// The value is clamped to the declared range, forwarded to the unit, and
    /// delivered to every observer except the originator. Anything still
    /// pending for this parameter, including an in-flight ramp, is superseded.
    /// Unknown addresses are ignored.
    pub fn set_value(&mut self, address: ParameterAddress, value: f32, originator: ObserverToken) {
        let Some(spec) = self.spec(address) else { return };
        let value = spec.clamp(value as f64) as f32;
        self.values[address.0 as usize] = value;
        self.next_generation(address);

        if self.commands.push(ParameterMessage::Set { address, value }).is_err() {
            warn!(?address, "parameter queue full, dropping write");
        }

        let event = ParameterEvent { address, value };
        for observer in self.observers.iter_mut() {
            if observer.token == originator {
                observer.retract(address);
            } else {
                observer.deliver(event);
            }
        }
    }

    /// Schedule a linear ramp to `value` over `frames` frames on behalf of
    /// `originator`.
    ///
    /// Progress is reported by the unit and shows up in every observer's
    /// mailbox on the next [`poll`](Self::poll). The ramp supersedes earlier
    /// writes and ramps to the same parameter.
    pub fn start_ramp(
        &mut self,
        address: ParameterAddress,
        value: f32,
        frames: u32,
        originator: ObserverToken,
    ) {
        let Some(spec) = self.spec(address) else { return };
        let value = spec.clamp(value as f64) as f32;
        let generation = self.next_generation(address);
        let msg = ParameterMessage::Ramp {
            address,
            value,
            frames,
            generation,
        };
        if self.commands.push(msg).is_err() {
            warn!(?address, "parameter queue full, dropping ramp");
        }

        if let Some(observer) = self.observers.iter_mut().find(|o| o.token == originator) {
            observer.retract(address);
        }
    }

    fn next_generation(&mut self, address: ParameterAddress) -> u32 {
        let generation = &mut self.generations[address.0 as usize];
        *generation = generation.wrapping_add(1);
        *generation
    }

    /// Take unit-reported changes and drain `token`'s mailbox.
    pub fn poll(&mut self, token: ObserverToken) -> impl Iterator<Item = ParameterEvent> + '_ {
        self.pump();
        self.observers
            .iter_mut()
            .find(|o| o.token == token)
            .into_iter()
            .flat_map(|o| o.pending.drain(..))
    }

    fn pump(&mut self) {
        while let Ok(event) = self.events.pop() {
            let index = event.address.0 as usize;
            // Progress from a ramp that a later write or ramp replaced
            if self.generations.get(index) != Some(&event.generation) {
                continue;
            }
            self.values[index] = event.value;

            let event = ParameterEvent {
                address: event.address,
                value: event.value,
            };
            for observer in self.observers.iter_mut() {
                observer.deliver(event);
            }
        }
    }

    /// Un-bypass the unit.
    pub fn start(&self) {
        self.started.store(true, Ordering::Release);
    }

    /// Bypass the unit: it keeps running but passes its input through.
    pub fn stop(&self) {
        self.started.store(false, Ordering::Release);
    }

    /// Live processing state of the unit.
    pub fn is_playing(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}
