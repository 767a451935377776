//! Processing units: the opaque DSP components nodes wrap.

use core::fmt;
use core::marker::PhantomData;

use dasp_graph::{Buffer, Input};
use tracing::warn;

use crate::format::ProcessContext;

/// Identifier of a processing unit attached to an [`Engine`](crate::Engine).
///
/// Ids are handed out sequentially and never reused within one engine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct UnitId(pub(crate) u32);

/// The core trait for processing units.
///
/// Units live on the audio side of the graph. The control plane never touches
/// them directly; it sends messages which are drained at the start of the next
/// block:
///
/// ```
/// use knoten::{AudioUnit, ProcessContext};
/// use dasp_graph::{Buffer, Input};
///
/// enum TrimMessage {
///     SetLevel(f32),
/// }
///
/// struct Trim {
///     level: f32,
/// }
///
/// impl AudioUnit for Trim {
///     type Message = TrimMessage;
///
///     fn process(
///         &mut self,
///         _ctx: &ProcessContext,
///         messages: impl Iterator<Item = TrimMessage>,
///         inputs: &[Input],
///         outputs: &mut [Buffer],
///     ) {
///         for msg in messages {
///             match msg {
///                 TrimMessage::SetLevel(l) => self.level = l,
///             }
///         }
///         knoten::units::mix_inputs(inputs, outputs);
///         for buffer in outputs.iter_mut() {
///             buffer.iter_mut().for_each(|s| *s *= self.level);
///         }
///     }
///
///     fn num_inputs(&self) -> usize { 1 }
/// }
/// ```
pub trait AudioUnit: Send + 'static {
    /// Message type for parameter updates (use `()` if none needed)
    type Message: Send + 'static;

    /// Process one block of audio
    ///
    /// 1. Drain and handle all pending messages
    /// 2. Read from inputs, write to outputs
    fn process(
        &mut self,
        ctx: &ProcessContext,
        messages: impl Iterator<Item = Self::Message>,
        inputs: &[Input],
        outputs: &mut [Buffer],
    );

    /// Number of input channels (0 for generators)
    fn num_inputs(&self) -> usize {
        0
    }

    /// Number of output channels
    fn num_outputs(&self) -> usize {
        1
    }
}

/// A handle for sending messages to an attached unit.
///
/// Messages are buffered in a lock-free ring buffer and applied at the start
/// of the next block. If the buffer is full, [`UnitHandle::send`] returns
/// `Err(msg)` with the message that couldn't be queued.
pub struct UnitHandle<M: Send + 'static> {
    pub(crate) id: UnitId,
    pub(crate) sender: rtrb::Producer<M>,
    pub(crate) _marker: PhantomData<M>,
}

impl<M: Send + 'static> UnitHandle<M> {
    #[inline]
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Send a message to the unit.
    ///
    /// Lock-free; never blocks on the audio thread.
    pub fn send(&mut self, msg: M) -> Result<(), M> {
        self.sender.push(msg).map_err(|rtrb::PushError::Full(m)| m)
    }

    /// Fire-and-forget send: a full queue drops the message with a warning.
    pub(crate) fn post(&mut self, msg: M) {
        if self.send(msg).is_err() {
            warn!(unit = ?self.id, "message queue full, dropping parameter update");
        }
    }
}

/// A four-character code, e.g. `b"stre"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const fn new(code: &[u8; 4]) -> Self {
        Self(*code)
    }

    /// The code as a big-endian integer (`'stre'` is `0x73747265`).
    pub const fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl From<&[u8; 4]> for FourCC {
    fn from(code: &[u8; 4]) -> Self {
        Self(*code)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self)
    }
}

/// Broad family a registered unit belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ComponentType {
    Effect,
    Generator,
    Mixer,
}

/// Identifies a custom unit type in the engine's unit factory.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ComponentDescription {
    pub component_type: ComponentType,
    pub sub_type: FourCC,
    pub manufacturer: FourCC,
}

/// Manufacturer code shared by the built-in automatable units.
pub const MANUFACTURER: FourCC = FourCC::new(b"Kntn");

impl ComponentDescription {
    /// An effect description under the built-in manufacturer code.
    pub const fn effect(sub_type: &[u8; 4]) -> Self {
        Self {
            component_type: ComponentType::Effect,
            sub_type: FourCC::new(sub_type),
            manufacturer: MANUFACTURER,
        }
    }
}

impl fmt::Display for ComponentDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{}/{}", self.component_type, self.sub_type, self.manufacturer)
    }
}
