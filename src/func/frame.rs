use std::fmt;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Legacy packed encoding of "not spilled". Never a valid [`StackSlot`].
pub const NO_STACK_SLOT: u32 = (1 << 30) - 1;
/// Stack slot numbers are packed into 18 bits downstream.
pub const MAX_STACK_SLOT: u32 = (1 << 18) - 1;

/// A frame object index, always in `0..=MAX_STACK_SLOT`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
pub struct StackSlot(u32);

impl StackSlot {
  pub fn new(id: u32) -> Option<Self> {
    (id <= MAX_STACK_SLOT).then_some(StackSlot(id))
  }

  pub const fn id(&self) -> u32 {
    self.0
  }
}

impl fmt::Display for StackSlot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "fi#{}", self.0)
  }
}

/// Per-function frame settings, read from the `[frame]` table of a replay
/// file.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct FrameConfig {
  /// Alignment the stack pointer is guaranteed to have on entry.
  pub stack_align: u32,
  /// Whether the prologue may realign the stack for over-aligned objects.
  pub can_realign: bool,
}

impl Default for FrameConfig {
  fn default() -> Self {
    FrameConfig {
      stack_align: 16,
      can_realign: true,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackObject {
  pub size: u32,
  pub align: u32,
  pub is_spill_slot: bool,
}

/// The abstract stack frame of one function. Objects are only created,
/// never freed; their offsets are decided later by frame lowering.
#[derive(Debug, Clone)]
pub struct FrameInfo {
  config: FrameConfig,
  objects: Vec<StackObject>,
}

impl FrameInfo {
  pub fn new(config: FrameConfig) -> Self {
    FrameInfo {
      config,
      objects: vec![],
    }
  }

  pub fn stack_align(&self) -> u32 {
    self.config.stack_align
  }

  pub fn can_realign_stack(&self) -> bool {
    self.config.can_realign
  }

  pub fn num_objects(&self) -> usize {
    self.objects.len()
  }

  pub fn object(&self, slot: StackSlot) -> Option<&StackObject> {
    self.objects.get(slot.id() as usize)
  }

  /// Create a stack object for a local variable.
  pub fn create_stack_object(&mut self, size: u32, align: u32) -> Result<StackSlot> {
    self.push_object(StackObject {
      size,
      align,
      is_spill_slot: false,
    })
  }

  /// Create a stack object holding a spilled register.
  pub fn create_spill_stack_object(&mut self, size: u32, align: u32) -> Result<StackSlot> {
    self.push_object(StackObject {
      size,
      align,
      is_spill_slot: true,
    })
  }

  fn push_object(&mut self, object: StackObject) -> Result<StackSlot> {
    let id = self.objects.len() as u32;
    let slot = StackSlot::new(id).ok_or_else(|| {
      anyhow!(
        "Ran out of stack slots: fi#{} exceeds the limit of {}",
        id,
        MAX_STACK_SLOT
      )
    })?;
    self.objects.push(object);
    Ok(slot)
  }
}
