use anyhow::{anyhow, Context, Result};

use super::VirtRegMap;
use crate::{
  func::{FrameInfo, MachineFunction, StackSlot},
  registers::{RegClassId, VirtReg},
};

/// Virtual register to stack slot assignments.
impl VirtRegMap<'_> {
  pub fn get_stack_slot(&self, reg: VirtReg) -> Option<StackSlot> {
    self.virt2stack_slot[reg]
  }

  /// Spill `reg` to a new stack slot sized for its register class.
  pub fn assign_virt2stack_slot(
    &mut self,
    reg: VirtReg,
    mf: &mut MachineFunction,
  ) -> Result<StackSlot> {
    if let Some(slot) = self.virt2stack_slot[reg] {
      return Err(anyhow!("{} is already spilled to {}", reg, slot));
    }
    let class = mf.reg_info().reg_class(reg);
    let slot = self
      .create_spill_slot(class, mf.frame_info_mut())
      .with_context(|| format!("Failed to spill {} in {}", reg, mf.name))?;
    self.virt2stack_slot[reg] = Some(slot);
    Ok(slot)
  }

  /// Spill `reg` to an existing slot, e.g. one shared by all the pieces
  /// of a split register.
  pub fn assign_virt2stack_slot_to(&mut self, reg: VirtReg, slot: StackSlot) -> Result<()> {
    if let Some(old) = self.virt2stack_slot[reg] {
      return Err(anyhow!("{} is already spilled to {}", reg, old));
    }
    log::debug!("Spilling {} to {}", reg, slot);
    self.virt2stack_slot[reg] = Some(slot);
    Ok(())
  }

  /// Create a fresh spill slot for a register of `class`. Slots are never
  /// reused.
  pub fn create_spill_slot(&mut self, class: RegClassId, frame: &mut FrameInfo) -> Result<StackSlot> {
    let tri = self.tri;
    let rc = tri.reg_class(class);
    let size = rc.spill_size();
    let mut align = rc.spill_align();

    // Settle for the stack alignment if the frame can't be realigned.
    if align > frame.stack_align() && !frame.can_realign_stack() {
      align = frame.stack_align();
    }

    let slot = frame.create_spill_stack_object(size, align)?;
    self.num_spill_slots += 1;
    log::debug!(
      "Created spill slot {} for {} ({} bytes, align {})",
      slot,
      rc.name(),
      size,
      align
    );
    Ok(slot)
  }
}
