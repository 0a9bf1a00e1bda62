//! The per-function state a register allocator works on.
mod frame;
mod reg_info;

pub use frame::{FrameConfig, FrameInfo, StackObject, StackSlot, MAX_STACK_SLOT, NO_STACK_SLOT};
pub use reg_info::{AllocationHint, RegInfo};

/// One function being compiled: its virtual registers and its frame.
pub struct MachineFunction {
  pub name: String,
  reg_info: RegInfo,
  frame: FrameInfo,
}

impl MachineFunction {
  pub fn new(name: &str, frame_config: FrameConfig) -> Self {
    MachineFunction {
      name: name.to_string(),
      reg_info: RegInfo::new(),
      frame: FrameInfo::new(frame_config),
    }
  }

  pub fn reg_info(&self) -> &RegInfo {
    &self.reg_info
  }

  pub fn reg_info_mut(&mut self) -> &mut RegInfo {
    &mut self.reg_info
  }

  pub fn frame_info(&self) -> &FrameInfo {
    &self.frame
  }

  pub fn frame_info_mut(&mut self) -> &mut FrameInfo {
    &mut self.frame
  }
}
