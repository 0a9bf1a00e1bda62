use serde::Serialize;

use super::reg::PhysReg;

/// Index of a register class in its target's class table.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize)]
pub struct RegClassId(pub u16);

/// The physical registers a virtual register may live in, plus the size and
/// alignment of the stack slot needed to spill it.
#[derive(Debug, Clone)]
pub struct RegisterClass {
  name: &'static str,
  spill_size: u32,
  spill_align: u32,
  /// Allocatable members in the order an allocator should try them.
  order: Vec<PhysReg>,
}

impl RegisterClass {
  pub fn new(name: &'static str, spill_size: u32, spill_align: u32, order: Vec<PhysReg>) -> Self {
    debug_assert!(spill_align.is_power_of_two(), "bad alignment for {}", name);
    RegisterClass {
      name,
      spill_size,
      spill_align,
      order,
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn spill_size(&self) -> u32 {
    self.spill_size
  }

  pub fn spill_align(&self) -> u32 {
    self.spill_align
  }

  pub fn contains(&self, reg: PhysReg) -> bool {
    self.order.contains(&reg)
  }
}

/// What the map needs to know about a target: register names and the
/// register classes virtual registers are created in.
pub trait TargetRegisterInfo {
  fn reg_name(&self, reg: PhysReg) -> &str;

  /// Look a physical register up by its assembler name, e.g. `rax`.
  fn find_reg(&self, name: &str) -> Option<PhysReg>;

  fn reg_classes(&self) -> &[RegisterClass];

  fn reg_class(&self, id: RegClassId) -> &RegisterClass {
    &self.reg_classes()[id.0 as usize]
  }

  fn find_reg_class(&self, name: &str) -> Option<RegClassId> {
    self
      .reg_classes()
      .iter()
      .position(|rc| rc.name().eq_ignore_ascii_case(name))
      .map(|i| RegClassId(i as u16))
  }
}
