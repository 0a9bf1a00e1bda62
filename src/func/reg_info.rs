use typed_index_collections::TiVec;

use crate::registers::{Reg, RegClassId, VirtReg};

/// A register allocation hint. Kind 0 is a plain "try to use this
/// register" hint; other kinds are target specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationHint {
  pub kind: u32,
  pub reg: Reg,
}

/// Per-function virtual register information: the class each virtual
/// register was created in and its allocation hint.
#[derive(Debug, Clone, Default)]
pub struct RegInfo {
  classes: TiVec<VirtReg, RegClassId>,
  hints: TiVec<VirtReg, Option<AllocationHint>>,
}

impl RegInfo {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn create_virtual_register(&mut self, class: RegClassId) -> VirtReg {
    let reg = self.classes.push_and_get_key(class);
    self.hints.push(None);
    log::debug!("Created virtual register {}", reg);
    reg
  }

  pub fn num_virt_regs(&self) -> usize {
    self.classes.len()
  }

  pub fn virt_regs(&self) -> impl Iterator<Item = VirtReg> {
    (0..self.classes.len()).map(VirtReg::from_index)
  }

  pub fn reg_class(&self, reg: VirtReg) -> RegClassId {
    match self.classes.get(reg) {
      Some(class) => *class,
      None => panic!("{} was never created", reg),
    }
  }

  pub fn set_reg_allocation_hint(&mut self, reg: VirtReg, kind: u32, hint: Reg) {
    match self.hints.get_mut(reg) {
      Some(slot) => *slot = Some(AllocationHint { kind, reg: hint }),
      None => panic!("{} was never created", reg),
    }
  }

  pub fn set_simple_hint(&mut self, reg: VirtReg, hint: Reg) {
    self.set_reg_allocation_hint(reg, 0, hint);
  }

  pub fn reg_allocation_hint(&self, reg: VirtReg) -> Option<AllocationHint> {
    self.hints.get(reg).copied().flatten()
  }

  /// The hint, if it is a plain kind 0 hint.
  pub fn simple_hint(&self, reg: VirtReg) -> Option<Reg> {
    self
      .reg_allocation_hint(reg)
      .filter(|hint| hint.kind == 0)
      .map(|hint| hint.reg)
  }
}
