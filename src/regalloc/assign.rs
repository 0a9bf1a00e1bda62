use anyhow::{anyhow, Result};

use super::VirtRegMap;
use crate::{
  func::RegInfo,
  registers::{PhysReg, Reg, VirtReg},
};

/// Virtual to physical register assignments.
impl VirtRegMap<'_> {
  pub fn get_phys(&self, reg: VirtReg) -> Option<PhysReg> {
    self.virt2phys[reg]
  }

  pub fn has_phys(&self, reg: VirtReg) -> bool {
    self.get_phys(reg).is_some()
  }

  /// Map `reg` to `phys`, replacing any earlier assignment.
  pub fn assign_virt2phys(&mut self, reg: VirtReg, phys: PhysReg) {
    log::debug!("Assigning {} to ${}", reg, self.tri.reg_name(phys));
    self.virt2phys[reg] = Some(phys);
    self.spill_count += 1;
  }

  /// Drop the physical register of `reg`, which must have one.
  pub fn clear_virt(&mut self, reg: VirtReg) -> Result<()> {
    let phys = self.virt2phys[reg]
      .take()
      .ok_or_else(|| anyhow!("Attempt to clear {}, which is not assigned", reg))?;
    log::debug!("Unassigning {} from ${}", reg, self.tri.reg_name(phys));
    Ok(())
  }

  /// Drop every physical assignment. Spill slots and split lineage stay.
  pub fn clear_all_virt(&mut self, mri: &RegInfo) {
    self.grow(mri);
    let n = self.num_virt_regs();
    self.virt2phys.clear();
    self.virt2phys.resize(n, None);
  }

  /// Whether `reg` lives in a register rather than a stack slot. A split
  /// register may have both; a register that was not split and has a
  /// slot is never register resident.
  pub fn is_assigned_reg(&self, reg: VirtReg) -> bool {
    if self.virt2stack_slot[reg].is_none() {
      return true;
    }
    self.virt2split[reg].is_some() && self.virt2phys[reg].is_some()
  }

  /// Whether `reg` is assigned to the register its simple hint asks for.
  /// A virtual hint stands for whatever that register is assigned to.
  pub fn has_preferred_phys(&self, reg: VirtReg, mri: &RegInfo) -> bool {
    let hint = match mri.simple_hint(reg) {
      Some(Reg::Phys(phys)) => Some(phys),
      Some(Reg::Virt(virt)) => self.get_phys(virt),
      None => None,
    };
    hint.is_some() && self.get_phys(reg) == hint
  }

  /// Whether the hint of `reg` names a physical register, directly or
  /// through an assigned virtual register. Only one level of virtual
  /// hint is followed.
  pub fn has_known_preference(&self, reg: VirtReg, mri: &RegInfo) -> bool {
    match mri.reg_allocation_hint(reg).map(|hint| hint.reg) {
      Some(Reg::Phys(_)) => true,
      Some(Reg::Virt(virt)) => self.has_phys(virt),
      None => false,
    }
  }
}
