use std::fmt;

use serde::Serialize;

use super::VirtRegMap;
use crate::{func::RegInfo, registers::VirtReg};

/// Counters describing how well allocation went for one function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VrmStats {
  pub num_virt_regs: usize,
  /// Registers for which [`VirtRegMap::is_assigned_reg`] holds.
  pub num_assigned: usize,
  pub num_with_phys: usize,
  pub num_spilled: usize,
  pub num_split: usize,
  /// Physical assignments made, including ones later undone.
  pub num_assignments: u32,
  pub num_spill_slots: u32,
}

/// One row of a [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VRegEntry {
  pub vreg: VirtReg,
  pub class: &'static str,
  pub phys: Option<String>,
  pub stack_slot: Option<u32>,
  pub split_from: Option<VirtReg>,
  pub original: VirtReg,
  pub assigned: bool,
}

/// Everything the map knows about a function, in a serializable form.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
  pub function: String,
  pub stats: VrmStats,
  pub vregs: Vec<VRegEntry>,
}

/// Displays a [`VirtRegMap`] with register class names.
pub struct MapPrinter<'a, 't> {
  vrm: &'a VirtRegMap<'t>,
  mri: &'a RegInfo,
}

impl fmt::Display for MapPrinter<'_, '_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.vrm.print(f, self.mri)
  }
}

impl<'t> VirtRegMap<'t> {
  /// The number of virtual registers that live in a register.
  pub fn get_stats(&self) -> usize {
    self.virt_regs().filter(|r| self.is_assigned_reg(*r)).count()
  }

  pub fn stats(&self) -> VrmStats {
    let mut stats = VrmStats {
      num_virt_regs: self.num_virt_regs(),
      num_assignments: self.spill_count,
      num_spill_slots: self.num_spill_slots,
      ..Default::default()
    };
    for reg in self.virt_regs() {
      stats.num_assigned += self.is_assigned_reg(reg) as usize;
      stats.num_with_phys += self.has_phys(reg) as usize;
      stats.num_spilled += self.get_stack_slot(reg).is_some() as usize;
      stats.num_split += self.is_split(reg) as usize;
    }
    stats
  }

  /// Write the physical register, stack slot and split mappings.
  pub fn print(&self, w: &mut impl fmt::Write, mri: &RegInfo) -> fmt::Result {
    let class_name = |reg: VirtReg| self.tri.reg_class(mri.reg_class(reg)).name();

    writeln!(w, "********** REGISTER MAP **********")?;
    for reg in self.virt_regs() {
      if let Some(phys) = self.get_phys(reg) {
        writeln!(
          w,
          "[{} -> ${}] {}",
          reg,
          self.tri.reg_name(phys),
          class_name(reg)
        )?;
      }
    }
    for reg in self.virt_regs() {
      if let Some(slot) = self.get_stack_slot(reg) {
        writeln!(w, "[{} -> {}] {}", reg, slot, class_name(reg))?;
      }
    }
    for reg in self.virt_regs() {
      if let Some(from) = self.get_pre_split_reg(reg) {
        writeln!(w, "[{} <- {}] orig {}", reg, from, self.get_original(reg))?;
      }
    }
    writeln!(w)
  }

  pub fn display<'a>(&'a self, mri: &'a RegInfo) -> MapPrinter<'a, 't> {
    MapPrinter { vrm: self, mri }
  }

  /// Print the map to stderr.
  pub fn dump(&self, mri: &RegInfo) {
    eprint!("{}", self.display(mri));
  }

  pub fn snapshot(&self, function: &str, mri: &RegInfo) -> Snapshot {
    let vregs = self
      .virt_regs()
      .map(|reg| VRegEntry {
        vreg: reg,
        class: self.tri.reg_class(mri.reg_class(reg)).name(),
        phys: self.get_phys(reg).map(|p| self.tri.reg_name(p).to_string()),
        stack_slot: self.get_stack_slot(reg).map(|s| s.id()),
        split_from: self.get_pre_split_reg(reg),
        original: self.get_original(reg),
        assigned: self.is_assigned_reg(reg),
      })
      .collect();
    Snapshot {
      function: function.to_string(),
      stats: self.stats(),
      vregs,
    }
  }
}
