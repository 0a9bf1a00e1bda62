//! Output emission

use anyhow::{Context, Result};
use std::fmt::{self, Write};

use crate::args::EmitTarget;
use crate::func::MachineFunction;
use crate::regalloc::VirtRegMap;

/// Render the map of `mf` in the requested format.
pub fn render(vrm: &VirtRegMap, mf: &MachineFunction, emit: EmitTarget, stats: bool) -> Result<String> {
  match emit {
    EmitTarget::Text => {
      let mut out = format!("# Function: {}\n", mf.name);
      write!(out, "{}", vrm.display(mf.reg_info()))?;
      if stats {
        render_stats(&mut out, vrm)?;
      }
      Ok(out)
    }
    EmitTarget::Json => {
      let snapshot = vrm.snapshot(&mf.name, mf.reg_info());
      serde_json::to_string_pretty(&snapshot).context("Cannot serialize the register map")
    }
  }
}

fn render_stats(out: &mut String, vrm: &VirtRegMap) -> fmt::Result {
  let stats = vrm.stats();
  writeln!(out, "Virtual registers: {}", stats.num_virt_regs)?;
  writeln!(out, "In registers:      {}", stats.num_assigned)?;
  writeln!(out, "Spilled:           {}", stats.num_spilled)?;
  writeln!(out, "Split:             {}", stats.num_split)?;
  writeln!(out, "Assignments made:  {}", stats.num_assignments)?;
  writeln!(out, "Spill slots:       {}", stats.num_spill_slots)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{func::FrameConfig, registers::x86_64::X86_64};

  #[test]
  fn test_render_text_with_stats() {
    let target = X86_64::new();
    let mut mf = MachineFunction::new("f", FrameConfig::default());
    mf.reg_info_mut().create_virtual_register(X86_64::GR64);
    let vrm = VirtRegMap::for_function(&target, &mf);

    let out = render(&vrm, &mf, EmitTarget::Text, true).unwrap();
    assert!(out.starts_with("# Function: f\n********** REGISTER MAP **********\n"));
    assert!(out.contains("In registers:      1"));
  }

  #[test]
  fn test_stats_follow_the_map() {
    let target = X86_64::new();
    let mut mf = MachineFunction::new("f", FrameConfig::default());
    mf.reg_info_mut().create_virtual_register(X86_64::GR64);
    let mut vrm = VirtRegMap::for_function(&target, &mf);
    vrm.assign_virt2stack_slot(crate::registers::VirtReg::from_index(0), &mut mf).unwrap();

    let mut out = String::new();
    render_stats(&mut out, &vrm).unwrap();
    assert_eq!(out.lines().count(), 6);
    assert!(out.contains("Spilled:           1\n"));
    assert!(out.ends_with("Spill slots:       1\n"));
  }

  #[test]
  fn test_render_json() {
    let target = X86_64::new();
    let mut mf = MachineFunction::new("g", FrameConfig::default());
    mf.reg_info_mut().create_virtual_register(X86_64::GR32);
    let vrm = VirtRegMap::for_function(&target, &mf);

    let out = render(&vrm, &mf, EmitTarget::Json, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["function"], "g");
    assert_eq!(value["vregs"].as_array().unwrap().len(), 1);
  }
}
