//! Replays a log of allocator decisions against a fresh register map.
//!
//! A replay file is TOML: the function's virtual registers with their
//! classes and hints, optional frame settings, and the operations an
//! allocator performed, in order.
//!
//! ```toml
//! name = "fib"
//!
//! [frame]
//! stack_align = 16
//!
//! [[vreg]]
//! class = "gr64"
//! hint = "rdi"
//!
//! [[op]]
//! op = "assign-phys"
//! vreg = 0
//! phys = "rdi"
//! ```
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::{
  func::{FrameConfig, MachineFunction, StackSlot},
  pass::MachineFunctionPass,
  registers::{Reg, RegClassId, TargetRegisterInfo, VirtReg},
  regalloc::VirtRegMap,
};

fn default_name() -> String {
  String::from("anonymous")
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ReplayFile {
  #[serde(default = "default_name")]
  pub name: String,
  #[serde(default)]
  pub frame: FrameConfig,
  #[serde(default, rename = "vreg")]
  pub vregs: Vec<VRegDecl>,
  #[serde(default, rename = "op")]
  pub ops: Vec<Op>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct VRegDecl {
  pub class: String,
  /// A physical register name like `rdi`, or a virtual register like `%3`.
  pub hint: Option<String>,
  #[serde(default)]
  pub hint_kind: u32,
}

/// One allocator decision.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Op {
  /// Create another virtual register.
  NewVreg { class: String },
  AssignPhys { vreg: usize, phys: String },
  Clear { vreg: usize },
  ClearAll,
  /// Spill to a fresh slot, or to `slot` if given.
  Spill { vreg: usize, slot: Option<u32> },
  /// Split a new virtual register off `vreg`.
  Split { vreg: usize },
}

impl ReplayFile {
  pub fn parse(text: &str) -> Result<Self> {
    toml::from_str(text).context("Invalid replay file")
  }

  pub fn load(path: &Path) -> Result<Self> {
    let text = std::fs::read_to_string(path)
      .with_context(|| format!("Cannot read {}", path.display()))?;
    Self::parse(&text).with_context(|| format!("In {}", path.display()))
  }
}

/// Build the function the replay file describes and run every operation on
/// a new register map for it.
pub fn replay<'t>(
  file: &ReplayFile,
  tri: &'t dyn TargetRegisterInfo,
) -> Result<(MachineFunction, VirtRegMap<'t>)> {
  let mut mf = MachineFunction::new(&file.name, file.frame);
  for decl in &file.vregs {
    let class = find_class(tri, &decl.class)?;
    mf.reg_info_mut().create_virtual_register(class);
  }
  // Hints may name virtual registers declared later, so resolve them after.
  for (i, decl) in file.vregs.iter().enumerate() {
    if let Some(hint) = &decl.hint {
      let hint = parse_reg(tri, &mf, hint).with_context(|| format!("Bad hint for %{}", i))?;
      mf.reg_info_mut()
        .set_reg_allocation_hint(VirtReg::from_index(i), decl.hint_kind, hint);
    }
  }

  let mut vrm = VirtRegMap::new(tri);
  vrm.run_on_machine_function(&mut mf)?;

  for (i, op) in file.ops.iter().enumerate() {
    apply(&mut vrm, &mut mf, op).with_context(|| format!("Operation #{} ({:?}) failed", i, op))?;
  }

  log::info!(
    "{}: {} of {} virtual registers in registers, {} spill slots",
    mf.name,
    vrm.get_stats(),
    vrm.num_virt_regs(),
    vrm.stats().num_spill_slots
  );
  Ok((mf, vrm))
}

fn apply(vrm: &mut VirtRegMap, mf: &mut MachineFunction, op: &Op) -> Result<()> {
  let tri = vrm.target_reg_info();
  match op {
    Op::NewVreg { class } => {
      let class = find_class(tri, class)?;
      mf.reg_info_mut().create_virtual_register(class);
      vrm.grow(mf.reg_info());
    }
    Op::AssignPhys { vreg, phys } => {
      let reg = virt_reg(vrm, *vreg)?;
      let phys = tri
        .find_reg(phys)
        .ok_or_else(|| anyhow!("Unknown register {}", phys))?;
      let class = tri.reg_class(mf.reg_info().reg_class(reg));
      if !class.contains(phys) {
        return Err(anyhow!(
          "${} is not in class {} of {}",
          tri.reg_name(phys),
          class.name(),
          reg
        ));
      }
      vrm.assign_virt2phys(reg, phys);
    }
    Op::Clear { vreg } => {
      let reg = virt_reg(vrm, *vreg)?;
      vrm.clear_virt(reg)?;
    }
    Op::ClearAll => vrm.clear_all_virt(mf.reg_info()),
    Op::Spill { vreg, slot: None } => {
      let reg = virt_reg(vrm, *vreg)?;
      vrm.assign_virt2stack_slot(reg, mf)?;
    }
    Op::Spill {
      vreg,
      slot: Some(id),
    } => {
      let slot = StackSlot::new(*id)
        .filter(|slot| mf.frame_info().object(*slot).is_some())
        .ok_or_else(|| anyhow!("fi#{} does not exist", id))?;
      let reg = virt_reg(vrm, *vreg)?;
      vrm.assign_virt2stack_slot_to(reg, slot)?;
    }
    Op::Split { vreg } => {
      let parent = virt_reg(vrm, *vreg)?;
      let class = mf.reg_info().reg_class(parent);
      let child = mf.reg_info_mut().create_virtual_register(class);
      vrm.grow(mf.reg_info());
      // Always link straight to the original, as a live range splitter does.
      let original = vrm.get_original(parent);
      vrm.set_is_split_from_reg(child, original);
    }
  }
  Ok(())
}

fn find_class(tri: &dyn TargetRegisterInfo, name: &str) -> Result<RegClassId> {
  tri
    .find_reg_class(name)
    .ok_or_else(|| anyhow!("Unknown register class {}", name))
}

fn virt_reg(vrm: &VirtRegMap, index: usize) -> Result<VirtReg> {
  if index < vrm.num_virt_regs() {
    Ok(VirtReg::from_index(index))
  } else {
    Err(anyhow!(
      "%{} does not exist, the function has {} virtual registers",
      index,
      vrm.num_virt_regs()
    ))
  }
}

fn parse_reg(tri: &dyn TargetRegisterInfo, mf: &MachineFunction, name: &str) -> Result<Reg> {
  if let Some(index) = name.strip_prefix('%').and_then(|i| i.parse::<usize>().ok()) {
    if index >= mf.reg_info().num_virt_regs() {
      return Err(anyhow!("%{} does not exist", index));
    }
    return Ok(Reg::Virt(VirtReg::from_index(index)));
  }
  tri
    .find_reg(name)
    .map(Reg::Phys)
    .ok_or_else(|| anyhow!("Unknown register {}", name))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::registers::x86_64::{X86_64Register, X86_64};

  const SPLIT_AND_SPILL: &str = r#"
name = "loop"

[frame]
stack_align = 8
can_realign = false

[[vreg]]
class = "gr64"
hint = "rdi"

[[vreg]]
class = "vr128"

[[vreg]]
class = "gr32"
hint = "%0"

[[op]]
op = "assign-phys"
vreg = 0
phys = "rdi"

[[op]]
op = "spill"
vreg = 1

[[op]]
op = "split"
vreg = 1

[[op]]
op = "split"
vreg = 3

[[op]]
op = "spill"
vreg = 4
slot = 0

[[op]]
op = "assign-phys"
vreg = 4
phys = "xmm1"
"#;

  fn v(i: usize) -> VirtReg {
    VirtReg::from_index(i)
  }

  #[test]
  fn test_replay_split_and_spill() {
    let target = X86_64::new();
    let file = ReplayFile::parse(SPLIT_AND_SPILL).unwrap();
    let (mf, vrm) = replay(&file, &target).unwrap();

    assert_eq!(mf.name, "loop");
    assert_eq!(vrm.num_virt_regs(), 5);
    assert_eq!(vrm.get_phys(v(0)), Some(X86_64Register::RDI.phys()));
    assert!(vrm.has_preferred_phys(v(0), mf.reg_info()));
    assert!(vrm.has_known_preference(v(2), mf.reg_info()));

    // both fragments point straight at %1
    assert_eq!(vrm.get_pre_split_reg(v(3)), Some(v(1)));
    assert_eq!(vrm.get_pre_split_reg(v(4)), Some(v(1)));
    assert_eq!(mf.reg_info().reg_class(v(4)), X86_64::VR128);

    assert_eq!(vrm.get_stack_slot(v(4)), vrm.get_stack_slot(v(1)));
    assert!(vrm.is_assigned_reg(v(4)));
    assert!(!vrm.is_assigned_reg(v(1)));

    // the frame can't realign, so the 16 byte slot is only 8 aligned
    let slot = vrm.get_stack_slot(v(1)).unwrap();
    assert_eq!(mf.frame_info().object(slot).unwrap().align, 8);

    let dump = format!("{}", vrm.display(mf.reg_info()));
    assert!(dump.contains("[%0 -> $rdi] gr64"));
    assert!(dump.contains("[%4 -> $xmm1] vr128"));
    assert!(dump.contains("[%1 -> fi#0] vr128"));
    assert!(dump.contains("[%4 <- %1] orig %1"));
  }

  #[test]
  fn test_clear_and_clear_all() {
    let target = X86_64::new();
    let file = ReplayFile::parse(
      r#"
[[vreg]]
class = "gr32"
[[vreg]]
class = "gr32"
[[op]]
op = "assign-phys"
vreg = 0
phys = "rax"
[[op]]
op = "assign-phys"
vreg = 1
phys = "rbx"
[[op]]
op = "clear"
vreg = 0
[[op]]
op = "spill"
vreg = 1
[[op]]
op = "clear-all"
[[op]]
op = "new-vreg"
class = "gr64"
"#,
    )
    .unwrap();
    let (mf, vrm) = replay(&file, &target).unwrap();
    assert_eq!(mf.name, "anonymous");
    assert_eq!(vrm.num_virt_regs(), 3);
    assert!(vrm.virt_regs().all(|r| !vrm.has_phys(r)));
    assert!(vrm.get_stack_slot(v(1)).is_some());
    assert_eq!(vrm.stats().num_assignments, 2);
  }

  #[test]
  fn clearing_unassigned_fails_the_replay() {
    let target = X86_64::new();
    let file = ReplayFile::parse(
      r#"
[[vreg]]
class = "gr64"
[[op]]
op = "clear"
vreg = 0
"#,
    )
    .unwrap();
    let err = replay(&file, &target).err().unwrap();
    let msg = format!("{:#}", err);
    assert!(msg.contains("Operation #0"));
    assert!(msg.contains("not assigned"));
  }

  #[test]
  fn test_bad_inputs() {
    let target = X86_64::new();
    let cases = [
      ("[[vreg]]\nclass = \"fp80\"\n", "Unknown register class"),
      ("[[vreg]]\nclass = \"gr64\"\nhint = \"%7\"\n", "Bad hint"),
      (
        "[[vreg]]\nclass = \"gr64\"\n[[op]]\nop = \"assign-phys\"\nvreg = 3\nphys = \"rax\"\n",
        "does not exist",
      ),
      (
        "[[vreg]]\nclass = \"gr64\"\n[[op]]\nop = \"assign-phys\"\nvreg = 0\nphys = \"xmm0\"\n",
        "is not in class gr64",
      ),
      (
        "[[vreg]]\nclass = \"gr64\"\n[[op]]\nop = \"spill\"\nvreg = 0\nslot = 4\n",
        "fi#4 does not exist",
      ),
    ];
    for (text, expected) in cases {
      let file = ReplayFile::parse(text).unwrap();
      let err = replay(&file, &target).err().unwrap();
      let msg = format!("{:#}", err);
      assert!(msg.contains(expected), "{:?} does not mention {:?}", msg, expected);
    }
  }

  #[test]
  fn unknown_ops_are_rejected() {
    assert!(ReplayFile::parse("[[op]]\nop = \"coalesce\"\n").is_err());
    assert!(ReplayFile::parse("colour = 3\n").is_err());
  }
}
