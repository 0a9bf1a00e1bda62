// The virtual register map records, per function, where every virtual
// register ended up: a physical register, a stack slot, or both for split
// live ranges, plus which register a split range was carved out of.
mod assign;
mod spill;
mod split;
mod stats;

pub use stats::{MapPrinter, Snapshot, VRegEntry, VrmStats};

use anyhow::Result;
use typed_index_collections::TiVec;

use crate::{
  func::{MachineFunction, RegInfo, StackSlot},
  pass::{AnalysisUsage, MachineFunctionPass},
  registers::{PhysReg, TargetRegisterInfo, VirtReg},
};

/// The map between virtual registers and their allocated locations.
/// There is one map per function.
///
/// The allocator fills it in, possibly clearing and redoing assignments,
/// and the rewriter reads it once allocation is final.
pub struct VirtRegMap<'t> {
  /// Register names and classes of the target.
  tri: &'t dyn TargetRegisterInfo,
  /// The physical register of each virtual register, if assigned.
  virt2phys: TiVec<VirtReg, Option<PhysReg>>,
  /// The spill slot of each virtual register, if spilled.
  virt2stack_slot: TiVec<VirtReg, Option<StackSlot>>,
  /// The register each split register was split from, `None` for itself.
  virt2split: TiVec<VirtReg, Option<VirtReg>>,
  /// Number of physical assignments made for this function.
  pub spill_count: u32,
  /// Number of spill slots created for this function.
  num_spill_slots: u32,
}

impl<'t> VirtRegMap<'t> {
  /// Create an empty map. It must be run on a function before use.
  pub fn new(tri: &'t dyn TargetRegisterInfo) -> Self {
    VirtRegMap {
      tri,
      virt2phys: TiVec::new(),
      virt2stack_slot: TiVec::new(),
      virt2split: TiVec::new(),
      spill_count: 0,
      num_spill_slots: 0,
    }
  }

  /// Create a map sized for `mf`.
  pub fn for_function(tri: &'t dyn TargetRegisterInfo, mf: &MachineFunction) -> Self {
    let mut vrm = VirtRegMap::new(tri);
    vrm.init(mf);
    vrm
  }

  pub fn target_reg_info(&self) -> &'t dyn TargetRegisterInfo {
    self.tri
  }

  /// Number of virtual registers the map has entries for.
  pub fn num_virt_regs(&self) -> usize {
    self.virt2split.len()
  }

  pub fn virt_regs(&self) -> impl Iterator<Item = VirtReg> {
    (0..self.num_virt_regs()).map(VirtReg::from_index)
  }

  /// Add default entries for virtual registers created since the last call,
  /// e.g. by live range splitting. Existing entries are left alone.
  pub fn grow(&mut self, mri: &RegInfo) {
    let n = mri.num_virt_regs();
    if n > self.num_virt_regs() {
      self.virt2phys.resize(n, None);
      self.virt2stack_slot.resize(n, None);
      self.virt2split.resize(n, None);
    }
  }

  fn init(&mut self, mf: &MachineFunction) {
    self.virt2phys.clear();
    self.virt2stack_slot.clear();
    self.virt2split.clear();
    self.spill_count = 0;
    self.num_spill_slots = 0;
    self.grow(mf.reg_info());
    log::debug!(
      "Register map for {} sized to {} virtual registers",
      mf.name,
      self.num_virt_regs()
    );
  }
}

impl MachineFunctionPass for VirtRegMap<'_> {
  fn pass_name(&self) -> &'static str {
    "virtregmap"
  }

  fn get_analysis_usage(&self, au: &mut AnalysisUsage) {
    au.set_preserves_all();
  }

  fn run_on_machine_function(&mut self, mf: &mut MachineFunction) -> Result<bool> {
    self.init(mf);
    Ok(false)
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::{
    func::FrameConfig,
    registers::{x86_64::X86_64, RegClassId},
  };

  /// A function with one virtual register per class in `classes`.
  pub(crate) fn function_with(classes: &[RegClassId]) -> MachineFunction {
    let mut mf = MachineFunction::new("test", FrameConfig::default());
    for class in classes {
      mf.reg_info_mut().create_virtual_register(*class);
    }
    mf
  }

  pub(crate) fn v(i: usize) -> VirtReg {
    VirtReg::from_index(i)
  }

  #[test]
  fn test_fresh_map_defaults() {
    let target = X86_64::new();
    let mut mf = function_with(&[X86_64::GR32, X86_64::GR64, X86_64::VR128]);
    let mut vrm = VirtRegMap::new(&target);
    assert!(!vrm.run_on_machine_function(&mut mf).unwrap());

    assert_eq!(vrm.num_virt_regs(), 3);
    for reg in vrm.virt_regs() {
      assert!(!vrm.has_phys(reg));
      assert_eq!(vrm.get_stack_slot(reg), None);
      assert_eq!(vrm.get_original(reg), reg);
      assert_eq!(vrm.get_pre_split_reg(reg), None);
    }
  }

  #[test]
  fn test_preserves_all() {
    let target = X86_64::new();
    let vrm = VirtRegMap::new(&target);
    let mut au = AnalysisUsage::default();
    vrm.get_analysis_usage(&mut au);
    assert!(au.preserves_all());
    assert_eq!(vrm.pass_name(), "virtregmap");
  }

  #[test]
  fn test_grow_initializes_only_new_entries() {
    let target = X86_64::new();
    let mut mf = function_with(&[X86_64::GR64, X86_64::GR64]);
    let mut vrm = VirtRegMap::for_function(&target, &mf);
    let rax = target.find_reg("rax").unwrap();
    vrm.assign_virt2phys(v(0), rax);
    let slot = vrm.assign_virt2stack_slot(v(1), &mut mf).unwrap();

    for _ in 0..3 {
      mf.reg_info_mut().create_virtual_register(X86_64::GR64);
    }
    vrm.grow(mf.reg_info());
    // growing twice is harmless
    vrm.grow(mf.reg_info());

    assert_eq!(vrm.num_virt_regs(), 5);
    assert_eq!(vrm.get_phys(v(0)), Some(rax));
    assert_eq!(vrm.get_stack_slot(v(1)), Some(slot));
    for i in 2..5 {
      assert!(!vrm.has_phys(v(i)));
      assert_eq!(vrm.get_stack_slot(v(i)), None);
      assert_eq!(vrm.get_original(v(i)), v(i));
    }
  }

  #[test]
  #[should_panic(expected = "out of bounds")]
  fn query_past_the_map_panics() {
    let target = X86_64::new();
    let mf = function_with(&[X86_64::GR32]);
    let vrm = VirtRegMap::for_function(&target, &mf);
    vrm.get_phys(v(1));
  }

  #[test]
  fn test_rerun_resets_state() {
    let target = X86_64::new();
    let mut mf = function_with(&[X86_64::GR32]);
    let mut vrm = VirtRegMap::for_function(&target, &mf);
    vrm.assign_virt2phys(v(0), target.find_reg("rbx").unwrap());
    vrm.assign_virt2stack_slot(v(0), &mut mf).unwrap();

    vrm.run_on_machine_function(&mut mf).unwrap();
    assert!(!vrm.has_phys(v(0)));
    assert_eq!(vrm.get_stack_slot(v(0)), None);
    assert_eq!(vrm.spill_count, 0);
  }
}
