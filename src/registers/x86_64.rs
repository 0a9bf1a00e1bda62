use std::collections::HashMap;

use lazy_static::lazy_static;

use super::{
  class::{RegClassId, RegisterClass, TargetRegisterInfo},
  consts::{ALLOC_POOL_GPRS, GR32_SPILL, GR64_SPILL, NUM_XMM_REGS, VR128_SPILL},
  reg::PhysReg,
};

decl_target_regs!(X86_64Register {
  RAX, RBX, RCX, RDX, RSI, RDI, RBP, RSP,
  R8, R9, R10, R11, R12, R13, R14, R15,
  XMM0, XMM1, XMM2, XMM3, XMM4, XMM5, XMM6, XMM7,
  XMM8, XMM9, XMM10, XMM11, XMM12, XMM13, XMM14, XMM15,
});

lazy_static! {
  static ref REGS_BY_NAME: HashMap<&'static str, X86_64Register> = X86_64Register::ALL
    .iter()
    .map(|reg| (AsRef::<str>::as_ref(reg), *reg))
    .collect();
}

impl X86_64Register {
  pub const fn is_xmm(&self) -> bool {
    (*self as u16) >= (X86_64Register::XMM0 as u16)
  }
}

/// The x86-64 target: general purpose registers in 32- and 64-bit classes
/// and the SSE registers in a 128-bit class.
pub struct X86_64 {
  classes: Vec<RegisterClass>,
}

impl X86_64 {
  pub const GR32: RegClassId = RegClassId(0);
  pub const GR64: RegClassId = RegClassId(1);
  pub const VR128: RegClassId = RegClassId(2);

  pub fn new() -> Self {
    let gprs: Vec<PhysReg> = ALLOC_POOL_GPRS.iter().map(|r| r.phys()).collect();
    let xmms: Vec<PhysReg> = X86_64Register::ALL
      .iter()
      .filter(|r| r.is_xmm())
      .map(|r| r.phys())
      .collect();
    debug_assert_eq!(xmms.len(), NUM_XMM_REGS);

    X86_64 {
      classes: vec![
        RegisterClass::new("gr32", GR32_SPILL.0, GR32_SPILL.1, gprs.clone()),
        RegisterClass::new("gr64", GR64_SPILL.0, GR64_SPILL.1, gprs),
        RegisterClass::new("vr128", VR128_SPILL.0, VR128_SPILL.1, xmms),
      ],
    }
  }
}

impl Default for X86_64 {
  fn default() -> Self {
    Self::new()
  }
}

impl TargetRegisterInfo for X86_64 {
  fn reg_name(&self, reg: PhysReg) -> &str {
    X86_64Register::from_phys(reg).map_or("<invalid>", |r| r.as_ref())
  }

  fn find_reg(&self, name: &str) -> Option<PhysReg> {
    let name = name.trim_start_matches(&['%', '$'][..]);
    REGS_BY_NAME
      .get(name.to_ascii_lowercase().as_str())
      .map(|r| r.phys())
  }

  fn reg_classes(&self) -> &[RegisterClass] {
    &self.classes
  }
}
