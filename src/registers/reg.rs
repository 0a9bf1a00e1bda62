use std::{fmt, num::NonZeroU16};

use enum_as_inner::EnumAsInner;
use serde::Serialize;

/// A virtual register. Indices are dense and handed out in increasing order
/// by [`crate::func::RegInfo::create_virtual_register`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
pub struct VirtReg(u32);

impl VirtReg {
  pub const fn from_index(index: usize) -> Self {
    Self(index as u32)
  }

  pub const fn index(&self) -> usize {
    self.0 as usize
  }
}

// Lets `VirtReg` index a `TiVec`.
impl From<usize> for VirtReg {
  fn from(index: usize) -> Self {
    Self::from_index(index)
  }
}

impl From<VirtReg> for usize {
  fn from(reg: VirtReg) -> Self {
    reg.index()
  }
}

impl fmt::Display for VirtReg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "%{}", self.0)
  }
}

/// A physical register number. Zero is never a valid register, so an
/// unassigned virtual register is simply `None`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize)]
pub struct PhysReg(NonZeroU16);

impl PhysReg {
  pub const fn new(id: u16) -> Option<Self> {
    match NonZeroU16::new(id) {
      Some(id) => Some(Self(id)),
      None => None,
    }
  }

  /// The `i`th register of a target whose enumeration starts at 1.
  pub const fn from_offset(i: u16) -> Self {
    Self(NonZeroU16::MIN.saturating_add(i))
  }

  pub const fn id(&self) -> u16 {
    self.0.get()
  }
}

impl fmt::Display for PhysReg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "$p{}", self.0)
  }
}

/// Anything that can sit in a register operand or an allocation hint.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, EnumAsInner)]
pub enum Reg {
  Virt(VirtReg),
  Phys(PhysReg),
}

impl From<VirtReg> for Reg {
  fn from(reg: VirtReg) -> Self {
    Reg::Virt(reg)
  }
}

impl From<PhysReg> for Reg {
  fn from(reg: PhysReg) -> Self {
    Reg::Phys(reg)
  }
}

impl fmt::Display for Reg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Reg::Virt(v) => write!(f, "{}", v),
      Reg::Phys(p) => write!(f, "{}", p),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_is_not_a_physreg() {
    assert!(PhysReg::new(0).is_none());
    assert_eq!(PhysReg::new(3).unwrap().id(), 3);
  }

  #[test]
  fn reg_kind_helpers() {
    let v: Reg = VirtReg::from_index(4).into();
    assert!(v.is_virt());
    assert_eq!(v.as_virt().unwrap().index(), 4);
    assert_eq!(format!("{}", v), "%4");

    let p: Reg = PhysReg::new(2).unwrap().into();
    assert!(p.is_phys());
    assert!(p.as_virt().is_none());
  }
}
