// Declares a target's physical register enumeration.
//
// Variants are numbered from 0 in declaration order and map onto physical
// register number `index + 1`, since register number 0 is reserved. Names
// are the lowercase variant names, e.g. `RAX` -> "rax".
macro_rules! decl_target_regs {
  ($name:ident { $($reg:ident),* $(,)? }) => {
    #[allow(clippy::upper_case_acronyms)]
    #[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, strum_macros::AsRefStr)]
    #[strum(serialize_all = "lowercase")]
    #[repr(u16)]
    pub enum $name {
      $($reg),*
    }

    impl $name {
      pub const ALL: &'static [$name] = &[$($name::$reg),*];

      pub const fn phys(self) -> $crate::registers::reg::PhysReg {
        $crate::registers::reg::PhysReg::from_offset(self as u16)
      }

      pub fn from_phys(reg: $crate::registers::reg::PhysReg) -> Option<&'static Self> {
        Self::ALL.get(reg.id() as usize - 1)
      }
    }

    impl From<$name> for $crate::registers::reg::PhysReg {
      fn from(reg: $name) -> Self {
        reg.phys()
      }
    }
  };
}
