#[macro_use]
mod macros;

pub mod class;
pub(crate) mod consts;
pub mod reg;
pub mod x86_64;

pub use class::{RegClassId, RegisterClass, TargetRegisterInfo};
pub use reg::{PhysReg, Reg, VirtReg};
