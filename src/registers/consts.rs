use crate::registers::x86_64::X86_64Register;

// IMPORTANT: The GPR pool is the allocation order of both GR32 and GR64.
//
// ====================
// RSP and RBP hold the frame, R11 is the rewriter's scratch register.
// Keep them out of the pool!
// ====================
pub const REG_ALLOC_POOL_SIZE: usize = 13;
pub const ALLOC_POOL_GPRS: [X86_64Register; REG_ALLOC_POOL_SIZE] = [
  X86_64Register::RAX,
  X86_64Register::RDI,
  X86_64Register::RSI,
  X86_64Register::RDX,
  X86_64Register::RCX,
  X86_64Register::R8,
  X86_64Register::R9,
  X86_64Register::R10,
  X86_64Register::RBX,
  X86_64Register::R12,
  X86_64Register::R13,
  X86_64Register::R14,
  X86_64Register::R15,
];

pub const NUM_XMM_REGS: usize = 16;

/// Spill size and alignment, in bytes, of each class.
pub const GR32_SPILL: (u32, u32) = (4, 4);
pub const GR64_SPILL: (u32, u32) = (8, 8);
pub const VR128_SPILL: (u32, u32) = (16, 16);
