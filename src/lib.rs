//! Virtual register map
//!
//! Records, for each function, which physical register or stack slot each
//! virtual register was given by the register allocator, and which register
//! a split live range came from. The rewriter reads it back to replace
//! virtual registers in the final code.

pub mod args;
pub mod emit;
pub mod func;
pub mod pass;
pub mod regalloc;
pub mod registers;
pub mod replay;

pub use regalloc::VirtRegMap;
