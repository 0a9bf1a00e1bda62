//! The contract between a per-function pass and the pipeline that runs it.
use anyhow::Result;

use crate::func::MachineFunction;

/// What a pass declares about its effect on other analyses.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AnalysisUsage {
  preserves_all: bool,
}

impl AnalysisUsage {
  /// The pass changes neither control flow nor instructions.
  pub fn set_preserves_all(&mut self) {
    self.preserves_all = true;
  }

  pub fn preserves_all(&self) -> bool {
    self.preserves_all
  }
}

/// A pass run once per function. The pipeline first asks for the pass's
/// analysis usage, then runs it on each function in turn.
pub trait MachineFunctionPass {
  fn pass_name(&self) -> &'static str;

  fn get_analysis_usage(&self, _au: &mut AnalysisUsage) {}

  /// Returns whether the function was modified.
  fn run_on_machine_function(&mut self, mf: &mut MachineFunction) -> Result<bool>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_preserves_all_is_opt_in() {
    let mut au = AnalysisUsage::default();
    assert!(!au.preserves_all());
    au.set_preserves_all();
    assert!(au.preserves_all());
  }
}
