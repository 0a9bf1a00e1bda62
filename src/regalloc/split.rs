use super::VirtRegMap;
use crate::registers::VirtReg;

/// Live range split lineage.
impl VirtRegMap<'_> {
  /// Record that `reg` was split off from `from`. Splitting a register
  /// from itself clears the record.
  ///
  /// # Panics
  /// If `reg` is `from` or one of its ancestors, which would make the
  /// lineage cyclic.
  pub fn set_is_split_from_reg(&mut self, reg: VirtReg, from: VirtReg) {
    if reg == from {
      self.virt2split[reg] = None;
      return;
    }
    if self.lineage(from).any(|ancestor| ancestor == reg) {
      panic!("Splitting {} from {} would make its lineage cyclic", reg, from);
    }
    log::debug!("{} is split from {}", reg, from);
    self.virt2split[reg] = Some(from);
  }

  /// The register `reg` was split from, exactly as recorded.
  pub fn get_pre_split_reg(&self, reg: VirtReg) -> Option<VirtReg> {
    self.virt2split[reg]
  }

  pub fn is_split(&self, reg: VirtReg) -> bool {
    self.virt2split[reg].is_some()
  }

  /// The register `reg` ultimately descends from. A register that was not
  /// split is its own original.
  ///
  /// Follows the lineage all the way up, so the result is the same whether
  /// splits were recorded against the original or against an intermediate
  /// piece, and `get_original(get_original(r)) == get_original(r)`.
  pub fn get_original(&self, reg: VirtReg) -> VirtReg {
    self.lineage(reg).last().unwrap_or(reg)
  }

  /// `reg` followed by each register it was split from, oldest last.
  fn lineage(&self, reg: VirtReg) -> impl Iterator<Item = VirtReg> + '_ {
    std::iter::successors(Some(reg), move |r| self.virt2split[*r])
  }
}
