//! Splicing operators. Positions are 1-based: `start = 1` means the splice
//! begins at the first bit.

use crate::error::{EvoError, Result};
use crate::genetics::genome::Genome;

impl Genome {
    /// Double-point crossover.
    ///
    /// Returns this genome with bits `[start-1, start-1+length)` replaced by
    /// the mate's bits at the same positions.
    ///
    /// Requires `1 <= start`, `start + length - 1 <= len` and mates of equal
    /// length.
    pub fn dbl_cross(&self, mate: &Genome, start: usize, length: usize) -> Result<Genome> {
        self.ensure_mate(mate)?;
        let past_end = (start.max(1) - 1)
            .checked_add(length)
            .map_or(true, |end| end > self.len());
        if start < 1 || past_end {
            return Err(EvoError::InvalidArgument(format!(
                "double crossover at start {start} with length {length} exceeds genome length {}",
                self.len()
            )));
        }

        let from = start - 1;
        let to = from + length;
        let mut genes = Vec::with_capacity(self.len());
        genes.extend_from_slice(&self.bits()[..from]);
        genes.extend_from_slice(&mate.bits()[from..to]);
        genes.extend_from_slice(&self.bits()[to..]);
        Ok(Genome::from_bits(genes))
    }

    /// Single-point crossover: this genome's bits before `start - 1`, then the
    /// mate's bits from `start - 1` to the end.
    pub fn sng_cross(&self, mate: &Genome, start: usize) -> Result<Genome> {
        self.ensure_mate(mate)?;
        if start < 1 || start - 1 > self.len() {
            return Err(EvoError::InvalidArgument(format!(
                "single crossover at start {start} exceeds genome length {}",
                self.len()
            )));
        }

        let from = start - 1;
        let mut genes = Vec::with_capacity(self.len());
        genes.extend_from_slice(&self.bits()[..from]);
        genes.extend_from_slice(&mate.bits()[from..]);
        Ok(Genome::from_bits(genes))
    }
}
