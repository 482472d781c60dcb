//! Seen-signer tracking for quorum verification.

/// One bit per roster position, set once that signer has been counted.
///
/// A signature set is checked against the lane's signer roster in a single
/// pass; the bitfield turns "has this signer already signed?" into a bit test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignerBitfield {
    words: Vec<u64>,
    roster_size: usize,
}

impl SignerBitfield {
    /// Create a bitfield for a roster of `roster_size` signers.
    pub fn new(roster_size: usize) -> Self {
        Self {
            words: vec![0; roster_size.div_ceil(64)],
            roster_size,
        }
    }

    /// Record signer `index`.
    ///
    /// Returns `false` when the signer was already recorded or lies outside
    /// the roster.
    pub fn insert(&mut self, index: usize) -> bool {
        if self.contains(index) || index >= self.roster_size {
            return false;
        }
        self.words[index / 64] |= 1 << (index % 64);
        true
    }

    /// Check whether signer `index` has been recorded.
    pub fn contains(&self, index: usize) -> bool {
        index < self.roster_size && self.words[index / 64] & (1 << (index % 64)) != 0
    }

    /// Number of distinct signers recorded.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Roster size this bitfield was created for.
    pub fn roster_size(&self) -> usize {
        self.roster_size
    }
}
