//! Allocator state guarded by the worker lock

/// Most recent unit and the last sequence issued in it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct State {
    gap: u64,
    sequence: u32,
}

impl State {
    #[inline(always)]
    pub(crate) const fn new(gap: u64, sequence: u32) -> Self {
        Self { gap, sequence }
    }

    #[inline(always)]
    pub(crate) const fn gap(self) -> u64 {
        self.gap
    }

    #[inline(always)]
    pub(crate) const fn sequence(self) -> u32 {
        self.sequence
    }

    /// First id of a newer unit, `first` being the masked sequence 1
    #[inline(always)]
    pub(crate) const fn claim(gap: u64, first: u32) -> Self {
        Self::new(gap, first)
    }

    /// Next id in the same unit, or sequence 0 of the following unit when
    /// `masked` wrapped around
    #[inline(always)]
    pub(crate) const fn increment(self, masked: u32) -> Self {
        if masked == 0 {
            Self::new(self.gap + 1, 0)
        } else {
            Self::new(self.gap, masked)
        }
    }
}
