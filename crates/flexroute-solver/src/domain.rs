//! Integer interval domains.

/// Closed interval `[lo, hi]` of values a variable may still take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Domain {
    pub lo: i64,
    pub hi: i64,
}

impl Domain {
    pub fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    pub fn is_fixed(&self) -> bool {
        self.lo == self.hi
    }

    /// Number of values minus one; zero when fixed.
    pub fn width(&self) -> u128 {
        (i128::from(self.hi) - i128::from(self.lo)).max(0) as u128
    }
}
