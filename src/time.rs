//! Simulated clock for the interrupt engine.
//!
//! A `Cycle` is one discrete unit of simulated time. The clock only moves
//! when the caller ticks the engine, never from wall-clock observation.

/// A point on the simulated clock, counted in whole cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Cycle(u64);

impl Cycle {
    /// The cycle every run starts at.
    pub const ZERO: Cycle = Cycle(0);

    /// Create a `Cycle` from a raw count.
    #[inline]
    pub fn new(count: u64) -> Self {
        Cycle(count)
    }

    /// Return the raw count.
    #[inline]
    pub fn count(self) -> u64 {
        self.0
    }

    /// The following cycle. Saturates at `u64::MAX`.
    #[inline]
    pub fn next(self) -> Cycle {
        Cycle(self.0.saturating_add(1))
    }

    /// Number of cycles elapsed since `earlier`.
    /// Returns `None` if `earlier` is after `self`.
    #[inline]
    pub fn since(self, earlier: Cycle) -> Option<u64> {
        self.0.checked_sub(earlier.0)
    }
}

impl std::fmt::Display for Cycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T={}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(Cycle::ZERO.count(), 0);
        assert_eq!(Cycle::default(), Cycle::ZERO);
    }

    #[test]
    fn test_next() {
        assert_eq!(Cycle::new(4).next(), Cycle::new(5));
        assert_eq!(Cycle::new(u64::MAX).next(), Cycle::new(u64::MAX));
    }

    #[test]
    fn test_since() {
        let start = Cycle::new(3);
        let end = Cycle::new(8);
        assert_eq!(end.since(start), Some(5));
        assert_eq!(start.since(end), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Cycle::new(42)), "T=42");
    }
}
