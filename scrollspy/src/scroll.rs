use std::fmt;

/// Vertical scroll distance from the top of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScrollOffset(u32);

impl ScrollOffset {
    pub const ZERO: Self = Self(0);

    pub const fn new(y: u32) -> Self {
        Self(y)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Move by a signed delta, saturating at zero and `max`.
    pub fn offset_by(self, delta: i64, max: u32) -> Self {
        let y = (self.0 as i64).saturating_add(delta).clamp(0, max as i64);
        Self(y as u32)
    }
}

impl From<u32> for ScrollOffset {
    fn from(y: u32) -> Self {
        Self(y)
    }
}

impl From<ScrollOffset> for u32 {
    fn from(offset: ScrollOffset) -> Self {
        offset.0
    }
}

impl fmt::Display for ScrollOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_by_clamps_both_ends() {
        let offset = ScrollOffset::new(10);
        assert_eq!(offset.offset_by(-25, 100), ScrollOffset::ZERO);
        assert_eq!(offset.offset_by(500, 100), ScrollOffset::new(100));
        assert_eq!(offset.offset_by(5, 100), ScrollOffset::new(15));
    }

    #[test]
    fn test_offset_by_extreme_deltas() {
        let offset = ScrollOffset::new(10);
        assert_eq!(offset.offset_by(i64::MAX, 100), ScrollOffset::new(100));
        assert_eq!(offset.offset_by(i64::MIN, 100), ScrollOffset::ZERO);
    }
}
