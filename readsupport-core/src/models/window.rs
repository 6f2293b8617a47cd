use std::fmt::{self, Display};

///
/// Genomic interval [start, end), 0-based.
/// Inclusive start, exclusive of end
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Window {
    pub start: u64,
    pub end: u64,
}

impl Window {
    pub fn new(start: u64, end: u64) -> Self {
        Window { start, end }
    }

    ///
    /// Number of genomic positions in the window
    ///
    pub fn width(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0
    }

    pub fn contains(&self, position: u64) -> bool {
        self.start <= position && position < self.end
    }

    /// Check if the window shares any position with [start, end)
    #[inline]
    pub fn overlaps(&self, start: u64, end: u64) -> bool {
        self.start < end && self.end > start
    }

    /// Last position inside the window, if any.
    pub fn last(&self) -> Option<u64> {
        if self.is_empty() {
            None
        } else {
            Some(self.end - 1)
        }
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
