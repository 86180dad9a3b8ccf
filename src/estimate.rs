//! Advisory size estimates.
//!
//! Estimates are hints for planning (buffer sizing, progress reporting). They
//! are never exact and must not be relied on for correctness.

/// Best-effort count of the elements a producer has left.
///
/// ```rust
/// use headtail::Estimate;
///
/// assert_eq!(Estimate::Finite(5).decrement(), Estimate::Finite(4));
/// assert_eq!(Estimate::Unknown.decrement(), Estimate::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Estimate {
    /// Roughly this many elements remain.
    Finite(usize),
    /// The producer cannot tell.
    Unknown,
    /// The producer never ends.
    Infinite,
}

impl Estimate {
    /// Estimate for a producer that has nothing left.
    pub const EMPTY: Estimate = Estimate::Finite(0);

    /// Returns `true` for `Finite(_)`.
    #[inline]
    pub const fn is_finite(&self) -> bool {
        matches!(self, Estimate::Finite(_))
    }

    /// Returns the finite count, if any.
    #[inline]
    pub const fn finite(self) -> Option<usize> {
        match self {
            Estimate::Finite(n) => Some(n),
            _ => None,
        }
    }

    /// One element fewer. Zero and the sentinels pass through unchanged.
    #[inline]
    pub const fn decrement(self) -> Estimate {
        match self {
            Estimate::Finite(n) if n > 0 => Estimate::Finite(n - 1),
            other => other,
        }
    }

    /// Estimate for two producers run back to back.
    ///
    /// `Unknown` wins over `Infinite`, which wins over any finite count.
    pub const fn saturating_add(self, other: Estimate) -> Estimate {
        match (self, other) {
            (Estimate::Unknown, _) | (_, Estimate::Unknown) => Estimate::Unknown,
            (Estimate::Infinite, _) | (_, Estimate::Infinite) => Estimate::Infinite,
            (Estimate::Finite(a), Estimate::Finite(b)) => Estimate::Finite(a.saturating_add(b)),
        }
    }

    /// Derives an estimate from an iterator's `size_hint`.
    pub fn from_size_hint(hint: (usize, Option<usize>)) -> Estimate {
        match hint {
            (_, Some(upper)) => Estimate::Finite(upper),
            (usize::MAX, None) => Estimate::Infinite,
            (_, None) => Estimate::Unknown,
        }
    }
}
