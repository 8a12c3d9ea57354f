//! Thread identifiers and logical creation stamps.
//!
//! Both types are thin `u64` newtypes. A [`ThreadId`] names a thread for its
//! whole lifetime; a [`Stamp`] orders threads by creation and is handed out by
//! a [`StampClock`], a monotonic logical counter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a single thread in a forest.
///
/// # Examples
///
/// ```
/// use threadmap_core::identifier::ThreadId;
///
/// let id = ThreadId::new(7);
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.to_string(), "t7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(u64);

impl ThreadId {
    /// Creates an identifier from its raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl From<u64> for ThreadId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Logical creation time of a thread.
///
/// Stamps are strictly ordered; two threads created by the same clock never
/// share a stamp.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Stamp(u64);

impl Stamp {
    /// Creates a stamp from its raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Monotonic source of [`Stamp`]s.
///
/// # Examples
///
/// ```
/// use threadmap_core::identifier::StampClock;
///
/// let mut clock = StampClock::default();
/// let first = clock.tick();
/// let second = clock.tick();
/// assert!(first < second);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StampClock {
    next: u64,
}

impl StampClock {
    /// Returns the next stamp and advances the clock.
    pub fn tick(&mut self) -> Stamp {
        let stamp = Stamp(self.next);
        self.next += 1;
        stamp
    }

    /// Moves the clock forward so that the next stamp is after `seen`.
    ///
    /// Never moves the clock backwards.
    pub fn observe(&mut self, seen: Stamp) {
        self.next = self.next.max(seen.0.saturating_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_id_display() {
        assert_eq!(ThreadId::new(0).to_string(), "t0");
        assert_eq!(ThreadId::from(42).to_string(), "t42");
    }

    #[test]
    fn test_clock_is_strictly_increasing() {
        let mut clock = StampClock::default();
        let stamps: Vec<_> = (0..5).map(|_| clock.tick()).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_observe_never_rewinds() {
        let mut clock = StampClock::default();
        clock.observe(Stamp::new(5));
        assert_eq!(clock.tick(), Stamp::new(6));

        clock.observe(Stamp::new(2));
        assert_eq!(clock.tick(), Stamp::new(7));
    }
}
