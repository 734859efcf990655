//! Seat identification and per-seat data storage.
//!
//! ## Seat
//!
//! A match always has exactly two seats. Seats are not necessarily human;
//! in the simulator both are automated agents.
//!
//! ## SeatMap
//!
//! Fixed two-slot storage indexed by `Seat` for O(1) access without
//! heap allocation.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two match participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Seat {
    /// The first seat (seat 1).
    First,
    /// The second seat (seat 2).
    Second,
}

impl Seat {
    /// Both seats in order.
    pub const ALL: [Seat; 2] = [Seat::First, Seat::Second];

    /// Get the 0-based seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    /// Get the opposing seat.
    #[must_use]
    pub const fn other(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    /// Iterate over both seats.
    ///
    /// ```
    /// use ccg_balance::core::Seat;
    ///
    /// let seats: Vec<_> = Seat::all().collect();
    /// assert_eq!(seats, vec![Seat::First, Seat::Second]);
    /// ```
    pub fn all() -> impl Iterator<Item = Seat> {
        Self::ALL.into_iter()
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.index() + 1)
    }
}

/// Per-seat data storage.
///
/// ## Example
///
/// ```
/// use ccg_balance::core::{Seat, SeatMap};
///
/// let mut wins: SeatMap<u32> = SeatMap::with_value(0);
/// wins[Seat::Second] += 1;
///
/// assert_eq!(wins[Seat::First], 0);
/// assert_eq!(wins[Seat::Second], 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: [T; 2],
}

impl<T> SeatMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(mut factory: impl FnMut(Seat) -> T) -> Self {
        Self {
            data: [factory(Seat::First), factory(Seat::Second)],
        }
    }

    /// Create a map from explicit per-seat values.
    pub fn from_pair(first: T, second: T) -> Self {
        Self {
            data: [first, second],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Iterate over (Seat, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        Seat::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Seat, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Seat, &mut T)> {
        Seat::ALL.into_iter().zip(self.data.iter_mut())
    }

    /// Transform each entry.
    pub fn map<U>(self, mut f: impl FnMut(Seat, T) -> U) -> SeatMap<U> {
        let [first, second] = self.data;
        SeatMap::from_pair(f(Seat::First, first), f(Seat::Second, second))
    }

    /// Mutable references to both entries at once.
    pub fn both_mut(&mut self) -> (&mut T, &mut T) {
        let [first, second] = &mut self.data;
        (first, second)
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        &self.data[seat.index()]
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        &mut self.data[seat.index()]
    }
}
