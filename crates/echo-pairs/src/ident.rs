// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Body, pair, and handle identifiers.

use core::fmt;

/// Opaque identifier for a simulated rigid body.
///
/// Bodies are owned by the world, not by this crate. Pairs only ever store a
/// `BodyId`, never the body itself.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyId(pub u32);

impl BodyId {
    /// Returns the raw id value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Order-independent identifier for the relationship between two bodies.
///
/// Layout: upper 32 bits hold the smaller body id, lower 32 bits the larger
/// one. `PairId::new(a, b) == PairId::new(b, a)` for every `a`, `b`, and two
/// distinct unordered body pairs never share an id.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairId(pub u64);

impl PairId {
    /// Computes the canonical id for bodies `a` and `b` (in either order).
    #[must_use]
    pub const fn new(a: BodyId, b: BodyId) -> Self {
        let (lo, hi) = if a.0 <= b.0 { (a.0, b.0) } else { (b.0, a.0) };
        Self(((lo as u64) << 32) | hi as u64)
    }

    /// Returns the two bodies as `(min, max)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn bodies(self) -> (BodyId, BodyId) {
        (BodyId((self.0 >> 32) as u32), BodyId(self.0 as u32))
    }

    /// Returns `true` if `body` is one of the two participants.
    #[must_use]
    pub const fn involves(self, body: BodyId) -> bool {
        let (a, b) = self.bodies();
        a.0 == body.0 || b.0 == body.0
    }
}

impl fmt::Display for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.bodies();
        write!(f, "pair({}, {})", a.0, b.0)
    }
}

/// Handle naming one pair entity instance inside a [`crate::PairRegistry`].
///
/// The `generation` distinguishes successive entities that reuse the same
/// storage slot: once a pair is evicted and its slot released, every handle to
/// it stops resolving, and a pair created later for the same bodies gets a
/// different handle.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl PairHandle {
    /// Slot index within the registry arena.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at the time the pair was created.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}
