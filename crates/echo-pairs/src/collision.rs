// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Raw per-step collision records produced by the narrow phase.

use crate::error::PairsError;
use crate::ident::{BodyId, PairId};

/// A single contact point reported by the narrow phase.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactPoint {
    /// World-space contact position (meters).
    pub position: [f32; 3],
    /// Penetration depth at this point (meters, positive when overlapping).
    pub depth: f32,
}

impl ContactPoint {
    /// Creates a contact point at `position` with penetration `depth`.
    #[must_use]
    pub const fn new(position: [f32; 3], depth: f32) -> Self {
        Self { position, depth }
    }
}

/// Geometric contact between two bodies detected during one step.
///
/// Fields are public so narrow-phase code can fill records in place. Records
/// built through [`Collision::new`] are guaranteed to name two distinct
/// bodies; the registry re-checks this before applying a step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collision {
    /// First participant as seen by the narrow phase.
    pub body_a: BodyId,
    /// Second participant as seen by the narrow phase.
    pub body_b: BodyId,
    /// Contact normal pointing from `body_a` towards `body_b`.
    pub normal: [f32; 3],
    /// Deepest penetration across all contact points.
    pub depth: f32,
    /// Contact manifold points.
    pub contacts: Vec<ContactPoint>,
    /// Sensor contacts report events but are never solved.
    pub is_sensor: bool,
}

impl Collision {
    /// Creates an empty record for bodies `a` and `b`.
    ///
    /// # Errors
    /// Returns [`PairsError::SelfPair`] when `a == b`.
    pub fn new(a: BodyId, b: BodyId) -> Result<Self, PairsError> {
        if a == b {
            return Err(PairsError::SelfPair(a));
        }
        Ok(Self {
            body_a: a,
            body_b: b,
            normal: [0.0, 0.0, 0.0],
            depth: 0.0,
            contacts: Vec::new(),
            is_sensor: false,
        })
    }

    /// Sets the contact normal.
    pub fn with_normal(mut self, normal: [f32; 3]) -> Self {
        self.normal = normal;
        self
    }

    /// Sets the penetration depth.
    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    /// Appends a contact point and widens `depth` to cover it.
    pub fn with_contact(mut self, contact: ContactPoint) -> Self {
        self.depth = self.depth.max(contact.depth);
        self.contacts.push(contact);
        self
    }

    /// Marks the record as a sensor contact.
    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    /// Canonical pair id for the two bodies.
    #[must_use]
    pub const fn pair_id(&self) -> PairId {
        PairId::new(self.body_a, self.body_b)
    }

    /// Returns the participant that is not `body`, if `body` takes part.
    #[must_use]
    pub fn other(&self, body: BodyId) -> Option<BodyId> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_self_pair() {
        assert_eq!(
            Collision::new(BodyId(3), BodyId(3)),
            Err(PairsError::SelfPair(BodyId(3)))
        );
    }

    #[test]
    fn reversed_roles_share_pair_id() {
        let ab = Collision::new(BodyId(1), BodyId(2)).expect("distinct bodies");
        let ba = Collision::new(BodyId(2), BodyId(1)).expect("distinct bodies");
        assert_eq!(ab.pair_id(), ba.pair_id());
    }

    #[test]
    fn with_contact_tracks_deepest_point() {
        let c = Collision::new(BodyId(1), BodyId(2))
            .expect("distinct bodies")
            .with_contact(ContactPoint::new([0.0, 0.0, 0.0], 0.02))
            .with_contact(ContactPoint::new([1.0, 0.0, 0.0], 0.05))
            .with_contact(ContactPoint::new([0.5, 0.0, 0.0], 0.01));
        assert_eq!(c.contacts.len(), 3);
        assert!((c.depth - 0.05).abs() < f32::EPSILON);
    }

    #[test]
    fn other_returns_counterpart() {
        let c = Collision::new(BodyId(1), BodyId(2)).expect("distinct bodies");
        assert_eq!(c.other(BodyId(1)), Some(BodyId(2)));
        assert_eq!(c.other(BodyId(2)), Some(BodyId(1)));
        assert_eq!(c.other(BodyId(3)), None);
    }
}
