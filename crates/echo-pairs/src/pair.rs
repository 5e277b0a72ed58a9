// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pair entity: the persistent relationship between two bodies.

use crate::collision::Collision;
use crate::ident::{BodyId, PairId};

/// Tracked contact relationship between two bodies.
///
/// A `Pair` outlives individual collision records: the registry creates it on
/// first detection, refreshes it with every later record for the same bodies,
/// and flips it inactive when a step passes without one.
///
/// Timestamps are simulation time as passed to [`crate::PairRegistry::update`];
/// the pair never reads a clock of its own.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pair {
    id: PairId,
    body_a: BodyId,
    body_b: BodyId,
    collision: Collision,
    is_active: bool,
    is_sensor: bool,
    time_created: f64,
    time_updated: f64,
    time_ended: Option<f64>,
}

impl Pair {
    /// Creates an active pair from its first collision record.
    ///
    /// Participant roles follow the record: `body_a` here is `collision.body_a`.
    #[must_use]
    pub fn new(collision: &Collision, timestamp: f64) -> Self {
        Self {
            id: collision.pair_id(),
            body_a: collision.body_a,
            body_b: collision.body_b,
            collision: collision.clone(),
            is_active: true,
            is_sensor: collision.is_sensor,
            time_created: timestamp,
            time_updated: timestamp,
            time_ended: None,
        }
    }

    /// Refreshes the contact payload from this step's record and marks the
    /// pair active.
    ///
    /// Contact storage is reused across steps, so a pair whose manifold size is
    /// stable does not allocate here.
    pub fn update(&mut self, collision: &Collision, timestamp: f64) {
        debug_assert_eq!(collision.pair_id(), self.id, "record belongs to another pair");
        self.collision.body_a = collision.body_a;
        self.collision.body_b = collision.body_b;
        self.collision.normal = collision.normal;
        self.collision.depth = collision.depth;
        self.collision.is_sensor = collision.is_sensor;
        self.collision.contacts.clone_from(&collision.contacts);
        self.is_sensor = collision.is_sensor;
        self.set_active(true, timestamp);
    }

    /// Sets the activity flag, recording `timestamp`.
    ///
    /// Deactivating an active pair stores `timestamp` as the contact end time;
    /// deactivating an already inactive pair keeps the original end time.
    pub fn set_active(&mut self, active: bool, timestamp: f64) {
        if active {
            self.time_ended = None;
            self.time_updated = timestamp;
        } else if self.is_active {
            self.time_ended = Some(timestamp);
        }
        self.is_active = active;
    }

    /// Canonical id of the two participants.
    #[must_use]
    pub const fn id(&self) -> PairId {
        self.id
    }

    /// First participant (role order of the creating record).
    #[must_use]
    pub const fn body_a(&self) -> BodyId {
        self.body_a
    }

    /// Second participant (role order of the creating record).
    #[must_use]
    pub const fn body_b(&self) -> BodyId {
        self.body_b
    }

    /// Latest collision payload.
    #[must_use]
    pub const fn collision(&self) -> &Collision {
        &self.collision
    }

    /// `true` if the contact was active as of the last update.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// `true` if the latest record was a sensor contact.
    #[must_use]
    pub const fn is_sensor(&self) -> bool {
        self.is_sensor
    }

    /// Timestamp of the step that created the pair.
    #[must_use]
    pub const fn time_created(&self) -> f64 {
        self.time_created
    }

    /// Timestamp of the last step that confirmed the contact.
    #[must_use]
    pub const fn time_updated(&self) -> f64 {
        self.time_updated
    }

    /// Timestamp of the step at which the contact last ended, if inactive.
    #[must_use]
    pub const fn time_ended(&self) -> Option<f64> {
        self.time_ended
    }

    /// Latest penetration depth.
    #[must_use]
    pub const fn separation(&self) -> f32 {
        self.collision.depth
    }

    /// Number of points in the latest contact manifold.
    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.collision.contacts.len()
    }
}
