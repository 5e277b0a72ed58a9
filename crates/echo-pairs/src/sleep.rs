// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Read-only view of body sleeping state consumed by eviction.

use std::collections::HashSet;
use std::hash::BuildHasher;

use crate::ident::BodyId;

/// Answers whether a body is currently asleep.
///
/// The registry queries this only for pairs whose contact ended this step: a
/// pair with a sleeping participant is kept so that no new detection is needed
/// to resurrect it once the body wakes.
pub trait SleepStates {
    /// Returns `true` if `body` is asleep.
    fn is_sleeping(&self, body: BodyId) -> bool;
}

impl<F> SleepStates for F
where
    F: Fn(BodyId) -> bool,
{
    fn is_sleeping(&self, body: BodyId) -> bool {
        self(body)
    }
}

/// A set of sleeping bodies; every body not in the set is awake.
impl<S: BuildHasher> SleepStates for HashSet<BodyId, S> {
    fn is_sleeping(&self, body: BodyId) -> bool {
        self.contains(&body)
    }
}
