// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for pair registry operations.
use thiserror::Error;

use crate::ident::{BodyId, PairId};

/// Errors emitted by [`crate::Collision::new`] and [`crate::PairRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PairsError {
    /// A collision record names the same body on both sides.
    #[error("collision record pairs {0} with itself")]
    SelfPair(BodyId),
    /// The same unordered body pair appeared twice in one update.
    #[error("duplicate collision record for {0}")]
    DuplicateCollision(PairId),
    /// Internal invariant violated (registry state corruption).
    #[error("internal invariant violated: {0}")]
    Corrupted(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_ids() {
        let e = PairsError::DuplicateCollision(PairId::new(BodyId(2), BodyId(1)));
        assert_eq!(e.to_string(), "duplicate collision record for pair(1, 2)");
        let e = PairsError::SelfPair(BodyId(5));
        assert!(e.to_string().contains("body#5"));
    }
}
