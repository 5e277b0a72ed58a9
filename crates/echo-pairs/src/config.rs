// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Registry construction options.

/// Options for [`crate::PairRegistry::with_config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PairsConfig {
    /// Number of pairs to reserve storage for up front.
    pub initial_capacity: usize,
    /// Reject updates that carry two records for the same pair.
    ///
    /// Turning this off skips one hash lookup per record; a duplicate then
    /// refreshes the pair's payload without classifying it a second time.
    pub reject_duplicates: bool,
}

impl Default for PairsConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            reject_duplicates: true,
        }
    }
}

impl PairsConfig {
    /// Sets [`PairsConfig::initial_capacity`].
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets [`PairsConfig::reject_duplicates`].
    pub fn reject_duplicates(mut self, reject: bool) -> Self {
        self.reject_duplicates = reject;
        self
    }
}
