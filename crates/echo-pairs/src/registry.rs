// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pair registry: reconciles each step's collision records with the tracked
//! pair set and classifies pairs as started, active, or ended.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, instrument, warn};

use crate::collision::Collision;
use crate::config::PairsConfig;
use crate::error::PairsError;
use crate::ident::{BodyId, PairHandle, PairId};
use crate::pair::Pair;
use crate::sleep::SleepStates;

/// Arena slot holding one pair entity.
///
/// `confirmed` is step scratch owned by the registry: reset for every tracked
/// pair at the start of `update` and set when a record matches the pair.
#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    pair: Option<Pair>,
    confirmed: bool,
}

/// Tracks contact pairs across simulation steps.
///
/// Per step, [`PairRegistry::update`] consumes the narrow phase's collision
/// records and rebuilds three outputs:
/// - [`started`](PairRegistry::started): pairs whose contact began this step,
///   including pairs resuming after a gap;
/// - [`active`](PairRegistry::active): pairs whose contact continued;
/// - [`ended`](PairRegistry::ended): tracked pairs that received no record.
///
/// Every tracked pair lands in exactly one of the three. An ended pair is
/// evicted unless one of its bodies sleeps; evicted pairs remain resolvable
/// through their handle until the next mutating call.
///
/// All buffers are reused between steps, so a registry whose pair count is
/// stable performs no allocation in `update`.
#[derive(Debug, Clone)]
pub struct PairRegistry {
    config: PairsConfig,
    table: FxHashMap<PairId, PairHandle>,
    list: Vec<PairHandle>,
    started: Vec<PairHandle>,
    active: Vec<PairHandle>,
    ended: Vec<PairHandle>,
    slots: Vec<Slot>,
    free: Vec<u32>,
    retired: Vec<PairHandle>,
    seen: FxHashSet<PairId>,
}

impl Default for PairRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PairRegistry {
    /// Creates an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(PairsConfig::default())
    }

    /// Creates an empty registry, pre-reserving storage per `config`.
    pub fn with_config(config: PairsConfig) -> Self {
        let cap = config.initial_capacity;
        let mut table = FxHashMap::default();
        table.reserve(cap);
        let mut seen = FxHashSet::default();
        if config.reject_duplicates {
            seen.reserve(cap);
        }
        Self {
            config,
            table,
            list: Vec::with_capacity(cap),
            started: Vec::with_capacity(cap),
            active: Vec::with_capacity(cap),
            ended: Vec::with_capacity(cap),
            slots: Vec::with_capacity(cap),
            free: Vec::new(),
            retired: Vec::new(),
            seen,
        }
    }

    /// Configuration the registry was built with.
    pub fn config(&self) -> &PairsConfig {
        &self.config
    }

    /// Applies one simulation step.
    ///
    /// `collisions` is this step's unordered narrow-phase output; `timestamp`
    /// is the step's simulation time; `sleeping` is consulted for pairs whose
    /// contact ended, to decide between eviction and retention.
    ///
    /// Outputs of the previous step are replaced. Handles evicted by the
    /// previous call stop resolving.
    ///
    /// # Errors
    /// Returns [`PairsError::SelfPair`] if a record names the same body twice,
    /// or [`PairsError::DuplicateCollision`] if two records name the same pair
    /// while [`PairsConfig::reject_duplicates`] is set. Both are detected before
    /// any state changes. [`PairsError::Corrupted`] reports a broken internal
    /// invariant.
    #[instrument(
        level = "trace",
        skip(self, collisions, sleeping),
        fields(records = collisions.len())
    )]
    pub fn update<S>(
        &mut self,
        collisions: &[Collision],
        timestamp: f64,
        sleeping: &S,
    ) -> Result<(), PairsError>
    where
        S: SleepStates + ?Sized,
    {
        self.validate(collisions)?;
        self.release_retired();

        for handle in &self.list {
            if let Some(slot) = self.slots.get_mut(handle.index as usize) {
                slot.confirmed = false;
            }
        }
        self.started.clear();
        self.active.clear();
        self.ended.clear();

        for collision in collisions {
            let id = collision.pair_id();
            if let Some(&handle) = self.table.get(&id) {
                let slot = self
                    .slots
                    .get_mut(handle.index as usize)
                    .filter(|s| s.generation == handle.generation)
                    .ok_or(PairsError::Corrupted("table maps to a stale handle"))?;
                let pair = slot
                    .pair
                    .as_mut()
                    .ok_or(PairsError::Corrupted("table maps to an empty slot"))?;
                // A repeated record for a pair already confirmed this step only
                // refreshes the payload; the pair keeps its first classification.
                // A pair resuming after a gap starts again even though the
                // entity is reused.
                if !slot.confirmed {
                    if pair.is_active() {
                        self.active.push(handle);
                    } else {
                        self.started.push(handle);
                    }
                }
                pair.update(collision, timestamp);
                slot.confirmed = true;
            } else {
                let handle = self.insert(Pair::new(collision, timestamp))?;
                self.table.insert(id, handle);
                self.list.push(handle);
                self.started.push(handle);
            }
        }

        let slots = &mut self.slots;
        let table = &mut self.table;
        let ended = &mut self.ended;
        let retired = &mut self.retired;
        self.list.retain(|&handle| {
            let Some(slot) = slots.get_mut(handle.index as usize) else {
                return false;
            };
            if slot.confirmed {
                return true;
            }
            let Some(pair) = slot.pair.as_mut() else {
                return false;
            };
            pair.set_active(false, timestamp);
            ended.push(handle);
            if sleeping.is_sleeping(pair.body_a()) || sleeping.is_sleeping(pair.body_b()) {
                return true;
            }
            table.remove(&pair.id());
            retired.push(handle);
            false
        });

        debug!(
            started = self.started.len(),
            active = self.active.len(),
            ended = self.ended.len(),
            evicted = self.retired.len(),
            tracked = self.list.len(),
            "pairs updated"
        );
        debug_assert_eq!(self.check_invariants(), Ok(()));
        Ok(())
    }

    /// Forgets every tracked pair while keeping allocated storage.
    ///
    /// All handles issued so far stop resolving. Pairs that callers cloned out
    /// of the registry are unaffected.
    pub fn clear(&mut self) {
        let tracked = self.list.len();
        self.table.clear();
        self.list.clear();
        self.started.clear();
        self.active.clear();
        self.ended.clear();
        self.retired.clear();
        self.free.clear();
        for (index, slot) in (0u32..).zip(self.slots.iter_mut()) {
            if slot.pair.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            slot.confirmed = false;
            self.free.push(index);
        }
        // Pop lowest indices first so refills are laid out like a fresh registry.
        self.free.reverse();
        debug!(tracked, "pairs cleared");
    }

    /// Evicts every tracked pair involving `body` without reporting events.
    ///
    /// Intended for body removal: a destroyed body must not leave pairs behind.
    /// Evicted pairs stay resolvable until the next mutating call. Returns the
    /// number of pairs removed.
    pub fn remove_body(&mut self, body: BodyId) -> usize {
        let before = self.list.len();
        let slots = &self.slots;
        let table = &mut self.table;
        let retired = &mut self.retired;
        self.list.retain(|&handle| {
            let id = slots
                .get(handle.index as usize)
                .and_then(|slot| slot.pair.as_ref())
                .map(Pair::id);
            match id {
                Some(id) if id.involves(body) => {
                    table.remove(&id);
                    retired.push(handle);
                    false
                }
                _ => true,
            }
        });
        let removed = before - self.list.len();
        debug!(%body, removed, "body removed from pairs");
        removed
    }

    /// Verifies that the table and list describe the same live pair set.
    ///
    /// # Errors
    /// Returns [`PairsError::Corrupted`] naming the first broken invariant.
    pub fn check_invariants(&self) -> Result<(), PairsError> {
        if self.table.len() != self.list.len() {
            return Err(PairsError::Corrupted("table and list sizes differ"));
        }
        let distinct: FxHashSet<PairHandle> = self.list.iter().copied().collect();
        if distinct.len() != self.list.len() {
            return Err(PairsError::Corrupted("list holds a handle twice"));
        }
        for &handle in &self.list {
            let pair = self
                .get(handle)
                .ok_or(PairsError::Corrupted("list holds a stale handle"))?;
            if self.table.get(&pair.id()) != Some(&handle) {
                return Err(PairsError::Corrupted("list entry missing from table"));
            }
        }
        Ok(())
    }

    /// Resolves a handle to its pair.
    ///
    /// Returns `None` once the pair's slot has been released.
    pub fn get(&self, handle: PairHandle) -> Option<&Pair> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.pair.as_ref())
    }

    /// Handle of the tracked pair with `id`.
    pub fn handle_of(&self, id: PairId) -> Option<PairHandle> {
        self.table.get(&id).copied()
    }

    /// Tracked pair with `id`.
    pub fn get_by_id(&self, id: PairId) -> Option<(PairHandle, &Pair)> {
        let handle = self.handle_of(id)?;
        self.get(handle).map(|pair| (handle, pair))
    }

    /// Tracked pair between `a` and `b`, in either role order.
    pub fn get_by_bodies(&self, a: BodyId, b: BodyId) -> Option<(PairHandle, &Pair)> {
        self.get_by_id(PairId::new(a, b))
    }

    /// `true` if a pair between `a` and `b` is tracked.
    pub fn contains(&self, a: BodyId, b: BodyId) -> bool {
        self.table.contains_key(&PairId::new(a, b))
    }

    /// Number of tracked pairs.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// `true` if no pairs are tracked.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Every tracked pair, in tracking order.
    pub fn list(&self) -> &[PairHandle] {
        &self.list
    }

    /// Pairs whose contact started during the last update.
    pub fn started(&self) -> &[PairHandle] {
        &self.started
    }

    /// Pairs whose contact continued during the last update.
    pub fn active(&self) -> &[PairHandle] {
        &self.active
    }

    /// Pairs whose contact ended (or stayed ended while retained) during the
    /// last update.
    pub fn ended(&self) -> &[PairHandle] {
        &self.ended
    }

    /// Iterates tracked pairs with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (PairHandle, &Pair)> + '_ {
        self.resolve(&self.list)
    }

    /// Resolves [`PairRegistry::started`].
    pub fn started_pairs(&self) -> impl Iterator<Item = &Pair> + '_ {
        self.resolve(&self.started).map(|(_, pair)| pair)
    }

    /// Resolves [`PairRegistry::active`].
    pub fn active_pairs(&self) -> impl Iterator<Item = &Pair> + '_ {
        self.resolve(&self.active).map(|(_, pair)| pair)
    }

    /// Resolves [`PairRegistry::ended`].
    pub fn ended_pairs(&self) -> impl Iterator<Item = &Pair> + '_ {
        self.resolve(&self.ended).map(|(_, pair)| pair)
    }

    /// Tracked pairs involving `body`.
    pub fn pairs_with(&self, body: BodyId) -> impl Iterator<Item = (PairHandle, &Pair)> + '_ {
        self.iter().filter(move |(_, pair)| pair.id().involves(body))
    }

    fn resolve<'a>(
        &'a self,
        handles: &'a [PairHandle],
    ) -> impl Iterator<Item = (PairHandle, &'a Pair)> + 'a {
        handles
            .iter()
            .filter_map(move |&handle| self.get(handle).map(|pair| (handle, pair)))
    }

    fn validate(&mut self, collisions: &[Collision]) -> Result<(), PairsError> {
        for collision in collisions {
            if collision.body_a == collision.body_b {
                warn!(body = %collision.body_a, "rejecting self-pair collision record");
                return Err(PairsError::SelfPair(collision.body_a));
            }
        }
        if !self.config.reject_duplicates {
            return Ok(());
        }
        self.seen.clear();
        for collision in collisions {
            let id = collision.pair_id();
            if !self.seen.insert(id) {
                warn!(pair = %id, "rejecting duplicate collision record");
                return Err(PairsError::DuplicateCollision(id));
            }
        }
        Ok(())
    }

    fn insert(&mut self, pair: Pair) -> Result<PairHandle, PairsError> {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index as usize) {
                slot.pair = Some(pair);
                slot.confirmed = true;
                return Ok(PairHandle {
                    index,
                    generation: slot.generation,
                });
            }
        }
        let index = slot_index(self.slots.len())?;
        self.slots.push(Slot {
            generation: 0,
            pair: Some(pair),
            confirmed: true,
        });
        Ok(PairHandle {
            index,
            generation: 0,
        })
    }

    fn release_retired(&mut self) {
        for handle in self.retired.drain(..) {
            if let Some(slot) = self.slots.get_mut(handle.index as usize) {
                if slot.generation == handle.generation && slot.pair.take().is_some() {
                    slot.generation = slot.generation.wrapping_add(1);
                    slot.confirmed = false;
                    self.free.push(handle.index);
                }
            }
        }
    }
}

/// Index for a new slot appended after `len` existing ones.
fn slot_index(len: usize) -> Result<u32, PairsError> {
    u32::try_from(len).map_err(|_| PairsError::Corrupted("pair slot index exceeds u32"))
}
