// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Contact pair lifecycle for Echo.

Each simulation step the narrow phase reports which bodies touch. This crate
turns those per-step snapshots into a temporally coherent pair lifecycle:

- [`PairRegistry`] reconciles the step's [`Collision`] records with every pair
  it already tracks and rebuilds three outputs: `started`, `active`, `ended`.
- [`Pair`] is the persistent relationship between two bodies, keyed by an
  order-independent [`PairId`] and named by a generational [`PairHandle`].
- [`SleepStates`] lets the caller say which bodies sleep; a pair whose contact
  ends while either body sleeps is retained instead of evicted.

Design notes:
- Single pass, linear in tracked pairs plus records; buffers are reused so a
  steady-state step does not allocate.
- Output order is deterministic: records in input order, ended pairs in
  tracking order.
- The crate decides which relationships exist, not how contacts resolve.

```
use echo_pairs::{BodyId, Collision, PairRegistry};

let awake = |_: BodyId| false;
let mut pairs = PairRegistry::new();
let hit = Collision::new(BodyId(1), BodyId(2))?;

pairs.update(std::slice::from_ref(&hit), 0.0, &awake)?;
assert_eq!(pairs.started().len(), 1);

pairs.update(&[hit], 1.0, &awake)?;
assert_eq!(pairs.active().len(), 1);

pairs.update(&[], 2.0, &awake)?;
assert_eq!(pairs.ended().len(), 1);
assert!(pairs.is_empty());
# Ok::<(), echo_pairs::PairsError>(())
```
"]
#![forbid(unsafe_code)]

pub mod collision;
mod config;
mod error;
pub mod ident;
mod pair;
mod registry;
mod sleep;

pub use collision::{Collision, ContactPoint};
pub use config::PairsConfig;
pub use error::PairsError;
pub use ident::{BodyId, PairHandle, PairId};
pub use pair::Pair;
pub use registry::PairRegistry;
pub use sleep::SleepStates;
