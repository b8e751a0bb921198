//! Shared types for the roadster bridge: entity identity, transforms and the
//! per-tick entity snapshot reported by the simulation.
//!
//! # Invariants
//! - `(id, kind)` is the identity of a renderable across ticks; `id` alone is not.
//! - Snapshots are immutable input for the tick that produced them.

mod types;

pub use types::{
    EntityId, EntityKey, EntityKind, EntitySnapshot, PhysicsKind, SnapshotError, Transform,
    ValidEntry,
};
