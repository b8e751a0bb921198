//! Simulation kernel: the contract the bridge drives, plus a reference world.
//!
//! # Invariants
//! - The simulation owns entity identity, transforms and physics classification.
//! - `snapshot` is a read-only copy; consumers never write back into the world.
//! - `advance` is deterministic given the same input sequence.

pub mod world;

pub use world::{EntityData, World};

use roadster_common::EntitySnapshot;
use roadster_input::InputState;
use roadster_terrain::HeightmapGrid;

/// The simulation collaborator as seen by the frame driver.
pub trait Simulation {
    /// Advance one tick using the input table as of the start of the frame.
    fn advance(&mut self, input: &InputState);

    /// Report every entity, in a stable order.
    fn snapshot(&self) -> Vec<EntitySnapshot>;

    /// Create the collider side of a map. Fire-and-forget.
    fn load_terrain(&mut self, heightmap: &HeightmapGrid);
}
