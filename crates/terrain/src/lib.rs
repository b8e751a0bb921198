//! Terrain: heightmap grids and the meshes generated from them.
//!
//! # Invariants
//! - A heightmap is square, at least 2x2, and every elevation is finite.
//! - `build` is a pure function: identical inputs give byte-identical buffers.
//! - Meshes are rebuilt wholesale on every map load, never patched.

mod heightmap;
mod mesh;

pub use heightmap::HeightmapGrid;
pub use mesh::{TerrainMesh, TerrainParams, TerrainSurface, build};

/// Errors raised while loading terrain data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TerrainError {
    #[error("malformed heightmap: {0}")]
    MalformedHeightmap(String),
}
