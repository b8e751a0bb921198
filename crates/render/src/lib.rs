//! Rendering collaborator: a keyed scene graph, its camera, and renderers.
//!
//! # Invariants
//! - At most one node per [`SceneKey`].
//! - A node's geometry and material are fixed at creation; only its transform moves.
//! - Renderers read the scene; they never mutate it.

mod camera;
mod geometry;
mod renderer;
mod scene;

pub use camera::Camera;
pub use geometry::{Geometry, Material, RenderablePrototype, Texture};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{Scene, SceneError, SceneEvent, SceneGraph, SceneKey, SceneNode};
