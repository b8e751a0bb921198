//! Bridge: keeps a retained scene graph in step with the simulation, one frame at a time.
//!
//! # Invariants
//! - Each frame runs advance, snapshot, reconcile, render in that order, with no overlap.
//! - The simulation sees the input table as it was when the frame began.
//! - Reconciliation validates the whole snapshot before it mutates the scene.
//! - Terrain is replaced wholesale at a reserved key, never patched.

mod camera;
mod config;
mod driver;
mod reconciler;
mod terrain;

pub use camera::CameraFollower;
pub use config::{BridgeConfig, ConfigError, StaleNodePolicy, UnknownKindPolicy};
pub use driver::{FrameDriver, FrameError, FrameReport};
pub use reconciler::{ReconcileError, ReconcileStats, SceneReconciler};
pub use terrain::{PendingTerrain, TerrainInstaller, TextureSender};
