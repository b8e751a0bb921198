use std::fmt::Write;

use crate::{Camera, SceneGraph};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a camera, then produces output. It never
/// mutates the scene; the bridge owns node existence and transforms.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the given scene from the given camera.
    fn render(&self, scene: &dyn SceneGraph, camera: &Camera) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable listing of the scene. Used by the CLI, logs and
/// tests in place of a GPU backend.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &dyn SceneGraph, camera: &Camera) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Scene (nodes={}) ===", scene.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1})",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
        );

        for node in scene.nodes() {
            let p = node.transform.position;
            let r = node.transform.rotation;
            let proto = node.prototype();
            let _ = writeln!(
                out,
                "  [{}] {} / {} pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2})",
                node.key(),
                proto.geometry,
                proto.material,
                p.x,
                p.y,
                p.z,
                r.x,
                r.y,
                r.z,
            );
        }

        out
    }
}
