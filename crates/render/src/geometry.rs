use glam::Vec3;
use roadster_terrain::TerrainMesh;
use std::fmt;
use std::sync::Arc;

/// Shape of a renderable, as handed to the rendering library.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box centred on the node origin.
    Box { width: f32, height: f32, depth: f32 },
    /// Convex hull over a fixed point set, in node-local space.
    ConvexHull { points: Vec<Vec3> },
    /// Generated terrain. Shared because meshes can be large.
    Terrain(Arc<TerrainMesh>),
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Box {
                width,
                height,
                depth,
            } => write!(f, "box {width:.1}x{height:.1}x{depth:.1}"),
            Self::ConvexHull { points } => write!(f, "hull {} pts", points.len()),
            Self::Terrain(mesh) => write!(
                f,
                "terrain {} verts {} tris",
                mesh.vertex_count(),
                mesh.triangle_count()
            ),
        }
    }
}

/// Decoded image applied to textured terrain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Surface appearance of a renderable.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Colours faces by their normal direction.
    Normal,
    /// Unlit flat white.
    Basic,
    /// Lit, single colour (0xRRGGBB).
    Standard { color: u32 },
    /// Per-vertex colours carried by the geometry.
    VertexColors,
    Textured(Arc<Texture>),
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Basic => f.write_str("basic"),
            Self::Standard { color } => write!(f, "standard #{color:06x}"),
            Self::VertexColors => f.write_str("vertex-colors"),
            Self::Textured(tex) => write!(f, "textured {}", tex.name),
        }
    }
}

/// Geometry plus material: everything needed to instantiate a scene node.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderablePrototype {
    pub geometry: Geometry,
    pub material: Material,
}
