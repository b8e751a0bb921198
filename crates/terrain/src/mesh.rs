use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{HeightmapGrid, TerrainError};

/// How the terrain surface is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainSurface {
    /// A texture will be applied: emit grid UVs, no vertex colours.
    Textured,
    /// No texture: paint each vertex from its position.
    #[default]
    VertexColors,
}

/// World-space sizing for a generated terrain mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub world_width: f32,
    pub world_depth: f32,
    pub height_scale: f32,
    pub surface: TerrainSurface,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            world_width: 1000.0,
            world_depth: 1000.0,
            height_scale: 100.0,
            surface: TerrainSurface::default(),
        }
    }
}

impl TerrainParams {
    fn validate(&self) -> Result<(), TerrainError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.world_width) || !positive(self.world_depth) {
            return Err(TerrainError::MalformedHeightmap(format!(
                "world extent must be positive, got {} x {}",
                self.world_width, self.world_depth
            )));
        }
        if !self.height_scale.is_finite() {
            return Err(TerrainError::MalformedHeightmap(
                "height scale must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Indexed triangle mesh generated from a heightmap.
///
/// Normals are a flat `(0, 0, 1)` placeholder per vertex, not derived from
/// neighbouring faces, so lighting looks flat-shaded along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub colors: Option<Vec<[f32; 3]>>,
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Raw vertex position buffer, as it would be uploaded.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw index buffer, as it would be uploaded.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Axis-aligned bounds of all vertex positions.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), p| {
                let p = Vec3::from_array(*p);
                (min.min(p), max.max(p))
            },
        )
    }
}

/// Generate the terrain mesh for a heightmap.
///
/// Vertices are emitted row-major, one per grid sample. Each cell becomes two
/// triangles; the winding is fixed and must not change, the rest of the scene
/// culls against it.
pub fn build(grid: &HeightmapGrid, params: &TerrainParams) -> Result<TerrainMesh, TerrainError> {
    params.validate()?;
    let n = grid.side();
    let segments = n - 1;
    if u32::try_from(n * n).is_err() {
        return Err(TerrainError::MalformedHeightmap(format!(
            "{n}x{n} grid exceeds the 32-bit index range"
        )));
    }

    let segment_size = params.world_width / segments as f32;
    let half_width = params.world_width / 2.0;

    let vertex_count = n * n;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::new();
    let mut colors = Vec::new();

    for (i, row) in grid.rows().enumerate() {
        for (j, &h) in row.iter().enumerate() {
            let x = j as f32 * segment_size - half_width;
            let y = h * params.height_scale;
            let z = i as f32 * segment_size - half_width;
            positions.push([x, y, z]);

            match params.surface {
                TerrainSurface::Textured => {
                    uvs.push([i as f32 / segments as f32, j as f32 / segments as f32]);
                }
                TerrainSurface::VertexColors => {
                    colors.push([
                        x / params.world_width + 0.5,
                        z / params.world_depth + 0.5,
                        1.0,
                    ]);
                }
            }
        }
    }

    let normals = vec![[0.0, 0.0, 1.0]; vertex_count];

    let idx = |r: usize, c: usize| (r * n + c) as u32;
    let mut indices = Vec::with_capacity(segments * segments * 6);
    for i in 0..segments {
        for j in 0..segments {
            let a = idx(i, j + 1);
            let b = idx(i, j);
            let c = idx(i + 1, j);
            let d = idx(i + 1, j + 1);
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    tracing::debug!(
        side = n,
        vertices = positions.len(),
        triangles = indices.len() / 3,
        surface = ?params.surface,
        "terrain mesh built"
    );

    let (uvs, colors) = match params.surface {
        TerrainSurface::Textured => (Some(uvs), None),
        TerrainSurface::VertexColors => (None, Some(colors)),
    };

    Ok(TerrainMesh {
        positions,
        normals,
        uvs,
        colors,
        indices,
    })
}
