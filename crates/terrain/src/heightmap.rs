use serde::{Deserialize, Serialize};

use crate::TerrainError;

/// Square grid of unit-less elevation multipliers, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct HeightmapGrid {
    side: usize,
    heights: Vec<f32>,
}

impl HeightmapGrid {
    /// Validate and flatten a grid given as rows.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, TerrainError> {
        let side = rows.len();
        if side < 2 {
            return Err(TerrainError::MalformedHeightmap(format!(
                "grid side must be at least 2, got {side}"
            )));
        }
        let mut heights = Vec::with_capacity(side * side);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != side {
                return Err(TerrainError::MalformedHeightmap(format!(
                    "row {i} has {} columns, expected {side}",
                    row.len()
                )));
            }
            if let Some(j) = row.iter().position(|h| !h.is_finite()) {
                return Err(TerrainError::MalformedHeightmap(format!(
                    "non-finite elevation at ({i}, {j})"
                )));
            }
            heights.extend(row);
        }
        Ok(Self { side, heights })
    }

    /// A flat grid of the given side length.
    pub fn flat(side: usize) -> Result<Self, TerrainError> {
        Self::from_rows(vec![vec![0.0; side]; side])
    }

    /// Number of samples along each edge (`N`).
    pub fn side(&self) -> usize {
        self.side
    }

    /// Elevation at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.side && j < self.side {
            Some(self.heights[i * self.side + j])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.heights.chunks(self.side)
    }
}

impl TryFrom<Vec<Vec<f32>>> for HeightmapGrid {
    type Error = TerrainError;

    fn try_from(rows: Vec<Vec<f32>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<HeightmapGrid> for Vec<Vec<f32>> {
    fn from(grid: HeightmapGrid) -> Self {
        grid.rows().map(<[f32]>::to_vec).collect()
    }
}
