use roadster_common::Transform;
use roadster_render::{
    Geometry, Material, RenderablePrototype, SceneError, SceneGraph, SceneKey, SceneNode, Texture,
};
use roadster_terrain::TerrainMesh;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// A textured terrain whose texture finished loading off the frame loop.
#[derive(Debug)]
pub struct PendingTerrain {
    /// Map load this terrain belongs to, from [`TerrainInstaller::begin_load`].
    pub load: u64,
    pub mesh: TerrainMesh,
    pub texture: Texture,
}

/// Sending half handed to a texture loader. Cloneable and `Send`.
#[derive(Debug, Clone)]
pub struct TextureSender {
    tx: Sender<PendingTerrain>,
}

impl TextureSender {
    /// Hand a finished terrain back to the frame loop. Returns false if the
    /// loop has shut down.
    pub fn deliver(&self, load: u64, mesh: TerrainMesh, texture: Texture) -> bool {
        self.tx
            .send(PendingTerrain {
                load,
                mesh,
                texture,
            })
            .is_ok()
    }
}

/// Owns the reserved terrain slot of the scene.
///
/// Synchronous installs go straight in. Textured installs arrive over a
/// channel and are applied only by [`TerrainInstaller::drain_into`], which the
/// frame driver calls between reconcile passes, never during one.
///
/// Every map load takes a number from [`TerrainInstaller::begin_load`]. Only a
/// delivery for the most recent load is installed; anything older lost the
/// race to a later map and is dropped.
#[derive(Debug)]
pub struct TerrainInstaller {
    rx: Receiver<PendingTerrain>,
    latest: u64,
}

impl TerrainInstaller {
    pub fn channel() -> (TextureSender, Self) {
        let (tx, rx) = mpsc::channel();
        (TextureSender { tx }, Self { rx, latest: 0 })
    }

    /// Start a new map load and return its number. Supersedes every earlier load.
    pub fn begin_load(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn latest_load(&self) -> u64 {
        self.latest
    }

    /// Replace whatever terrain the scene holds with `mesh`.
    pub fn install<S: SceneGraph + ?Sized>(
        scene: &mut S,
        mesh: TerrainMesh,
        material: Material,
    ) -> Result<(), SceneError> {
        if scene.remove(&SceneKey::Terrain).is_some() {
            tracing::debug!("previous terrain removed");
        }
        let triangles = mesh.triangle_count();
        let node = SceneNode::new(
            SceneKey::Terrain,
            RenderablePrototype {
                geometry: Geometry::Terrain(Arc::new(mesh)),
                material,
            },
            Transform::default(),
        );
        scene.insert(node)?;
        tracing::info!(triangles, "terrain installed");
        Ok(())
    }

    /// Install the terrain delivered for the latest load, if it arrived since
    /// the last call. Deliveries for superseded loads are discarded.
    /// Returns how many were applied.
    pub fn drain_into<S: SceneGraph + ?Sized>(&self, scene: &mut S) -> Result<usize, SceneError> {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(pending) if pending.load != self.latest => {
                    tracing::debug!(
                        load = pending.load,
                        latest = self.latest,
                        "dropping terrain for superseded map load"
                    );
                }
                Ok(pending) => {
                    let material = Material::Textured(Arc::new(pending.texture));
                    Self::install(scene, pending.mesh, material)?;
                    applied += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        Ok(applied)
    }
}
