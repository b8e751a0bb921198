use roadster_assets::ObjectFactory;
use roadster_input::InputAggregator;
use roadster_kernel::Simulation;
use roadster_render::{Material, Renderer, SceneError, SceneGraph, SceneKey, Texture};
use roadster_terrain::{HeightmapGrid, TerrainError, TerrainParams, TerrainSurface, build};
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::thread::JoinHandle;

use crate::{
    BridgeConfig, ReconcileError, ReconcileStats, SceneReconciler, TerrainInstaller, TextureSender,
};

/// Errors that abort a frame or a map load.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("reconcile failed: {0}")]
    Reconcile(#[from] ReconcileError),
    #[error("terrain load failed: {0}")]
    Terrain(#[from] TerrainError),
    #[error("scene update failed: {0}")]
    Scene(#[from] SceneError),
}

/// Result of one completed frame.
#[derive(Debug, Clone)]
pub struct FrameReport<O> {
    pub frame: u64,
    pub stats: ReconcileStats,
    pub output: O,
}

/// Outermost per-frame callback.
///
/// Each [`FrameDriver::frame`] runs, strictly in order: read input, advance the
/// simulation, take its snapshot, apply any finished terrain load, reconcile,
/// render. The host schedules the next frame only after this returns.
///
/// The input handle is shared with the event layer. It is read once at the
/// start of the frame, so events handled while the frame runs are seen by the
/// next one.
pub struct FrameDriver<Sim, S, R> {
    simulation: Sim,
    scene: S,
    renderer: R,
    reconciler: SceneReconciler,
    input: Rc<RefCell<InputAggregator>>,
    installer: TerrainInstaller,
    texture_tx: TextureSender,
    terrain: TerrainParams,
    frame: u64,
}

impl<Sim, S, R> FrameDriver<Sim, S, R>
where
    Sim: Simulation,
    S: SceneGraph,
    R: Renderer,
{
    pub fn new(simulation: Sim, scene: S, renderer: R, config: &BridgeConfig) -> Self {
        let (texture_tx, installer) = TerrainInstaller::channel();
        Self {
            simulation,
            scene,
            renderer,
            reconciler: SceneReconciler::new(ObjectFactory::new(), config),
            input: Rc::new(RefCell::new(InputAggregator::with_bindings(
                config.key_bindings.clone(),
            ))),
            installer,
            texture_tx,
            terrain: config.terrain,
            frame: 0,
        }
    }

    /// Handle for the event layer to push key and touch events into.
    pub fn input(&self) -> Rc<RefCell<InputAggregator>> {
        Rc::clone(&self.input)
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn simulation(&self) -> &Sim {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Sim {
        &mut self.simulation
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Run one frame. On error the frame is abandoned before rendering; the
    /// next call starts fresh from a new snapshot.
    pub fn frame(&mut self) -> Result<FrameReport<R::Output>, FrameError> {
        let _span = tracing::debug_span!("frame", frame = self.frame + 1).entered();

        let input = self.input.borrow().state();
        self.simulation.advance(&input);
        let snapshot = self.simulation.snapshot();

        let installed = self.installer.drain_into(&mut self.scene)?;
        if installed > 0 {
            tracing::debug!(installed, "pending terrain applied");
        }

        let stats = self.reconciler.reconcile(&mut self.scene, &snapshot)?;
        let output = self.renderer.render(&self.scene, self.scene.camera());

        self.frame += 1;
        Ok(FrameReport {
            frame: self.frame,
            stats,
            output,
        })
    }

    /// Run `frames` frames, stopping at the first failure. Returns the last report.
    pub fn run(&mut self, frames: u64) -> Result<Option<FrameReport<R::Output>>, FrameError> {
        let mut last = None;
        for _ in 0..frames {
            last = Some(self.frame()?);
        }
        Ok(last)
    }

    /// Load a map: validate and mesh the heightmap, create the simulation's
    /// collider, then swap the scene's terrain for the new mesh.
    ///
    /// The mesh is built first, so a malformed map fails before anything changes.
    pub fn load_terrain(&mut self, heightmap: &HeightmapGrid) -> Result<(), FrameError> {
        let params = TerrainParams {
            surface: TerrainSurface::VertexColors,
            ..self.terrain
        };
        let mesh = build(heightmap, &params)?;
        let load = self.installer.begin_load();
        self.simulation.load_terrain(heightmap);
        TerrainInstaller::install(&mut self.scene, mesh, Material::VertexColors)?;
        tracing::debug!(load, "map loaded");
        Ok(())
    }

    /// Load a textured map. The collider is created now and the previous
    /// terrain visual is taken down; the new one is installed at the start of
    /// the first frame after `load_texture` returns. A later map load
    /// supersedes this one even if its texture arrives afterwards.
    ///
    /// If `load_texture` panics the panic is logged and the map stays without
    /// a terrain visual; the returned handle still joins cleanly.
    pub fn load_terrain_textured<F>(
        &mut self,
        heightmap: &HeightmapGrid,
        load_texture: F,
    ) -> Result<JoinHandle<()>, FrameError>
    where
        F: FnOnce() -> Texture + Send + 'static,
    {
        let params = TerrainParams {
            surface: TerrainSurface::Textured,
            ..self.terrain
        };
        let mesh = build(heightmap, &params)?;
        let load = self.installer.begin_load();
        self.simulation.load_terrain(heightmap);
        if self.scene.remove(&SceneKey::Terrain).is_some() {
            tracing::debug!(load, "previous terrain removed while texture loads");
        }

        let tx = self.texture_tx.clone();
        Ok(std::thread::spawn(move || {
            let texture = match panic::catch_unwind(AssertUnwindSafe(load_texture)) {
                Ok(texture) => texture,
                Err(_) => {
                    tracing::error!(load, "terrain texture loader panicked");
                    return;
                }
            };
            if !tx.deliver(load, mesh, texture) {
                tracing::debug!(load, "frame loop gone; dropping terrain texture");
            }
        }))
    }
}
