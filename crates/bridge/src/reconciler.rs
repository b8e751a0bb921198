use roadster_assets::{FactoryError, ObjectFactory};
use roadster_common::{EntityKey, EntityKind, EntitySnapshot, PhysicsKind, SnapshotError, Transform};
use roadster_render::{SceneError, SceneGraph, SceneKey, SceneNode};
use std::collections::BTreeSet;

use crate::{BridgeConfig, CameraFollower, StaleNodePolicy, UnknownKindPolicy};

/// Errors that abort a reconciliation pass. The scene is left untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconcileError {
    #[error("no renderable for entity kind {0:?}")]
    UnknownEntityKind(String),
    #[error("invalid snapshot entry at index {index}: {source}")]
    InvalidSnapshotEntry {
        index: usize,
        #[source]
        source: SnapshotError,
    },
    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl From<FactoryError> for ReconcileError {
    fn from(err: FactoryError) -> Self {
        match err {
            FactoryError::UnknownEntityKind(name) => Self::UnknownEntityKind(name),
        }
    }
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    /// Dynamic nodes whose transform actually changed.
    pub updated: usize,
    /// Entries skipped under [`UnknownKindPolicy::Skip`].
    pub skipped: usize,
    pub pruned: usize,
    /// Terrain placeholder nodes taken down because a terrain mesh is installed.
    pub hidden: usize,
    pub camera_moved: bool,
}

impl ReconcileStats {
    /// True if the pass changed nothing in the scene.
    pub fn is_noop(&self) -> bool {
        self.created == 0
            && self.updated == 0
            && self.pruned == 0
            && self.hidden == 0
            && !self.camera_moved
    }
}

/// A validated snapshot entry, ready to apply.
struct Planned {
    key: EntityKey,
    transform: Transform,
    physics: PhysicsKind,
}

/// Diffs each tick's snapshot against the scene graph: creates nodes for new
/// `(id, kind)` keys and re-syncs Dynamic ones.
///
/// Static entities are never re-synced after creation. Node removal depends on
/// [`StaleNodePolicy`]; by default entities are append-only for the session.
/// Placeholder kinds (the flat map slab) are only shown while the scene has
/// no terrain mesh.
#[derive(Debug, Clone)]
pub struct SceneReconciler {
    factory: ObjectFactory,
    follower: CameraFollower,
    player_kind: EntityKind,
    unknown_kind_policy: UnknownKindPolicy,
    stale_nodes: StaleNodePolicy,
}

impl SceneReconciler {
    pub fn new(factory: ObjectFactory, config: &BridgeConfig) -> Self {
        Self {
            factory,
            follower: CameraFollower::new(config.camera_offset),
            player_kind: config.player_kind,
            unknown_kind_policy: config.unknown_kind_policy,
            stale_nodes: config.stale_nodes,
        }
    }

    /// Bring `scene` in line with `snapshot`.
    ///
    /// Every entry is validated and resolved before the first mutation, so a
    /// failing pass leaves the scene as it was.
    pub fn reconcile<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        snapshot: &[EntitySnapshot],
    ) -> Result<ReconcileStats, ReconcileError> {
        let _span = tracing::debug_span!("reconcile", entities = snapshot.len()).entered();
        let mut stats = ReconcileStats::default();

        let plan = self.plan(snapshot, &mut stats)?;
        self.apply(scene, &plan, &mut stats)?;
        if self.stale_nodes == StaleNodePolicy::Prune {
            stats.pruned = prune(scene, &plan);
        }

        tracing::debug!(
            created = stats.created,
            updated = stats.updated,
            skipped = stats.skipped,
            pruned = stats.pruned,
            hidden = stats.hidden,
            "reconcile complete"
        );
        Ok(stats)
    }

    fn plan(
        &self,
        snapshot: &[EntitySnapshot],
        stats: &mut ReconcileStats,
    ) -> Result<Vec<Planned>, ReconcileError> {
        let mut plan = Vec::with_capacity(snapshot.len());
        for (index, entry) in snapshot.iter().enumerate() {
            let entry = entry
                .validate()
                .map_err(|source| ReconcileError::InvalidSnapshotEntry { index, source })?;
            let kind = match self.factory.resolve(entry.name) {
                Ok(kind) => kind,
                Err(err) => match self.unknown_kind_policy {
                    UnknownKindPolicy::Fail => return Err(err.into()),
                    UnknownKindPolicy::Skip => {
                        tracing::warn!(name = entry.name, id = %entry.id, "skipping unknown entity kind");
                        stats.skipped += 1;
                        continue;
                    }
                },
            };
            plan.push(Planned {
                key: EntityKey::new(entry.id, kind),
                transform: entry.transform,
                physics: entry.physics,
            });
        }
        Ok(plan)
    }

    fn apply<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        plan: &[Planned],
        stats: &mut ReconcileStats,
    ) -> Result<(), ReconcileError> {
        let has_terrain = scene.contains(&SceneKey::Terrain);
        for p in plan {
            let key = SceneKey::Entity(p.key);
            if has_terrain && p.key.kind.is_terrain_placeholder() {
                if scene.remove(&key).is_some() {
                    stats.hidden += 1;
                    tracing::debug!(%key, "placeholder replaced by terrain mesh");
                }
                continue;
            }
            if !scene.contains(&key) {
                let prototype = self.factory.prototype(p.key.kind);
                scene.insert(SceneNode::new(key, prototype, p.transform))?;
                stats.created += 1;
                tracing::info!(%key, "{} built", p.key.kind);
                continue;
            }

            if p.physics != PhysicsKind::Dynamic {
                continue;
            }
            if scene.set_transform(&key, p.transform) {
                stats.updated += 1;
                tracing::trace!(%key, position = ?p.transform.position, "node synced");
            }
            if p.key.kind == self.player_kind
                && self.follower.follow(scene, p.transform.position)
            {
                stats.camera_moved = true;
            }
        }
        Ok(())
    }
}

/// Remove entity nodes whose key did not appear in this pass. Returns how many went.
fn prune<S: SceneGraph + ?Sized>(scene: &mut S, plan: &[Planned]) -> usize {
    let live: BTreeSet<EntityKey> = plan.iter().map(|p| p.key).collect();
    let stale: Vec<SceneKey> = scene
        .keys()
        .into_iter()
        .filter(|k| matches!(k, SceneKey::Entity(key) if !live.contains(key)))
        .collect();
    for key in &stale {
        scene.remove(key);
        tracing::debug!(%key, "stale node removed");
    }
    stale.len()
}
