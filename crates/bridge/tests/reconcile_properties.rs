use glam::Vec3;
use roadster_assets::ObjectFactory;
use roadster_bridge::{BridgeConfig, ReconcileError, SceneReconciler, StaleNodePolicy};
use roadster_common::{EntityId, EntityKey, EntityKind, EntitySnapshot, PhysicsKind, Transform};
use roadster_render::{Scene, SceneEvent, SceneGraph, SceneKey};

fn reconciler(config: &BridgeConfig) -> SceneReconciler {
    SceneReconciler::new(ObjectFactory::new(), config)
}

fn entry(n: u128, name: &str, pos: Vec3, physics: PhysicsKind) -> EntitySnapshot {
    EntitySnapshot::new(
        EntityId::from_u128(n),
        name,
        Transform::from_position(pos),
        physics,
    )
}

fn key(n: u128, kind: EntityKind) -> SceneKey {
    SceneKey::Entity(EntityKey::new(EntityId::from_u128(n), kind))
}

fn session() -> Vec<EntitySnapshot> {
    vec![
        entry(1, "floor", Vec3::ZERO, PhysicsKind::Static),
        entry(2, "car00", Vec3::new(0.0, 5.0, 0.0), PhysicsKind::Dynamic),
        entry(3, "ramp0", Vec3::new(0.0, 0.0, 10.0), PhysicsKind::Static),
    ]
}

#[test]
fn reconcile_is_idempotent() {
    let r = reconciler(&BridgeConfig::default());
    let mut scene = Scene::new();
    let snap = session();

    r.reconcile(&mut scene, &snap).unwrap();
    let after_first = scene.keys();
    scene.drain_events();

    let stats = r.reconcile(&mut scene, &snap).unwrap();
    assert!(stats.is_noop());
    assert!(scene.events().is_empty());
    assert_eq!(scene.keys(), after_first);
}

#[test]
fn identity_is_stable_and_tracks_latest_dynamic_transform() {
    let r = reconciler(&BridgeConfig::default());
    let mut scene = Scene::new();
    r.reconcile(&mut scene, &session()).unwrap();

    for step in 1..=5 {
        let pos = Vec3::new(step as f32, 5.0, 0.0);
        let mut snap = session();
        snap[1].transform = Transform {
            position: pos,
            rotation: Vec3::new(0.0, 0.1 * step as f32, 0.0),
        };
        let stats = r.reconcile(&mut scene, &snap).unwrap();
        assert_eq!(stats.created, 0);
        assert_eq!(stats.updated, 1);
        assert_eq!(scene.len(), 3);
        assert_eq!(
            scene.get(&key(2, EntityKind::Car)).unwrap().transform,
            snap[1].transform
        );
    }

    let inserts = scene
        .events()
        .iter()
        .filter(|e| matches!(e, SceneEvent::Inserted { .. }))
        .count();
    assert_eq!(inserts, 3);
}

#[test]
fn static_nodes_are_never_resynced() {
    let r = reconciler(&BridgeConfig::default());
    let mut scene = Scene::new();
    r.reconcile(&mut scene, &session()).unwrap();

    let mut moved = session();
    moved[2].transform.position = Vec3::new(50.0, 50.0, 50.0);
    r.reconcile(&mut scene, &moved).unwrap();

    assert_eq!(
        scene.get(&key(3, EntityKind::Ramp)).unwrap().transform.position,
        Vec3::new(0.0, 0.0, 10.0)
    );
}

#[test]
fn same_id_with_new_kind_gets_its_own_node() {
    let r = reconciler(&BridgeConfig::default());
    let mut scene = Scene::new();
    r.reconcile(
        &mut scene,
        &[entry(9, "ramp0", Vec3::ZERO, PhysicsKind::Static)],
    )
    .unwrap();
    r.reconcile(
        &mut scene,
        &[entry(9, "car00", Vec3::ZERO, PhysicsKind::Dynamic)],
    )
    .unwrap();

    assert!(scene.contains(&key(9, EntityKind::Ramp)));
    assert!(scene.contains(&key(9, EntityKind::Car)));
}

#[test]
fn player_update_snaps_camera() {
    let config = BridgeConfig {
        camera_offset: Vec3::new(-5.0, 5.0, -5.0),
        ..BridgeConfig::default()
    };
    let r = reconciler(&config);
    let mut scene = Scene::new();
    r.reconcile(&mut scene, &session()).unwrap();

    let mut snap = session();
    snap[1].transform.position = Vec3::new(10.0, 0.0, 0.0);
    let stats = r.reconcile(&mut scene, &snap).unwrap();

    assert!(stats.camera_moved);
    assert_eq!(scene.camera().position, Vec3::new(5.0, 5.0, -5.0));
    assert_eq!(scene.camera().target, Vec3::new(10.0, 0.0, 0.0));
}

#[test]
fn non_player_dynamic_entities_leave_camera_alone() {
    let config = BridgeConfig {
        player_kind: EntityKind::Ramp,
        ..BridgeConfig::default()
    };
    let r = reconciler(&config);
    let mut scene = Scene::new();
    r.reconcile(&mut scene, &session()).unwrap();
    let before = *scene.camera();

    let mut snap = session();
    snap[1].transform.position = Vec3::new(10.0, 0.0, 0.0);
    r.reconcile(&mut scene, &snap).unwrap();
    assert_eq!(*scene.camera(), before);
}

#[test]
fn unknown_kind_mid_session_leaves_scene_as_it_was() {
    let r = reconciler(&BridgeConfig::default());
    let mut scene = Scene::new();
    r.reconcile(&mut scene, &session()).unwrap();
    scene.drain_events();

    let mut snap = session();
    snap[1].transform.position = Vec3::new(42.0, 0.0, 0.0);
    snap.push(entry(4, "nonexistent", Vec3::ZERO, PhysicsKind::Static));

    let err = r.reconcile(&mut scene, &snap).unwrap_err();
    assert_eq!(err, ReconcileError::UnknownEntityKind("nonexistent".into()));
    assert!(scene.events().is_empty());
    assert_eq!(
        scene.get(&key(2, EntityKind::Car)).unwrap().transform.position,
        Vec3::new(0.0, 5.0, 0.0)
    );
}

/// Default policy: entities are append-only for the session, so nodes of
/// entities that vanish from the snapshot stay in the scene.
#[test]
fn vanished_entities_are_retained_by_default() {
    let r = reconciler(&BridgeConfig::default());
    let mut scene = Scene::new();
    r.reconcile(&mut scene, &session()).unwrap();

    let stats = r.reconcile(&mut scene, &session()[..1]).unwrap();
    assert_eq!(stats.pruned, 0);
    assert_eq!(scene.len(), 3);
}

/// Opt-in policy: nodes absent from the snapshot are removed, terrain excepted.
#[test]
fn prune_policy_removes_vanished_entities_but_not_terrain() {
    let config = BridgeConfig {
        stale_nodes: StaleNodePolicy::Prune,
        ..BridgeConfig::default()
    };
    let r = reconciler(&config);
    let mut scene = Scene::new();
    r.reconcile(&mut scene, &session()).unwrap();
    let terrain = roadster_terrain::build(
        &roadster_terrain::HeightmapGrid::flat(2).unwrap(),
        &roadster_terrain::TerrainParams::default(),
    )
    .unwrap();
    roadster_bridge::TerrainInstaller::install(
        &mut scene,
        terrain,
        roadster_render::Material::VertexColors,
    )
    .unwrap();

    let stats = r.reconcile(&mut scene, &session()[..1]).unwrap();
    assert_eq!(stats.pruned, 2);
    assert!(scene.contains(&key(1, EntityKind::Floor)));
    assert!(scene.contains(&SceneKey::Terrain));
    assert!(!scene.contains(&key(2, EntityKind::Car)));
}
