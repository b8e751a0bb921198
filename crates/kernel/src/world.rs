use glam::Vec3;
use roadster_common::{EntityId, EntityKind, EntitySnapshot, PhysicsKind, Transform};
use roadster_input::{Action, InputState};
use roadster_terrain::HeightmapGrid;
use std::collections::BTreeMap;

use crate::Simulation;

/// Fixed simulation step, seconds.
pub const DT: f32 = 1.0 / 60.0;
const CAR_MASS: f32 = 120.0;
const ACCELERATE_THRUST: f32 = 320.0;
const BRAKE_THRUST: f32 = -120.0;
/// Yaw rate while steering, radians per second.
const TURN_RATE: f32 = 1.8;
/// Fraction of speed kept each tick while on the ground.
const TRACTION: f32 = 0.97;

/// Per-entity data stored in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityData {
    pub kind: EntityKind,
    pub transform: Transform,
    pub physics: PhysicsKind,
    /// Forward speed along the heading. Only cars move.
    pub speed: f32,
}

/// Deterministic kinematic stand-in for the physics engine.
///
/// Cars integrate thrust and steering from the input table; everything else
/// stays where it was spawned. There is no collision or gravity.
///
/// Uses BTreeMap so snapshots come out in the same order every tick.
#[derive(Debug, Clone, Default)]
pub struct World {
    entities: BTreeMap<EntityId, EntityData>,
    tick: u64,
    heightmap: Option<HeightmapGrid>,
    map_entity: Option<EntityId>,
}

impl World {
    /// Create an empty world at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Floor at the origin, the player car dropped in above it, and a test ramp.
    pub fn with_default_scene() -> Self {
        let mut world = Self::new();
        world.spawn(EntityKind::Floor, Transform::default(), PhysicsKind::Static);
        world.spawn(
            EntityKind::Car,
            Transform::from_position(Vec3::new(0.0, 5.0, 0.0)),
            PhysicsKind::Dynamic,
        );
        world.spawn(
            EntityKind::Ramp,
            Transform::from_position(Vec3::new(0.0, 0.0, 10.0)),
            PhysicsKind::Static,
        );
        world
    }

    /// Current simulation tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of entities in the world.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Read-only access to all entities (BTreeMap for deterministic iteration).
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    /// Heightmap of the loaded map collider, if any.
    pub fn heightmap(&self) -> Option<&HeightmapGrid> {
        self.heightmap.as_ref()
    }

    /// Spawn a new entity. Returns its id.
    pub fn spawn(&mut self, kind: EntityKind, transform: Transform, physics: PhysicsKind) -> EntityId {
        let id = EntityId::new();
        self.spawn_with_id(id, kind, transform, physics);
        id
    }

    /// Spawn an entity with a specific id.
    pub fn spawn_with_id(
        &mut self,
        id: EntityId,
        kind: EntityKind,
        transform: Transform,
        physics: PhysicsKind,
    ) {
        self.entities.insert(
            id,
            EntityData {
                kind,
                transform,
                physics,
                speed: 0.0,
            },
        );
        tracing::debug!(%id, %kind, "entity spawned");
    }

    /// Remove an entity. Returns the data if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        let data = self.entities.remove(&id);
        if self.map_entity == Some(id) {
            self.map_entity = None;
        }
        data
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    fn drive(data: &mut EntityData, input: &InputState) {
        let mut thrust = 0.0;
        if input.get(Action::Accelerate) {
            thrust = ACCELERATE_THRUST;
        }
        if input.get(Action::Brake) {
            thrust = BRAKE_THRUST;
        }

        let mut yaw_rate = 0.0;
        if input.get(Action::Left) {
            yaw_rate = TURN_RATE;
        }
        if input.get(Action::Right) {
            yaw_rate = -TURN_RATE;
        }

        data.speed = (data.speed + thrust / CAR_MASS) * TRACTION;
        data.transform.rotation.y += yaw_rate * DT;
        // Cars face +X in their local frame.
        let forward = data.transform.rotation_quat() * Vec3::X;
        data.transform.position += forward * data.speed * DT;
    }
}

impl Simulation for World {
    fn advance(&mut self, input: &InputState) {
        self.tick += 1;
        for data in self.entities.values_mut() {
            if data.kind == EntityKind::Car && data.physics == PhysicsKind::Dynamic {
                Self::drive(data, input);
            }
        }
        tracing::trace!(tick = self.tick, input = input.bits(), "world advanced");
    }

    fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.entities
            .iter()
            .map(|(id, data)| EntitySnapshot::new(*id, data.kind.name(), data.transform, data.physics))
            .collect()
    }

    fn load_terrain(&mut self, heightmap: &HeightmapGrid) {
        self.heightmap = Some(heightmap.clone());
        if self.map_entity.is_none() {
            let id = self.spawn(EntityKind::Map, Transform::default(), PhysicsKind::Static);
            self.map_entity = Some(id);
        }
        tracing::info!(side = heightmap.side(), "map collider loaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car_world() -> (World, EntityId) {
        let mut w = World::new();
        let id = EntityId::from_u128(1);
        w.spawn_with_id(id, EntityKind::Car, Transform::default(), PhysicsKind::Dynamic);
        (w, id)
    }

    fn held(actions: &[Action]) -> InputState {
        let mut input = InputState::new();
        for a in actions {
            input.set_action(*a, true);
        }
        input
    }

    #[test]
    fn world_starts_empty() {
        let w = World::new();
        assert_eq!(w.tick(), 0);
        assert_eq!(w.entity_count(), 0);
        assert!(w.snapshot().is_empty());
    }

    #[test]
    fn default_scene_has_floor_car_and_ramp() {
        let w = World::with_default_scene();
        let mut names: Vec<String> = w
            .snapshot()
            .into_iter()
            .filter_map(|s| s.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["car00", "floor", "ramp0"]);
    }

    #[test]
    fn spawn_and_despawn() {
        let mut w = World::new();
        let id = w.spawn(EntityKind::Ramp, Transform::default(), PhysicsKind::Static);
        assert_eq!(w.entity_count(), 1);
        assert!(w.get(id).is_some());
        assert!(w.despawn(id).is_some());
        assert_eq!(w.entity_count(), 0);
    }

    #[test]
    fn idle_car_stays_put() {
        let (mut w, id) = car_world();
        for _ in 0..10 {
            w.advance(&InputState::new());
        }
        assert_eq!(w.tick(), 10);
        assert_eq!(w.get(id).unwrap().transform, Transform::default());
    }

    #[test]
    fn accelerating_moves_car_forward() {
        let (mut w, id) = car_world();
        let input = held(&[Action::Accelerate]);
        for _ in 0..30 {
            w.advance(&input);
        }
        let p = w.get(id).unwrap().transform.position;
        assert!(p.x > 0.0);
        assert!(p.z.abs() < 1e-4);
    }

    #[test]
    fn brake_wins_over_accelerate() {
        let (mut w, id) = car_world();
        let input = held(&[Action::Accelerate, Action::Brake]);
        w.advance(&input);
        assert!(w.get(id).unwrap().speed < 0.0);
    }

    #[test]
    fn steering_changes_heading() {
        let (mut w, id) = car_world();
        w.advance(&held(&[Action::Left]));
        assert!(w.get(id).unwrap().transform.rotation.y > 0.0);
        w.advance(&held(&[Action::Right]));
        w.advance(&held(&[Action::Right]));
        assert!(w.get(id).unwrap().transform.rotation.y < 0.0);
    }

    #[test]
    fn static_entities_never_move() {
        let mut w = World::new();
        let id = w.spawn(
            EntityKind::Car,
            Transform::from_position(Vec3::new(1.0, 0.0, 0.0)),
            PhysicsKind::Static,
        );
        w.advance(&held(&[Action::Accelerate]));
        assert_eq!(w.get(id).unwrap().transform.position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn advance_is_deterministic() {
        let (mut a, id) = car_world();
        let (mut b, _) = car_world();
        let inputs = [
            held(&[Action::Accelerate]),
            held(&[Action::Accelerate, Action::Left]),
            held(&[Action::Brake, Action::Right]),
        ];
        for input in inputs.iter().cycle().take(90) {
            a.advance(input);
            b.advance(input);
        }
        assert_eq!(a.get(id), b.get(id));
    }

    #[test]
    fn load_terrain_spawns_one_map_entity() {
        let mut w = World::new();
        let grid = HeightmapGrid::flat(5).unwrap();
        w.load_terrain(&grid);
        w.load_terrain(&grid);
        let maps = w
            .snapshot()
            .into_iter()
            .filter(|s| s.name.as_deref() == Some("map00"))
            .count();
        assert_eq!(maps, 1);
        assert_eq!(w.heightmap().map(HeightmapGrid::side), Some(5));
    }
}
