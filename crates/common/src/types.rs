use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier the simulation assigns to an entity.
///
/// The bridge only observes ids; it never allocates them for simulation entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build an id from a fixed integer. Deterministic; used by replays and tests.
    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// The nil id marks an entry whose identity was not reported.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.to_string();
        f.write_str(&s[..8])
    }
}

/// Closed set of visual kinds the simulation can report.
///
/// The string tag is what travels in a snapshot; the enum is what the rest
/// of the workspace matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "car00")]
    Car,
    #[serde(rename = "floor")]
    Floor,
    #[serde(rename = "ramp0")]
    Ramp,
    #[serde(rename = "map00")]
    Map,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [Self::Car, Self::Floor, Self::Ramp, Self::Map];

    /// Type tag as reported in snapshots.
    pub fn name(self) -> &'static str {
        match self {
            Self::Car => "car00",
            Self::Floor => "floor",
            Self::Ramp => "ramp0",
            Self::Map => "map00",
        }
    }

    /// Resolve a type tag. Returns `None` for tags outside the closed set.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Kinds drawn only until a generated terrain mesh takes their place.
    pub fn is_terrain_placeholder(self) -> bool {
        matches!(self, Self::Map)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Physics classification reported by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicsKind {
    Static,
    Dynamic,
}

/// Composite identity of a renderable: simulation id plus visual kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityKey {
    pub id: EntityId,
    pub kind: EntityKind,
}

impl EntityKey {
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self { id, kind }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.kind)
    }
}

/// Spatial transform: position plus Euler rotation (radians, XYZ order).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite()
    }
}

/// Errors for a single malformed snapshot entry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("entry has no entity id")]
    MissingId,
    #[error("entry has no type name")]
    MissingName,
    #[error("entry {name} has a non-finite transform")]
    NonFinite { name: String },
}

/// One tick's report of a simulated object.
///
/// Fields mirror what the simulation hands over, so identity may be absent
/// on a malformed record; [`EntitySnapshot::validate`] checks that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: Option<EntityId>,
    pub name: Option<String>,
    pub transform: Transform,
    pub physics: PhysicsKind,
}

/// Borrowed view of a snapshot entry that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidEntry<'a> {
    pub id: EntityId,
    pub name: &'a str,
    pub transform: Transform,
    pub physics: PhysicsKind,
}

impl EntitySnapshot {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        transform: Transform,
        physics: PhysicsKind,
    ) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
            transform,
            physics,
        }
    }

    pub fn validate(&self) -> Result<ValidEntry<'_>, SnapshotError> {
        let id = self
            .id
            .filter(|id| !id.is_nil())
            .ok_or(SnapshotError::MissingId)?;
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(SnapshotError::MissingName)?;
        if !self.transform.is_finite() {
            return Err(SnapshotError::NonFinite {
                name: name.to_string(),
            });
        }
        Ok(ValidEntry {
            id,
            name,
            transform: self.transform,
            physics: self.physics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.rotation_quat(), Quat::IDENTITY);
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::parse(kind.name()), Some(kind));
        }
        assert_eq!(EntityKind::parse("nonexistent"), None);
    }

    #[test]
    fn only_the_map_is_a_terrain_placeholder() {
        let placeholders: Vec<EntityKind> = EntityKind::ALL
            .into_iter()
            .filter(|k| k.is_terrain_placeholder())
            .collect();
        assert_eq!(placeholders, vec![EntityKind::Map]);
    }

    #[test]
    fn same_id_different_kind_is_a_different_key() {
        let id = EntityId::from_u128(1);
        assert_ne!(
            EntityKey::new(id, EntityKind::Car),
            EntityKey::new(id, EntityKind::Ramp)
        );
    }

    #[test]
    fn validate_accepts_well_formed_entry() {
        let id = EntityId::from_u128(3);
        let snap = EntitySnapshot::new(id, "car00", Transform::default(), PhysicsKind::Dynamic);
        let entry = snap.validate().unwrap();
        assert_eq!(entry.id, id);
        assert_eq!(entry.name, "car00");
    }

    #[test]
    fn validate_rejects_missing_identity() {
        let mut snap = EntitySnapshot::new(
            EntityId::from_u128(3),
            "car00",
            Transform::default(),
            PhysicsKind::Dynamic,
        );
        snap.id = None;
        assert_eq!(snap.validate(), Err(SnapshotError::MissingId));

        snap.id = Some(EntityId::from_u128(0));
        assert_eq!(snap.validate(), Err(SnapshotError::MissingId));

        snap.id = Some(EntityId::from_u128(3));
        snap.name = Some(String::new());
        assert_eq!(snap.validate(), Err(SnapshotError::MissingName));
    }

    #[test]
    fn validate_rejects_nan_position() {
        let snap = EntitySnapshot::new(
            EntityId::from_u128(3),
            "floor",
            Transform::from_position(Vec3::new(f32::NAN, 0.0, 0.0)),
            PhysicsKind::Static,
        );
        assert!(matches!(
            snap.validate(),
            Err(SnapshotError::NonFinite { .. })
        ));
    }
}
