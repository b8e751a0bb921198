//! Object factory: the static catalog of what each entity kind looks like.
//!
//! Geometry sizes mirror the simulation's collider shapes (full extents, where
//! the colliders are built from half extents). Adding a visual kind means
//! adding an [`EntityKind`] variant and one arm in [`ObjectFactory::prototype`];
//! the reconciler does not change.

use glam::Vec3;
use roadster_common::EntityKind;
use roadster_render::{Geometry, Material, RenderablePrototype};

/// Errors from prototype lookup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FactoryError {
    #[error("no renderable for entity kind {0:?}")]
    UnknownEntityKind(String),
}

/// Ramp profile: a wedge 10 wide, 12 long, rising to 5 at the +Z end.
const RAMP_POINTS: [[f32; 3]; 6] = [
    [5.0, 0.0, 6.0],
    [-5.0, 0.0, 6.0],
    [5.0, 0.0, -6.0],
    [-5.0, 0.0, -6.0],
    [5.0, 5.0, 6.0],
    [-5.0, 5.0, 6.0],
];

/// Maps entity type names to renderable prototypes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectFactory;

impl ObjectFactory {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a reported type name against the catalog.
    pub fn resolve(&self, name: &str) -> Result<EntityKind, FactoryError> {
        EntityKind::parse(name).ok_or_else(|| FactoryError::UnknownEntityKind(name.to_string()))
    }

    /// Build the prototype for a reported type name.
    pub fn create(&self, name: &str) -> Result<RenderablePrototype, FactoryError> {
        let kind = self.resolve(name)?;
        Ok(self.prototype(kind))
    }

    pub fn prototype(&self, kind: EntityKind) -> RenderablePrototype {
        match kind {
            EntityKind::Car => RenderablePrototype {
                geometry: Geometry::Box {
                    width: 8.0,
                    height: 2.0,
                    depth: 4.0,
                },
                material: Material::Normal,
            },
            EntityKind::Floor => RenderablePrototype {
                geometry: Geometry::Box {
                    width: 200.0,
                    height: 0.2,
                    depth: 200.0,
                },
                material: Material::Basic,
            },
            EntityKind::Ramp => RenderablePrototype {
                geometry: Geometry::ConvexHull {
                    points: RAMP_POINTS.iter().copied().map(Vec3::from_array).collect(),
                },
                material: Material::Standard { color: 0xFF00FF },
            },
            EntityKind::Map => RenderablePrototype {
                geometry: Geometry::Box {
                    width: 1000.0,
                    height: 0.1,
                    depth: 1000.0,
                },
                material: Material::Standard { color: 0x3A7D44 },
            },
        }
    }

    /// Every catalog entry, in kind order.
    pub fn catalog(&self) -> impl Iterator<Item = (EntityKind, RenderablePrototype)> + '_ {
        EntityKind::ALL.into_iter().map(|k| (k, self.prototype(k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_fails() {
        let factory = ObjectFactory::new();
        assert_eq!(
            factory.create("nonexistent"),
            Err(FactoryError::UnknownEntityKind("nonexistent".into()))
        );
    }

    #[test]
    fn car_is_a_fixed_box() {
        let proto = ObjectFactory::new().create("car00").unwrap();
        assert_eq!(
            proto.geometry,
            Geometry::Box {
                width: 8.0,
                height: 2.0,
                depth: 4.0
            }
        );
        assert_eq!(proto.material, Material::Normal);
    }

    #[test]
    fn ramp_is_a_hull_over_six_points() {
        let proto = ObjectFactory::new().create("ramp0").unwrap();
        let Geometry::ConvexHull { points } = proto.geometry else {
            panic!("ramp should be a convex hull");
        };
        assert_eq!(points.len(), 6);
        assert!(points.iter().all(|p| p.y >= 0.0 && p.y <= 5.0));
    }

    #[test]
    fn floor_is_large_and_flat() {
        let proto = ObjectFactory::new().create("floor").unwrap();
        let Geometry::Box { width, height, .. } = proto.geometry else {
            panic!("floor should be a box");
        };
        assert!(width >= 100.0);
        assert!(height < 1.0);
    }

    #[test]
    fn catalog_covers_every_kind() {
        let factory = ObjectFactory::new();
        let kinds: Vec<EntityKind> = factory.catalog().map(|(k, _)| k).collect();
        assert_eq!(kinds, EntityKind::ALL.to_vec());
    }

    #[test]
    fn create_is_repeatable() {
        let factory = ObjectFactory::new();
        assert_eq!(factory.create("ramp0"), factory.create("ramp0"));
    }
}
