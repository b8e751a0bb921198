use roadster_common::{EntityKey, Transform};
use std::collections::BTreeMap;
use std::fmt;

use crate::{Camera, RenderablePrototype};

/// Lookup key of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneKey {
    /// Reserved slot for the generated terrain. At most one terrain node exists.
    Terrain,
    Entity(EntityKey),
}

impl fmt::Display for SceneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terrain => f.write_str("terrain"),
            Self::Entity(key) => key.fmt(f),
        }
    }
}

/// A renderable owned by the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    key: SceneKey,
    prototype: RenderablePrototype,
    pub transform: Transform,
}

impl SceneNode {
    pub fn new(key: SceneKey, prototype: RenderablePrototype, transform: Transform) -> Self {
        Self {
            key,
            prototype,
            transform,
        }
    }

    pub fn key(&self) -> SceneKey {
        self.key
    }

    pub fn prototype(&self) -> &RenderablePrototype {
        &self.prototype
    }
}

/// Errors from scene mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("scene already has a node at {0}")]
    DuplicateKey(SceneKey),
}

/// Record of a scene mutation. Used to audit what a pass changed.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Inserted { key: SceneKey },
    Removed { key: SceneKey },
    TransformUpdated {
        key: SceneKey,
        old: Transform,
        new: Transform,
    },
    CameraMoved { old: Camera, new: Camera },
}

/// Keyed scene graph contract consumed by the bridge.
///
/// Lookups return `Option`: a missing node is the ordinary case on the first
/// tick an entity appears.
pub trait SceneGraph {
    fn get(&self, key: &SceneKey) -> Option<&SceneNode>;

    /// Insert a node. Fails if its key is already taken.
    fn insert(&mut self, node: SceneNode) -> Result<(), SceneError>;

    fn remove(&mut self, key: &SceneKey) -> Option<SceneNode>;

    /// Overwrite a node's transform. Returns false if the node is missing or
    /// already had that transform.
    fn set_transform(&mut self, key: &SceneKey, transform: Transform) -> bool;

    fn nodes(&self) -> Box<dyn Iterator<Item = &SceneNode> + '_>;

    fn camera(&self) -> &Camera;

    /// Returns false if the camera already matched.
    fn set_camera(&mut self, camera: Camera) -> bool;

    fn contains(&self, key: &SceneKey) -> bool {
        self.get(key).is_some()
    }

    fn keys(&self) -> Vec<SceneKey> {
        self.nodes().map(SceneNode::key).collect()
    }

    fn len(&self) -> usize {
        self.nodes().count()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory retained scene.
///
/// Uses BTreeMap so node iteration (and therefore rendering and debug output)
/// is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: BTreeMap<SceneKey, SceneNode>,
    camera: Camera,
    events: Vec<SceneEvent>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access to the mutation log.
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    /// Drain and return the mutation log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

impl SceneGraph for Scene {
    fn get(&self, key: &SceneKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    fn insert(&mut self, node: SceneNode) -> Result<(), SceneError> {
        let key = node.key();
        if self.nodes.contains_key(&key) {
            return Err(SceneError::DuplicateKey(key));
        }
        self.nodes.insert(key, node);
        self.events.push(SceneEvent::Inserted { key });
        Ok(())
    }

    fn remove(&mut self, key: &SceneKey) -> Option<SceneNode> {
        let removed = self.nodes.remove(key);
        if removed.is_some() {
            self.events.push(SceneEvent::Removed { key: *key });
        }
        removed
    }

    fn set_transform(&mut self, key: &SceneKey, transform: Transform) -> bool {
        let Some(node) = self.nodes.get_mut(key) else {
            return false;
        };
        if node.transform == transform {
            return false;
        }
        let old = node.transform;
        node.transform = transform;
        self.events.push(SceneEvent::TransformUpdated {
            key: *key,
            old,
            new: transform,
        });
        true
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &SceneNode> + '_> {
        Box::new(self.nodes.values())
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn set_camera(&mut self, camera: Camera) -> bool {
        if self.camera == camera {
            return false;
        }
        let old = self.camera;
        self.camera = camera;
        self.events.push(SceneEvent::CameraMoved { old, new: camera });
        true
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}
