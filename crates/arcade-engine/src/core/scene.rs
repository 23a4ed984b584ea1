use crate::api::types::EntityId;

/// Anything stored in a [`Scene`].
pub trait SceneEntity {
    fn id(&self) -> EntityId;

    /// Entities that flag themselves destroyed are queued by
    /// [`Scene::despawn_destroyed`] and dropped at the next frame boundary.
    fn is_destroyed(&self) -> bool {
        false
    }
}

/// Simple entity storage using a flat Vec.
/// Designed for small entity counts (tens, not millions).
///
/// Removal is deferred: `despawn` only queues the id. The entity stays
/// visible to `get` and `iter` until `apply_pending` runs at the end of the
/// frame, so callers iterating mid-frame never see the list shift.
pub struct Scene<T> {
    entities: Vec<T>,
    pending_despawns: Vec<EntityId>,
}

impl<T: SceneEntity> Scene<T> {
    pub fn new() -> Self {
        Self::with_capacity(32)
    }

    /// Create a scene with a specific entity capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
            pending_despawns: Vec::new(),
        }
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: T) {
        self.entities.push(entity);
    }

    /// Queue an entity for removal at the next `apply_pending`.
    /// Returns false if no entity with that id exists.
    /// Queuing the same id twice is harmless.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if !self.entities.iter().any(|e| e.id() == id) {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    /// Queue every entity that reports itself destroyed.
    pub fn despawn_destroyed(&mut self) {
        let destroyed = self
            .entities
            .iter()
            .filter(|e| e.is_destroyed())
            .map(|e| e.id());
        self.pending_despawns.extend(destroyed);
    }

    /// Whether the entity is queued for removal this frame.
    pub fn is_pending_despawn(&self, id: EntityId) -> bool {
        self.pending_despawns.contains(&id)
    }

    /// Commit queued removals. Returns how many entities were removed.
    pub fn apply_pending(&mut self) -> usize {
        if self.pending_despawns.is_empty() {
            return 0;
        }
        self.pending_despawns.sort();
        self.pending_despawns.dedup();
        let before = self.entities.len();
        let pending = &self.pending_despawns;
        self.entities
            .retain(|e| pending.binary_search(&e.id()).is_err());
        self.pending_despawns.clear();
        before - self.entities.len()
    }

    /// Get a reference to an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entities.iter().find(|e| e.id() == id)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    /// Iterate over all entities, including ones pending removal.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entities.iter()
    }

    /// Iterate over all entities mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entities.iter_mut()
    }

    /// Number of entities in the scene.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Clear all entities immediately, dropping any pending removals.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending_despawns.clear();
    }
}

impl<T: SceneEntity> Default for Scene<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy {
        id: EntityId,
        dead: bool,
    }

    impl Dummy {
        fn new(id: u32) -> Self {
            Self { id: EntityId(id), dead: false }
        }
    }

    impl SceneEntity for Dummy {
        fn id(&self) -> EntityId {
            self.id
        }

        fn is_destroyed(&self) -> bool {
            self.dead
        }
    }

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        scene.spawn(Dummy::new(1));
        assert!(scene.get(EntityId(1)).is_some());
        assert!(scene.get(EntityId(2)).is_none());
    }

    #[test]
    fn despawn_is_deferred_until_apply() {
        let mut scene = Scene::new();
        scene.spawn(Dummy::new(1));
        scene.spawn(Dummy::new(2));
        assert!(scene.despawn(EntityId(1)));
        assert_eq!(scene.len(), 2);
        assert!(scene.get(EntityId(1)).is_some());
        assert!(scene.is_pending_despawn(EntityId(1)));

        assert_eq!(scene.apply_pending(), 1);
        assert_eq!(scene.len(), 1);
        assert!(scene.get(EntityId(1)).is_none());
    }

    #[test]
    fn duplicate_despawns_are_idempotent() {
        let mut scene = Scene::new();
        scene.spawn(Dummy::new(1));
        scene.spawn(Dummy::new(2));
        scene.despawn(EntityId(1));
        scene.despawn(EntityId(1));
        scene.despawn(EntityId(1));
        assert_eq!(scene.apply_pending(), 1);
        assert!(scene.get(EntityId(2)).is_some());
    }

    #[test]
    fn despawn_unknown_returns_false() {
        let mut scene: Scene<Dummy> = Scene::new();
        assert!(!scene.despawn(EntityId(9)));
        assert_eq!(scene.apply_pending(), 0);
    }

    #[test]
    fn destroyed_entities_are_collected() {
        let mut scene = Scene::new();
        scene.spawn(Dummy::new(1));
        scene.spawn(Dummy::new(2));
        scene.get_mut(EntityId(2)).unwrap().dead = true;
        scene.despawn_destroyed();
        scene.apply_pending();
        assert_eq!(scene.len(), 1);
        assert!(scene.get(EntityId(1)).is_some());
    }
}
