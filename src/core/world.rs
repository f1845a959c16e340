//=========================================================================
// World
//=========================================================================
//
// Entity container with deferred mutation.
//
// The world never adds or removes entities mid-pass. Spawns land in a
// pending-add queue and are promoted at the start of the next step pass;
// destroys land in a pending-remove queue and are drained after the draw
// pass. Iteration order is insertion order and survives removals.
//
// Ids are assigned at queue time, monotonically, and never reused, so a
// handle to a destroyed entity simply stops resolving instead of
// aliasing a newcomer.
//
// The pass machinery itself (promotion, stepping, removal drains) lives
// on `StepContext`, which borrows the world; this module owns the storage
// and the bookkeeping.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cmp;
use std::collections::{HashMap, VecDeque};

//=== Internal Dependencies ===============================================

use crate::core::entity::{Entity, EntityBase, EntityId, EntityKind};
use crate::core::render::Color;

//=== Slot ================================================================

/// One entity's storage cell.
///
/// `entity` is `None` only while the box is temporarily taken out (during
/// its own step, or after cleanup pending compaction).
struct Slot<K: EntityKind> {
    id: EntityId,
    kind: K,
    entity: Option<Box<dyn Entity<K>>>,
}

//=== World ===============================================================

/// Container for all live entities of one scene.
pub struct World<K: EntityKind> {
    slots: Vec<Slot<K>>,
    index: HashMap<EntityId, usize>,
    kinds: HashMap<K, Vec<EntityId>>,

    pending_add: VecDeque<Box<dyn Entity<K>>>,
    pending_remove: Vec<EntityId>,

    /// Color the frame is cleared to before any entity draws.
    pub background_color: Color,

    next_id: u64,
}

impl<K: EntityKind> World<K> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            kinds: HashMap::new(),
            pending_add: VecDeque::new(),
            pending_remove: Vec::new(),
            background_color: Color::BLACK,
            next_id: 0,
        }
    }

    //=====================================================================
    // Deferred Mutation
    //=====================================================================

    /// Queues an entity for addition and assigns its id immediately.
    ///
    /// The entity is promoted (and its `create` hook run) at the start of
    /// the next step pass.
    pub fn queue_add(&mut self, mut entity: Box<dyn Entity<K>>) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        entity.base_mut().assign_id(id);
        self.pending_add.push_back(entity);
        id
    }

    /// Queues an entity for removal at the end of the current frame.
    ///
    /// Duplicate and unknown ids are harmless; the drain skips them.
    pub fn queue_remove(&mut self, id: EntityId) {
        if !self.pending_remove.contains(&id) {
            self.pending_remove.push(id);
        }
    }

    //=====================================================================
    // Queries
    //=====================================================================

    /// Number of live (promoted) entities.
    pub fn entity_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether an id resolves to a live entity.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Live entity ids of one kind, in insertion order.
    pub fn entities_of_kind(&self, kind: K) -> &[EntityId] {
        self.kinds.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of live entities of one kind.
    pub fn count_entities_of_kind(&self, kind: K) -> usize {
        self.entities_of_kind(kind).len()
    }

    /// Trait-object view of a live entity.
    ///
    /// Same availability rules as [`entity_base`](Self::entity_base).
    pub fn entity(&self, id: EntityId) -> Option<&dyn Entity<K>> {
        let i = *self.index.get(&id)?;
        self.slots[i].entity.as_deref()
    }

    /// Shared state of a live entity.
    ///
    /// Returns `None` for unknown ids and for the entity currently being
    /// stepped (it already has `&mut self`).
    pub fn entity_base(&self, id: EntityId) -> Option<&EntityBase> {
        let i = *self.index.get(&id)?;
        self.slots[i].entity.as_ref().map(|e| e.base())
    }

    /// Mutable variant of [`entity_base`](Self::entity_base).
    pub fn entity_base_mut(&mut self, id: EntityId) -> Option<&mut EntityBase> {
        let i = *self.index.get(&id)?;
        self.slots[i].entity.as_mut().map(|e| e.base_mut())
    }

    //=====================================================================
    // Pass Machinery (driven by StepContext and the engine loop)
    //=====================================================================

    //--- Promotion --------------------------------------------------------

    /// Pops one queued addition, oldest first.
    pub(crate) fn pop_pending_add(&mut self) -> Option<Box<dyn Entity<K>>> {
        self.pending_add.pop_front()
    }

    /// Installs a created entity into the live set and indexes.
    pub(crate) fn promote(&mut self, entity: Box<dyn Entity<K>>) {
        let id = match entity.base().id() {
            Some(id) => id,
            // queue_add always assigns; a missing id is a logic error
            // upstream, drop the entity rather than corrupt the index.
            None => {
                log::warn!("Dropping entity promoted without an id");
                return;
            }
        };
        let kind = entity.kind();
        self.index.insert(id, self.slots.len());
        self.kinds.entry(kind).or_default().push(id);
        self.slots.push(Slot { id, kind, entity: Some(entity) });
    }

    //--- Slot Access ------------------------------------------------------

    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Takes the box out of a slot, leaving the slot in place.
    pub(crate) fn take_slot(&mut self, i: usize) -> Option<Box<dyn Entity<K>>> {
        self.slots.get_mut(i).and_then(|s| s.entity.take())
    }

    /// Puts a taken box back into its slot.
    pub(crate) fn restore_slot(&mut self, i: usize, entity: Box<dyn Entity<K>>) {
        if let Some(slot) = self.slots.get_mut(i) {
            slot.entity = Some(entity);
        }
    }

    /// Takes a live entity's box by id, for the removal drain.
    pub(crate) fn take_by_id(&mut self, id: EntityId) -> Option<Box<dyn Entity<K>>> {
        let i = *self.index.get(&id)?;
        self.take_slot(i)
    }

    /// Direct mutable access for the draw pass.
    pub(crate) fn entity_at_mut(&mut self, i: usize) -> Option<&mut (dyn Entity<K> + 'static)> {
        self.slots.get_mut(i).and_then(|s| s.entity.as_deref_mut())
    }

    //--- Removal ----------------------------------------------------------

    /// Drains the queued removal ids for processing.
    pub(crate) fn take_pending_removals(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.pending_remove)
    }

    /// Drops a not-yet-promoted entity from the pending-add queue.
    ///
    /// Covers spawn-then-destroy within a single frame; the entity never
    /// ran `create`, so no cleanup is owed.
    pub(crate) fn remove_pending(&mut self, id: EntityId) -> bool {
        let before = self.pending_add.len();
        self.pending_add.retain(|e| e.base().id() != Some(id));
        self.pending_add.len() != before
    }

    /// Drops empty slots and rebuilds the id and kind indexes.
    ///
    /// Insertion order of the survivors is preserved.
    pub(crate) fn compact(&mut self) {
        self.slots.retain(|s| s.entity.is_some());
        self.index.clear();
        for vec in self.kinds.values_mut() {
            vec.clear();
        }
        for (i, slot) in self.slots.iter().enumerate() {
            self.index.insert(slot.id, i);
            self.kinds.entry(slot.kind).or_default().push(slot.id);
        }
    }

    //--- Teardown ---------------------------------------------------------

    /// Clears all storage after a teardown pass.
    ///
    /// Never-promoted pending entities are dropped without cleanup (they
    /// never ran `create`). The id counter is kept so a scene restart
    /// keeps issuing fresh ids.
    pub(crate) fn clear_entities(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.kinds.clear();
        self.pending_add.clear();
        self.pending_remove.clear();
    }

    //--- Draw Order -------------------------------------------------------

    /// Slot indices in draw order: higher depth first, ties in insertion
    /// order (stable sort).
    pub(crate) fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.slots.len()).collect();
        order.sort_by_key(|&i| {
            let depth = self.slots[i]
                .entity
                .as_ref()
                .map(|e| e.base().depth)
                .unwrap_or(i32::MIN);
            cmp::Reverse(depth)
        });
        order
    }
}

//--- Trait Implementations -----------------------------------------------

impl<K: EntityKind> Default for World<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::EntityBase;

    //--- Test Fixtures ----------------------------------------------------

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Crate,
        Barrel,
    }

    impl EntityKind for Kind {}

    struct Prop {
        base: EntityBase,
        kind: Kind,
    }

    impl Prop {
        fn boxed(kind: Kind, depth: i32) -> Box<dyn Entity<Kind>> {
            let mut base = EntityBase::new(0.0, 0.0);
            base.depth = depth;
            Box::new(Prop { base, kind })
        }
    }

    impl Entity<Kind> for Prop {
        fn base(&self) -> &EntityBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut EntityBase {
            &mut self.base
        }

        fn kind(&self) -> Kind {
            self.kind
        }
    }

    /// Queues and immediately promotes, bypassing the create hook.
    fn add_live(world: &mut World<Kind>, kind: Kind, depth: i32) -> EntityId {
        let id = world.queue_add(Prop::boxed(kind, depth));
        let entity = world.pending_add.pop_back().expect("just queued");
        world.promote(entity);
        id
    }

    //--- Id Assignment ----------------------------------------------------

    #[test]
    fn ids_are_monotonic_and_unique() {
        let mut world = World::new();
        let a = world.queue_add(Prop::boxed(Kind::Crate, 0));
        let b = world.queue_add(Prop::boxed(Kind::Crate, 0));
        let c = world.queue_add(Prop::boxed(Kind::Barrel, 0));
        assert!(a < b && b < c);
    }

    #[test]
    fn queued_entity_is_not_alive_until_promoted() {
        let mut world = World::new();
        let id = world.queue_add(Prop::boxed(Kind::Crate, 0));
        assert!(!world.is_alive(id));
        assert_eq!(world.entity_count(), 0);

        let entity = world.pop_pending_add().expect("queued");
        world.promote(entity);
        assert!(world.is_alive(id));
        assert_eq!(world.entity_count(), 1);
    }

    //--- Kind Index -------------------------------------------------------

    #[test]
    fn kind_index_tracks_insertion_order() {
        let mut world = World::new();
        let a = add_live(&mut world, Kind::Crate, 0);
        let _b = add_live(&mut world, Kind::Barrel, 0);
        let c = add_live(&mut world, Kind::Crate, 0);

        assert_eq!(world.entities_of_kind(Kind::Crate), &[a, c]);
        assert_eq!(world.entities_of_kind(Kind::Barrel).len(), 1);
    }

    #[test]
    fn unknown_kind_yields_empty_slice() {
        let world: World<Kind> = World::new();
        assert!(world.entities_of_kind(Kind::Barrel).is_empty());
        assert_eq!(world.count_entities_of_kind(Kind::Barrel), 0);
    }

    #[test]
    fn entity_lookup_sees_live_entities_only() {
        let mut world = World::new();
        let queued = world.queue_add(Prop::boxed(Kind::Barrel, 0));
        let live = add_live(&mut world, Kind::Crate, 7);

        assert!(world.entity(queued).is_none());
        let found = world.entity(live).expect("promoted entity is visible");
        assert_eq!(found.kind(), Kind::Crate);
        assert_eq!(found.base().depth, 7);
        assert_eq!(world.count_entities_of_kind(Kind::Crate), 1);
    }

    //--- Removal & Compaction ---------------------------------------------

    #[test]
    fn compact_preserves_survivor_order_and_reindexes() {
        let mut world = World::new();
        let a = add_live(&mut world, Kind::Crate, 0);
        let b = add_live(&mut world, Kind::Crate, 0);
        let c = add_live(&mut world, Kind::Crate, 0);

        // Simulate the removal drain for b.
        drop(world.take_by_id(b));
        world.compact();

        assert_eq!(world.entity_count(), 2);
        assert!(!world.is_alive(b));
        assert_eq!(world.entities_of_kind(Kind::Crate), &[a, c]);
        assert!(world.entity_base(a).is_some());
        assert!(world.entity_base(c).is_some());
    }

    #[test]
    fn queue_remove_deduplicates() {
        let mut world = World::new();
        let id = add_live(&mut world, Kind::Crate, 0);
        world.queue_remove(id);
        world.queue_remove(id);
        assert_eq!(world.take_pending_removals(), vec![id]);
    }

    #[test]
    fn remove_pending_drops_unpromoted_entity() {
        let mut world = World::new();
        let id = world.queue_add(Prop::boxed(Kind::Crate, 0));
        assert!(world.remove_pending(id));
        assert!(world.pop_pending_add().is_none());
    }

    //--- Id Reuse ---------------------------------------------------------

    #[test]
    fn ids_are_never_reused_after_removal() {
        let mut world = World::new();
        let a = add_live(&mut world, Kind::Crate, 0);
        drop(world.take_by_id(a));
        world.compact();

        let b = add_live(&mut world, Kind::Crate, 0);
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn clear_entities_keeps_the_id_counter() {
        let mut world = World::new();
        let a = add_live(&mut world, Kind::Crate, 0);
        world.clear_entities();
        assert_eq!(world.entity_count(), 0);

        let b = add_live(&mut world, Kind::Crate, 0);
        assert!(b > a, "restart must keep issuing fresh ids");
    }

    //--- Draw Order -------------------------------------------------------

    #[test]
    fn draw_order_is_depth_descending_with_stable_ties() {
        let mut world = World::new();
        let _a = add_live(&mut world, Kind::Crate, 3);
        let _b = add_live(&mut world, Kind::Crate, 1);
        let _c = add_live(&mut world, Kind::Crate, 2);
        let _d = add_live(&mut world, Kind::Crate, 2);

        // Depths: a=3, c=2, d=2 (insertion order), b=1.
        assert_eq!(world.draw_order(), vec![0, 2, 3, 1]);
    }

    //--- Stale Handles ----------------------------------------------------

    #[test]
    fn stale_id_stops_resolving() {
        let mut world = World::new();
        let id = add_live(&mut world, Kind::Crate, 0);
        drop(world.take_by_id(id));
        world.compact();

        assert!(world.entity_base(id).is_none());
        assert!(world.entity_base_mut(id).is_none());
    }
}
