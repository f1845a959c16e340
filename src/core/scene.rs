//=========================================================================
// Scenes
//=========================================================================
//
// Named game states (title, gameplay, game over) and the registry that
// switches between them.
//
// A scene is hook-only logic layered over a world the director owns.
// Each registered scene keeps its own world; entering a scene runs
// `on_create` against an empty world, leaving it tears every entity down
// and then runs `on_cleanup`. Revisiting a scene therefore restarts it
// from scratch.
//
// Switches requested mid-frame are deferred: the director records the
// request and the engine loop applies it at the frame boundary, so
// entities never step in a half-switched world.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::context::{DrawContext, StepContext};
use crate::core::entity::EntityKind;
use crate::core::world::World;

//=== Scene Trait =========================================================

/// Per-scene logic hooks.
///
/// All hooks default to no-ops; a scene implements the ones it needs.
/// Entity hooks run first each frame; these run after them.
pub trait Scene<K: EntityKind> {
    /// Runs once when the scene becomes current, against an empty world.
    ///
    /// Spawn the scene's starting entities here; they are promoted at the
    /// start of the first frame's step pass.
    fn on_create(&mut self, ctx: &mut StepContext<'_, K>) {
        let _ = ctx;
    }

    /// Runs every frame after the entity step pass.
    fn on_step(&mut self, ctx: &mut StepContext<'_, K>) {
        let _ = ctx;
    }

    /// Runs every frame after the entity draw pass.
    ///
    /// The usual place for HUD and overlay drawing, since it lands on top
    /// of every entity.
    fn on_draw(&mut self, ctx: &mut DrawContext<'_>) {
        let _ = ctx;
    }

    /// Runs once when the scene stops being current, after its entities
    /// were torn down.
    fn on_cleanup(&mut self, ctx: &mut StepContext<'_, K>) {
        let _ = ctx;
    }
}

//=== SceneSlot ===========================================================

/// One registered scene: its logic plus the world it plays in.
pub(crate) struct SceneSlot<K: EntityKind> {
    pub(crate) world: World<K>,
    pub(crate) logic: Box<dyn Scene<K>>,
}

//=== SceneDirector =======================================================

/// Registry of scenes and the current/pending selection.
///
/// The director only records intent; the engine loop performs the actual
/// switch (teardown, hook calls) at the frame boundary.
pub struct SceneDirector<K: EntityKind> {
    scenes: HashMap<String, SceneSlot<K>>,
    current: Option<String>,
    pending: Option<String>,
}

impl<K: EntityKind> SceneDirector<K> {
    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            current: None,
            pending: None,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene under a name.
    ///
    /// Re-registering a name replaces the previous scene (and discards
    /// its world) with a warning.
    pub fn register(&mut self, name: impl Into<String>, scene: impl Scene<K> + 'static) {
        let name = name.into();
        let slot = SceneSlot {
            world: World::new(),
            logic: Box::new(scene),
        };
        if self.scenes.insert(name.clone(), slot).is_some() {
            warn!("Scene '{name}' was already registered and has been replaced");
        } else {
            debug!("Registered scene '{name}'");
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    //--- Selection --------------------------------------------------------

    /// Name of the current scene, if any.
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Records a deferred switch request.
    ///
    /// Unknown names warn and leave the current scene running. A second
    /// request in the same frame overrides the first.
    pub fn request_switch(&mut self, name: &str) {
        if self.scenes.contains_key(name) {
            self.pending = Some(name.to_owned());
        } else {
            warn!("Ignoring switch to unregistered scene '{name}'");
        }
    }

    /// Takes the pending switch request, if one was recorded.
    pub(crate) fn take_pending(&mut self) -> Option<String> {
        self.pending.take()
    }

    /// Makes a scene current without any lifecycle processing.
    ///
    /// The engine loop calls this between the old scene's teardown and
    /// the new scene's `on_create`. Unknown names warn and change
    /// nothing.
    pub(crate) fn set_current(&mut self, name: &str) -> bool {
        if self.scenes.contains_key(name) {
            self.current = Some(name.to_owned());
            true
        } else {
            warn!("Cannot make unregistered scene '{name}' current");
            false
        }
    }

    //--- Access -----------------------------------------------------------

    /// Split access to the current scene's world and logic.
    pub(crate) fn current_parts(&mut self) -> Option<(&mut World<K>, &mut dyn Scene<K>)> {
        let name = self.current.as_ref()?;
        let slot = self.scenes.get_mut(name)?;
        Some((&mut slot.world, slot.logic.as_mut()))
    }

    /// Read access to the current scene's world.
    pub fn current_world(&self) -> Option<&World<K>> {
        let name = self.current.as_ref()?;
        self.scenes.get(name).map(|slot| &slot.world)
    }
}

//--- Trait Implementations -----------------------------------------------

impl<K: EntityKind> Default for SceneDirector<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
