//=========================================================================
// Frame Contexts
//=========================================================================
//
// The two capability bundles handed to entity and scene code.
//
// `StepContext` is passed to create/step/cleanup hooks: it can spawn and
// destroy entities, query the world, poll input, drive cameras and audio,
// and queue frame-end commands (scene switches, quit). `DrawContext` is
// passed to draw hooks: it issues draw calls through the renderer,
// applying the active camera's offset and culling.
//
// Engine-side requests that must not take effect mid-frame (switching
// scenes, quitting, resizing) are queued as `Command`s on `Services` and
// drained by the loop after the removal drain.
//
// The step/removal/teardown pass drivers also live here: they need to
// borrow the world mutably while each entity's box is temporarily out of
// its slot, and the context is the natural owner of that dance.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::assets::{AssetStore, Audio};
use crate::core::camera::{sprite_bounds, Camera, CameraSystem};
use crate::core::entity::{Entity, EntityBase, EntityId, EntityKind};
use crate::core::input::InputState;
use crate::core::render::{Color, Renderer};
use crate::core::world::World;

//=== Command =============================================================

/// Frame-end request queued by entity or scene code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch to the named scene after this frame completes.
    SwitchScene(String),

    /// Stop the engine loop after this frame completes.
    Quit,

    /// Ask the platform to resize the window.
    ResizeWindow(u32, u32),
}

//=== Services ============================================================

/// Shared engine-wide state that outlives any single scene.
pub struct Services {
    pub input: InputState,
    pub cameras: CameraSystem,
    pub(crate) window_size: (u32, u32),
    pub(crate) delta_time: f32,
    commands: Vec<Command>,
}

impl Services {
    pub(crate) fn new(window_size: (u32, u32)) -> Self {
        Self {
            input: InputState::new(),
            cameras: CameraSystem::new(),
            window_size,
            delta_time: 0.0,
            commands: Vec::new(),
        }
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Seconds the previous frame took.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub(crate) fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub(crate) fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}

//=== StepContext =========================================================

/// Capabilities available during create/step/cleanup hooks.
pub struct StepContext<'a, K: EntityKind> {
    pub(crate) world: &'a mut World<K>,
    pub(crate) services: &'a mut Services,
    pub(crate) assets: &'a dyn AssetStore,
    pub(crate) audio: &'a mut dyn Audio,
}

impl<'a, K: EntityKind> StepContext<'a, K> {
    pub(crate) fn new(
        world: &'a mut World<K>,
        services: &'a mut Services,
        assets: &'a dyn AssetStore,
        audio: &'a mut dyn Audio,
    ) -> Self {
        Self { world, services, assets, audio }
    }

    //=====================================================================
    // Pass Drivers (called by the engine loop)
    //=====================================================================

    /// Runs the add-drain and the step pass.
    ///
    /// Pending additions are promoted first: each runs its `create` hook,
    /// and additions queued during a `create` are promoted in the same
    /// pass. The step pass then iterates the live set as of its start;
    /// entities spawned during a `step` wait for the next frame.
    pub(crate) fn run_step(&mut self) {
        while let Some(mut entity) = self.world.pop_pending_add() {
            entity.create(self);
            self.world.promote(entity);
        }

        let count = self.world.slot_count();
        for i in 0..count {
            // The box leaves its slot while stepping so the entity can
            // hold &mut self alongside this context's world borrow.
            let Some(mut entity) = self.world.take_slot(i) else { continue };
            if entity.base().active {
                entity.step(self);
            }
            self.world.restore_slot(i, entity);
        }
    }

    /// Drains the pending-remove queue.
    ///
    /// Runs after the draw pass: an entity destroyed during a step still
    /// draws its final frame. Each removed entity runs its `cleanup` hook
    /// exactly once. Ids queued for a spawn that never got promoted are
    /// dropped without cleanup.
    pub(crate) fn run_removals(&mut self) {
        let ids = self.world.take_pending_removals();
        if ids.is_empty() {
            return;
        }
        for id in ids {
            if let Some(mut entity) = self.world.take_by_id(id) {
                entity.cleanup(self);
            } else if !self.world.remove_pending(id) {
                debug!("Ignoring removal of unknown {id}");
            }
        }
        self.world.compact();
    }

    /// Removes every entity, running cleanup hooks, and clears the world.
    ///
    /// Used when leaving a scene and when the engine shuts down. The id
    /// counter survives so a revisited scene issues fresh ids.
    pub(crate) fn run_teardown(&mut self) {
        let count = self.world.slot_count();
        for i in 0..count {
            if let Some(mut entity) = self.world.take_slot(i) {
                entity.cleanup(self);
            }
        }
        self.world.clear_entities();
    }

    //=====================================================================
    // Entity Lifecycle
    //=====================================================================

    /// Queues an entity for addition and returns its id immediately.
    ///
    /// The entity joins the world (and runs `create`) at the start of the
    /// next step pass.
    pub fn spawn(&mut self, entity: impl Entity<K> + 'static) -> EntityId {
        self.world.queue_add(Box::new(entity))
    }

    /// Queues an entity for removal at the end of this frame.
    ///
    /// The entity still steps and draws out the current frame. Unknown or
    /// already-queued ids are a silent no-op.
    pub fn destroy(&mut self, id: EntityId) {
        self.world.queue_remove(id);
    }

    //=====================================================================
    // World Queries
    //=====================================================================

    /// Read access to the world for richer queries.
    pub fn world(&self) -> &World<K> {
        self.world
    }

    /// Live entity ids of one kind, in insertion order.
    ///
    /// Returns an owned vec so the caller can keep using this context
    /// while iterating.
    pub fn entities_of_kind(&self, kind: K) -> Vec<EntityId> {
        self.world.entities_of_kind(kind).to_vec()
    }

    /// Shared state of another live entity.
    ///
    /// `None` for unknown ids and for the entity currently stepping (it
    /// already holds `&mut self`).
    pub fn entity_base(&self, id: EntityId) -> Option<&EntityBase> {
        self.world.entity_base(id)
    }

    /// Mutable variant of [`entity_base`](Self::entity_base).
    pub fn entity_base_mut(&mut self, id: EntityId) -> Option<&mut EntityBase> {
        self.world.entity_base_mut(id)
    }

    /// Sets the color the frame clears to before entity draws.
    pub fn set_background_color(&mut self, color: Color) {
        self.world.background_color = color;
    }

    //=====================================================================
    // Timing, Input & Window
    //=====================================================================

    /// Seconds the previous frame took.
    pub fn delta_time(&self) -> f32 {
        self.services.delta_time
    }

    pub fn input(&self) -> &InputState {
        &self.services.input
    }

    pub fn window_size(&self) -> (u32, u32) {
        self.services.window_size
    }

    /// Mouse position in world coordinates.
    ///
    /// With an active camera the screen position is unprojected through
    /// it; without one, screen and world coincide.
    pub fn mouse_world_position(&self) -> (f32, f32) {
        let (mx, my) = self.services.input.mouse_position();
        match self.services.cameras.active() {
            Some(camera) => camera.screen_to_world(mx, my),
            None => (mx, my),
        }
    }

    //=====================================================================
    // Cameras, Assets & Audio
    //=====================================================================

    pub fn cameras(&mut self) -> &mut CameraSystem {
        &mut self.services.cameras
    }

    pub fn assets(&self) -> &dyn AssetStore {
        self.assets
    }

    /// Plays a loaded sound. Unloaded names warn and play nothing.
    pub fn play_sound(&mut self, name: &str, volume: f32) {
        if self.assets.has_sound(name) {
            self.audio.play_sound(name, volume);
        } else {
            warn!("Sound '{name}' is not loaded");
        }
    }

    /// Stops all playing instances of a sound.
    pub fn stop_sound(&mut self, name: &str) {
        self.audio.stop_sound(name);
    }

    //=====================================================================
    // Frame-End Commands
    //=====================================================================

    /// Requests a switch to the named scene after this frame.
    pub fn switch_scene(&mut self, name: impl Into<String>) {
        self.services.push_command(Command::SwitchScene(name.into()));
    }

    /// Requests the engine stop after this frame.
    pub fn quit(&mut self) {
        self.services.push_command(Command::Quit);
    }

    /// Requests a window resize after this frame.
    pub fn resize_window(&mut self, width: u32, height: u32) {
        self.services.push_command(Command::ResizeWindow(width, height));
    }
}

//=== DrawContext =========================================================

/// Capabilities available during draw hooks.
///
/// Holds a copy of the active camera (the "lens") taken at the start of
/// the draw pass; moving the camera mid-draw affects the next frame.
pub struct DrawContext<'a> {
    renderer: &'a mut dyn Renderer,
    assets: &'a dyn AssetStore,
    lens: Option<Camera>,
}

impl<'a> DrawContext<'a> {
    pub(crate) fn new(
        renderer: &'a mut dyn Renderer,
        assets: &'a dyn AssetStore,
        lens: Option<Camera>,
    ) -> Self {
        Self { renderer, assets, lens }
    }

    //--- Draw State -------------------------------------------------------

    /// Sets the tint applied to subsequent draws.
    pub fn set_color(&mut self, color: Color) {
        self.renderer.set_color(color);
    }

    /// Sets the alpha applied to subsequent draws.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.renderer.set_alpha(alpha);
    }

    //--- Sprites ----------------------------------------------------------

    /// Draws a sprite at a world position.
    ///
    /// Under an active camera the position is offset into camera space
    /// and the sprite is culled against the view; sprites whose rotated
    /// bounds touch the view are never culled. An unloaded sprite name is
    /// a silent skip.
    pub fn draw_sprite(
        &mut self,
        x: f32,
        y: f32,
        name: &str,
        xscale: f32,
        yscale: f32,
        angle: f32,
    ) {
        let Some(info) = self.assets.sprite(name) else {
            log::trace!("Skipping draw of unloaded sprite '{name}'");
            return;
        };
        match self.lens {
            Some(camera) => {
                let (cx, cy) = camera.world_to_camera(x, y);
                let bounds = sprite_bounds(info, cx, cy, xscale, yscale, angle);
                if !camera.is_visible(bounds) {
                    return;
                }
                self.renderer.draw_sprite(cx, cy, name, xscale, yscale, angle);
            }
            None => self.renderer.draw_sprite(x, y, name, xscale, yscale, angle),
        }
    }

    //--- Primitives -------------------------------------------------------
    //
    // Primitives are camera-offset but never culled; they are cheap and
    // their extents are not known to the core (line width, text metrics).

    pub fn draw_rectangle(&mut self, x: f32, y: f32, w: f32, h: f32, filled: bool) {
        let (x, y) = self.offset(x, y);
        self.renderer.draw_rectangle(x, y, w, h, filled);
    }

    pub fn draw_circle(&mut self, x: f32, y: f32, radius: f32, filled: bool) {
        let (x, y) = self.offset(x, y);
        self.renderer.draw_circle(x, y, radius, filled);
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        let (x1, y1) = self.offset(x1, y1);
        let (x2, y2) = self.offset(x2, y2);
        self.renderer.draw_line(x1, y1, x2, y2, width);
    }

    /// Draws text with an optional named font (`None` uses the backend
    /// default).
    pub fn draw_text(&mut self, x: f32, y: f32, text: &str, scale: f32, font: Option<&str>) {
        let (x, y) = self.offset(x, y);
        self.renderer.draw_text(x, y, text, scale, font);
    }

    //--- Queries ----------------------------------------------------------

    pub fn assets(&self) -> &dyn AssetStore {
        self.assets
    }

    /// The camera this pass is drawing through, if any.
    pub fn lens(&self) -> Option<&Camera> {
        self.lens.as_ref()
    }

    //--- Internal Helpers -------------------------------------------------

    fn offset(&self, x: f32, y: f32) -> (f32, f32) {
        match self.lens {
            Some(camera) => camera.world_to_camera(x, y),
            None => (x, y),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
