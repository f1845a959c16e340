//=========================================================================
// Entity Model
//=========================================================================
//
// Game objects and their lifecycle contract.
//
// Every entity embeds an [`EntityBase`] carrying the shared state the
// engine understands (position, sprite, depth, bounding mask, ...) and
// implements the [`Entity`] trait for its behavior. The world drives four
// lifecycle hooks in a fixed order:
//
// ```text
// spawn → create() → step()* → draw()* → destroy → cleanup()
// ```
//
// `create` runs once when the entity is promoted from the pending-add
// queue, before its first step. `cleanup` runs once when the entity is
// drained from the pending-remove queue, after its last draw.
//
// Default `step`/`draw` implementations cover the common case; overriders
// that still want the base behavior call the [`EntityBase`] helpers
// themselves (e.g. `self.base_mut().snapshot_position()` at the top of a
// custom `step`).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::assets::AssetStore;
use crate::core::context::{DrawContext, StepContext};
use crate::core::math::{self, Rect};
use crate::core::render::Color;

//=== EntityId ============================================================

/// Stable handle to a live entity.
///
/// Ids are unique per world, monotonically increasing, and never reused,
/// even across scene restarts. A stale id simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

//=== EntityKind ==========================================================

/// Marker trait for the game's entity classification enum.
///
/// The world keeps a per-kind index so queries like "all bullets" stay
/// cheap. Games typically implement this on a fieldless enum:
///
/// ```
/// use glimmer_engine::core::entity::EntityKind;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Kind { Player, Enemy, Bullet }
///
/// impl EntityKind for Kind {}
/// ```
pub trait EntityKind: Copy + Eq + Hash + Debug + 'static {}

//=== Mask ================================================================

/// Collision mask as offsets from the entity position.
///
/// Offsets are inclusive: a sprite-sized mask for a 32px-wide sprite runs
/// from `left = 0` to `right = 31`. Scaling the entity scales the mask.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mask {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Mask {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Mask covering a sprite of the given pixel size.
    pub fn for_sprite(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, (width - 1.0).max(0.0), (height - 1.0).max(0.0))
    }
}

//=== EntityBase ==========================================================

/// Shared per-entity state driven by the engine.
///
/// Embed one of these in every entity struct and hand it out through
/// [`Entity::base`]/[`Entity::base_mut`].
#[derive(Debug, Clone)]
pub struct EntityBase {
    //--- Position ---------------------------------------------------------
    pub x: f32,
    pub y: f32,

    /// Position at the start of the current step, before any movement.
    pub xprevious: f32,
    pub yprevious: f32,

    //--- Appearance -------------------------------------------------------
    /// Sprite name, or `None` to draw nothing by default.
    pub sprite: Option<String>,

    /// Cached dimensions of the assigned sprite (0 when unassigned).
    pub sprite_width: f32,
    pub sprite_height: f32,

    pub xscale: f32,
    pub yscale: f32,

    /// Rotation in degrees, counter-clockwise on screen.
    pub angle: f32,

    pub alpha: f32,
    pub tint: Color,

    /// Draw depth. Higher depths draw first (further from the viewer).
    pub depth: i32,

    //--- Flags ------------------------------------------------------------
    /// Inactive entities skip their step but still draw.
    pub active: bool,

    /// Invisible entities skip their draw but still step.
    pub visible: bool,

    //--- Collision --------------------------------------------------------
    pub mask: Mask,

    //--- Identity ---------------------------------------------------------
    /// `None` until the world promotes the entity and assigns an id.
    id: Option<EntityId>,
}

impl EntityBase {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            xprevious: x,
            yprevious: y,
            sprite: None,
            sprite_width: 0.0,
            sprite_height: 0.0,
            xscale: 1.0,
            yscale: 1.0,
            angle: 0.0,
            alpha: 1.0,
            tint: Color::WHITE,
            depth: 0,
            active: true,
            visible: true,
            mask: Mask::default(),
            id: None,
        }
    }

    //--- Identity ---------------------------------------------------------

    /// The id assigned by the world, or `None` while detached.
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    //--- Sprite -----------------------------------------------------------

    /// Assigns a sprite and refreshes cached dimensions plus the mask.
    ///
    /// An unloaded sprite name still sticks (draw calls will skip it) but
    /// leaves dimensions and mask at zero with a warning.
    pub fn set_sprite(&mut self, name: &str, assets: &dyn AssetStore) {
        self.sprite = Some(name.to_owned());
        self.refresh_sprite_dimensions(assets);
    }

    /// Re-reads the assigned sprite's dimensions and resets the mask to
    /// cover it.
    pub fn refresh_sprite_dimensions(&mut self, assets: &dyn AssetStore) {
        let Some(name) = &self.sprite else { return };
        match assets.sprite(name) {
            Some(info) => {
                self.sprite_width = info.width;
                self.sprite_height = info.height;
                self.mask = Mask::for_sprite(info.width, info.height);
            }
            None => {
                warn!("Sprite '{name}' is not loaded; dimensions unavailable");
                self.sprite_width = 0.0;
                self.sprite_height = 0.0;
                self.mask = Mask::default();
            }
        }
    }

    //--- Step Helpers -----------------------------------------------------

    /// Records the current position as the previous-frame position.
    ///
    /// Called at the top of the default step, before any movement.
    pub fn snapshot_position(&mut self) {
        self.xprevious = self.x;
        self.yprevious = self.y;
    }

    //--- Bounding Box -----------------------------------------------------

    pub fn bbox_left(&self) -> f32 {
        self.x + self.mask.left * self.xscale
    }

    pub fn bbox_top(&self) -> f32 {
        self.y + self.mask.top * self.yscale
    }

    pub fn bbox_right(&self) -> f32 {
        self.x + self.mask.right * self.xscale
    }

    pub fn bbox_bottom(&self) -> f32 {
        self.y + self.mask.bottom * self.yscale
    }

    /// The scaled bounding box as a rectangle in world space.
    pub fn bbox(&self) -> Rect {
        let left = self.bbox_left();
        let top = self.bbox_top();
        Rect::new(left, top, self.bbox_right() - left, self.bbox_bottom() - top)
    }

    /// Point test against the bounding box, edges inclusive.
    pub fn point_in_bbox(&self, px: f32, py: f32) -> bool {
        px >= self.bbox_left()
            && px <= self.bbox_right()
            && py >= self.bbox_top()
            && py <= self.bbox_bottom()
    }

    /// Bounding-box overlap test. Touching edges count as a collision.
    pub fn overlaps(&self, other: &EntityBase) -> bool {
        !(self.bbox_right() < other.bbox_left()
            || self.bbox_left() > other.bbox_right()
            || self.bbox_bottom() < other.bbox_top()
            || self.bbox_top() > other.bbox_bottom())
    }

    //--- Spatial Queries --------------------------------------------------

    /// Euclidean distance between entity positions.
    pub fn distance_to(&self, other: &EntityBase) -> f32 {
        math::point_distance(self.x, self.y, other.x, other.y)
    }

    /// Direction toward another entity in degrees, [0, 360).
    ///
    /// Follows the screen convention: 0 is right, 90 is up.
    pub fn direction_to(&self, other: &EntityBase) -> f32 {
        math::point_direction(self.x, self.y, other.x, other.y)
    }
}

//=== Entity Trait ========================================================

/// Behavior contract for game objects.
///
/// `base`/`base_mut`/`kind` are the required plumbing; the lifecycle
/// hooks all have default implementations.
pub trait Entity<K: EntityKind> {
    /// Shared engine-driven state.
    fn base(&self) -> &EntityBase;

    fn base_mut(&mut self) -> &mut EntityBase;

    /// Classification used by the world's per-kind index.
    fn kind(&self) -> K;

    /// Runs once when the entity is promoted into the world.
    ///
    /// The id is already assigned; spawning more entities here is fine,
    /// they are promoted within the same pass. The default refreshes the
    /// sprite dimensions and mask against the engine's assets, covering
    /// entities built before the asset catalog was available.
    fn create(&mut self, ctx: &mut StepContext<'_, K>) {
        self.base_mut().refresh_sprite_dimensions(ctx.assets());
    }

    /// Runs every frame while the entity is active.
    ///
    /// The default snapshots the previous-frame position and nothing
    /// else. Overriders wanting that behavior call
    /// `self.base_mut().snapshot_position()` first.
    fn step(&mut self, ctx: &mut StepContext<'_, K>) {
        let _ = ctx;
        self.base_mut().snapshot_position();
    }

    /// Runs every frame while the entity is visible, in depth order.
    ///
    /// The default draws the assigned sprite with the base's tint, alpha,
    /// scale, and angle. Entities without a sprite draw nothing.
    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        let base = self.base();
        if let Some(name) = base.sprite.clone() {
            ctx.set_color(base.tint);
            ctx.set_alpha(base.alpha);
            ctx.draw_sprite(base.x, base.y, &name, base.xscale, base.yscale, base.angle);
        }
    }

    /// Runs once when the entity leaves the world (destroy or teardown).
    fn cleanup(&mut self, ctx: &mut StepContext<'_, K>) {
        let _ = ctx;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
