//=========================================================================
// Camera System
//=========================================================================
//
// A camera maps a world-space view rectangle onto a screen-space viewport
// rectangle. While a camera is active, every draw call issued by the scene
// pass is offset into camera space and culled against the view; the
// renderer composites the camera's surface into the viewport at frame end,
// scaling when view and viewport sizes differ.
//
// At most one camera is active at a time. With no active camera, draws go
// straight to the screen untransformed and nothing is culled.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::assets::SpriteInfo;
use crate::core::math::Rect;

//=== CameraId ============================================================

/// Handle to a camera registered with the [`CameraSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraId(u32);

impl std::fmt::Display for CameraId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "camera#{}", self.0)
    }
}

//=== Camera ==============================================================

/// Default view/viewport dimensions for newly created cameras.
const DEFAULT_SIZE: (f32, f32) = (800.0, 600.0);

/// One view → viewport mapping.
///
/// `view` is the world region the camera sees; `viewport` is the screen
/// region it renders into. The backend owns the actual render surface,
/// sized to the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    id: CameraId,
    pub view: Rect,
    pub viewport: Rect,
}

impl Camera {
    fn new(id: CameraId, view: Rect, viewport: Rect) -> Self {
        Self { id, view, viewport }
    }

    pub fn id(&self) -> CameraId {
        self.id
    }

    //--- Transforms -------------------------------------------------------

    /// World coordinates → camera-surface coordinates.
    pub fn world_to_camera(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.view.x, y - self.view.y)
    }

    /// Camera-surface coordinates → viewport-relative coordinates.
    ///
    /// Applies the view → viewport scale factor component-wise.
    pub fn camera_to_viewport(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.viewport.w / self.view.w, y * self.viewport.h / self.view.h)
    }

    /// World coordinates → absolute screen coordinates.
    pub fn world_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        let (cx, cy) = self.world_to_camera(x, y);
        let (vx, vy) = self.camera_to_viewport(cx, cy);
        (vx + self.viewport.x, vy + self.viewport.y)
    }

    /// Absolute screen coordinates → world coordinates.
    ///
    /// Exact inverse of [`world_to_screen`](Self::world_to_screen) for
    /// nonzero view/viewport sizes. Used for pointer queries.
    pub fn screen_to_world(&self, sx: f32, sy: f32) -> (f32, f32) {
        let vx = sx - self.viewport.x;
        let vy = sy - self.viewport.y;
        (
            vx * self.view.w / self.viewport.w + self.view.x,
            vy * self.view.h / self.viewport.h + self.view.y,
        )
    }

    //--- Culling ----------------------------------------------------------

    /// Whether camera-space bounds touch the visible view region.
    ///
    /// Bounds exactly on the view edge count as visible; culling may only
    /// skip work, never change what ends up on screen.
    pub fn is_visible(&self, bounds: Rect) -> bool {
        !(bounds.right() < 0.0
            || bounds.x > self.view.w
            || bounds.bottom() < 0.0
            || bounds.y > self.view.h)
    }
}

//=== Sprite Bounds =======================================================

/// Axis-aligned bounds of a sprite drawn at `(x, y)` with the given scale
/// and rotation, in the same space as `(x, y)`.
///
/// Rotation uses the exact AABB of the rotated quad (corners rotated
/// around the sprite origin), so a cull test over these bounds never
/// rejects a sprite that would have produced pixels.
pub(crate) fn sprite_bounds(
    info: &SpriteInfo,
    x: f32,
    y: f32,
    xscale: f32,
    yscale: f32,
    angle: f32,
) -> Rect {
    let w = info.width * xscale.abs();
    let h = info.height * yscale.abs();
    let ox = info.origin_x * xscale.abs();
    let oy = info.origin_y * yscale.abs();

    if angle == 0.0 {
        return Rect::new(x - ox, y - oy, w, h);
    }

    // Corners relative to the rotation anchor (the sprite origin).
    let corners = [
        (-ox, -oy),
        (w - ox, -oy),
        (-ox, h - oy),
        (w - ox, h - oy),
    ];

    let rad = angle.to_radians();
    let (sin, cos) = (rad.sin(), rad.cos());

    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;

    for (cx, cy) in corners {
        // Y-down screen rotation, counter-clockwise for positive angles.
        let rx = cx * cos + cy * sin;
        let ry = -cx * sin + cy * cos;
        min_x = min_x.min(rx);
        min_y = min_y.min(ry);
        max_x = max_x.max(rx);
        max_y = max_y.max(ry);
    }

    Rect::new(x + min_x, y + min_y, max_x - min_x, max_y - min_y)
}

//=== CameraSystem ========================================================

/// Registry of cameras plus the active-camera selection.
#[derive(Debug, Default)]
pub struct CameraSystem {
    cameras: HashMap<CameraId, Camera>,
    active: Option<CameraId>,
    next_id: u32,
}

impl CameraSystem {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Creation & Lookup ------------------------------------------------

    /// Creates a camera with default view and viewport (800×600 at origin).
    pub fn create(&mut self) -> CameraId {
        let (w, h) = DEFAULT_SIZE;
        self.create_with(Rect::new(0.0, 0.0, w, h), Rect::new(0.0, 0.0, w, h))
    }

    /// Creates a camera with explicit view and viewport rectangles.
    pub fn create_with(&mut self, view: Rect, viewport: Rect) -> CameraId {
        let id = CameraId(self.next_id);
        self.next_id += 1;
        self.cameras.insert(id, Camera::new(id, view, viewport));
        debug!("Created {id} (view {view:?}, viewport {viewport:?})");
        id
    }

    pub fn camera(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.get(&id)
    }

    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.cameras.get_mut(&id)
    }

    //--- Active Selection -------------------------------------------------

    /// Marks a camera active. Unknown ids are ignored.
    pub fn set_active(&mut self, id: CameraId) {
        if self.cameras.contains_key(&id) {
            self.active = Some(id);
        } else {
            debug!("Ignoring activation of unknown {id}");
        }
    }

    /// Deactivates any active camera; draws go straight to the screen.
    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn active_id(&self) -> Option<CameraId> {
        self.active
    }

    /// The active camera, if one is set.
    pub fn active(&self) -> Option<&Camera> {
        self.active.and_then(|id| self.cameras.get(&id))
    }

    //--- Convenience Setters ----------------------------------------------

    /// Moves a camera's view to a world position. Unknown ids are ignored.
    pub fn set_view_pos(&mut self, id: CameraId, x: f32, y: f32) {
        if let Some(cam) = self.cameras.get_mut(&id) {
            cam.view.x = x;
            cam.view.y = y;
        }
    }

    /// Resizes a camera's view (the backend resizes its surface to match).
    pub fn set_view_size(&mut self, id: CameraId, w: f32, h: f32) {
        if let Some(cam) = self.cameras.get_mut(&id) {
            cam.view.w = w;
            cam.view.h = h;
        }
    }

    /// Repositions/resizes a camera's screen viewport.
    pub fn set_viewport(&mut self, id: CameraId, viewport: Rect) {
        if let Some(cam) = self.cameras.get_mut(&id) {
            cam.viewport = viewport;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
