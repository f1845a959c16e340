//=========================================================================
// Render Contract
//=========================================================================
//
// The engine core never rasterizes anything. It issues draw calls against
// the `Renderer` trait; a backend (GPU, software blitter, terminal, ...)
// decides what the calls mean.
//
// All calls operate on whichever render target is currently bound: the
// screen by default, or a camera's offscreen surface between
// `begin_camera_target` and `end_camera_target`.
//
// Two built-in implementations ship with the crate:
// - `NullRenderer`: discards everything (headless default)
// - `RecordingRenderer`: captures the command stream for tests
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::camera::CameraId;
use crate::core::math::Rect;

//=== Color ===============================================================

/// 8-bit RGB color. Alpha is tracked separately as draw state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

//=== Renderer Trait ======================================================

/// Low-level drawing backend consumed by the engine core.
///
/// Implementations are expected to be cheap to call: the core performs
/// camera transforms and culling before issuing calls, so every call that
/// arrives should be drawn.
pub trait Renderer {
    /// Fills the current target with a color.
    fn clear(&mut self, color: Color);

    /// Sets the tint color applied to subsequent draws.
    fn set_color(&mut self, color: Color);

    /// Sets the alpha (0.0 transparent – 1.0 opaque) for subsequent draws.
    fn set_alpha(&mut self, alpha: f32);

    /// Draws a named sprite. Coordinates are already in target space.
    fn draw_sprite(&mut self, x: f32, y: f32, sprite: &str, xscale: f32, yscale: f32, angle: f32);

    fn draw_rectangle(&mut self, x: f32, y: f32, w: f32, h: f32, filled: bool);

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, filled: bool);

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32);

    fn draw_text(&mut self, x: f32, y: f32, text: &str, scale: f32, font: Option<&str>);

    /// Binds the offscreen surface for `camera`, sized to its view.
    ///
    /// The surface is created or resized on demand by the backend.
    fn begin_camera_target(&mut self, camera: CameraId, view_w: u32, view_h: u32);

    /// Unbinds the camera surface and composites it into `viewport` on the
    /// screen, scaling when view and viewport sizes differ.
    fn end_camera_target(&mut self, camera: CameraId, viewport: Rect);

    /// Flips the finished frame to the screen.
    fn present(&mut self);
}

//=== NullRenderer ========================================================

/// Renderer that discards every call. Default backend for headless runs.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn clear(&mut self, _color: Color) {}
    fn set_color(&mut self, _color: Color) {}
    fn set_alpha(&mut self, _alpha: f32) {}
    fn draw_sprite(&mut self, _x: f32, _y: f32, _sprite: &str, _xs: f32, _ys: f32, _angle: f32) {}
    fn draw_rectangle(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _filled: bool) {}
    fn draw_circle(&mut self, _x: f32, _y: f32, _radius: f32, _filled: bool) {}
    fn draw_line(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, _width: f32) {}
    fn draw_text(&mut self, _x: f32, _y: f32, _text: &str, _scale: f32, _font: Option<&str>) {}
    fn begin_camera_target(&mut self, _camera: CameraId, _view_w: u32, _view_h: u32) {}
    fn end_camera_target(&mut self, _camera: CameraId, _viewport: Rect) {}
    fn present(&mut self) {}
}

//=== RecordingRenderer ===================================================

/// One recorded draw call.
///
/// Payloads keep only what tests assert on; styling state changes are
/// recorded as their own commands in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    SetColor(Color),
    SetAlpha(f32),
    Sprite { x: f32, y: f32, name: String },
    Rectangle { x: f32, y: f32, w: f32, h: f32, filled: bool },
    Circle { x: f32, y: f32, radius: f32, filled: bool },
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
    Text { x: f32, y: f32, text: String },
    BeginCamera(CameraId),
    EndCamera(CameraId),
    Present,
}

/// Renderer that records the command stream instead of drawing.
///
/// Lets tests assert draw order, culling, and camera bracketing without a
/// graphics context.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands, in issue order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Names of recorded sprite draws, in issue order.
    pub fn sprite_names(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn set_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::SetColor(color));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::SetAlpha(alpha));
    }

    fn draw_sprite(&mut self, x: f32, y: f32, sprite: &str, _xs: f32, _ys: f32, _angle: f32) {
        self.commands.push(DrawCommand::Sprite { x, y, name: sprite.to_owned() });
    }

    fn draw_rectangle(&mut self, x: f32, y: f32, w: f32, h: f32, filled: bool) {
        self.commands.push(DrawCommand::Rectangle { x, y, w, h, filled });
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, filled: bool) {
        self.commands.push(DrawCommand::Circle { x, y, radius, filled });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, _width: f32) {
        self.commands.push(DrawCommand::Line { x1, y1, x2, y2 });
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, _scale: f32, _font: Option<&str>) {
        self.commands.push(DrawCommand::Text { x, y, text: text.to_owned() });
    }

    fn begin_camera_target(&mut self, camera: CameraId, _view_w: u32, _view_h: u32) {
        self.commands.push(DrawCommand::BeginCamera(camera));
    }

    fn end_camera_target(&mut self, camera: CameraId, _viewport: Rect) {
        self.commands.push(DrawCommand::EndCamera(camera));
    }

    fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
