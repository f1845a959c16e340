//=========================================================================
// Glimmer Engine
//
// Main entry point and frame-loop coordinator.
//
// Architecture:
// ```text
//     EngineBuilder ──build()──> Engine ──run()──> [frame loop]
//         │                        │
//         ├─ with_window_size()    ├─ register_scene()
//         ├─ with_frame_rate()     ├─ init_scene()
//         └─ with_*  (backends)    └─ tick() per frame
// ```
//
// Frame order (one `tick`):
// ```text
// delta time → poll events → input state → step pass → scene on_step
//   → draw pass (camera target, clear, entities by depth, on_draw)
//   → removal drain → command drain → pending scene switch
//   → present → input edge clear
// ```
//
// The ordering is load-bearing: an entity destroyed during its step
// still draws that frame (the removal drain runs after the draw pass),
// and scene switches requested mid-frame land only at the boundary.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::marker::PhantomData;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::assets::{AssetCatalog, AssetStore, Audio, NullAudio};
use crate::core::context::{Command, DrawContext, Services, StepContext};
use crate::core::entity::EntityKind;
use crate::core::input::{EventSource, SourceEvent};
use crate::core::render::{NullRenderer, Renderer};
use crate::core::scene::{Scene, SceneDirector};
use crate::platform::{PlatformError, WinitPlatform};

//=== Constants ===========================================================

/// Longest frame the simulation will account for. Frames stalled past
/// this (debugger pause, laptop sleep) resume with a clamped delta
/// instead of one giant catch-up step.
const MAX_DELTA: f32 = 0.25;

//=== EngineError =========================================================

/// Errors surfaced by engine setup and execution.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// A scene name was used before being registered.
    #[error("no scene named '{0}' is registered")]
    UnknownScene(String),
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Window**: 800x600, titled "Glimmer Engine"
/// - **Frame rate**: 60 FPS
/// - **Backends**: a Winit window for events (created on first run),
///   with null renderer/audio and an empty asset catalog
///
/// # Examples
///
/// ```no_run
/// use glimmer_engine::EngineBuilder;
/// use glimmer_engine::core::entity::EntityKind;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Kind { Player }
/// impl EntityKind for Kind {}
///
/// let engine = EngineBuilder::<Kind>::new()
///     .with_title("My Game")
///     .with_window_size(1280, 720)
///     .build();
/// ```
pub struct EngineBuilder<K: EntityKind> {
    window_size: (u32, u32),
    title: String,
    frame_rate: u32,
    events: Option<Box<dyn EventSource>>,
    renderer: Option<Box<dyn Renderer>>,
    audio: Option<Box<dyn Audio>>,
    assets: Option<Box<dyn AssetStore>>,
    _phantom: PhantomData<K>,
}

impl<K: EntityKind> EngineBuilder<K> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            window_size: (800, 600),
            title: "Glimmer Engine".to_owned(),
            frame_rate: 60,
            events: None,
            renderer: None,
            audio: None,
            assets: None,
            _phantom: PhantomData,
        }
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the target frames per second for the loop.
    ///
    /// # Panics
    ///
    /// Panics if `frame_rate == 0`.
    pub fn with_frame_rate(mut self, frame_rate: u32) -> Self {
        assert!(frame_rate > 0, "Frame rate must be positive");
        self.frame_rate = frame_rate;
        self
    }

    //--- Backend Injection ------------------------------------------------

    /// Replaces the default Winit event source.
    ///
    /// Injecting a `ScriptedEvents` here makes the engine fully headless
    /// and deterministic.
    pub fn with_event_source(mut self, events: impl EventSource + 'static) -> Self {
        self.events = Some(Box::new(events));
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn with_audio(mut self, audio: impl Audio + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn with_assets(mut self, assets: impl AssetStore + 'static) -> Self {
        self.assets = Some(Box::new(assets));
        self
    }

    /// Builds the engine instance.
    ///
    /// The Winit window (when no event source was injected) is created
    /// lazily by [`Engine::initialize`] or on the first [`Engine::run`],
    /// so building never touches the OS.
    pub fn build(self) -> Engine<K> {
        info!(
            "Building engine ({}x{} @ {} FPS)",
            self.window_size.0, self.window_size.1, self.frame_rate
        );
        Engine {
            director: SceneDirector::new(),
            services: Services::new(self.window_size),
            events: self.events,
            renderer: self.renderer.unwrap_or_else(|| Box::new(NullRenderer)),
            audio: self.audio.unwrap_or_else(|| Box::new(NullAudio)),
            assets: self.assets.unwrap_or_else(|| Box::new(AssetCatalog::new())),
            title: self.title,
            frame_rate: self.frame_rate,
            running: true,
            last_frame: None,
        }
    }
}

impl<K: EntityKind> Default for EngineBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Glimmer Engine runtime.
///
/// Owns the scene director, the shared services, and the backend boxes,
/// and drives them through the fixed frame order. Create one via
/// [`EngineBuilder`], register scenes, pick the initial scene with
/// [`init_scene`](Self::init_scene), then [`run`](Self::run).
///
/// # Examples
///
/// ```no_run
/// # use glimmer_engine::{EngineBuilder, Scene};
/// # use glimmer_engine::core::entity::EntityKind;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Kind { Player }
/// # impl EntityKind for Kind {}
/// struct Title;
/// impl Scene<Kind> for Title {}
///
/// let mut engine = EngineBuilder::<Kind>::new().build();
/// engine.register_scene("title", Title);
/// engine.init_scene("title")?;
/// engine.run()?;
/// # Ok::<(), glimmer_engine::EngineError>(())
/// ```
pub struct Engine<K: EntityKind> {
    director: SceneDirector<K>,
    services: Services,

    events: Option<Box<dyn EventSource>>,
    renderer: Box<dyn Renderer>,
    audio: Box<dyn Audio>,
    assets: Box<dyn AssetStore>,

    title: String,
    frame_rate: u32,
    running: bool,
    last_frame: Option<Instant>,
}

impl<K: EntityKind> Engine<K> {
    //--- Setup ------------------------------------------------------------

    /// Registers a scene under a name. See [`SceneDirector::register`].
    pub fn register_scene(&mut self, name: impl Into<String>, scene: impl Scene<K> + 'static) {
        self.director.register(name, scene);
    }

    /// Makes a scene current immediately and runs its `on_create`.
    ///
    /// This is the synchronous entry point for picking the initial scene
    /// before the loop starts; in-frame switches go through
    /// `StepContext::switch_scene` instead, which defers to the frame
    /// boundary.
    pub fn init_scene(&mut self, name: &str) -> Result<(), EngineError> {
        if !self.director.is_registered(name) {
            return Err(EngineError::UnknownScene(name.to_owned()));
        }

        // Re-initializing mid-game: the outgoing scene still gets its
        // full teardown, and any queued deferred switch is superseded.
        if let Some((world, logic)) = self.director.current_parts() {
            let mut ctx = StepContext::new(
                world,
                &mut self.services,
                self.assets.as_ref(),
                self.audio.as_mut(),
            );
            ctx.run_teardown();
            logic.on_cleanup(&mut ctx);
        }
        self.director.take_pending();

        if !self.director.set_current(name) {
            return Err(EngineError::UnknownScene(name.to_owned()));
        }
        info!("Initial scene: '{name}'");
        if let Some((world, logic)) = self.director.current_parts() {
            let mut ctx = StepContext::new(
                world,
                &mut self.services,
                self.assets.as_ref(),
                self.audio.as_mut(),
            );
            logic.on_create(&mut ctx);
        }
        Ok(())
    }

    /// Creates any backend not injected through the builder.
    ///
    /// Only the event source has a fallible default (the Winit window);
    /// calling this again is a no-op. [`run`](Self::run) calls it
    /// automatically.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        if self.events.is_none() {
            let platform = WinitPlatform::new(self.title.clone(), self.services.window_size())?;
            self.events = Some(Box::new(platform));
        }
        Ok(())
    }

    //--- Introspection ----------------------------------------------------

    /// Whether the loop will keep ticking.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Name of the current scene, if one was initialized.
    pub fn current_scene(&self) -> Option<&str> {
        self.director.current_name()
    }

    /// Read access to the current scene's world.
    pub fn world(&self) -> Option<&crate::core::world::World<K>> {
        self.director.current_world()
    }

    //--- Execution --------------------------------------------------------

    /// Runs the frame loop until quit is requested or the window closes.
    ///
    /// Paces frames to the configured rate by sleeping out the remainder
    /// of each frame budget. Tears the current scene down on exit.
    pub fn run(mut self) -> Result<(), EngineError> {
        self.initialize()?;
        info!("Starting engine loop ({} FPS target)", self.frame_rate);

        let frame_budget = Duration::from_secs_f64(1.0 / f64::from(self.frame_rate));
        while self.running {
            let frame_start = Instant::now();
            self.tick();
            if let Some(remaining) = frame_budget.checked_sub(frame_start.elapsed()) {
                thread::sleep(remaining);
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Advances the engine by exactly one frame, without pacing.
    ///
    /// This is what [`run`](Self::run) calls in its loop; headless setups
    /// and tests can call it directly to step deterministically.
    pub fn tick(&mut self) {
        self.update_delta_time();

        //--- 1. Events → input state -------------------------------------
        let polled = match self.events.as_mut() {
            Some(source) => source.poll_events(),
            None => Vec::new(),
        };
        let mut inputs = Vec::new();
        for event in polled {
            match event {
                SourceEvent::Input(input) => inputs.push(input),
                SourceEvent::CloseRequested => {
                    info!("Close requested, stopping");
                    self.running = false;
                }
                SourceEvent::Resized { width, height } => {
                    debug!("Window resized to {width}x{height}");
                    self.services.window_size = (width, height);
                }
            }
        }
        self.services.input.process_events(&inputs);

        //--- 2. Step pass + scene step hook ------------------------------
        if let Some((world, logic)) = self.director.current_parts() {
            let mut ctx = StepContext::new(
                world,
                &mut self.services,
                self.assets.as_ref(),
                self.audio.as_mut(),
            );
            ctx.run_step();
            logic.on_step(&mut ctx);
        }

        //--- 3. Draw pass + scene draw hook ------------------------------
        let lens = self.services.cameras.active().copied();
        if let Some((world, logic)) = self.director.current_parts() {
            if let Some(camera) = &lens {
                self.renderer.begin_camera_target(
                    camera.id(),
                    camera.view.w as u32,
                    camera.view.h as u32,
                );
            }
            self.renderer.clear(world.background_color);

            let mut ctx = DrawContext::new(self.renderer.as_mut(), self.assets.as_ref(), lens);
            for i in world.draw_order() {
                let Some(entity) = world.entity_at_mut(i) else { continue };
                if entity.base().visible {
                    entity.draw(&mut ctx);
                }
            }
            logic.on_draw(&mut ctx);

            if let Some(camera) = &lens {
                self.renderer.end_camera_target(camera.id(), camera.viewport);
            }
        }

        //--- 4. Removal drain (after draw: final frames happen) ----------
        if let Some((world, _)) = self.director.current_parts() {
            let mut ctx = StepContext::new(
                world,
                &mut self.services,
                self.assets.as_ref(),
                self.audio.as_mut(),
            );
            ctx.run_removals();
        }

        //--- 5. Command drain --------------------------------------------
        for command in self.services.drain_commands() {
            match command {
                Command::SwitchScene(name) => self.director.request_switch(&name),
                Command::Quit => {
                    info!("Quit requested");
                    self.running = false;
                }
                Command::ResizeWindow(width, height) => {
                    debug!("Resize requested: {width}x{height}");
                    if let Some(source) = self.events.as_mut() {
                        source.request_resize(width, height);
                    }
                    // Track the requested size immediately so window_size
                    // queries stay coherent; the platform confirms with a
                    // Resized event on a later frame.
                    self.services.window_size = (width, height);
                }
            }
        }

        //--- 6. Pending scene switch -------------------------------------
        if let Some(next) = self.director.take_pending() {
            self.perform_switch(&next);
        }

        //--- 7. Present + frame-edge cleanup -----------------------------
        self.renderer.present();
        self.services.input.end_frame();
    }

    //--- Internal Helpers -------------------------------------------------

    fn update_delta_time(&mut self) {
        let now = Instant::now();
        self.services.delta_time = match self.last_frame {
            Some(previous) => now.duration_since(previous).as_secs_f32().min(MAX_DELTA),
            // No previous frame to measure; assume a nominal frame.
            None => 1.0 / self.frame_rate as f32,
        };
        self.last_frame = Some(now);
    }

    /// Applies a deferred scene switch at the frame boundary.
    ///
    /// Order: old scene's entities are torn down (cleanup hooks run),
    /// then its `on_cleanup`, then the new scene's `on_create` against
    /// its empty world.
    fn perform_switch(&mut self, name: &str) {
        if let Some((world, logic)) = self.director.current_parts() {
            let mut ctx = StepContext::new(
                world,
                &mut self.services,
                self.assets.as_ref(),
                self.audio.as_mut(),
            );
            ctx.run_teardown();
            logic.on_cleanup(&mut ctx);
        }

        if !self.director.set_current(name) {
            // request_switch validated the name; hitting this means the
            // scene was unregistered mid-frame.
            error!("Scene '{name}' vanished before the switch completed");
            return;
        }
        info!("Switched to scene '{name}'");

        if let Some((world, logic)) = self.director.current_parts() {
            let mut ctx = StepContext::new(
                world,
                &mut self.services,
                self.assets.as_ref(),
                self.audio.as_mut(),
            );
            logic.on_create(&mut ctx);
        }
    }

    fn shutdown(&mut self) {
        if let Some((world, logic)) = self.director.current_parts() {
            let mut ctx = StepContext::new(
                world,
                &mut self.services,
                self.assets.as_ref(),
                self.audio.as_mut(),
            );
            ctx.run_teardown();
            logic.on_cleanup(&mut ctx);
        }
        info!("Engine shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assets::SpriteInfo;
    use crate::core::context::StepContext;
    use crate::core::entity::{Entity, EntityBase};
    use crate::core::input::ScriptedEvents;
    use crate::core::math::Rect;
    use crate::core::render::{Color, DrawCommand, RecordingRenderer};
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Fixtures ----------------------------------------------------

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Thing,
    }

    impl EntityKind for Kind {}

    type Log = Rc<RefCell<Vec<String>>>;

    /// Renderer handle shareable between a test and the boxed engine.
    #[derive(Clone, Default)]
    struct SharedRecorder(Rc<RefCell<RecordingRenderer>>);

    impl SharedRecorder {
        fn take_commands(&self) -> Vec<DrawCommand> {
            self.0.borrow_mut().take_commands()
        }

        fn sprite_names(&self) -> Vec<String> {
            self.0.borrow().sprite_names()
        }
    }

    impl Renderer for SharedRecorder {
        fn clear(&mut self, color: Color) {
            self.0.borrow_mut().clear(color);
        }
        fn set_color(&mut self, color: Color) {
            self.0.borrow_mut().set_color(color);
        }
        fn set_alpha(&mut self, alpha: f32) {
            self.0.borrow_mut().set_alpha(alpha);
        }
        fn draw_sprite(&mut self, x: f32, y: f32, sprite: &str, xs: f32, ys: f32, angle: f32) {
            self.0.borrow_mut().draw_sprite(x, y, sprite, xs, ys, angle);
        }
        fn draw_rectangle(&mut self, x: f32, y: f32, w: f32, h: f32, filled: bool) {
            self.0.borrow_mut().draw_rectangle(x, y, w, h, filled);
        }
        fn draw_circle(&mut self, x: f32, y: f32, radius: f32, filled: bool) {
            self.0.borrow_mut().draw_circle(x, y, radius, filled);
        }
        fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
            self.0.borrow_mut().draw_line(x1, y1, x2, y2, width);
        }
        fn draw_text(&mut self, x: f32, y: f32, text: &str, scale: f32, font: Option<&str>) {
            self.0.borrow_mut().draw_text(x, y, text, scale, font);
        }
        fn begin_camera_target(&mut self, camera: crate::core::camera::CameraId, w: u32, h: u32) {
            self.0.borrow_mut().begin_camera_target(camera, w, h);
        }
        fn end_camera_target(&mut self, camera: crate::core::camera::CameraId, viewport: Rect) {
            self.0.borrow_mut().end_camera_target(camera, viewport);
        }
        fn present(&mut self) {
            self.0.borrow_mut().present();
        }
    }

    /// Entity that shows a sprite and optionally destroys itself.
    struct Sprite {
        base: EntityBase,
        destroy_on_step: bool,
    }

    impl Sprite {
        fn new(name: &str, depth: i32, assets: &dyn AssetStore) -> Self {
            let mut base = EntityBase::new(0.0, 0.0);
            base.set_sprite(name, assets);
            base.depth = depth;
            Self { base, destroy_on_step: false }
        }
    }

    impl Entity<Kind> for Sprite {
        fn base(&self) -> &EntityBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut EntityBase {
            &mut self.base
        }
        fn kind(&self) -> Kind {
            Kind::Thing
        }
        fn step(&mut self, ctx: &mut StepContext<'_, Kind>) {
            self.base.snapshot_position();
            if self.destroy_on_step {
                if let Some(id) = self.base.id() {
                    ctx.destroy(id);
                }
            }
        }
    }

    /// Scene that spawns a configured set of sprites and logs its hooks.
    struct TestScene {
        log: Log,
        tag: &'static str,
        sprites: Vec<(&'static str, i32, bool)>,
        quit_after_steps: Option<u32>,
        switch_to: Option<&'static str>,
        steps: u32,
    }

    impl TestScene {
        fn new(log: &Log, tag: &'static str) -> Self {
            Self {
                log: Rc::clone(log),
                tag,
                sprites: Vec::new(),
                quit_after_steps: None,
                switch_to: None,
                steps: 0,
            }
        }

        fn record(&self, event: &str) {
            self.log.borrow_mut().push(format!("{}:{event}", self.tag));
        }
    }

    impl Scene<Kind> for TestScene {
        fn on_create(&mut self, ctx: &mut StepContext<'_, Kind>) {
            self.record("create");
            self.steps = 0;
            for (name, depth, destroy) in &self.sprites {
                let mut sprite = Sprite::new(name, *depth, ctx.assets());
                sprite.destroy_on_step = *destroy;
                ctx.spawn(sprite);
            }
        }

        fn on_step(&mut self, ctx: &mut StepContext<'_, Kind>) {
            self.record("step");
            self.steps += 1;
            if let Some(limit) = self.quit_after_steps {
                if self.steps >= limit {
                    ctx.quit();
                }
            }
            if let Some(target) = self.switch_to.take() {
                ctx.switch_scene(target);
            }
        }

        fn on_draw(&mut self, ctx: &mut DrawContext<'_>) {
            ctx.draw_text(4.0, 4.0, self.tag, 1.0, None);
        }

        fn on_cleanup(&mut self, _ctx: &mut StepContext<'_, Kind>) {
            self.record("cleanup");
        }
    }

    fn catalog() -> AssetCatalog {
        let mut catalog = AssetCatalog::new();
        for name in ["deep", "mid", "shallow", "ship"] {
            catalog.insert_sprite(name, SpriteInfo::new(16.0, 16.0));
        }
        catalog
    }

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn headless(renderer: SharedRecorder) -> Engine<Kind> {
        EngineBuilder::<Kind>::new()
            .with_event_source(ScriptedEvents::new())
            .with_renderer(renderer)
            .with_assets(catalog())
            .build()
    }

    //=====================================================================
    // Frame Pipeline Tests
    //=====================================================================

    /// One frame clears, draws entities by descending depth, then
    /// presents.
    #[test]
    fn frame_draws_clear_depth_order_present() {
        let recorder = SharedRecorder::default();
        let log = log();
        let mut engine = headless(recorder.clone());

        let mut scene = TestScene::new(&log, "game");
        // Insertion order deliberately scrambled relative to depth.
        scene.sprites = vec![("mid", 2, false), ("deep", 3, false), ("shallow", 1, false)];
        engine.register_scene("game", scene);
        engine.init_scene("game").unwrap();

        engine.tick();

        let commands = recorder.take_commands();
        assert!(matches!(commands.first(), Some(DrawCommand::Clear(_))));
        assert!(matches!(commands.last(), Some(DrawCommand::Present)));

        let names: Vec<String> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["deep", "mid", "shallow"]);

        // Scene overlay draws after every entity.
        let text_pos = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Text { .. }))
            .expect("scene drew its overlay");
        let last_sprite = commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Sprite { .. }))
            .unwrap();
        assert!(text_pos > last_sprite);
    }

    /// A destroyed entity still draws the frame it was destroyed in.
    #[test]
    fn destroyed_entity_draws_its_final_frame() {
        let recorder = SharedRecorder::default();
        let log = log();
        let mut engine = headless(recorder.clone());

        let mut scene = TestScene::new(&log, "game");
        scene.sprites = vec![("ship", 0, true)];
        engine.register_scene("game", scene);
        engine.init_scene("game").unwrap();

        engine.tick();
        assert_eq!(recorder.sprite_names(), vec!["ship"], "final frame still drawn");
        assert_eq!(engine.world().unwrap().entity_count(), 0, "gone after the drain");

        recorder.take_commands();
        engine.tick();
        assert!(recorder.sprite_names().is_empty());
    }

    /// An invisible entity steps but does not draw.
    #[test]
    fn invisible_entity_skips_draw() {
        let recorder = SharedRecorder::default();
        let log = log();
        let mut engine = headless(recorder.clone());

        let mut scene = TestScene::new(&log, "game");
        scene.sprites = vec![("ship", 0, false)];
        engine.register_scene("game", scene);
        engine.init_scene("game").unwrap();

        engine.tick();
        let id = engine.world().unwrap().entities_of_kind(Kind::Thing)[0];
        recorder.take_commands();

        // Reach into the next frame via a scripted mutation: flip
        // visibility directly on the world between ticks.
        // (Engine tests may poke the world; games use entity logic.)
        {
            let world = engine.director.current_parts().unwrap().0;
            world.entity_base_mut(id).unwrap().visible = false;
        }
        engine.tick();
        assert!(recorder.sprite_names().is_empty());
        assert!(engine.world().unwrap().is_alive(id), "still stepping");
    }

    //=====================================================================
    // Loop Control Tests
    //=====================================================================

    /// A close request from the platform stops the loop.
    #[test]
    fn close_request_stops_the_loop() {
        let events = ScriptedEvents::new().with_frame(vec![SourceEvent::CloseRequested]);
        let mut engine = EngineBuilder::<Kind>::new()
            .with_event_source(events)
            .build();

        assert!(engine.is_running());
        engine.tick();
        assert!(!engine.is_running());
    }

    /// A quit command from scene logic stops the loop.
    #[test]
    fn quit_command_stops_the_loop() {
        let log = log();
        let mut engine = headless(SharedRecorder::default());
        let mut scene = TestScene::new(&log, "game");
        scene.quit_after_steps = Some(2);
        engine.register_scene("game", scene);
        engine.init_scene("game").unwrap();

        engine.tick();
        assert!(engine.is_running());
        engine.tick();
        assert!(!engine.is_running());
    }

    /// run() tears the current scene down after the loop exits.
    #[test]
    fn run_tears_down_on_exit() {
        let log = log();
        let mut engine = headless(SharedRecorder::default());
        let mut scene = TestScene::new(&log, "game");
        scene.quit_after_steps = Some(1);
        engine.register_scene("game", scene);
        engine.init_scene("game").unwrap();

        engine.run().unwrap();

        assert_eq!(log.borrow().last().map(String::as_str), Some("game:cleanup"));
    }

    /// A resize command is forwarded to the event source and tracked.
    #[test]
    fn resize_command_reaches_the_event_source() {
        /// Event source that records resize requests.
        #[derive(Default)]
        struct ResizeSpy(Rc<RefCell<Vec<(u32, u32)>>>);

        impl EventSource for ResizeSpy {
            fn poll_events(&mut self) -> Vec<SourceEvent> {
                Vec::new()
            }
            fn request_resize(&mut self, width: u32, height: u32) {
                self.0.borrow_mut().push((width, height));
            }
        }

        let requests = Rc::new(RefCell::new(Vec::new()));
        let mut engine = EngineBuilder::<Kind>::new()
            .with_event_source(ResizeSpy(Rc::clone(&requests)))
            .build();

        engine.services.push_command(Command::ResizeWindow(1024, 768));
        engine.tick();

        assert_eq!(*requests.borrow(), vec![(1024, 768)]);
        assert_eq!(engine.services.window_size(), (1024, 768));
    }

    /// Resize events update the reported window size.
    #[test]
    fn resize_event_updates_window_size() {
        let events = ScriptedEvents::new()
            .with_frame(vec![SourceEvent::Resized { width: 1024, height: 768 }]);
        let mut engine = EngineBuilder::<Kind>::new()
            .with_event_source(events)
            .build();

        engine.tick();
        assert_eq!(engine.services.window_size(), (1024, 768));
    }

    //=====================================================================
    // Scene Switch Tests
    //=====================================================================

    /// A mid-frame switch request lands at the frame boundary: old scene
    /// cleanup, then new scene create, in order.
    #[test]
    fn deferred_switch_runs_cleanup_then_create() {
        let log = log();
        let mut engine = headless(SharedRecorder::default());

        let mut title = TestScene::new(&log, "title");
        title.switch_to = Some("game");
        engine.register_scene("title", title);
        engine.register_scene("game", TestScene::new(&log, "game"));
        engine.init_scene("title").unwrap();

        engine.tick();

        assert_eq!(engine.current_scene(), Some("game"));
        assert_eq!(
            *log.borrow(),
            vec!["title:create", "title:step", "title:cleanup", "game:create"],
        );
    }

    /// Switching away tears down the old scene's entities; revisiting
    /// restarts it from scratch with fresh ids.
    #[test]
    fn revisited_scene_restarts_fresh() {
        let log = log();
        let mut engine = headless(SharedRecorder::default());

        let mut title = TestScene::new(&log, "title");
        title.sprites = vec![("ship", 0, false)];
        title.switch_to = Some("game");
        engine.register_scene("title", title);

        let mut game = TestScene::new(&log, "game");
        game.switch_to = Some("title");
        engine.register_scene("game", game);

        engine.init_scene("title").unwrap();
        engine.tick(); // title steps, switch to game at boundary
        engine.tick(); // game steps, switch back to title at boundary
        engine.tick(); // title's sprite is promoted again

        let world = engine.world().unwrap();
        assert_eq!(world.entity_count(), 1);
        let id = world.entities_of_kind(Kind::Thing)[0];
        assert!(id > crate::core::entity::EntityId::new(0), "ids keep counting up");
    }

    /// Re-initializing while a scene is live tears the old one down and
    /// discards any queued deferred switch.
    #[test]
    fn init_scene_replaces_live_scene_and_drops_pending() {
        let log = log();
        let mut engine = headless(SharedRecorder::default());

        let mut title = TestScene::new(&log, "title");
        title.sprites = vec![("ship", 0, false)];
        engine.register_scene("title", title);
        engine.register_scene("game", TestScene::new(&log, "game"));

        engine.init_scene("title").unwrap();
        engine.tick();

        // A deferred switch is queued, but init_scene supersedes it.
        engine.director.request_switch("game");
        engine.init_scene("title").unwrap();

        assert_eq!(engine.current_scene(), Some("title"));
        assert_eq!(
            *log.borrow(),
            vec!["title:create", "title:step", "title:cleanup", "title:create"],
        );

        // The stale pending switch must not fire on the next frame.
        engine.tick();
        assert_eq!(engine.current_scene(), Some("title"));
        assert!(engine.world().unwrap().entity_count() > 0);
    }

    /// init_scene with an unknown name errors and leaves nothing current.
    #[test]
    fn init_scene_rejects_unknown_names() {
        let mut engine = EngineBuilder::<Kind>::new()
            .with_event_source(ScriptedEvents::new())
            .build();

        let err = engine.init_scene("nope").unwrap_err();
        assert!(matches!(err, EngineError::UnknownScene(_)));
        assert!(engine.current_scene().is_none());
    }

    //=====================================================================
    // Camera Bracket Tests
    //=====================================================================

    /// With an active camera the frame is bracketed by camera-target
    /// begin/end around the scene's draws.
    #[test]
    fn active_camera_brackets_the_frame() {
        let recorder = SharedRecorder::default();
        let log = log();
        let mut engine = headless(recorder.clone());

        let mut scene = TestScene::new(&log, "game");
        scene.sprites = vec![("ship", 0, false)];
        engine.register_scene("game", scene);
        engine.init_scene("game").unwrap();

        let cam = engine.services.cameras.create();
        engine.services.cameras.set_active(cam);

        engine.tick();

        let commands = recorder.take_commands();
        assert!(matches!(commands.first(), Some(DrawCommand::BeginCamera(_))));
        let end = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::EndCamera(_)))
            .expect("camera target closed");
        let present = commands.len() - 1;
        assert!(matches!(commands[present], DrawCommand::Present));
        assert!(end < present);
        assert!(commands[1..end].iter().any(|c| matches!(c, DrawCommand::Sprite { .. })));
    }

    //=====================================================================
    // Builder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::<Kind>::new();
        assert_eq!(builder.window_size, (800, 600));
        assert_eq!(builder.frame_rate, 60);
    }

    #[test]
    #[should_panic(expected = "Frame rate must be positive")]
    fn builder_rejects_zero_frame_rate() {
        EngineBuilder::<Kind>::new().with_frame_rate(0);
    }

    #[test]
    fn first_frame_delta_falls_back_to_nominal() {
        let mut engine = EngineBuilder::<Kind>::new()
            .with_event_source(ScriptedEvents::new())
            .with_frame_rate(50)
            .build();

        engine.tick();
        assert_eq!(engine.services.delta_time(), 1.0 / 50.0);
    }
}
