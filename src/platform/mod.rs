//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the engine's frame loop.
//
// Architecture:
// ```text
//  Engine loop (each frame):            Winit:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  poll_events()           │    │  ApplicationHandler  │
//  │   ↓                      │    │   ├─ resumed():      │
//  │  pump_app_events(0ms) ───┼───→│   │   create window  │
//  │   ↓                      │    │   └─ window_event(): │
//  │  drain channel           │←───┼──── map + send       │
//  │   ↓                      │    └──────────────────────┘
//  │  SourceEvent batch       │
//  └──────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Pumped, not run**: the engine owns the frame loop and pacing, so
//   the Winit loop is pumped with a zero timeout once per frame instead
//   of taking over the thread with `run_app`.
// - **Lazy window**: created in `resumed()`, as Winit requires for
//   mobile suspend/resume cycles.
// - **Channel hand-off**: the handler callbacks push mapped events into
//   a crossbeam channel; `poll_events` drains it after the pump. This
//   keeps the callback side write-only and the loop side read-only.
//
// Responsibilities:
// - Create and manage the OS window
// - Pump Winit events once per engine frame
// - Convert Winit types → engine SourceEvents (see `event_mapper`)
//
//=========================================================================

//=== Submodules ==========================================================

mod event_mapper;

//=== External Crates =====================================================

use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info};
use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::input::{EventSource, SourceEvent};
use event_mapper::map_window_event;

//=== PlatformError =======================================================

/// Platform initialization errors.
///
/// These are fatal: without an event loop and a window the engine
/// cannot present anything.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create the event loop (rare, indicates an OS-level
    /// issue such as no display server).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(#[from] winit::error::EventLoopError),
}

//=== WindowApp ===========================================================

/// Winit-side half of the platform: owns the window and forwards mapped
/// events into the channel.
struct WindowApp {
    /// OS window handle (None until `resumed()` is called).
    window: Option<Window>,

    title: String,
    size: (u32, u32),

    sender: Sender<SourceEvent>,
}

impl ApplicationHandler for WindowApp {
    /// Called when the app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(self.size.0, self.size.1));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {e}");
                // Treat it like a close so the engine loop winds down.
                let _ = self.sender.send(SourceEvent::CloseRequested);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let Some(mapped) = map_window_event(&event) {
            let closing = mapped == SourceEvent::CloseRequested;
            // A disconnected receiver means the engine is already gone;
            // keep the window responsive so it can still close.
            let _ = self.sender.send(mapped);
            if closing {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }
        }
    }
}

//=== WinitPlatform =======================================================

/// Production [`EventSource`] backed by a Winit window.
///
/// The engine loop calls [`poll_events`](EventSource::poll_events) once
/// per frame; each call pumps the Winit event loop with a zero timeout
/// and drains whatever the handler forwarded.
///
/// Must live on the main thread (Winit requirement on macOS/iOS).
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    app: WindowApp,
    receiver: Receiver<SourceEvent>,
}

impl WinitPlatform {
    /// Creates the event loop and prepares the window.
    ///
    /// The window itself appears on the first poll, when Winit delivers
    /// the `resumed` callback.
    pub fn new(title: impl Into<String>, size: (u32, u32)) -> Result<Self, PlatformError> {
        let event_loop = EventLoop::new()?;
        let (sender, receiver) = unbounded();
        info!(target: "platform", "Platform subsystem initialized");
        Ok(Self {
            event_loop,
            app: WindowApp {
                window: None,
                title: title.into(),
                size,
                sender,
            },
            receiver,
        })
    }
}

impl EventSource for WinitPlatform {
    fn poll_events(&mut self) -> Vec<SourceEvent> {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);

        let mut events: Vec<SourceEvent> = self.receiver.try_iter().collect();

        // The loop exiting without a close event (window creation
        // failure already sent one) still has to stop the engine.
        if matches!(status, PumpStatus::Exit(_))
            && !events.contains(&SourceEvent::CloseRequested)
        {
            events.push(SourceEvent::CloseRequested);
        }
        events
    }

    fn request_resize(&mut self, width: u32, height: u32) {
        match &self.app.window {
            Some(window) => {
                // The compositor may refuse or adjust; the real size comes
                // back as a Resized window event on the next pump.
                let _ = window.request_inner_size(LogicalSize::new(width, height));
            }
            None => {
                // Window not created yet; adjust the pending attributes.
                self.app.size = (width, height);
            }
        }
    }
}
