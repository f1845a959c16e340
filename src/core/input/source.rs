//=========================================================================
// Event Source
//=========================================================================
//
// The seam between the engine loop and whatever produces window events.
//
// The loop polls its `EventSource` exactly once per frame and folds the
// drained events into the input state and command queue. The production
// implementation lives in the platform layer (Winit); tests use
// `ScriptedEvents` to drive the loop deterministically without a window.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::event::InputEvent;

//=== SourceEvent =========================================================

/// One event drained from an [`EventSource`].
///
/// Input events feed the input state; the other variants are window-level
/// signals the loop handles itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceEvent {
    /// Keyboard or mouse input.
    Input(InputEvent),

    /// The user asked to close the window.
    CloseRequested,

    /// The window was resized to the given pixel size.
    Resized { width: u32, height: u32 },
}

//=== EventSource Trait ===================================================

/// Supplier of window events, polled once per frame.
pub trait EventSource {
    /// Drains every event that arrived since the last poll.
    ///
    /// Must not block: an empty vec means a quiet frame.
    fn poll_events(&mut self) -> Vec<SourceEvent>;

    /// Asks the platform to resize the window.
    ///
    /// Best effort; a successful resize is reported back through a
    /// [`SourceEvent::Resized`] on a later poll. Headless sources ignore
    /// it.
    fn request_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }
}

//=== ScriptedEvents ======================================================

/// Event source that replays a pre-built script, one frame per batch.
///
/// Once the script is exhausted every poll returns an empty batch, so a
/// test can keep ticking the loop past the scripted frames.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    frames: std::collections::VecDeque<Vec<SourceEvent>>,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one frame's worth of events to the script.
    pub fn push_frame(&mut self, events: Vec<SourceEvent>) {
        self.frames.push_back(events);
    }

    /// Builder-style variant of [`push_frame`](Self::push_frame).
    pub fn with_frame(mut self, events: Vec<SourceEvent>) -> Self {
        self.push_frame(events);
        self
    }
}

impl EventSource for ScriptedEvents {
    fn poll_events(&mut self) -> Vec<SourceEvent> {
        self.frames.pop_front().unwrap_or_default()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
