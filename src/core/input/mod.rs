//=========================================================================
// Input Subsystem
//=========================================================================
//
// Polled input for entity logic.
//
// The platform layer translates window events into [`InputEvent`]s; the
// engine loop drains them from an [`EventSource`] each frame and folds
// them into the [`InputState`] that entities query during their step.
//
// Submodules:
// - `event`:  portable key/button/event types
// - `state`:  held sets plus per-frame pressed/released edges
// - `source`: the poll seam between the loop and the platform
//
//=========================================================================

pub mod event;
pub mod source;
pub mod state;

//--- Re-exports ----------------------------------------------------------

pub use event::{InputEvent, KeyCode, MouseButton};
pub use source::{EventSource, ScriptedEvents, SourceEvent};
pub use state::InputState;
