//=========================================================================
// Input State
//=========================================================================
//
// Polled input state with per-frame edge tracking.
//
// Architecture:
//   InputEvent → process_events() → HashSet (keys/buttons held) → query
//
// Frame lifecycle: process_events() → entity step queries → end_frame().
// Held sets persist across frames; pressed/released sets describe the
// transitions that happened this frame only and are cleared at frame end.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, MouseButton};

//=== InputState ==========================================================

/// Tracks held keys/buttons plus the per-frame pressed/released edges.
///
/// Entities poll this during their step; they never see raw events.
pub struct InputState {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    mouse_position: (f32, f32),

    //--- Frame Edges (reset each frame via end_frame()) ------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
}

impl InputState {
    /// Creates a new input state with nothing held.
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            buttons_down: HashSet::new(),
            mouse_position: (0.0, 0.0),
            keys_pressed: HashSet::new(),
            keys_released: HashSet::new(),
            buttons_pressed: HashSet::new(),
            buttons_released: HashSet::new(),
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Folds a batch of events into the state.
    ///
    /// Called once per frame before the entity step pass.
    pub(crate) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Clears the per-frame edge sets. Held state is untouched.
    ///
    /// Called at the end of every frame, after drawing.
    pub(crate) fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
    }

    //--- Internal Helpers -------------------------------------------------

    fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key } => {
                // Key-repeat delivers duplicate downs; only the first
                // transition counts as pressed.
                if self.keys_down.insert(*key) {
                    self.keys_pressed.insert(*key);
                }
            }

            InputEvent::KeyUp { key } => {
                // Spurious ups (focus loss replays) are ignored.
                if self.keys_down.remove(key) {
                    self.keys_released.insert(*key);
                }
            }

            InputEvent::MouseButtonDown { button } => {
                if self.buttons_down.insert(*button) {
                    self.buttons_pressed.insert(*button);
                }
            }

            InputEvent::MouseButtonUp { button } => {
                if self.buttons_down.remove(button) {
                    self.buttons_released.insert(*button);
                }
            }

            InputEvent::MouseMoved { x, y } => {
                self.mouse_position = (*x, *y);
            }

            InputEvent::Unidentified => {}
        }
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// Returns `true` if the key transitioned UP → DOWN this frame.
    ///
    /// Use for discrete actions like jumping or firing.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns `true` while the key is held.
    ///
    /// Use for continuous actions like movement.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns `true` if the key transitioned DOWN → UP this frame.
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    //=====================================================================
    // Query API - Mouse
    //=====================================================================

    /// Like [`key_pressed`](Self::key_pressed) but for mouse buttons.
    pub fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    /// Like [`key_down`](Self::key_down) but for mouse buttons.
    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Like [`key_released`](Self::key_released) but for mouse buttons.
    pub fn button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Mouse position in screen coordinates (pixels, top-left origin).
    ///
    /// For the world-space position under an active camera, see
    /// `StepContext::mouse_world_position`.
    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for InputState {
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

    //--- Test Helpers -----------------------------------------------------

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key }
    }

    fn key_up(key: KeyCode) -> InputEvent {
        InputEvent::KeyUp { key }
    }

    fn mouse_down(btn: MouseButton) -> InputEvent {
        InputEvent::MouseButtonDown { button: btn }
    }

    fn mouse_up(btn: MouseButton) -> InputEvent {
        InputEvent::MouseButtonUp { button: btn }
    }

    //--- Keyboard Tests ---------------------------------------------------

    /// key_pressed only returns true on the transition frame.
    #[test]
    fn key_pressed_only_on_transition_frame() {
        let mut state = InputState::new();

        // Frame 1: key goes down
        state.process_events(&[key_down(KeyCode::KeyA)]);
        assert!(state.key_pressed(KeyCode::KeyA));
        assert!(state.key_down(KeyCode::KeyA));
        state.end_frame();

        // Frame 2: still held, no longer "pressed"
        state.process_events(&[]);
        assert!(!state.key_pressed(KeyCode::KeyA));
        assert!(state.key_down(KeyCode::KeyA));
        state.end_frame();

        // Frame 3: released
        state.process_events(&[key_up(KeyCode::KeyA)]);
        assert!(!state.key_pressed(KeyCode::KeyA));
        assert!(!state.key_down(KeyCode::KeyA));
        assert!(state.key_released(KeyCode::KeyA));
    }

    /// Held state persists across many frames.
    #[test]
    fn key_down_persists_across_frames() {
        let mut state = InputState::new();
        state.process_events(&[key_down(KeyCode::KeyW)]);

        for _ in 0..10 {
            state.end_frame();
            state.process_events(&[]);
            assert!(state.key_down(KeyCode::KeyW), "key should remain down");
        }
    }

    /// Multiple keys are tracked independently.
    #[test]
    fn multiple_keys_tracked_independently() {
        let mut state = InputState::new();
        state.process_events(&[
            key_down(KeyCode::KeyW),
            key_down(KeyCode::KeyA),
            key_down(KeyCode::KeyS),
        ]);

        assert!(state.key_down(KeyCode::KeyW));
        assert!(state.key_down(KeyCode::KeyA));
        assert!(state.key_down(KeyCode::KeyS));
        assert!(!state.key_down(KeyCode::KeyD));

        state.end_frame();
        state.process_events(&[key_up(KeyCode::KeyA)]);

        assert!(state.key_down(KeyCode::KeyW));
        assert!(!state.key_down(KeyCode::KeyA));
        assert!(state.key_down(KeyCode::KeyS));
    }

    /// A press and release inside one frame registers both edges.
    #[test]
    fn fast_tap_both_edges_captured() {
        let mut state = InputState::new();
        state.process_events(&[key_down(KeyCode::Space), key_up(KeyCode::Space)]);

        assert!(state.key_pressed(KeyCode::Space));
        assert!(state.key_released(KeyCode::Space));
        assert!(!state.key_down(KeyCode::Space));
    }

    /// Key-repeat downs do not re-trigger the pressed edge.
    #[test]
    fn duplicate_key_down_ignored() {
        let mut state = InputState::new();
        state.process_events(&[key_down(KeyCode::KeyA)]);
        state.end_frame();

        state.process_events(&[key_down(KeyCode::KeyA)]);
        assert!(!state.key_pressed(KeyCode::KeyA), "repeat must not re-press");
        assert!(state.key_down(KeyCode::KeyA));
    }

    /// Releasing a key that was never down registers nothing.
    #[test]
    fn key_up_without_down_ignored() {
        let mut state = InputState::new();
        state.process_events(&[key_up(KeyCode::KeyZ)]);
        assert!(!state.key_released(KeyCode::KeyZ));
    }

    //--- Mouse Tests ------------------------------------------------------

    /// Button edges and held state behave like keys.
    #[test]
    fn mouse_button_pressed_and_down() {
        let mut state = InputState::new();
        state.process_events(&[mouse_down(MouseButton::Left)]);

        assert!(state.button_pressed(MouseButton::Left));
        assert!(state.button_down(MouseButton::Left));

        state.end_frame();
        state.process_events(&[]);

        assert!(!state.button_pressed(MouseButton::Left));
        assert!(state.button_down(MouseButton::Left));
    }

    /// Released edge registers on the up frame.
    #[test]
    fn mouse_button_released() {
        let mut state = InputState::new();
        state.process_events(&[mouse_down(MouseButton::Right)]);
        state.end_frame();
        state.process_events(&[mouse_up(MouseButton::Right)]);

        assert!(state.button_released(MouseButton::Right));
        assert!(!state.button_down(MouseButton::Right));
    }

    /// Last MouseMoved wins within a frame.
    #[test]
    fn mouse_position_tracks_latest_move() {
        let mut state = InputState::new();
        state.process_events(&[
            InputEvent::MouseMoved { x: 10.0, y: 20.0 },
            InputEvent::MouseMoved { x: 100.0, y: 200.0 },
        ]);
        assert_eq!(state.mouse_position(), (100.0, 200.0));
    }

    //--- Edge Cases -------------------------------------------------------

    /// Unidentified events are safely ignored.
    #[test]
    fn unidentified_events_ignored() {
        let mut state = InputState::new();
        state.process_events(&[InputEvent::Unidentified]);
        assert_eq!(state.mouse_position(), (0.0, 0.0));
    }

    /// end_frame clears edges but keeps held state.
    #[test]
    fn end_frame_clears_edges_only() {
        let mut state = InputState::new();
        state.process_events(&[key_down(KeyCode::KeyA)]);
        assert!(state.key_pressed(KeyCode::KeyA));

        state.end_frame();

        assert!(!state.key_pressed(KeyCode::KeyA));
        assert!(state.key_down(KeyCode::KeyA));
    }
}
