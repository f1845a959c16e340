//=========================================================================
// Input Event Types
//
// Defines the internal representation of low-level input events.
//
// This module abstracts away platform-specific input (e.g. Winit, SDL)
// into a unified, engine-friendly format used by the input subsystem.
//
// Responsibilities:
// - Represent keyboard and mouse inputs in a stable, portable way
// - Provide equality and hashing semantics for set-based state tracking
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputState (processes events)
//         ↓
//    Entity step logic (polls state)
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// Abstracts platform-specific button representations into a stable,
/// portable enum. The `Other` variant covers side buttons, macro buttons,
/// and any non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// For example, `KeyA` is always the same physical key regardless of
/// keyboard layout (QWERTY vs AZERTY).
///
/// Coverage:
/// - Alphanumeric keys (A-Z, 0-9)
/// - Arrow keys
/// - Common special keys (Space, Enter, Escape, etc.)
///
/// Additional keys can be added as needed without breaking existing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    /// Directional navigation keys
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    /// Spacebar
    Space,

    /// Return/Enter key
    Enter,

    /// Escape key
    Escape,

    /// Tab key
    Tab,

    /// Backspace key
    Backspace,

    /// Delete key
    Delete,

    /// Left Shift key
    ShiftLeft,

    /// Right Shift key
    ShiftRight,

    /// Fallback for keys not explicitly mapped by the input layer.
    ///
    /// Used when the platform reports a key that isn't in the enum.
    Unidentified
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// Events carry both the input type (key/button/mouse) and associated
/// data (which key, position).
///
/// # Event Types
///
/// - **KeyDown/KeyUp**: Discrete keyboard events
/// - **MouseButtonDown/MouseButtonUp**: Discrete mouse button events
/// - **MouseMoved**: Continuous cursor position updates
/// - **Unidentified**: Unknown/unsupported events (ignored by the state)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key pressed down.
    KeyDown { key: KeyCode },

    /// Key released.
    KeyUp { key: KeyCode },

    /// Mouse button pressed.
    MouseButtonDown { button: MouseButton },

    /// Mouse button released.
    MouseButtonUp { button: MouseButton },

    /// Mouse cursor moved to new position.
    ///
    /// Coordinates are in screen space (pixels, top-left origin).
    MouseMoved { x: f32, y: f32 },

    /// Unrecognized or unsupported event.
    ///
    /// Silently ignored by the input state. Used for forward
    /// compatibility when new platform events are added.
    Unidentified
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Same key and event type compare equal.
    #[test]
    fn equality_same_type_same_data() {
        let a = InputEvent::KeyDown { key: KeyCode::KeyA };
        let b = InputEvent::KeyDown { key: KeyCode::KeyA };
        assert_eq!(a, b);
    }

    /// Down and up for the same key are distinct events.
    #[test]
    fn equality_different_discriminant() {
        let a = InputEvent::KeyDown { key: KeyCode::KeyA };
        let b = InputEvent::KeyUp { key: KeyCode::KeyA };
        assert_ne!(a, b);
    }

    /// KeyCode is Copy and usable in sets.
    #[test]
    fn keycode_is_copy() {
        let key = KeyCode::Space;
        let copied = key;
        assert_eq!(key, copied);
    }

    /// Mouse buttons compare by variant.
    #[test]
    fn mouse_buttons_compare_by_variant() {
        assert_ne!(
            InputEvent::MouseButtonDown { button: MouseButton::Left },
            InputEvent::MouseButtonDown { button: MouseButton::Right },
        );
    }
}
