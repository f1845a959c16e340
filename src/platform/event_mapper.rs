//=========================================================================
// Event Mapper
//=========================================================================
//
// Converts platform-specific Winit events into engine events.
//
// Architecture:
//   Winit WindowEvent → map_window_event() → SourceEvent → engine loop
//
// Unmapped keys (F13-F24, numpad, media keys) come through as
// `KeyCode::Unidentified` and are filtered before reaching the input
// state. Window events the engine has no use for map to `None`.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, MouseButton as WinitMouseButton, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, MouseButton, SourceEvent};

//=== Window Event Mapping ================================================

/// Maps one Winit window event to an engine event, if it has one.
pub(crate) fn map_window_event(event: &WindowEvent) -> Option<SourceEvent> {
    match event {
        WindowEvent::CloseRequested => Some(SourceEvent::CloseRequested),

        WindowEvent::Resized(size) => Some(SourceEvent::Resized {
            width: size.width,
            height: size.height,
        }),

        WindowEvent::KeyboardInput { event: key_event, .. } => {
            let key = match key_event.physical_key {
                PhysicalKey::Code(code) => KeyCode::from(code),
                _ => return None,
            };
            if matches!(key, KeyCode::Unidentified) {
                return None;
            }
            let input = match key_event.state {
                ElementState::Pressed => InputEvent::KeyDown { key },
                ElementState::Released => InputEvent::KeyUp { key },
            };
            Some(SourceEvent::Input(input))
        }

        WindowEvent::MouseInput { state, button, .. } => {
            let button = MouseButton::from(*button);
            let input = match state {
                ElementState::Pressed => InputEvent::MouseButtonDown { button },
                ElementState::Released => InputEvent::MouseButtonUp { button },
            };
            Some(SourceEvent::Input(input))
        }

        WindowEvent::CursorMoved { position, .. } => Some(SourceEvent::Input(
            InputEvent::MouseMoved {
                x: position.x as f32,
                y: position.y as f32,
            },
        )),

        _ => None,
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit physical key codes to engine key codes.
///
/// Maps A-Z, 0-9, arrows, and common special keys. Everything else
/// returns `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,
            ShiftLeft => KeyCode::ShiftLeft,
            ShiftRight => KeyCode::ShiftRight,

            //--- Unmapped (return Unidentified) -------------------------------

            _ => KeyCode::Unidentified,
        }
    }
}

/// Converts Winit mouse buttons to engine buttons.
///
/// Left/Right/Middle mapped directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
