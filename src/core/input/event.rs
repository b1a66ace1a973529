//=========================================================================
// Input Event Types
//=========================================================================
//
// Engine-side representation of low-level input.
//
// The platform layer translates OS events (winit) into these types so
// nothing past the platform bridge depends on a windowing backend.
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (held / pressed / released)
//         ↓
//    VirtualController (movement axis, buttons)
// ```
//
//=========================================================================

//=== MouseButton =========================================================

/// Physical mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,

    /// Side, thumb, and macro buttons.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Names the key position, not the character it produces: `KeyW` is the
/// same physical key on QWERTY and AZERTY layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    ShiftLeft,
    ShiftRight,

    /// Key the platform reported but the engine does not map.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state. Left and right variants are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,

    /// Ctrl, or Command on macOS.
    pub ctrl: bool,

    /// Alt, or Option on macOS.
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };

    /// `true` when no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// Discrete events (keys, buttons, focus) are delivered in order.
/// Continuous events (cursor, wheel) may be coalesced by the platform
/// so only the latest one per kind reaches the core in a given batch.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyDown { key: KeyCode, modifiers: Modifiers },
    KeyUp { key: KeyCode, modifiers: Modifiers },
    MouseButtonDown { button: MouseButton, modifiers: Modifiers },
    MouseButtonUp { button: MouseButton, modifiers: Modifiers },

    /// Cursor position in window pixels, top-left origin.
    MouseMoved { x: f32, y: f32 },

    /// Vertical scroll, in lines. Positive scrolls away from the user.
    MouseWheel { delta: f32 },

    /// The window lost keyboard focus; every held input is released.
    FocusLost,
}

impl InputEvent {
    /// Shorthand for a `KeyDown` without modifiers.
    pub fn key_down(key: KeyCode) -> Self {
        Self::KeyDown { key, modifiers: Modifiers::NONE }
    }

    /// Shorthand for a `KeyUp` without modifiers.
    pub fn key_up(key: KeyCode) -> Self {
        Self::KeyUp { key, modifiers: Modifiers::NONE }
    }

    /// `true` for events the platform may coalesce (cursor and wheel).
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::MouseMoved { .. } | Self::MouseWheel { .. })
    }

    /// Modifier state carried by key and button events.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self {
            Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. }
            | Self::MouseButtonDown { modifiers, .. }
            | Self::MouseButtonUp { modifiers, .. } => Some(*modifiers),
            _ => None,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
