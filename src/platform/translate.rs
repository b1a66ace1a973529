//=========================================================================
// Input Translation
//=========================================================================
//
// Turns winit window events into engine `InputEvent`s.
//
// Modifier changes carry no event of their own: they are cached and
// stamped onto later key and button events. Keys without an engine
// `KeyCode` are dropped here, so nothing past the platform sees them.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

/// Pixels per wheel line for touchpad-style pixel deltas.
const PIXELS_PER_LINE: f32 = 40.0;

//=== Keymap ==============================================================

// Engine key names mirror winit's physical key names one to one.
macro_rules! keymap {
    ($($key:ident),* $(,)?) => {
        fn map_key(code: WinitKeyCode) -> Option<KeyCode> {
            match code {
                $(WinitKeyCode::$key => Some(KeyCode::$key),)*
                _ => None,
            }
        }
    };
}

keymap!(
    Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM,
    KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Space, Enter, Escape, Tab, Backspace, ShiftLeft, ShiftRight,
);

fn map_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        _ => MouseButton::Other,
    }
}

fn map_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
    }
}

//=== InputTranslator =====================================================

/// Stateful winit → engine event translation.
#[derive(Debug, Default)]
pub(crate) struct InputTranslator {
    modifiers: Modifiers,
}

impl InputTranslator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Translates one window event, or returns `None` when it carries no
    /// engine input (including modifier updates, which are only cached).
    pub(crate) fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::ModifiersChanged(state) => {
                self.set_modifiers(state.state());
                None
            }
            WindowEvent::KeyboardInput { event, .. } => self.key(event.physical_key, event.state),
            WindowEvent::MouseInput { state, button, .. } => Some(self.button(*button, *state)),
            WindowEvent::CursorMoved { position, .. } => Some(Self::cursor(*position)),
            WindowEvent::MouseWheel { delta, .. } => Some(Self::wheel(*delta)),
            WindowEvent::Focused(focused) => self.focus(*focused),
            _ => None,
        }
    }

    //--- Per-Kind Translation ---------------------------------------------

    fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = map_modifiers(state);
        trace!(target: "platform::input", "Modifiers now {:?}", self.modifiers);
    }

    fn key(&self, physical: PhysicalKey, state: ElementState) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = physical else {
            return None;
        };
        let Some(key) = map_key(code) else {
            trace!(target: "platform::input", "Unmapped key {:?} ignored", code);
            return None;
        };

        let modifiers = self.modifiers;
        Some(match state {
            ElementState::Pressed => InputEvent::KeyDown { key, modifiers },
            ElementState::Released => InputEvent::KeyUp { key, modifiers },
        })
    }

    fn button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let (button, modifiers) = (map_button(button), self.modifiers);
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }

    fn cursor(position: PhysicalPosition<f64>) -> InputEvent {
        InputEvent::MouseMoved {
            x: position.x as f32,
            y: position.y as f32,
        }
    }

    /// Wheel movement in lines, positive away from the user.
    fn wheel(delta: MouseScrollDelta) -> InputEvent {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
        };
        InputEvent::MouseWheel { delta: lines }
    }

    /// Losing focus drops cached modifiers; their key-up goes elsewhere.
    fn focus(&mut self, focused: bool) -> Option<InputEvent> {
        if focused {
            return None;
        }
        self.modifiers = Modifiers::NONE;
        Some(InputEvent::FocusLost)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shift_ctrl() -> ModifiersState {
        ModifiersState::SHIFT | ModifiersState::CONTROL
    }

    #[test]
    fn movement_keys_reach_the_controller_bindings() {
        let translator = InputTranslator::new();
        for (winit, engine) in [
            (WinitKeyCode::KeyW, KeyCode::KeyW),
            (WinitKeyCode::ArrowLeft, KeyCode::ArrowLeft),
            (WinitKeyCode::Space, KeyCode::Space),
            (WinitKeyCode::Escape, KeyCode::Escape),
        ] {
            assert_eq!(
                translator.key(PhysicalKey::Code(winit), ElementState::Pressed),
                Some(InputEvent::key_down(engine))
            );
        }
    }

    #[test]
    fn keys_outside_the_engine_set_are_dropped() {
        let translator = InputTranslator::new();
        assert_eq!(translator.key(PhysicalKey::Code(WinitKeyCode::F13), ElementState::Pressed), None);
        assert_eq!(
            translator.key(PhysicalKey::Code(WinitKeyCode::NumpadEnter), ElementState::Released),
            None
        );
    }

    #[test]
    fn cached_modifiers_stamp_keys_and_buttons() {
        let mut translator = InputTranslator::new();
        translator.set_modifiers(shift_ctrl());

        let key = translator.key(PhysicalKey::Code(WinitKeyCode::KeyS), ElementState::Released);
        let click = translator.button(WinitMouseButton::Back, ElementState::Pressed);

        let expected = Modifiers { shift: true, ctrl: true, alt: false };
        assert_eq!(key, Some(InputEvent::KeyUp { key: KeyCode::KeyS, modifiers: expected }));
        assert_eq!(
            click,
            InputEvent::MouseButtonDown { button: MouseButton::Other, modifiers: expected }
        );
    }

    #[test]
    fn cursor_position_is_narrowed_to_f32() {
        assert_eq!(
            InputTranslator::cursor(PhysicalPosition::new(12.5, 480.0)),
            InputEvent::MouseMoved { x: 12.5, y: 480.0 }
        );
    }

    #[test]
    fn wheel_deltas_are_measured_in_lines() {
        assert_eq!(
            InputTranslator::wheel(MouseScrollDelta::LineDelta(0.0, -2.0)),
            InputEvent::MouseWheel { delta: -2.0 }
        );
        assert_eq!(
            InputTranslator::wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0))),
            InputEvent::MouseWheel { delta: 2.0 }
        );
    }

    #[test]
    fn losing_focus_releases_modifiers() {
        let mut translator = InputTranslator::new();
        translator.set_modifiers(shift_ctrl());

        assert_eq!(translator.focus(true), None);
        assert_eq!(translator.focus(false), Some(InputEvent::FocusLost));

        let key = translator.key(PhysicalKey::Code(WinitKeyCode::KeyA), ElementState::Pressed);
        assert_eq!(key, Some(InputEvent::key_down(KeyCode::KeyA)));
    }
}
