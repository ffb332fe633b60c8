//! `winit` → engine input translation.

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitButton, TouchPhase as WinitPhase, WindowEvent};
use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};
use winit::window::Window;

use crate::input::{
    InputEvent, InputState, Key, KeyState, Modifiers, MouseButton, MouseButtonState,
    PointerButtonEvent, PointerMoveEvent, TouchEvent, TouchPhase,
};

/// Returns `None` for window events that carry no input.
///
/// Positions are converted to logical pixels with the window's current scale
/// factor. Button events take their position from `state`, which the runtime
/// updates after every translated event.
pub(crate) fn translate_window_event(
    window: &Window,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    let ev = match event {
        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = logical(window, *position);
            InputEvent::PointerMoved(PointerMoveEvent { x, y })
        }
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,
        WindowEvent::MouseInput { state: pressed, button, .. } => {
            return pointer_button(state, mouse_button(*button), *pressed);
        }
        WindowEvent::Touch(touch) => {
            let (x, y) = logical(window, touch.location);
            InputEvent::Touch(TouchEvent {
                id: touch.id,
                phase: touch_phase(touch.phase),
                x,
                y,
            })
        }
        WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
            key: key(&event.logical_key),
            state: match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            },
            modifiers: state.modifiers,
            repeat: event.repeat,
        },
        WindowEvent::ModifiersChanged(m) => InputEvent::ModifiersChanged(modifiers(m.state())),
        WindowEvent::Focused(focused) => InputEvent::Focused(*focused),
        _ => return None,
    };
    Some(ev)
}

/// A press is dropped until the cursor position is known, and its release
/// with it: only releases of held buttons are forwarded.
fn pointer_button(
    state: &InputState,
    button: MouseButton,
    pressed: ElementState,
) -> Option<InputEvent> {
    let (button_state, (x, y)) = match pressed {
        ElementState::Pressed => {
            let Some(pos) = state.pointer_pos else {
                log::debug!("{button:?} pressed before the cursor position is known; ignored");
                return None;
            };
            (MouseButtonState::Pressed, pos)
        }
        ElementState::Released => {
            if !state.button_down(button) {
                return None;
            }
            (MouseButtonState::Released, state.pointer_pos.unwrap_or_default())
        }
    };
    Some(InputEvent::PointerButton(PointerButtonEvent {
        button,
        state: button_state,
        x,
        y,
        modifiers: state.modifiers,
    }))
}

fn logical(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let p = pos.to_logical::<f64>(window.scale_factor());
    (p.x as f32, p.y as f32)
}

fn touch_phase(phase: WinitPhase) -> TouchPhase {
    match phase {
        WinitPhase::Started => TouchPhase::Started,
        WinitPhase::Moved => TouchPhase::Moved,
        WinitPhase::Ended => TouchPhase::Ended,
        WinitPhase::Cancelled => TouchPhase::Cancelled,
    }
}

fn modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn mouse_button(b: WinitButton) -> MouseButton {
    match b {
        WinitButton::Left => MouseButton::Left,
        WinitButton::Right => MouseButton::Right,
        WinitButton::Middle => MouseButton::Middle,
        WinitButton::Back => MouseButton::Other(3),
        WinitButton::Forward => MouseButton::Other(4),
        WinitButton::Other(n) => MouseButton::Other(n),
    }
}

// Layout-aware: bindings follow the character printed on the key.
fn key(k: &WinitKey) -> Key {
    match k {
        WinitKey::Character(s) => s
            .chars()
            .next()
            .map_or(Key::Other, |c| Key::Char(c.to_ascii_lowercase())),
        WinitKey::Named(named) => match named {
            NamedKey::Escape => Key::Escape,
            NamedKey::Delete => Key::Delete,
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Enter => Key::Enter,
            NamedKey::Tab => Key::Tab,
            NamedKey::Space => Key::Space,
            NamedKey::Shift => Key::Shift,
            NamedKey::Control => Key::Control,
            NamedKey::Alt => Key::Alt,
            NamedKey::Super | NamedKey::Meta => Key::Meta,
            _ => Key::Other,
        },
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characters_are_lowercased() {
        assert_eq!(key(&WinitKey::Character("S".into())), Key::Char('s'));
        assert_eq!(key(&WinitKey::Character("c".into())), Key::Char('c'));
    }

    #[test]
    fn named_keys_map_and_the_rest_is_other() {
        assert_eq!(key(&WinitKey::Named(NamedKey::Escape)), Key::Escape);
        assert_eq!(key(&WinitKey::Named(NamedKey::Delete)), Key::Delete);
        assert_eq!(key(&WinitKey::Named(NamedKey::F5)), Key::Other);
    }

    #[test]
    fn press_waits_for_a_known_cursor_position() {
        let mut state = InputState::default();
        assert_eq!(pointer_button(&state, MouseButton::Left, ElementState::Pressed), None);

        state.pointer_pos = Some((12.0, 34.0));
        let press = pointer_button(&state, MouseButton::Left, ElementState::Pressed);
        assert!(matches!(
            press,
            Some(InputEvent::PointerButton(PointerButtonEvent {
                state: MouseButtonState::Pressed,
                x,
                y,
                ..
            })) if (x, y) == (12.0, 34.0)
        ));
    }

    #[test]
    fn release_is_forwarded_only_for_held_buttons() {
        let mut state = InputState::default();
        assert_eq!(pointer_button(&state, MouseButton::Left, ElementState::Released), None);

        state.pointer_pos = Some((1.0, 1.0));
        if let Some(press) = pointer_button(&state, MouseButton::Left, ElementState::Pressed) {
            state.apply_event(&press);
        }
        state.apply_event(&InputEvent::PointerLeft);

        let release = pointer_button(&state, MouseButton::Left, ElementState::Released);
        assert!(matches!(
            release,
            Some(InputEvent::PointerButton(PointerButtonEvent {
                state: MouseButtonState::Released,
                ..
            }))
        ));
    }

    #[test]
    fn touch_phases_map_one_to_one() {
        assert_eq!(touch_phase(WinitPhase::Cancelled), TouchPhase::Cancelled);
        assert_eq!(touch_phase(WinitPhase::Started), TouchPhase::Started);
    }
}
