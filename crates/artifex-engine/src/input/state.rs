use std::collections::HashSet;

use super::types::{
    InputEvent,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for a single window.
///
/// Holds the pointer position and which mouse buttons are down. The winit
/// translation reads it to stamp button events with a position and to drop
/// releases of presses it never forwarded.
#[derive(Debug, Default)]
pub struct InputState {
    /// Current modifier state.
    pub modifiers: Modifiers,

    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases can be lost while unfocused.
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { modifiers, .. } => {
                self.modifiers = *modifiers;
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                x,
                y,
                modifiers,
            }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;
                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }

            InputEvent::Touch(_) => {}
        }
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyState};

    fn button(state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x: 3.0,
            y: 4.0,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn button_press_and_release_tracked() {
        let mut s = InputState::default();
        s.apply_event(&button(MouseButtonState::Pressed));
        assert!(s.button_down(MouseButton::Left));
        assert_eq!(s.pointer_pos, Some((3.0, 4.0)));

        s.apply_event(&button(MouseButtonState::Released));
        assert!(!s.button_down(MouseButton::Left));
    }

    #[test]
    fn focus_loss_releases_buttons() {
        let mut s = InputState::default();
        s.apply_event(&button(MouseButtonState::Pressed));
        s.apply_event(&InputEvent::Focused(false));
        assert!(!s.button_down(MouseButton::Left));
        assert!(!s.focused);
    }

    #[test]
    fn leaving_forgets_the_pointer() {
        let mut s = InputState::default();
        s.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 2.0 }));
        assert_eq!(s.pointer_pos, Some((1.0, 2.0)));
        s.apply_event(&InputEvent::PointerLeft);
        assert_eq!(s.pointer_pos, None);
    }

    #[test]
    fn key_events_carry_modifiers() {
        let mut s = InputState::default();
        let shift = Modifiers { shift: true, ..Modifiers::default() };
        s.apply_event(&InputEvent::Key {
            key: Key::Char('s'),
            state: KeyState::Pressed,
            modifiers: shift,
            repeat: false,
        });
        assert_eq!(s.modifiers, shift);
    }

    #[test]
    fn repeat_is_not_a_fresh_press() {
        let ev = InputEvent::Key {
            key: Key::Char('c'),
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: true,
        };
        assert!(!ev.is_key_press(Key::Char('c')));
    }
}
