/// A key, as far as the studio cares.
///
/// Printable keys arrive as lowercase [`Key::Char`] following the active
/// keyboard layout; everything unnamed collapses to [`Key::Other`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Enter,
    Tab,
    Space,
    Shift,
    Control,
    Alt,
    Meta,
    Char(char),
    Other,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Cursor position in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Mouse button change, stamped with the cursor position at the time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// One touch contact update in logical pixels.
///
/// `id` identifies the contact from `Started` until `Ended`/`Cancelled`;
/// simultaneous contacts have distinct ids.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchEvent {
    pub id: u64,
    pub phase: TouchPhase,
    pub x: f32,
    pub y: f32,
}

/// Window-system input after translation, free of `winit` types.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),
    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        repeat: bool,
    },
    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),
    Touch(TouchEvent),
    PointerLeft,
    Focused(bool),
}

impl InputEvent {
    /// True for the initial press of `key` (auto-repeat excluded).
    pub fn is_key_press(&self, key: Key) -> bool {
        matches!(
            self,
            InputEvent::Key { key: k, state: KeyState::Pressed, repeat: false, .. } if *k == key
        )
    }
}
