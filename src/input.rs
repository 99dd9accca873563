//! Per-frame input snapshot consumed by the ring core, and the effects it hands back to the host.

use crate::geometry::{Point, Size};
use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::collections::{BTreeSet, HashSet};
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

/// Keys a ring can be bound to. `Backspace` and `Escape` are control keys and never bindable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum KeyCode {
    #[strum(to_string = "MButton", serialize = "middle")]
    MiddleMouse,
    #[strum(to_string = "XButton1", serialize = "mouse4")]
    Mouse4,
    #[strum(to_string = "XButton2", serialize = "mouse5")]
    Mouse5,
    #[strum(to_string = "CapsLock", serialize = "Caps_Lock")]
    CapsLock,
    Space,
    #[strum(to_string = "PageUp", serialize = "Page_Up", serialize = "Prior")]
    PageUp,
    #[strum(to_string = "PageDown", serialize = "Page_Down", serialize = "Next")]
    PageDown,
    End,
    Home,
    Left,
    Up,
    Right,
    Down,
    Insert,
    Delete,
    #[strum(to_string = "0")]
    Digit0,
    #[strum(to_string = "1")]
    Digit1,
    #[strum(to_string = "2")]
    Digit2,
    #[strum(to_string = "3")]
    Digit3,
    #[strum(to_string = "4")]
    Digit4,
    #[strum(to_string = "5")]
    Digit5,
    #[strum(to_string = "6")]
    Digit6,
    #[strum(to_string = "7")]
    Digit7,
    #[strum(to_string = "8")]
    Digit8,
    #[strum(to_string = "9")]
    Digit9,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    #[strum(to_string = "NumPad0", serialize = "KP_0", serialize = "KP_Insert")]
    NumPad0,
    #[strum(to_string = "NumPad1", serialize = "KP_1", serialize = "KP_End")]
    NumPad1,
    #[strum(to_string = "NumPad2", serialize = "KP_2", serialize = "KP_Down")]
    NumPad2,
    #[strum(to_string = "NumPad3", serialize = "KP_3", serialize = "KP_Next")]
    NumPad3,
    #[strum(to_string = "NumPad4", serialize = "KP_4", serialize = "KP_Left")]
    NumPad4,
    #[strum(to_string = "NumPad5", serialize = "KP_5", serialize = "KP_Begin")]
    NumPad5,
    #[strum(to_string = "NumPad6", serialize = "KP_6", serialize = "KP_Right")]
    NumPad6,
    #[strum(to_string = "NumPad7", serialize = "KP_7", serialize = "KP_Home")]
    NumPad7,
    #[strum(to_string = "NumPad8", serialize = "KP_8", serialize = "KP_Up")]
    NumPad8,
    #[strum(to_string = "NumPad9", serialize = "KP_9", serialize = "KP_Prior")]
    NumPad9,
    #[strum(to_string = "NumPad*", serialize = "KP_Multiply")]
    NumPadMultiply,
    #[strum(to_string = "NumPad+", serialize = "KP_Add")]
    NumPadAdd,
    #[strum(to_string = "NumPad-", serialize = "KP_Subtract")]
    NumPadSubtract,
    #[strum(to_string = "NumPad.", serialize = "KP_Decimal", serialize = "KP_Delete")]
    NumPadDecimal,
    #[strum(to_string = "NumPad/", serialize = "KP_Divide")]
    NumPadDivide,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    F23,
    F24,
    #[strum(to_string = ";", serialize = "semicolon")]
    Semicolon,
    #[strum(to_string = "=", serialize = "equal", serialize = "plus")]
    Equal,
    #[strum(to_string = ",", serialize = "comma")]
    Comma,
    #[strum(to_string = "-", serialize = "minus")]
    Minus,
    #[strum(to_string = ".", serialize = "period")]
    Period,
    #[strum(to_string = "/", serialize = "slash")]
    Slash,
    #[strum(to_string = "`", serialize = "grave")]
    Grave,
    #[strum(to_string = "[", serialize = "bracketleft")]
    BracketLeft,
    #[strum(to_string = "\\", serialize = "backslash")]
    Backslash,
    #[strum(to_string = "]", serialize = "bracketright")]
    BracketRight,
    #[strum(to_string = "'", serialize = "apostrophe", serialize = "quote")]
    Quote,
    #[strum(to_string = "LCtrl", serialize = "Control_L", serialize = "ctrl")]
    LeftControl,
    #[strum(to_string = "RCtrl", serialize = "Control_R")]
    RightControl,
    #[strum(to_string = "LShift", serialize = "Shift_L", serialize = "shift")]
    LeftShift,
    #[strum(to_string = "RShift", serialize = "Shift_R")]
    RightShift,
    #[strum(to_string = "LAlt", serialize = "Alt_L", serialize = "alt")]
    LeftAlt,
    #[strum(to_string = "RAlt", serialize = "Alt_R", serialize = "ISO_Level3_Shift")]
    RightAlt,
    #[strum(to_string = "Backspace")]
    Backspace,
    #[strum(to_string = "Escape", serialize = "esc")]
    Escape,
}

impl KeyCode {
    pub fn is_bindable(&self) -> bool {
        !matches!(self, Self::Backspace | Self::Escape)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct RoleId(u32);

impl RoleId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Keys held down at the time the frame was sampled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeySnapshot(HashSet<KeyCode>);

impl KeySnapshot {
    pub fn press(&mut self, key: KeyCode) {
        self.0.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.0.remove(&key);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.0.contains(&key)
    }

    /// True when every key is held and none of them is a control key. An empty list is never held.
    pub fn all_held(&self, keys: &[KeyCode]) -> bool {
        !keys.is_empty() && keys.iter().all(|k| k.is_bindable() && self.is_held(*k))
    }

    /// Bindable keys currently held, in [`KeyCode`] declaration order.
    pub fn held_bindable(&self) -> Vec<KeyCode> {
        KeyCode::iter()
            .filter(|k| k.is_bindable() && self.is_held(*k))
            .collect()
    }
}

impl FromIterator<KeyCode> for KeySnapshot {
    fn from_iter<T: IntoIterator<Item = KeyCode>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub pointer: Point,
    /// Primary button click edge for this frame.
    pub clicked: bool,
    /// Monotonic time in seconds.
    pub now: f64,
    pub viewport: Size,
    pub keys: KeySnapshot,
    pub text_input_focused: bool,
    pub role: Option<RoleId>,
}

impl FrameInput {
    pub fn at(now: f64) -> Self {
        Self {
            now,
            ..Default::default()
        }
    }

    pub fn with_pointer(mut self, pointer: Point) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn with_keys(mut self, keys: impl IntoIterator<Item = KeyCode>) -> Self {
        self.keys = keys.into_iter().collect();
        self
    }

    pub fn with_click(mut self) -> Self {
        self.clicked = true;
        self
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_role(mut self, role: RoleId) -> Self {
        self.role = Some(role);
        self
    }

    pub fn escape_pressed(&self) -> bool {
        self.keys.is_held(KeyCode::Escape)
    }
}

/// Requests the core makes of the host while processing a frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameEffects {
    pub consumed_keys: BTreeSet<KeyCode>,
    pub warp_pointer: Option<Point>,
}

impl FrameEffects {
    pub fn consume(&mut self, key: KeyCode) {
        self.consumed_keys.insert(key);
    }

    pub fn is_consumed(&self, key: KeyCode) -> bool {
        self.consumed_keys.contains(&key)
    }

    pub fn request_warp(&mut self, position: Point) {
        self.warp_pointer = Some(position);
    }
}
