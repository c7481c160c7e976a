// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use keyboard_types::Code;

/// A virtual key, named independently of keyboard language and platform.
///
/// Platform shims convert physical keys with `From<keyboard_types::Code>`; keys
/// without a name here become [`Key::Unknown`], and the raw scan code still travels
/// with the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[expect(missing_docs, reason = "Variants are named after the keys they stand for")]
pub enum Key {
    Unknown,
    Escape,
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
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    Enter,
    Tab,
    Backspace,
    Space,
    Shift,
    Control,
    Alt,
    Meta,
    CapsLock,
    Minus,
    Equal,
    BracketLeft,
    BracketRight,
    Backslash,
    Semicolon,
    Quote,
    Backquote,
    Comma,
    Period,
    Slash,
}

const LETTERS: [Key; 26] = [
    Key::A,
    Key::B,
    Key::C,
    Key::D,
    Key::E,
    Key::F,
    Key::G,
    Key::H,
    Key::I,
    Key::J,
    Key::K,
    Key::L,
    Key::M,
    Key::N,
    Key::O,
    Key::P,
    Key::Q,
    Key::R,
    Key::S,
    Key::T,
    Key::U,
    Key::V,
    Key::W,
    Key::X,
    Key::Y,
    Key::Z,
];

impl Key {
    /// Whether this is one of the modifier keys.
    pub fn is_modifier(self) -> bool {
        matches!(self, Self::Shift | Self::Control | Self::Alt | Self::Meta)
    }

    /// The letter key for an ASCII letter, in either case.
    pub fn from_letter(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        ('A'..='Z').zip(LETTERS).find(|(l, _)| *l == c).map(|(_, key)| key)
    }
}

impl From<Code> for Key {
    fn from(code: Code) -> Self {
        match code {
            Code::Escape => Self::Escape,
            Code::F1 => Self::F1,
            Code::F2 => Self::F2,
            Code::F3 => Self::F3,
            Code::F4 => Self::F4,
            Code::F5 => Self::F5,
            Code::F6 => Self::F6,
            Code::F7 => Self::F7,
            Code::F8 => Self::F8,
            Code::F9 => Self::F9,
            Code::F10 => Self::F10,
            Code::F11 => Self::F11,
            Code::F12 => Self::F12,
            Code::KeyA => Self::A,
            Code::KeyB => Self::B,
            Code::KeyC => Self::C,
            Code::KeyD => Self::D,
            Code::KeyE => Self::E,
            Code::KeyF => Self::F,
            Code::KeyG => Self::G,
            Code::KeyH => Self::H,
            Code::KeyI => Self::I,
            Code::KeyJ => Self::J,
            Code::KeyK => Self::K,
            Code::KeyL => Self::L,
            Code::KeyM => Self::M,
            Code::KeyN => Self::N,
            Code::KeyO => Self::O,
            Code::KeyP => Self::P,
            Code::KeyQ => Self::Q,
            Code::KeyR => Self::R,
            Code::KeyS => Self::S,
            Code::KeyT => Self::T,
            Code::KeyU => Self::U,
            Code::KeyV => Self::V,
            Code::KeyW => Self::W,
            Code::KeyX => Self::X,
            Code::KeyY => Self::Y,
            Code::KeyZ => Self::Z,
            Code::Digit0 => Self::Digit0,
            Code::Digit1 => Self::Digit1,
            Code::Digit2 => Self::Digit2,
            Code::Digit3 => Self::Digit3,
            Code::Digit4 => Self::Digit4,
            Code::Digit5 => Self::Digit5,
            Code::Digit6 => Self::Digit6,
            Code::Digit7 => Self::Digit7,
            Code::Digit8 => Self::Digit8,
            Code::Digit9 => Self::Digit9,
            Code::ArrowUp => Self::ArrowUp,
            Code::ArrowDown => Self::ArrowDown,
            Code::ArrowLeft => Self::ArrowLeft,
            Code::ArrowRight => Self::ArrowRight,
            Code::Home => Self::Home,
            Code::End => Self::End,
            Code::PageUp => Self::PageUp,
            Code::PageDown => Self::PageDown,
            Code::Insert => Self::Insert,
            Code::Delete => Self::Delete,
            Code::Enter | Code::NumpadEnter => Self::Enter,
            Code::Tab => Self::Tab,
            Code::Backspace => Self::Backspace,
            Code::Space => Self::Space,
            Code::ShiftLeft | Code::ShiftRight => Self::Shift,
            Code::ControlLeft | Code::ControlRight => Self::Control,
            Code::AltLeft | Code::AltRight => Self::Alt,
            Code::MetaLeft | Code::MetaRight => Self::Meta,
            Code::CapsLock => Self::CapsLock,
            Code::Minus => Self::Minus,
            Code::Equal => Self::Equal,
            Code::BracketLeft => Self::BracketLeft,
            Code::BracketRight => Self::BracketRight,
            Code::Backslash => Self::Backslash,
            Code::Semicolon => Self::Semicolon,
            Code::Quote => Self::Quote,
            Code::Backquote => Self::Backquote,
            Code::Comma => Self::Comma,
            Code::Period => Self::Period,
            Code::Slash => Self::Slash,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_neutral_keys() {
        assert_eq!(Key::from(Code::KeyQ), Key::Q);
        assert_eq!(Key::from(Code::NumpadEnter), Key::Enter);
        assert_eq!(Key::from(Code::ShiftRight), Key::Shift);
        assert_eq!(Key::from(Code::Fn), Key::Unknown);
        assert_eq!(Key::from_letter('q'), Some(Key::Q));
        assert_eq!(Key::from_letter('1'), None);
    }
}
