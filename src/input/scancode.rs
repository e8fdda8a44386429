//! PS/2 scan-code set 1 decoding.
//!
//! Make codes are `0x01..=0x7F`; the matching break code has bit 7 set.
//! `0xE0` prefixes the arrow block and other extended keys.

use super::{InputEvent, InputSource};

const EXTENDED_PREFIX: u8 = 0xE0;
const RELEASE_BIT: u8 = 0x80;

/// US layout, unshifted. Zero means "no printable key".
#[rustfmt::skip]
const SET1_ASCII: [u8; 58] = [
    0,    27,   b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'0', b'-', b'=', 8,
    b'\t', b'q', b'w', b'e', b'r', b't', b'y', b'u', b'i', b'o', b'p', b'[', b']', b'\n',
    0,    b'a', b's', b'd', b'f', b'g', b'h', b'j', b'k', b'l', b';', b'\'', b'`',
    0,    b'\\', b'z', b'x', b'c', b'v', b'b', b'n', b'm', b',', b'.', b'/', 0,
    b'*', 0,    b' ',
];

/// A decoded key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Printable key, lower-case ASCII.
    Char(u8),
}

impl Key {
    /// W/S and the vertical arrows move, A/D strafe, the side arrows turn.
    pub fn event(self) -> Option<InputEvent> {
        Some(match self {
            Key::Up | Key::Char(b'w') => InputEvent::MoveForward,
            Key::Down | Key::Char(b's') => InputEvent::MoveBackward,
            Key::Left => InputEvent::TurnLeft,
            Key::Right => InputEvent::TurnRight,
            Key::Char(b'a') => InputEvent::StrafeLeft,
            Key::Char(b'd') => InputEvent::StrafeRight,
            Key::Char(_) => return None,
        })
    }
}

/// Byte-at-a-time decoder. Only key presses are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScancodeDecoder {
    extended: bool,
}

impl ScancodeDecoder {
    pub const fn new() -> Self {
        Self { extended: false }
    }

    /// Whether the last byte was an unconsumed `0xE0`.
    pub fn is_extended(&self) -> bool {
        self.extended
    }

    pub fn feed(&mut self, code: u8) -> Option<Key> {
        if code == EXTENDED_PREFIX {
            self.extended = true;
            return None;
        }
        let extended = std::mem::take(&mut self.extended);
        if code & RELEASE_BIT != 0 {
            return None;
        }

        if extended {
            return match code {
                0x48 => Some(Key::Up),
                0x4B => Some(Key::Left),
                0x4D => Some(Key::Right),
                0x50 => Some(Key::Down),
                _ => None,
            };
        }
        match SET1_ASCII.get(usize::from(code)) {
            Some(&c) if c != 0 => Some(Key::Char(c)),
            _ => None,
        }
    }
}

/// Pulls one byte per poll from a scan-code stream.
#[derive(Clone, Debug)]
pub struct ScancodeInput<B> {
    bytes: B,
    decoder: ScancodeDecoder,
}

impl<B: Iterator<Item = u8>> ScancodeInput<B> {
    pub fn new(bytes: impl IntoIterator<IntoIter = B>) -> Self {
        Self {
            bytes: bytes.into_iter(),
            decoder: ScancodeDecoder::new(),
        }
    }
}

impl<B: Iterator<Item = u8>> InputSource for ScancodeInput<B> {
    fn poll(&mut self) -> Option<InputEvent> {
        let code = self.bytes.next()?;
        self.decoder.feed(code).and_then(Key::event)
    }
}
