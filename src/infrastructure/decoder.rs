//! Keystroke decoding for raw terminal input.
//!
//! Turns each chunk read from a raw-mode terminal into the events the menu
//! consumes: the decoded keystrokes first, then one [`InputEvent::Data`]
//! carrying the chunk itself.
//!
//! # Recognized sequences
//!
//! | Bytes                       | Key         |
//! |-----------------------------|-------------|
//! | `ESC [ A` / `ESC O A`       | `Up`        |
//! | `ESC [ B` / `ESC O B`       | `Down`      |
//! | `ESC [ C` / `ESC O C`       | `Right`     |
//! | `ESC [ D` / `ESC O D`       | `Left`      |
//! | `ESC` alone                 | `Escape`    |
//! | `CR`, `LF`, `CR LF`         | `Enter`     |
//! | `DEL`, `BS`                 | `Backspace` |
//! | printable UTF-8             | `Text`      |
//!
//! Other CSI sequences (modifier parameters on arrows are accepted), `ESC`
//! followed by any other byte, and control bytes decode as `Other`.

use crate::app::{InputEvent, Key, ESC};

const CSI: u8 = b'[';
const SS3: u8 = b'O';
const CR: u8 = b'\r';
const LF: u8 = b'\n';
const DEL: u8 = 0x7f;
const BS: u8 = 0x08;

/// Decodes one raw chunk into keystrokes followed by the raw-byte event.
#[must_use]
pub fn decode(chunk: &[u8]) -> Vec<InputEvent> {
    let mut events = Vec::new();
    let mut rest = chunk;

    while let Some((key, consumed)) = next_key(rest) {
        events.push(InputEvent::Key(key));
        rest = &rest[consumed..];
    }

    if !chunk.is_empty() {
        events.push(InputEvent::Data(chunk.to_vec()));
    }
    events
}

/// Decodes the key at the start of `bytes`, returning it with the number of
/// bytes it spans.
fn next_key(bytes: &[u8]) -> Option<(Key, usize)> {
    let (&first, tail) = bytes.split_first()?;

    let decoded = match first {
        ESC => match tail.first() {
            None | Some(&ESC) => (Key::Escape, 1),
            Some(&CSI) => csi(&tail[1..]),
            Some(&SS3) => ss3(&tail[1..]),
            Some(_) => (Key::Other, 2),
        },
        CR if tail.first() == Some(&LF) => (Key::Enter, 2),
        CR | LF => (Key::Enter, 1),
        DEL | BS => (Key::Backspace, 1),
        byte if byte < 0x20 => (Key::Other, 1),
        _ => text(bytes),
    };
    Some(decoded)
}

/// Decodes the body of a CSI sequence (after `ESC [`).
fn csi(body: &[u8]) -> (Key, usize) {
    let params = body
        .iter()
        .take_while(|b| (0x20..=0x3f).contains(*b))
        .count();

    match body.get(params) {
        Some(&fin) if (0x40..=0x7e).contains(&fin) => (arrow(fin), 2 + params + 1),
        _ => (Key::Other, 2 + params),
    }
}

/// Decodes the body of an SS3 sequence (after `ESC O`).
fn ss3(body: &[u8]) -> (Key, usize) {
    body.first().map_or((Key::Other, 2), |&fin| (arrow(fin), 3))
}

fn arrow(fin: u8) -> Key {
    match fin {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        _ => Key::Other,
    }
}

/// Decodes one UTF-8 character as text.
fn text(bytes: &[u8]) -> (Key, usize) {
    let width = match bytes[0] {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return (Key::Other, 1),
    };

    match bytes.get(..width).map(std::str::from_utf8) {
        Some(Ok(ch)) => (Key::Text(ch.to_string()), width),
        _ => (Key::Other, 1),
    }
}
