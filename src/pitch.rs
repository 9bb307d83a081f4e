// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Note name to MIDI pitch conversion.
//!
//! Octaves follow the convention where C3 is MIDI note 60 (C-2 is 0), so
//! `midi = (octave + 2) * 12 + pitch_class`. This is not the C4 = 60
//! convention and must not be changed, as sample libraries named against
//! it would map one octave off.

/// The highest valid MIDI note number.
pub const MAX_MIDI_NOTE: u8 = 127;

/// Octave offset for the C3 = 60 convention.
const OCTAVE_OFFSET: i64 = 2;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Returns the pitch class of a natural note letter, case-insensitively.
fn pitch_class(letter: char) -> Option<i64> {
    match letter.to_ascii_uppercase() {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// Converts a note name such as `F#4`, `Bb2` or `c-1` to a MIDI note number.
///
/// The character directly after the letter is the accidental: `#` is sharp,
/// `b` or `B` is flat. This means `BB2` reads as B-flat 2. Returns `None` if
/// the letter is unknown, the octave is not an integer, or the result falls
/// outside 0-127.
pub fn convert(note_text: &str) -> Option<u8> {
    let mut chars = note_text.chars();
    let base = pitch_class(chars.next()?)?;

    let rest = chars.as_str();
    let (accidental, octave_text) = match rest.chars().next() {
        Some('#') => (1, &rest[1..]),
        Some('b') | Some('B') => (-1, &rest[1..]),
        _ => (0, rest),
    };

    let octave: i64 = octave_text.parse().ok()?;
    let midi = octave
        .checked_add(OCTAVE_OFFSET)?
        .checked_mul(12)?
        .checked_add(base + accidental)?;

    u8::try_from(midi)
        .ok()
        .filter(|note| *note <= MAX_MIDI_NOTE)
}

/// Resolves a note token that is either a bare MIDI number (`49`) or a note
/// name (`C#1`).
pub fn resolve(token: &str) -> Option<u8> {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse::<u8>().ok().filter(|note| *note <= MAX_MIDI_NOTE)
    } else {
        convert(token)
    }
}

/// Formats a MIDI note number as a note name, using sharps. The inverse of
/// [`convert`]: `note_name(60)` is `C3`.
pub fn note_name(midi: u8) -> String {
    let octave = i64::from(midi / 12) - OCTAVE_OFFSET;
    format!("{}{}", SHARP_NAMES[usize::from(midi % 12)], octave)
}
