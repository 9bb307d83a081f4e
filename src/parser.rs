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

//! Sample filename parsing.
//!
//! Extracts the sample name, MIDI note, velocity range and round-robin index
//! from filenames such as `Kick_C1_v0-40_rr1.wav`. Parsing never fails: a
//! filename that follows none of the conventions yields its stem as the
//! sample name and nothing else.

use std::fmt;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use serde::Serialize;
use tracing::debug;

use crate::layers::MAX_VELOCITY;
use crate::pitch;

pub mod batch;


pub use batch::{group_by_note, parse_batch, unassigned};

#[derive(Parser)]
#[grammar = "src/parser/filename.pest"]
struct FilenameParser;

/// Velocity range assumed when a filename does not encode one.
pub const FULL_VELOCITY_RANGE: (u8, u8) = (0, MAX_VELOCITY);

/// The naming conventions recognized in sample filenames, in precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPattern {
    /// `<name>_<note>_v<min>-<max>_rr<index>`
    Full,
    /// `<name>_<note>_v<min>-<max>`
    NoteVelocity,
    /// `<name>_<note>_rr<index>`
    NoteRoundRobin,
    /// `<name>_<note>`
    NoteOnly,
}

impl NamingPattern {
    /// All patterns, in the order they are tried.
    pub const PRECEDENCE: [NamingPattern; 4] = [
        NamingPattern::Full,
        NamingPattern::NoteVelocity,
        NamingPattern::NoteRoundRobin,
        NamingPattern::NoteOnly,
    ];

    fn rule(self) -> Rule {
        match self {
            NamingPattern::Full => Rule::full,
            NamingPattern::NoteVelocity => Rule::note_velocity,
            NamingPattern::NoteRoundRobin => Rule::note_round_robin,
            NamingPattern::NoteOnly => Rule::note_only,
        }
    }

    /// Whether the pattern carries an explicit velocity range.
    fn has_velocity(self) -> bool {
        matches!(self, NamingPattern::Full | NamingPattern::NoteVelocity)
    }
}

/// Metadata extracted from a single sample filename.
///
/// Every optional field is either fully valid or absent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParsedSampleInfo {
    /// The filename exactly as given.
    pub original_file_name: String,
    /// The sample name with the naming convention and extension removed.
    pub sample_name: String,
    /// The resolved MIDI note (0-127).
    pub midi_note: Option<u8>,
    /// Inclusive velocity bounds, `min <= max`.
    pub velocity_range: Option<(u8, u8)>,
    /// One-based round-robin index.
    pub round_robin_index: Option<u32>,
    /// The naming pattern that matched, if any.
    pub pattern: Option<NamingPattern>,
}

impl ParsedSampleInfo {
    /// A result carrying only the sample name, for filenames that match no pattern.
    fn unmatched(file_name: &str, stem: &str) -> ParsedSampleInfo {
        ParsedSampleInfo {
            original_file_name: file_name.to_string(),
            sample_name: stem.to_string(),
            midi_note: None,
            velocity_range: None,
            round_robin_index: None,
            pattern: None,
        }
    }
}

impl fmt::Display for ParsedSampleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: name={}", self.original_file_name, self.sample_name)?;
        if let Some(note) = self.midi_note {
            write!(f, " note={} ({})", note, pitch::note_name(note))?;
        }
        if let Some((min, max)) = self.velocity_range {
            write!(f, " velocity={}-{}", min, max)?;
        }
        if let Some(rr) = self.round_robin_index {
            write!(f, " rr={}", rr)?;
        }
        Ok(())
    }
}

/// Parses a sample filename. Always returns a result.
pub fn parse(file_name: &str) -> ParsedSampleInfo {
    let stem = strip_extension(file_name);

    for pattern in NamingPattern::PRECEDENCE {
        let Ok(mut pairs) = FilenameParser::parse(pattern.rule(), stem) else {
            continue;
        };
        let Some(matched) = pairs.next() else {
            continue;
        };

        let info = from_match(file_name, pattern, matched);
        debug!(
            file = file_name,
            pattern = ?pattern,
            midi_note = ?info.midi_note,
            "Matched naming pattern"
        );
        return info;
    }

    debug!(file = file_name, "No naming pattern matched");
    ParsedSampleInfo::unmatched(file_name, stem)
}

/// Removes the last `.`-delimited suffix. A leading dot is not an extension.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(index) if index > 0 => &file_name[..index],
        _ => file_name,
    }
}

/// Builds the parsed info from a structural match. Tokens that match the
/// grammar but fail to resolve (a note above 127, `v90-10`, `rr0`) only null
/// their own field.
fn from_match(file_name: &str, pattern: NamingPattern, matched: Pair<Rule>) -> ParsedSampleInfo {
    let mut sample_name = "";
    let mut midi_note = None;
    let mut velocity_min = None;
    let mut velocity_max = None;
    let mut round_robin_index = None;

    for pair in matched.into_inner() {
        match pair.as_rule() {
            Rule::full_name
            | Rule::note_velocity_name
            | Rule::note_round_robin_name
            | Rule::note_only_name => sample_name = pair.as_str(),
            Rule::note_number | Rule::note_name => midi_note = pitch::resolve(pair.as_str()),
            Rule::velocity_min => velocity_min = parse_velocity(pair.as_str()),
            Rule::velocity_max => velocity_max = parse_velocity(pair.as_str()),
            Rule::round_robin => {
                round_robin_index = pair.as_str().parse::<u32>().ok().filter(|rr| *rr >= 1)
            }
            _ => {}
        }
    }

    let velocity_range = if pattern.has_velocity() {
        match (velocity_min, velocity_max) {
            (Some(min), Some(max)) if min <= max => Some((min, max)),
            _ => None,
        }
    } else {
        Some(FULL_VELOCITY_RANGE)
    };

    ParsedSampleInfo {
        original_file_name: file_name.to_string(),
        sample_name: sample_name.to_string(),
        midi_note,
        velocity_range,
        round_robin_index,
        pattern: Some(pattern),
    }
}

fn parse_velocity(value: &str) -> Option<u8> {
    value.parse::<u8>().ok().filter(|v| *v <= MAX_VELOCITY)
}
