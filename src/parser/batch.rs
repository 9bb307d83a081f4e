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
use std::collections::BTreeMap;

use super::{parse, ParsedSampleInfo};

/// Parses every filename, preserving input order.
pub fn parse_batch<S: AsRef<str>>(file_names: &[S]) -> Vec<ParsedSampleInfo> {
    file_names
        .iter()
        .map(|file_name| parse(file_name.as_ref()))
        .collect()
}

/// Groups parsed samples by MIDI note. Entries without a note are left out;
/// see [`unassigned`]. Order within each group follows the input.
pub fn group_by_note(parsed: &[ParsedSampleInfo]) -> BTreeMap<u8, Vec<ParsedSampleInfo>> {
    let mut groups: BTreeMap<u8, Vec<ParsedSampleInfo>> = BTreeMap::new();
    for info in parsed {
        if let Some(note) = info.midi_note {
            groups.entry(note).or_default().push(info.clone());
        }
    }
    groups
}

/// Returns the entries that [`group_by_note`] drops, in input order.
pub fn unassigned(parsed: &[ParsedSampleInfo]) -> Vec<&ParsedSampleInfo> {
    parsed.iter().filter(|info| info.midi_note.is_none()).collect()
}
