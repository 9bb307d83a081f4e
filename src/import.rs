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

//! Batch import: turns a set of sample filenames into an instrument mapping.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Import;
use crate::layers::{Instrument, LayerError, SampleReference, VelocityRange, VelocitySlotSet};
use crate::parser::{self, ParsedSampleInfo, FULL_VELOCITY_RANGE};
use crate::util;

/// Round-robin indexes above this are treated as missing when importing.
pub const MAX_IMPORT_ROUND_ROBINS: usize = 128;

/// Error types for import operations
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Layer error: {0}")]
    Layer(#[from] LayerError),
}

/// The outcome of an import.
#[derive(Clone, Debug, Serialize)]
pub struct ImportReport {
    /// The mapping built from every file with a resolvable note.
    pub instrument: Instrument,
    /// Files whose names did not yield a MIDI note, in input order.
    pub unassigned: Vec<ParsedSampleInfo>,
}

/// Parses the filenames and builds an instrument from them.
///
/// Each key gets one layer per distinct velocity range, ordered by range.
/// A layer has at least `settings.round_robins()` slots and enough for the
/// highest round-robin index among its files. Files with a round-robin index
/// go to that slot; the rest, and any whose slot is already taken, fill the
/// first empty slot, growing the layer when it is full.
pub fn import_samples<S: AsRef<str>>(
    file_names: &[S],
    settings: &Import,
) -> Result<ImportReport, ImportError> {
    let parsed = parser::parse_batch(file_names);

    let unassigned: Vec<ParsedSampleInfo> =
        parser::unassigned(&parsed).into_iter().cloned().collect();
    for info in &unassigned {
        warn!(
            file = info.original_file_name.as_str(),
            "No MIDI note in file name, leaving sample unassigned"
        );
    }

    let mut instrument = Instrument::new();
    for (note, entries) in parser::group_by_note(&parsed) {
        let mapping = instrument.key_mut(note)?;
        for layer in build_layers(&entries, settings.round_robins())? {
            mapping.add_layer(layer);
        }

        for (first, second) in mapping.overlapping_layers() {
            warn!(note, %first, %second, "Velocity layers overlap");
        }
    }

    info!(
        files = parsed.len(),
        keys = instrument.mapped_notes().len(),
        samples = instrument.sample_count(),
        unassigned = unassigned.len(),
        "Imported samples"
    );

    Ok(ImportReport {
        instrument,
        unassigned,
    })
}

/// Lists the files in a directory (not recursing) with one of the given
/// extensions, sorted by name.
pub fn scan_directory(path: &Path, extensions: &[String]) -> Result<Vec<String>, ImportError> {
    let mut file_names = Vec::new();
    for entry in fs::read_dir(path)? {
        let path = entry?.path();
        if !path.is_file() || !util::has_extension(&path, extensions) {
            debug!(file = util::filename_display(&path), "Skipping entry");
            continue;
        }

        match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => file_names.push(name.to_string()),
            None => warn!(path = ?path, "Skipping file with a non UTF-8 name"),
        }
    }

    file_names.sort();
    Ok(file_names)
}

fn build_layers(
    entries: &[ParsedSampleInfo],
    round_robins: usize,
) -> Result<Vec<VelocitySlotSet>, LayerError> {
    let mut by_range: BTreeMap<(u8, u8), Vec<&ParsedSampleInfo>> = BTreeMap::new();
    for entry in entries {
        let range = entry.velocity_range.unwrap_or_else(|| {
            debug!(
                file = entry.original_file_name.as_str(),
                "Invalid velocity range in file name, using the full range"
            );
            FULL_VELOCITY_RANGE
        });
        by_range.entry(range).or_default().push(entry);
    }

    by_range
        .into_iter()
        .map(|((min, max), entries)| {
            build_layer(VelocityRange::hard(min, max)?, &entries, round_robins)
        })
        .collect()
}

fn build_layer(
    velocity_range: VelocityRange,
    entries: &[&ParsedSampleInfo],
    round_robins: usize,
) -> Result<VelocitySlotSet, LayerError> {
    let slot_of = |entry: &ParsedSampleInfo| {
        entry
            .round_robin_index
            .and_then(|rr| usize::try_from(rr).ok())
            .and_then(|rr| rr.checked_sub(1))
            .filter(|index| *index < MAX_IMPORT_ROUND_ROBINS)
    };

    let highest = entries
        .iter()
        .filter_map(|entry| slot_of(*entry))
        .map(|index| index + 1)
        .max()
        .unwrap_or(0);
    let mut layer = VelocitySlotSet::create(velocity_range, round_robins.max(highest));

    let mut pending = Vec::new();
    for entry in entries {
        match slot_of(*entry) {
            Some(index) if layer.sample(index).is_none() => {
                layer.assign(index, SampleReference::new(&entry.original_file_name))?;
                debug!(file = entry.original_file_name.as_str(), slot = index, "Placed sample");
            }
            _ => pending.push(*entry),
        }
    }

    for entry in pending {
        let index = match layer.first_empty_slot() {
            Some(index) => index,
            None => {
                let index = layer.round_robin_count();
                layer.resize(index + 1);
                index
            }
        };
        layer.assign(index, SampleReference::new(&entry.original_file_name))?;
        debug!(file = entry.original_file_name.as_str(), slot = index, "Placed sample");
    }

    Ok(layer)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn file_names(instrument: &Instrument, note: u8) -> Vec<Vec<Option<String>>> {
        instrument
            .key(note)
            .unwrap()
            .layers()
            .iter()
            .map(|layer| {
                layer
                    .samples()
                    .iter()
                    .map(|slot| slot.as_ref().map(|s| s.file_name().to_string()))
                    .collect()
            })
            .collect()
    }

    fn some(name: &str) -> Option<String> {
        Some(name.to_string())
    }

    #[test]
    fn test_import_velocity_layers_and_round_robins() {
        let report = import_samples(
            &[
                "Kick_C1_v41-127_rr2.wav",
                "Kick_C1_v0-40_rr1.wav",
                "Kick_C1_v41-127_rr1.wav",
                "Kick_C1_v0-40_rr2.wav",
                "Snare_D1.wav",
            ],
            &Import::default(),
        )
        .unwrap();

        let instrument = &report.instrument;
        assert_eq!(instrument.mapped_notes(), vec![36, 38]);
        assert_eq!(instrument.sample_count(), 5);
        assert!(report.unassigned.is_empty());

        let kick = instrument.key(36).unwrap();
        assert_eq!(kick.len(), 2);
        assert_eq!(kick.layers()[0].velocity_range().min(), 0);
        assert_eq!(kick.layers()[0].velocity_range().max(), 40);
        assert_eq!(kick.layers()[1].velocity_range().min(), 41);
        assert_eq!(
            file_names(instrument, 36),
            vec![
                vec![some("Kick_C1_v0-40_rr1.wav"), some("Kick_C1_v0-40_rr2.wav")],
                vec![
                    some("Kick_C1_v41-127_rr1.wav"),
                    some("Kick_C1_v41-127_rr2.wav")
                ],
            ]
        );

        let snare = instrument.key(38).unwrap();
        assert_eq!(snare.len(), 1);
        assert_eq!(*snare.layers()[0].velocity_range(), VelocityRange::full());
    }

    #[test]
    fn test_import_leaves_gaps_and_pads_to_minimum() {
        let report = import_samples(
            &["Hat_F#1_rr3.wav", "Hat_F#1.wav"],
            &Import::new(Some(4), None),
        )
        .unwrap();

        assert_eq!(
            file_names(&report.instrument, 42),
            vec![vec![some("Hat_F#1.wav"), None, some("Hat_F#1_rr3.wav"), None]]
        );
    }

    #[test]
    fn test_import_grows_layer_for_unindexed_samples() {
        let report = import_samples(
            &["Pad_C3_rr1.wav", "Pad_C3.wav", "Pad_C3_alt.wav", "Pad_60_rr1.wav"],
            &Import::default(),
        )
        .unwrap();

        // "Pad_C3_alt" has no note at the end and stays unassigned; the
        // duplicate rr1 falls through to the next free slot.
        assert_eq!(
            file_names(&report.instrument, 60),
            vec![vec![
                some("Pad_C3_rr1.wav"),
                some("Pad_C3.wav"),
                some("Pad_60_rr1.wav")
            ]]
        );
        assert_eq!(report.unassigned.len(), 1);
        assert_eq!(report.unassigned[0].original_file_name, "Pad_C3_alt.wav");
    }

    #[test]
    fn test_import_invalid_velocity_uses_full_range() {
        let report = import_samples(&["Kick_C1_v90-10.wav"], &Import::default()).unwrap();
        let kick = report.instrument.key(36).unwrap();
        assert_eq!(*kick.layers()[0].velocity_range(), VelocityRange::full());
    }

    #[test]
    fn test_import_huge_round_robin_index_is_ignored() {
        let report =
            import_samples(&["Kick_C1_rr4000000000.wav"], &Import::default()).unwrap();
        let kick = report.instrument.key(36).unwrap();
        assert_eq!(kick.layers()[0].round_robin_count(), 1);
        assert_eq!(kick.sample_count(), 1);
    }

    #[test]
    fn test_import_overlapping_ranges_are_kept() {
        let report = import_samples(
            &["Kick_C1_v0-64.wav", "Kick_C1_v60-127.wav"],
            &Import::default(),
        )
        .unwrap();
        let kick = report.instrument.key(36).unwrap();
        assert_eq!(kick.len(), 2);
        assert_eq!(kick.overlapping_layers().len(), 1);
    }

    #[test]
    fn test_scan_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Snare_D1.wav", "Kick_C1.WAV", "notes.txt", "Pad_C3.flac"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("nested.wav")).unwrap();

        let files =
            scan_directory(dir.path(), &["wav".to_string(), "flac".to_string()]).unwrap();
        assert_eq!(files, vec!["Kick_C1.WAV", "Pad_C3.flac", "Snare_D1.wav"]);
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = scan_directory(&dir.path().join("missing"), &["wav".to_string()]);
        assert!(matches!(result, Err(ImportError::Io(_))));
    }
}
