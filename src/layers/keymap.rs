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

use serde::Serialize;

use super::{LayerError, LayerId, SampleReference, SelectedSlot, VelocityRange, VelocitySlotSet};
use crate::pitch::MAX_MIDI_NOTE;

/// The velocity layers of one key, kept sorted by ascending minimum velocity.
///
/// Overlapping ranges are allowed; [`KeyMapping::overlapping_layers`] reports them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyMapping {
    layers: Vec<VelocitySlotSet>,
}

impl KeyMapping {
    /// Creates an empty key mapping.
    pub fn new() -> KeyMapping {
        KeyMapping { layers: Vec::new() }
    }

    /// Gets the layers in ascending velocity order.
    pub fn layers(&self) -> &[VelocitySlotSet] {
        &self.layers
    }

    /// Adds a layer, keeping the velocity order. Layers with the same minimum
    /// stay in insertion order.
    pub fn add_layer(&mut self, layer: VelocitySlotSet) -> LayerId {
        let id = layer.id();
        let min = layer.velocity_range().min();
        let position = self
            .layers
            .partition_point(|existing| existing.velocity_range().min() <= min);
        self.layers.insert(position, layer);
        id
    }

    /// Creates a layer with empty slots and adds it.
    pub fn create_layer(&mut self, velocity_range: VelocityRange, slot_count: usize) -> LayerId {
        self.add_layer(VelocitySlotSet::create(velocity_range, slot_count))
    }

    /// Removes a layer, returning it.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<VelocitySlotSet, LayerError> {
        let position = self
            .layers
            .iter()
            .position(|layer| layer.id() == id)
            .ok_or(LayerError::LayerNotFound(id))?;
        Ok(self.layers.remove(position))
    }

    /// Gets a layer by id.
    pub fn layer(&self, id: LayerId) -> Option<&VelocitySlotSet> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    /// Gets a layer by id for slot editing.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut VelocitySlotSet> {
        self.layers.iter_mut().find(|layer| layer.id() == id)
    }

    /// Changes the velocity range of a layer and restores the velocity order.
    pub fn set_velocity_range(
        &mut self,
        id: LayerId,
        velocity_range: VelocityRange,
    ) -> Result<(), LayerError> {
        let mut layer = self.remove_layer(id)?;
        layer.set_velocity_range(velocity_range);
        self.add_layer(layer);
        Ok(())
    }

    /// Finds the first layer whose range contains the velocity.
    pub fn layer_for_velocity(&self, velocity: u8) -> Option<&VelocitySlotSet> {
        self.layers
            .iter()
            .find(|layer| layer.velocity_range().contains(velocity))
    }

    /// Pairs of layers whose velocity ranges overlap, in layer order.
    pub fn overlapping_layers(&self) -> Vec<(LayerId, LayerId)> {
        let mut overlaps = Vec::new();
        for (i, first) in self.layers.iter().enumerate() {
            for second in &self.layers[i + 1..] {
                if first.velocity_range().overlaps(second.velocity_range()) {
                    overlaps.push((first.id(), second.id()));
                }
            }
        }
        overlaps
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the key has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of assigned samples across all layers.
    pub fn sample_count(&self) -> usize {
        self.layers
            .iter()
            .map(VelocitySlotSet::active_sample_count)
            .sum()
    }

    /// Removes every layer.
    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

/// The mapping of every key of an instrument, by MIDI note.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Instrument {
    keys: BTreeMap<u8, KeyMapping>,
}

impl Instrument {
    /// Creates an instrument with no mapped keys.
    pub fn new() -> Instrument {
        Instrument {
            keys: BTreeMap::new(),
        }
    }

    /// Gets the mapping of a key, if it has one.
    pub fn key(&self, note: u8) -> Option<&KeyMapping> {
        self.keys.get(&note)
    }

    /// Gets the mapping of a key for editing, creating an empty one if needed.
    pub fn key_mut(&mut self, note: u8) -> Result<&mut KeyMapping, LayerError> {
        if note > MAX_MIDI_NOTE {
            return Err(LayerError::InvalidArgument(format!(
                "MIDI note {} is above {}",
                note, MAX_MIDI_NOTE
            )));
        }
        Ok(self.keys.entry(note).or_default())
    }

    /// Removes a key's mapping and all of its layers.
    pub fn clear_key(&mut self, note: u8) -> Option<KeyMapping> {
        self.keys.remove(&note)
    }

    /// Iterates over keys that have at least one layer, in note order.
    pub fn keys(&self) -> impl Iterator<Item = (u8, &KeyMapping)> {
        self.keys
            .iter()
            .filter(|(_, mapping)| !mapping.is_empty())
            .map(|(note, mapping)| (*note, mapping))
    }

    /// Notes that have at least one layer.
    pub fn mapped_notes(&self) -> Vec<u8> {
        self.keys().map(|(note, _)| note).collect()
    }

    /// Number of assigned samples across all keys.
    pub fn sample_count(&self) -> usize {
        self.keys.values().map(KeyMapping::sample_count).sum()
    }

    /// Checks a selection against the current mapping of a key and returns the
    /// sample in the selected slot, if any.
    pub fn resolve_selection(
        &self,
        note: u8,
        selection: SelectedSlot,
    ) -> Result<Option<&SampleReference>, LayerError> {
        let layer = self
            .key(note)
            .and_then(|mapping| mapping.layer(selection.layer_id))
            .ok_or(LayerError::LayerNotFound(selection.layer_id))?;

        let count = layer.round_robin_count();
        if selection.round_robin_index >= count {
            return Err(LayerError::IndexOutOfRange {
                index: selection.round_robin_index,
                count,
            });
        }
        Ok(layer.sample(selection.round_robin_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: u8, max: u8) -> VelocityRange {
        VelocityRange::hard(min, max).unwrap()
    }

    fn mins(mapping: &KeyMapping) -> Vec<u8> {
        mapping
            .layers()
            .iter()
            .map(|layer| layer.velocity_range().min())
            .collect()
    }

    #[test]
    fn test_layers_stay_sorted() {
        let mut mapping = KeyMapping::new();
        mapping.create_layer(range(81, 127), 1);
        mapping.create_layer(range(0, 40), 1);
        mapping.create_layer(range(41, 80), 1);

        assert_eq!(mins(&mapping), vec![0, 41, 81]);
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn test_equal_minimums_keep_insertion_order() {
        let mut mapping = KeyMapping::new();
        let first = mapping.create_layer(range(0, 60), 1);
        let second = mapping.create_layer(range(0, 127), 1);

        assert_eq!(mapping.layers()[0].id(), first);
        assert_eq!(mapping.layers()[1].id(), second);
    }

    #[test]
    fn test_remove_layer() {
        let mut mapping = KeyMapping::new();
        let soft = mapping.create_layer(range(0, 63), 2);
        let loud = mapping.create_layer(range(64, 127), 2);

        let removed = mapping.remove_layer(soft).unwrap();
        assert_eq!(removed.id(), soft);
        assert_eq!(mapping.len(), 1);
        assert!(mapping.layer(soft).is_none());
        assert!(mapping.layer(loud).is_some());

        assert_eq!(
            mapping.remove_layer(soft),
            Err(LayerError::LayerNotFound(soft))
        );
    }

    #[test]
    fn test_set_velocity_range_resorts() {
        let mut mapping = KeyMapping::new();
        let a = mapping.create_layer(range(0, 63), 1);
        let b = mapping.create_layer(range(64, 127), 1);

        mapping.set_velocity_range(a, range(100, 127)).unwrap();
        assert_eq!(mapping.layers()[0].id(), b);
        assert_eq!(mapping.layers()[1].id(), a);
        assert_eq!(mapping.layer(a).unwrap().velocity_range().min(), 100);
    }

    #[test]
    fn test_layer_for_velocity() {
        let mut mapping = KeyMapping::new();
        let soft = mapping.create_layer(range(1, 60), 1);
        let loud = mapping.create_layer(range(61, 127), 1);

        assert_eq!(mapping.layer_for_velocity(45).map(|l| l.id()), Some(soft));
        assert_eq!(mapping.layer_for_velocity(61).map(|l| l.id()), Some(loud));
        assert!(mapping.layer_for_velocity(0).is_none());
    }

    #[test]
    fn test_overlapping_layers() {
        let mut mapping = KeyMapping::new();
        let a = mapping.create_layer(range(0, 64), 1);
        let b = mapping.create_layer(range(60, 100), 1);
        mapping.create_layer(range(101, 127), 1);

        assert_eq!(mapping.overlapping_layers(), vec![(a, b)]);
    }

    #[test]
    fn test_slot_editing_through_mapping() {
        let mut mapping = KeyMapping::new();
        let id = mapping.create_layer(range(0, 127), 2);

        let layer = mapping.layer_mut(id).unwrap();
        layer.assign(0, SampleReference::new("a.wav")).unwrap();
        layer.assign(1, SampleReference::new("b.wav")).unwrap();
        assert_eq!(mapping.sample_count(), 2);

        mapping.clear();
        assert!(mapping.is_empty());
        assert_eq!(mapping.sample_count(), 0);
    }

    #[test]
    fn test_instrument_keys() {
        let mut instrument = Instrument::new();
        instrument
            .key_mut(38)
            .unwrap()
            .create_layer(VelocityRange::full(), 1);
        instrument
            .key_mut(36)
            .unwrap()
            .create_layer(VelocityRange::full(), 1);
        // Touching a key without adding layers does not map it.
        instrument.key_mut(40).unwrap();

        assert_eq!(instrument.mapped_notes(), vec![36, 38]);
        assert!(matches!(
            instrument.key_mut(128),
            Err(LayerError::InvalidArgument(_))
        ));

        assert!(instrument.clear_key(36).is_some());
        assert_eq!(instrument.mapped_notes(), vec![38]);
    }

    #[test]
    fn test_resolve_selection() {
        let mut instrument = Instrument::new();
        let mapping = instrument.key_mut(36).unwrap();
        let id = mapping.create_layer(VelocityRange::full(), 2);
        mapping
            .layer_mut(id)
            .unwrap()
            .assign(1, SampleReference::new("kick.wav"))
            .unwrap();

        let selected = SelectedSlot {
            layer_id: id,
            round_robin_index: 1,
        };
        assert_eq!(
            instrument.resolve_selection(36, selected),
            Ok(Some(&SampleReference::new("kick.wav")))
        );
        assert_eq!(
            instrument.resolve_selection(
                36,
                SelectedSlot {
                    layer_id: id,
                    round_robin_index: 0
                }
            ),
            Ok(None)
        );
        assert_eq!(
            instrument.resolve_selection(
                36,
                SelectedSlot {
                    layer_id: id,
                    round_robin_index: 2
                }
            ),
            Err(LayerError::IndexOutOfRange { index: 2, count: 2 })
        );
        assert_eq!(
            instrument.resolve_selection(37, selected),
            Err(LayerError::LayerNotFound(id))
        );

        // Shrinking the layer invalidates the selection.
        instrument
            .key_mut(36)
            .unwrap()
            .layer_mut(id)
            .unwrap()
            .resize(1);
        assert!(instrument.resolve_selection(36, selected).is_err());
    }
}
