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

//! Velocity layers and their round-robin sample slots.
//!
//! Each key of an instrument owns an ordered set of velocity layers
//! ([`keymap::KeyMapping`]). A layer covers a velocity range and holds a
//! fixed number of round-robin slots, each either empty or referencing a
//! sample owned by the audio asset store.

use std::fmt;

use serde::Serialize;

mod error;
pub mod keymap;

pub use error::LayerError;
pub use keymap::{Instrument, KeyMapping};

/// The highest MIDI velocity.
pub const MAX_VELOCITY: u8 = 127;

/// Identifies a velocity layer for its whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LayerId(u64);

impl LayerId {
    fn generate() -> LayerId {
        LayerId(rand::random())
    }

    /// Gets the raw identifier value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A velocity range with a nested crossfade range, all bounds inclusive:
/// `min <= crossfade_min <= crossfade_max <= max <= 127`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct VelocityRange {
    min: u8,
    max: u8,
    crossfade_min: u8,
    crossfade_max: u8,
}

impl VelocityRange {
    /// Creates a velocity range, rejecting bounds that are not nested.
    pub fn new(
        min: u8,
        max: u8,
        crossfade_min: u8,
        crossfade_max: u8,
    ) -> Result<VelocityRange, LayerError> {
        if max > MAX_VELOCITY {
            return Err(LayerError::InvalidArgument(format!(
                "velocity {} is above {}",
                max, MAX_VELOCITY
            )));
        }
        if !(min <= crossfade_min && crossfade_min <= crossfade_max && crossfade_max <= max) {
            return Err(LayerError::InvalidArgument(format!(
                "crossfade {}-{} is not nested in velocity range {}-{}",
                crossfade_min, crossfade_max, min, max
            )));
        }

        Ok(VelocityRange {
            min,
            max,
            crossfade_min,
            crossfade_max,
        })
    }

    /// Creates a range without a crossfade zone (crossfade bounds equal the hard bounds).
    pub fn hard(min: u8, max: u8) -> Result<VelocityRange, LayerError> {
        VelocityRange::new(min, max, min, max)
    }

    /// The full 0-127 range.
    pub fn full() -> VelocityRange {
        VelocityRange {
            min: 0,
            max: MAX_VELOCITY,
            crossfade_min: 0,
            crossfade_max: MAX_VELOCITY,
        }
    }

    /// Gets the lowest velocity of the range.
    pub fn min(&self) -> u8 {
        self.min
    }

    /// Gets the highest velocity of the range.
    pub fn max(&self) -> u8 {
        self.max
    }

    /// Gets the lower crossfade bound.
    pub fn crossfade_min(&self) -> u8 {
        self.crossfade_min
    }

    /// Gets the upper crossfade bound.
    pub fn crossfade_max(&self) -> u8 {
        self.crossfade_max
    }

    /// Number of velocity values covered, `max - min + 1`.
    pub fn span(&self) -> u32 {
        (u32::from(self.max) + 1).saturating_sub(u32::from(self.min))
    }

    /// Whether the velocity falls inside the hard bounds.
    pub fn contains(&self, velocity: u8) -> bool {
        (self.min..=self.max).contains(&velocity)
    }

    /// Whether the hard bounds of both ranges share at least one velocity.
    pub fn overlaps(&self, other: &VelocityRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

impl Default for VelocityRange {
    fn default() -> Self {
        VelocityRange::full()
    }
}

impl fmt::Display for VelocityRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)?;
        if self.crossfade_min != self.min || self.crossfade_max != self.max {
            write!(f, " (xfade {}-{})", self.crossfade_min, self.crossfade_max)?;
        }
        Ok(())
    }
}

/// A reference to a sample held by the audio asset store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SampleReference {
    file_name: String,
}

impl SampleReference {
    /// Creates a new sample reference.
    pub fn new(file_name: impl Into<String>) -> SampleReference {
        SampleReference {
            file_name: file_name.into(),
        }
    }

    /// Gets the file name of the referenced sample.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// One velocity layer of a key: a velocity range and its round-robin slots.
///
/// The slot count is the round-robin count. Slots keep their index across
/// resizes; only slots past the new end are dropped when shrinking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VelocitySlotSet {
    id: LayerId,
    velocity_range: VelocityRange,
    samples: Vec<Option<SampleReference>>,
}

impl VelocitySlotSet {
    /// Creates a layer with `slot_count` empty round-robin slots and a fresh id.
    pub fn create(velocity_range: VelocityRange, slot_count: usize) -> VelocitySlotSet {
        VelocitySlotSet {
            id: LayerId::generate(),
            velocity_range,
            samples: vec![None; slot_count],
        }
    }

    /// Gets the layer id.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Gets the velocity range.
    pub fn velocity_range(&self) -> &VelocityRange {
        &self.velocity_range
    }

    /// Changes the velocity range. Layers held by a [`KeyMapping`] are
    /// changed through [`KeyMapping::set_velocity_range`] so the order is kept.
    pub(crate) fn set_velocity_range(&mut self, velocity_range: VelocityRange) {
        self.velocity_range = velocity_range;
    }

    /// Gets all slots in round-robin order.
    pub fn samples(&self) -> &[Option<SampleReference>] {
        &self.samples
    }

    /// Gets the sample in a slot, or `None` if the slot is empty or does not exist.
    pub fn sample(&self, index: usize) -> Option<&SampleReference> {
        self.samples.get(index).and_then(Option::as_ref)
    }

    /// Assigns a sample to a slot, returning the sample it replaced.
    pub fn assign(
        &mut self,
        index: usize,
        sample: SampleReference,
    ) -> Result<Option<SampleReference>, LayerError> {
        let slot = self.slot_mut(index)?;
        Ok(slot.replace(sample))
    }

    /// Empties a slot, returning the sample it held.
    pub fn clear(&mut self, index: usize) -> Result<Option<SampleReference>, LayerError> {
        let slot = self.slot_mut(index)?;
        Ok(slot.take())
    }

    /// Grows the layer with empty slots or truncates it from the end.
    pub fn resize(&mut self, new_count: usize) {
        self.samples.resize(new_count, None);
    }

    /// Index of the first empty slot.
    pub fn first_empty_slot(&self) -> Option<usize> {
        self.samples.iter().position(Option::is_none)
    }

    /// Number of slots holding a sample.
    pub fn active_sample_count(&self) -> usize {
        self.samples.iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of round-robin slots.
    pub fn round_robin_count(&self) -> usize {
        self.samples.len()
    }

    /// Whether no slot holds a sample.
    pub fn is_empty(&self) -> bool {
        self.active_sample_count() == 0
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Option<SampleReference>, LayerError> {
        let count = self.samples.len();
        self.samples
            .get_mut(index)
            .ok_or(LayerError::IndexOutOfRange { index, count })
    }
}

impl fmt::Display for VelocitySlotSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{} [", self.velocity_range)?;
        for (index, slot) in self.samples.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            match slot {
                Some(sample) => write!(f, "{}", sample.file_name())?,
                None => write!(f, "-")?,
            }
        }
        write!(f, "]")
    }
}

/// A transient reference to one round-robin slot, e.g. the slot selected in
/// an editor. Only meaningful while the layer and index still exist; see
/// [`Instrument::resolve_selection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SelectedSlot {
    pub layer_id: LayerId,
    pub round_robin_index: usize,
}
