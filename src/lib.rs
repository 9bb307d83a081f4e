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

//! Sample mapping for sampled instruments.
//!
//! - [`parser`] extracts note, velocity range and round-robin index from
//!   sample filenames such as `Kick_C1_v0-40_rr1.wav`.
//! - [`layers`] holds the per-key velocity layers and their round-robin slots.
//! - [`layout`] computes the rectangles a key grid renderer draws.
//! - [`import`] ties these together to build an instrument from a directory.

pub mod config;
pub mod import;
pub mod layers;
pub mod layout;
pub mod parser;
pub mod pitch;
pub mod util;

pub use layers::{
    Instrument, KeyMapping, LayerError, LayerId, SampleReference, SelectedSlot, VelocityRange,
    VelocitySlotSet,
};
pub use layout::{compute_layout, LayerLayout, Rect};
pub use parser::{parse, NamingPattern, ParsedSampleInfo};
