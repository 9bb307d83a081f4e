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

//! Layout geometry for drawing a key's velocity layers.
//!
//! Layers are stacked top to bottom in the order given, each as tall as its
//! share of the 128 velocity values. Heights are not normalized: spans that
//! add up to less than 128 leave space unused and spans that add up to more
//! overflow `height`. Every layer is at least `2 * spacing` tall and every
//! slot at least `2 * spacing` wide so that narrow layers stay visible.

use std::fmt;

use serde::Serialize;

use crate::layers::{LayerId, SelectedSlot, VelocitySlotSet};

/// Number of distinct MIDI velocity values.
const VELOCITY_VALUES: f64 = 128.0;

/// An axis-aligned rectangle. Width and height may be zero or negative when
/// the available space is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the point lies inside the rectangle. The left and top edges
    /// are inside, the right and bottom edges are not.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}) {:.2}x{:.2}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// The computed geometry of one velocity layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayerLayout {
    pub layer_id: LayerId,
    pub layer_rect: Rect,
    /// One rectangle per round-robin slot. A layer with no slots gets a
    /// single full-width placeholder so it can still be drawn.
    pub slot_rects: Vec<Rect>,
    pub round_robin_count: usize,
}

impl LayerLayout {
    /// Maps a point to the slot under it. Placeholders never select anything.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<SelectedSlot> {
        if self.round_robin_count == 0 {
            return None;
        }
        self.slot_rects
            .iter()
            .position(|rect| rect.contains(x, y))
            .map(|round_robin_index| SelectedSlot {
                layer_id: self.layer_id,
                round_robin_index,
            })
    }
}

/// Computes the rectangles of each layer and its slots.
///
/// The layers are laid out in the order given; sort them first for a
/// velocity-ordered display. The result depends only on the arguments.
pub fn compute_layout(
    layers: &[VelocitySlotSet],
    width: f64,
    height: f64,
    spacing: f64,
) -> Vec<LayerLayout> {
    let minimum = 2.0 * spacing;
    let mut y = 0.0;

    layers
        .iter()
        .map(|layer| {
            let proportion = f64::from(layer.velocity_range().span()) / VELOCITY_VALUES;
            let layer_height = (proportion * height).max(minimum);
            let layer_rect = Rect::new(0.0, y, width, layer_height);
            y += layer_height + spacing;

            LayerLayout {
                layer_id: layer.id(),
                layer_rect,
                slot_rects: slot_rects(&layer_rect, layer.round_robin_count(), spacing),
                round_robin_count: layer.round_robin_count(),
            }
        })
        .collect()
}

/// Maps a point to a slot across a whole layout.
pub fn hit_test(layouts: &[LayerLayout], x: f64, y: f64) -> Option<SelectedSlot> {
    layouts.iter().find_map(|layout| layout.hit_test(x, y))
}

fn slot_rects(layer_rect: &Rect, count: usize, spacing: f64) -> Vec<Rect> {
    if count == 0 {
        return vec![*layer_rect];
    }

    let total_spacing = spacing * (count - 1) as f64;
    let available = layer_rect.width - total_spacing;
    let slot_width = (available / count as f64).max(2.0 * spacing);

    (0..count)
        .map(|index| {
            Rect::new(
                layer_rect.x + index as f64 * (slot_width + spacing),
                layer_rect.y,
                slot_width,
                layer_rect.height,
            )
        })
        .collect()
}
