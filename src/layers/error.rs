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

use super::LayerId;

/// Errors raised while editing velocity layers. All of them are recoverable;
/// callers typically report them to the user and carry on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayerError {
    #[error("Round robin index {index} is out of range (layer has {count} slots)")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Velocity layer {0} not found")]
    LayerNotFound(LayerId),
}
