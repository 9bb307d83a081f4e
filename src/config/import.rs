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
use serde::Deserialize;

const DEFAULT_ROUND_ROBINS: usize = 1;
const DEFAULT_EXTENSIONS: [&str; 6] = ["wav", "aif", "aiff", "flac", "mp3", "ogg"];

/// A YAML representation of the batch import settings.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Import {
    /// Minimum number of round-robin slots per imported layer (default: 1).
    round_robins: Option<usize>,

    /// File extensions picked up when scanning a directory, without the dot.
    extensions: Option<Vec<String>>,
}

impl Import {
    /// Creates a new import configuration.
    pub fn new(round_robins: Option<usize>, extensions: Option<Vec<String>>) -> Import {
        Import {
            round_robins,
            extensions,
        }
    }

    /// Returns the minimum slot count for imported layers.
    pub fn round_robins(&self) -> usize {
        self.round_robins.unwrap_or(DEFAULT_ROUND_ROBINS)
    }

    /// Returns the audio file extensions considered by directory scanning.
    pub fn extensions(&self) -> Vec<String> {
        match &self.extensions {
            Some(extensions) => extensions.clone(),
            None => DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}
