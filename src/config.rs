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

//! Settings for the command line tool, loaded from YAML.

use std::path::Path;

use config::{Config, File};
use serde::Deserialize;

pub mod error;
pub mod import;
pub mod layout;

pub use error::ConfigError;
pub use import::Import;
pub use layout::Layout;

/// The top level settings file.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Settings {
    /// Key grid layout settings.
    #[serde(default)]
    layout: Layout,

    /// Batch import settings.
    #[serde(default)]
    import: Import,
}

impl Settings {
    /// Creates new settings.
    pub fn new(layout: Layout, import: Import) -> Settings {
        Settings { layout, import }
    }

    /// Parse settings from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Settings, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// Loads settings from the given file, or the defaults if there is none.
    pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
        match path {
            Some(path) => Settings::deserialize(path),
            None => Ok(Settings::default()),
        }
    }

    /// Gets the layout settings.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Gets the import settings.
    pub fn import(&self) -> &Import {
        &self.import
    }
}
