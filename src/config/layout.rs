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

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 400.0;
const DEFAULT_SPACING: f64 = 2.0;

/// A YAML representation of the key grid layout settings.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Layout {
    /// Width available to a key's layers (default: 800).
    width: Option<f64>,

    /// Height available to a key's layers (default: 400).
    height: Option<f64>,

    /// Gap between slots and between layers (default: 2).
    spacing: Option<f64>,
}

impl Layout {
    /// Creates a new layout configuration.
    pub fn new(width: Option<f64>, height: Option<f64>, spacing: Option<f64>) -> Layout {
        Layout {
            width,
            height,
            spacing,
        }
    }

    /// Returns a copy with any given values replacing the configured ones.
    pub fn with_overrides(
        &self,
        width: Option<f64>,
        height: Option<f64>,
        spacing: Option<f64>,
    ) -> Layout {
        Layout {
            width: width.or(self.width),
            height: height.or(self.height),
            spacing: spacing.or(self.spacing),
        }
    }

    /// Returns the layout width.
    pub fn width(&self) -> f64 {
        self.width.unwrap_or(DEFAULT_WIDTH)
    }

    /// Returns the layout height.
    pub fn height(&self) -> f64 {
        self.height.unwrap_or(DEFAULT_HEIGHT)
    }

    /// Returns the spacing between slots and layers.
    pub fn spacing(&self) -> f64 {
        self.spacing.unwrap_or(DEFAULT_SPACING)
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, File, FileFormat};

    use super::*;

    #[test]
    fn test_defaults() {
        let layout = Layout::default();
        assert_eq!(layout.width(), DEFAULT_WIDTH);
        assert_eq!(layout.height(), DEFAULT_HEIGHT);
        assert_eq!(layout.spacing(), DEFAULT_SPACING);
    }

    #[test]
    fn test_layout_deserialize() {
        let yaml = r#"
            width: 640
            spacing: 1.5
        "#;

        let layout: Layout = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(layout.width(), 640.0);
        assert_eq!(layout.height(), DEFAULT_HEIGHT);
        assert_eq!(layout.spacing(), 1.5);
    }

    #[test]
    fn test_overrides() {
        let layout = Layout::new(Some(640.0), None, Some(1.0));
        let overridden = layout.with_overrides(None, Some(200.0), Some(4.0));

        assert_eq!(overridden.width(), 640.0);
        assert_eq!(overridden.height(), 200.0);
        assert_eq!(overridden.spacing(), 4.0);
    }
}
