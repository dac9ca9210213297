//! Optional JSON settings file.
//!
//! Every field may be omitted. A `camera` block replaces the camera of the
//! chosen scene; a `render` block is merged over the scene's defaults.
//!
//! ```json
//! {
//!   "camera": { "image_width": 800, "lookfrom": [13, 2, 3], "lookat": [0, 0, 0] },
//!   "render": { "samples_per_pixel": 100, "max_depth": 50, "seed": 7 }
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lux_renderer::{Background, CameraSettings};
use serde::{Deserialize, Serialize};

/// Render options that may be left unset to keep the scene's choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOverrides {
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub background: Option<Background>,
    pub seed: Option<u64>,
    pub bucket_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub camera: Option<CameraSettings>,
    pub render: RenderOverrides,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_math::{Color, Point3};

    #[test]
    fn test_empty_settings() {
        let settings = Settings::parse("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_settings() {
        let settings = Settings::parse(
            r#"{
                "camera": { "image_width": 320, "lookfrom": [1.0, 2.0, 3.0] },
                "render": { "samples_per_pixel": 8, "background": { "solid": [0.0, 0.0, 0.0] } }
            }"#,
        )
        .unwrap();

        let camera = settings.camera.unwrap();
        assert_eq!(camera.image_width, 320);
        assert_eq!(camera.lookfrom, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.aspect_ratio, CameraSettings::default().aspect_ratio);

        assert_eq!(settings.render.samples_per_pixel, Some(8));
        assert_eq!(settings.render.max_depth, None);
        assert_eq!(
            settings.render.background,
            Some(Background::Solid(Color::ZERO))
        );
    }

    #[test]
    fn test_malformed_settings_are_errors() {
        assert!(Settings::parse("{ \"camera\": 3 }").is_err());
        assert!(Settings::load(Path::new("does/not/exist.json")).is_err());
    }
}
