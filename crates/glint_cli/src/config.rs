//! JSON render configuration file.

use anyhow::{Context, Result};
use glint_renderer::{CameraSettings, RenderConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contents of a `--config` file. Sections that are present replace the
/// scene preset's defaults wholesale; missing fields inside a section take
/// the library defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub render: Option<RenderConfig>,
    pub camera: Option<CameraSettings>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_renderer::Vec3;

    #[test]
    fn test_empty_config() {
        let config = ConfigFile::parse("{}").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = ConfigFile::parse(
            r#"{
                "render": { "samples_per_pixel": 16, "seed": 3 },
                "camera": { "image_width": 320, "image_height": 180, "look_from": [1.0, 2.0, 3.0] }
            }"#,
        )
        .unwrap();

        let render = config.render.unwrap();
        assert_eq!(render.samples_per_pixel, 16);
        assert_eq!(render.seed, 3);
        assert_eq!(render.max_depth, RenderConfig::default().max_depth);

        let camera = config.camera.unwrap();
        assert_eq!((camera.image_width, camera.image_height), (320, 180));
        assert_eq!(camera.look_from, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.vfov, CameraSettings::default().vfov);
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert!(ConfigFile::parse(r#"{ "renderer": {} }"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigFile::load(Path::new("/nonexistent/glint.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
