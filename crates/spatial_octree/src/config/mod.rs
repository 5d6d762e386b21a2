//! Configuration system
//!
//! Tree setup (root box, how deep to pre-split, log level) can be read from
//! TOML or RON files, picked by file extension.

pub use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec3;
use crate::spatial::Bounds;

/// Deepest pre-subdivision a config may request (8^5 leaves)
pub const MAX_SUBDIVISION_DEPTH: u32 = 5;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Check loaded values; called by [`Config::load_from_file`]
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let is_toml = path.ends_with(".toml");
        if !is_toml && !path.ends_with(".ron") {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        let config: Self = if is_toml {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        };

        config.validate()?;
        log::debug!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values parsed but out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// # Octree Configuration
///
/// Describes the root box of a tree and how far the caller wants it
/// pre-split. The tree itself never reads this; callers build the root from
/// it and call `subdivide_to_depth` themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Levels to subdivide below the root after construction
    pub subdivision_depth: u32,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Box covered by the root node
    pub bounds: Bounds,
}

impl OctreeConfig {
    /// Create a configuration covering `bounds` with no pre-subdivision
    pub fn new(bounds: Bounds) -> Self {
        Self {
            subdivision_depth: 0,
            log_level: "info".to_string(),
            bounds,
        }
    }

    /// Set the pre-subdivision depth
    pub fn with_subdivision_depth(mut self, depth: u32) -> Self {
        self.subdivision_depth = depth;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self::new(Bounds::new(Vec3::zeros(), Vec3::new(100.0, 100.0, 100.0)))
    }
}

impl Config for OctreeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.bounds
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.subdivision_depth > MAX_SUBDIVISION_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "subdivision_depth {} exceeds maximum of {}",
                self.subdivision_depth, MAX_SUBDIVISION_DEPTH
            )));
        }

        if self.log_level.is_empty() {
            return Err(ConfigError::Invalid("log_level cannot be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("spatial_octree_{}_{}", std::process::id(), name))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(OctreeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config: OctreeConfig = toml::from_str(
            r#"
            subdivision_depth = 3

            [bounds]
            center = [1.0, 2.0, 3.0]
            size = [16.0, 16.0, 16.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.subdivision_depth, 3);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.bounds.center, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.bounds.size, Vec3::new(16.0, 16.0, 16.0));
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("round_trip.toml");
        let config = OctreeConfig::new(Bounds::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(8.0, 8.0, 8.0)))
            .with_subdivision_depth(2)
            .with_log_level("debug");

        config.save_to_file(&path).unwrap();
        let loaded = OctreeConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("round_trip.ron");
        let config = OctreeConfig::default().with_subdivision_depth(4);

        config.save_to_file(&path).unwrap();
        let loaded = OctreeConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let path = temp_path("too_deep.toml");
        let config = OctreeConfig::default().with_subdivision_depth(MAX_SUBDIVISION_DEPTH + 1);
        config.save_to_file(&path).unwrap();

        let result = OctreeConfig::load_from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let negative = OctreeConfig::new(Bounds::new(Vec3::zeros(), Vec3::new(-1.0, 1.0, 1.0)));
        assert!(matches!(negative.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unsupported_format() {
        let config = OctreeConfig::default();
        assert!(matches!(
            config.save_to_file("octree.json"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            OctreeConfig::load_from_file("octree.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        // An existing file with an unknown extension is never read
        let path = temp_path("existing.yaml");
        std::fs::write(&path, "subdivision_depth: 2\n").unwrap();
        let result = OctreeConfig::load_from_file(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_max_subdivision_depth() {
        let deepest = OctreeConfig::default().with_subdivision_depth(MAX_SUBDIVISION_DEPTH);
        assert!(deepest.validate().is_ok());

        let too_deep = OctreeConfig::default().with_subdivision_depth(6);
        assert!(matches!(too_deep.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = OctreeConfig::load_from_file(&temp_path("does_not_exist.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
