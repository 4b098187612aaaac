/*
 * Error Module
 *
 * Errors raised while building or loading simulation configuration.
 * The steering model itself is total and never returns an error.
 */

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("min_speed ({min}) must not exceed max_speed ({max})")]
    SpeedRange { min: f32, max: f32 },

    #[error("vision_angle_degrees must lie in (0, 360], got {0}")]
    VisionAngle(f32),

    #[error("protected_distance ({protected}) must not exceed vision_distance ({vision})")]
    ProtectedDistance { protected: f32, vision: f32 },

    #[error("world margin {margin} leaves no interior in a {width}x{height} world")]
    Margin { margin: f32, width: f32, height: f32 },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
