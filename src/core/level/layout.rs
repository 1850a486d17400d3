//! Level file schema (RON), pixel-space coordinates.
//!
//! A level carries named layers: static platforms, dynamic (destructible)
//! platforms, collectible points, the finish rect and the player spawn point,
//! plus a map-level `hue` driving the color scheme. The physics bridge
//! converts pixels to meters at the configured pixels-per-meter scale.
use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, io, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("read level {path}: {source}")]
    Io {
        path: String,
        source: io::Error,
    },
    #[error("parse level {path}: {source}")]
    Parse {
        path: String,
        source: ron::error::SpannedError,
    },
    #[error("level version {0} unsupported (expected 1)")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct PointDef {
    pub x: f32,
    pub y: f32,
}

impl From<PointDef> for Vec2 {
    fn from(p: PointDef) -> Self {
        Vec2::new(p.x, p.y)
    }
}

/// Center-based pixel rectangle.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RectDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectDef {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_hue")]
    pub hue: f32,
    pub player: PointDef,
    pub finish: RectDef,
    #[serde(default)]
    pub static_platforms: Vec<RectDef>,
    #[serde(default)]
    pub dynamic_platforms: Vec<RectDef>,
    #[serde(default)]
    pub points: Vec<RectDef>,
}

fn default_hue() -> f32 {
    210.0
}

impl LevelFile {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path_str = path.as_ref().display().to_string();
        let txt = fs::read_to_string(&path).map_err(|source| LevelError::Io {
            path: path_str.clone(),
            source,
        })?;
        let level: LevelFile = ron::from_str(&txt).map_err(|source| LevelError::Parse {
            path: path_str,
            source,
        })?;
        if level.version != 1 {
            return Err(LevelError::UnsupportedVersion(level.version));
        }
        Ok(level)
    }

    pub fn total_points(&self) -> u32 {
        self.points.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"(
        version: 1,
        name: "smoke",
        hue: 140.0,
        player: (x: -400.0, y: 64.0),
        finish: (x: 420.0, y: 48.0, w: 48.0, h: 64.0),
        static_platforms: [(x: 0.0, y: -40.0, w: 1200.0, h: 24.0)],
        dynamic_platforms: [(x: 120.0, y: 90.0, w: 96.0, h: 16.0)],
        points: [(x: 0.0, y: 60.0, w: 24.0, h: 24.0), (x: 60.0, y: 60.0, w: 24.0, h: 24.0)],
    )"#;

    #[test]
    fn parses_sample_level() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{SAMPLE}").unwrap();
        let level = LevelFile::load_from_file(f.path()).unwrap();
        assert_eq!(level.name, "smoke");
        assert_eq!(level.hue, 140.0);
        assert_eq!(level.static_platforms.len(), 1);
        assert_eq!(level.dynamic_platforms.len(), 1);
        assert_eq!(level.total_points(), 2);
    }

    #[test]
    fn rejects_unknown_version() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            "(version: 9, player: (x: 0.0, y: 0.0), finish: (x: 0.0, y: 0.0, w: 1.0, h: 1.0))"
        )
        .unwrap();
        assert!(matches!(
            LevelFile::load_from_file(f.path()),
            Err(LevelError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            LevelFile::load_from_file("no/such/level.ron"),
            Err(LevelError::Io { .. })
        ));
    }
}
