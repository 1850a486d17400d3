use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Recoil Runner".into(),
        }
    }
}

/// Fixed-step integration and unit-scale parameters.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity_y: f32,
    /// Fixed simulation step in seconds.
    pub time_step: f32,
    /// Accumulated backlog cap in seconds; bounds per-frame work on hitches.
    pub max_accumulated: f32,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
    /// Conversion between level-file pixel space and physics meters.
    pub pixels_per_meter: f32,
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity_y: -9.81,
            time_step: 1.0 / 300.0,
            max_accumulated: 0.25,
            velocity_iterations: 6,
            position_iterations: 2,
            pixels_per_meter: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub radius_px: f32,
    pub density: f32,
    pub friction: f32,
    /// Impulse magnitude applied opposite the shot direction.
    pub recoil_impulse: f32,
    /// Kill plane: falling below this y (pixels) restarts the level.
    pub kill_depth_px: f32,
}
impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius_px: 16.0,
            density: 1.0,
            friction: 0.4,
            recoil_impulse: 0.9,
            kill_depth_px: -2000.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BulletConfig {
    pub radius_px: f32,
    /// Muzzle speed in meters/second.
    pub speed: f32,
    pub density: f32,
    /// Seconds before an airborne bullet expires.
    pub lifetime: f32,
    /// Random aim jitter in radians (uniform, +-).
    pub spread: f32,
}
impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            radius_px: 5.0,
            speed: 14.0,
            density: 2.0,
            lifetime: 3.0,
            spread: 0.015,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LevelListConfig {
    /// Level ids in play order; ids resolve to assets/levels/<id>.ron.
    pub order: Vec<String>,
    pub default_level_id: String,
}
impl Default for LevelListConfig {
    fn default() -> Self {
        Self {
            order: vec!["level01".into()],
            default_level_id: "level01".into(),
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub bullet: BulletConfig,
    pub levels: LevelListConfig,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            physics: Default::default(),
            player: Default::default(),
            bullet: Default::default(),
            levels: Default::default(),
        }
    }
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let data = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("read config {:?}: {e}", path.as_ref()))?;
        let cfg: Self =
            ron::from_str(&data).map_err(|e| anyhow::anyhow!("parse config RON: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e.to_string())),
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.physics.time_step <= 0.0 {
            anyhow::bail!("physics.time_step must be positive");
        }
        if self.physics.max_accumulated < self.physics.time_step {
            anyhow::bail!("physics.max_accumulated must cover at least one step");
        }
        if self.physics.pixels_per_meter <= 0.0 {
            anyhow::bail!("physics.pixels_per_meter must be positive");
        }
        if self.levels.order.is_empty() {
            anyhow::bail!("levels.order must list at least one level id");
        }
        Ok(())
    }
}
