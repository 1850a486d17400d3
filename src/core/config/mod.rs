pub mod config;

pub use config::{
    BulletConfig, GameConfig, LevelListConfig, PhysicsConfig, PlayerConfig, WindowConfig,
};
