pub mod layout;
pub mod loader;

pub use layout::{LevelError, LevelFile, PointDef, RectDef};
pub use loader::{CurrentLevel, LevelEntity, LevelRequest};
