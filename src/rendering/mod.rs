pub mod camera;
pub mod theme;
