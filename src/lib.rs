pub mod app;
pub mod core;
pub mod editor;
pub mod gameplay;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use app::game::GamePlugin;
pub use app::state::AppState;
pub use core::config::{GameConfig, WindowConfig};
pub use core::events::{GameEvent, GameEventQueue};
