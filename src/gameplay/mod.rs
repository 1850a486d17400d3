pub mod progress;
pub mod shooting;
pub mod spawn;
