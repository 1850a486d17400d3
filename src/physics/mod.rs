pub mod bridge;
pub mod categories;
pub mod contact;
pub mod overlap;
pub mod world;
