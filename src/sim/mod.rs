pub mod level;
pub mod world;
