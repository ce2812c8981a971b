pub mod grid;
pub mod palette;
pub mod tile;
