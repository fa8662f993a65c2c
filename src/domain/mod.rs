pub mod ai;
pub mod blast;
pub mod entity;
pub mod grid;
pub mod motion;
pub mod tile;
