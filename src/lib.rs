//! Grid Pac-Man: a square board where four ghosts greedily chase the player
//! while dots and cherries are eaten for points.

pub mod board;
pub mod config;
pub mod direction;
pub mod entity;
pub mod error;
pub mod render;
pub mod session;
pub mod snapshot;

pub use board::Board;
pub use direction::{Dir, Facing};
pub use entity::{Character, Pos};
pub use error::{LoadError, SaveError};
