//! Perfect maze generation, route finding and maze-run navigation.

pub mod cells;
pub mod game;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod items;
pub mod pathing;
pub mod units;

mod utils;
