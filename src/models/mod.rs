pub mod board;

pub use board::{Grid, SolvedBoard, Tile, BOARD_SIZE};
