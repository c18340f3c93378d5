//! The common board model: the normalized departure row and the logic
//! that combines both sources into a single ordered board.

mod merge;
mod row;

pub use merge::{CombineMode, combine};
pub use row::{DepartureRow, NO_PLATFORM, NO_TIME};
