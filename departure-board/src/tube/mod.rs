//! Underground adapter, backed by the TfL unified API.

mod board;
mod client;
mod error;

pub use board::{fetch_board, items_to_rows};
pub use client::{TubeClient, TubeConfig};
pub use error::TubeError;
