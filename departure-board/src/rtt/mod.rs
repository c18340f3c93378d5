//! National Rail adapter, backed by the RealTimeTrains API.

mod board;
mod client;
mod error;
mod types;

pub use board::{BoardOptions, fetch_board};
pub use client::{LineupQuery, RttClient, RttConfig};
pub use error::RttError;
pub use types::{LineupService, LocationDetail, LocationLineup, LocationPair, ServiceInfo, ServiceLocation};
