//! OLED departure board.
//!
//! Fetches upcoming National Rail and London Underground services,
//! normalizes both into a common row shape, and renders them as a
//! single board. Configuration is layered: local YAML file, then
//! environment overlay, then optional remote overrides.

pub mod board;
pub mod config;
pub mod render;
pub mod rtt;
pub mod sources;
pub mod tube;
