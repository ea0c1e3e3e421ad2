pub mod cabinet;
pub mod cell;
pub mod customer;
pub mod movement_log;
pub mod permission;
pub mod room;
pub mod room_session;
pub mod shelf;
pub mod swatch;
pub mod system_log;
pub mod user;

/// Timestamp format used in every response DTO.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
