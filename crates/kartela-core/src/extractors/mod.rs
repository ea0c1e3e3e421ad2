pub mod client_addr;
pub mod json;
pub mod pagination;
pub mod query;
pub mod role;
pub mod room_session;

pub use client_addr::ClientAddr;
pub use json::Json;
pub use pagination::Pagination;
pub use query::Query;
pub use role::AdminSession;
pub use room_session::{RoomSession, SessionInfo};
