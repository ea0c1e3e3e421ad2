//! Business rules behind the HTTP handlers.
//!
//! Handlers stay thin adapters; every operation that reads more than one
//! table or writes an audit row lives here. Read paths take any
//! [`sea_orm::ConnectionTrait`]; swatch writes take the pool and open
//! their own transaction.

pub mod access;
pub mod audit;
pub mod customer;
pub mod dashboard;
pub mod location;
pub mod qr;
pub mod swatch;

pub use audit::{Actor, Movement, MovementAction};
pub use qr::QrPayload;

use sea_orm::sea_query::LikeExpr;

/// `LIKE` pattern matching `q` as a literal substring: `%`, `_` and `\`
/// in the query match only themselves.
pub(crate) fn substring_pattern(q: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(q.len() + 2);
    pattern.push('%');
    for c in q.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

