//! Cache key generators for consistent key naming.

/// Key under which an order is cached: its id in decimal.
#[must_use]
pub fn order(id: i32) -> String {
    id.to_string()
}
