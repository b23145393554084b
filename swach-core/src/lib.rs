pub mod facilities;
pub mod points;
pub mod progress;
pub mod report;
pub mod schema;
pub mod session;
pub mod store;

use chrono::Utc;

/// ISO-8601 timestamp for row writes. All store timestamps go through here.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

pub fn new_row_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
