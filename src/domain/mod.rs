pub mod ad;
pub mod query;
pub mod result;

pub use ad::{AdRecord, DateWindow, Platform, MAX_EXCERPT_CHARS, MAX_TEXT_LINES};
pub use query::Query;
pub use result::CollectionResult;
