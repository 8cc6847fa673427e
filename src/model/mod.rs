//! Data model shared by the crawler and the output layer
//!
//! # Components
//!
//! - `CrawlTask`: A URL waiting to be fetched, tagged with the kind of page it points to
//! - `RawPage`: Markup returned by a successful fetch
//! - `JutsuRecord`: The normalized record extracted from a detail page

mod record;
mod task;

// Re-export main types
pub use record::{JutsuRecord, NOT_CLASSIFIED, UNKNOWN_NAME};
pub use task::{CrawlTask, PageKind, RawPage};
