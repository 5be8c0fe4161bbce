//! API endpoint modules.

mod export;
mod search;

pub use export::ExportApi;
pub use search::{SearchApi, SearchRequestBuilder};
