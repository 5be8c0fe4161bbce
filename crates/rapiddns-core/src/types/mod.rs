mod export;
mod query;
mod record;

pub use export::*;
pub use query::*;
pub use record::{Record, RecordSet, SearchPayload};

pub(crate) use record::lenient_string;
