//! Data module - CSV loading, column derivation and table queries

mod enrich;
mod loader;
mod processor;
mod session;

pub use enrich::{enrich, parse_posted_date, split_model, REQUIRED_COLUMNS};
pub use loader::{load_listings, LoaderError};
pub use processor::{DataProcessor, ProcessorError, POPULAR_MAKE_THRESHOLD};
pub use session::Session;
