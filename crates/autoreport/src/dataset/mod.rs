//! Vehicle-sales records and the cleaning step that produces them.

mod preprocess;
mod record;

pub use preprocess::Preprocessor;
pub use record::{MileageBin, SalesTable, VehicleRecord, DERIVED_COLUMNS, RECORD_COLUMNS};
