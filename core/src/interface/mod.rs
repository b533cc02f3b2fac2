pub mod coordinates;
pub mod records;

pub use coordinates::{coordinates_string, write_coordinates};
pub use records::{OrderRecord, SummaryRecord, SurfaceRow};
