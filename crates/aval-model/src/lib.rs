pub mod dimension;
pub mod enums;
pub mod error;
pub mod schema;

pub use dimension::{Dimension, DimensionValue};
pub use enums::{AttainmentLevel, Gender, SchoolSector};
pub use error::{AvalError, Result};
pub use schema::{ColumnSpec, ColumnType, ResultsSchema};
