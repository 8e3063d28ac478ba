pub mod csv_table;
pub mod frame;
pub mod values;

pub use csv_table::{CsvTable, read_results_table};
pub use frame::{CleanReport, build_clean_frame};
pub use values::{any_to_f64, any_to_string, parse_f64};
