//! Infrastructure: reading the driver roster and writing results

pub mod driver_csv;
pub mod excel;
pub mod results_csv;

pub use driver_csv::{load_drivers, load_drivers_from_reader, DriverRow, DriverTable};
pub use excel::export_to_excel;
pub use results_csv::{results_file_name, save_results_csv, write_results_csv};
