//! Bulk import of expenses from uploaded CSV files.

mod csv;
mod import_expenses;

pub use csv::parse_expenses_csv;
pub use import_expenses::import_expenses_endpoint;
