//! Creates the application's database schema.

use rusqlite::Connection;

use crate::{Error, expense::create_expenses_table};

/// Create the tables for the application's domain models if they do not
/// already exist.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_expenses_table(connection)?;

    Ok(())
}
