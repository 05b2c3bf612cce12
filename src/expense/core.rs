//! Defines the core data model and database queries for expenses.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::{
    OffsetDateTime, PrimitiveDateTime, format_description::BorrowedFormatItem,
    macros::format_description,
};
use uuid::Uuid;

use crate::Error;

/// The category given to expenses created without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// The format used to store timestamps in the database.
///
/// Always UTC with a fixed number of subsecond digits so that stored strings
/// compare lexicographically in timestamp order and the first ten characters
/// are the calendar date.
const STORED_TIMESTAMP_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
);

/// A single recorded spending entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, generated by the server at creation.
    pub id: String,
    /// A text label describing the expense.
    pub name: String,
    /// The amount of money spent, always greater than zero.
    pub amount: f64,
    /// The category the expense belongs to.
    pub category: String,
    /// When the expense was recorded, in UTC. Never modified.
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated expense that has not been persisted yet.
///
/// Use [NewExpense::new] to trim the name, check the amount and apply the
/// category default before the expense gets anywhere near the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The trimmed, non-empty expense name.
    pub name: String,
    /// The amount of money spent, greater than zero.
    pub amount: f64,
    /// The trimmed category, defaulting to [DEFAULT_CATEGORY].
    pub category: String,
}

impl NewExpense {
    /// Validate and normalize the fields for a new expense.
    ///
    /// # Errors
    /// Returns [Error::EmptyExpenseName] if `name` is empty after trimming,
    /// or [Error::NonPositiveAmount] if `amount` is not greater than zero.
    pub fn new(name: &str, amount: f64, category: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            name: normalize_name(name)?,
            amount: validate_amount(amount)?,
            category: normalize_category(category),
        })
    }
}

/// The optional field overwrites for a partial expense update.
///
/// Fields that are absent (or null) in the request body keep their prior
/// values.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ExpenseChanges {
    /// The new expense name, if it should change.
    pub name: Option<String>,
    /// The new amount, if it should change.
    pub amount: Option<f64>,
    /// The new category, if it should change.
    pub category: Option<String>,
}

fn normalize_name(raw: &str) -> Result<String, Error> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(Error::EmptyExpenseName);
    }

    Ok(name.to_owned())
}

fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::NonPositiveAmount(amount))
    }
}

fn normalize_category(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(category) if !category.is_empty() => category.to_owned(),
        _ => DEFAULT_CATEGORY.to_owned(),
    }
}

/// Create an expense from validated fields and return it with its generated
/// ID and creation timestamp.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let expense = Expense {
        id: Uuid::new_v4().to_string(),
        name: new_expense.name,
        amount: new_expense.amount,
        category: new_expense.category,
        created_at: OffsetDateTime::now_utc(),
    };

    insert_expense(&expense, connection)?;

    Ok(expense)
}

/// Insert a fully formed expense row.
///
/// [create_expense] and the CSV import path generate the ID and timestamp
/// before calling this.
pub(crate) fn insert_expense(expense: &Expense, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO expenses (id, name, amount, category, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            expense.id,
            expense.name,
            expense.amount,
            expense.category,
            encode_timestamp(expense.created_at)?,
        ],
    )?;

    Ok(())
}

/// Retrieve a single expense by ID.
pub fn get_expense(expense_id: &str, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare("SELECT id, name, amount, category, created_at FROM expenses WHERE id = :id;")?
        .query_row(&[(":id", &expense_id)], map_expense_row)
        .map_err(|error| error.into())
}

/// Retrieve all expenses ordered by creation time, newest first.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, category, created_at FROM expenses \
            ORDER BY created_at DESC;",
        )?
        .query_map([], map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the fields present in `changes` and return the updated expense.
///
/// Fields that are `None` keep their prior values. Present fields go through
/// the same validation as expense creation.
///
/// # Errors
/// Returns [Error::UpdateMissingExpense] if no expense has `expense_id`.
pub fn update_expense(
    expense_id: &str,
    changes: ExpenseChanges,
    connection: &Connection,
) -> Result<Expense, Error> {
    let mut expense = get_expense(expense_id, connection).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingExpense,
        error => error,
    })?;

    if let Some(name) = &changes.name {
        expense.name = normalize_name(name)?;
    }

    if let Some(amount) = changes.amount {
        expense.amount = validate_amount(amount)?;
    }

    if let Some(category) = &changes.category {
        expense.category = normalize_category(Some(category));
    }

    connection.execute(
        "UPDATE expenses SET name = ?1, amount = ?2, category = ?3 WHERE id = ?4",
        params![expense.name, expense.amount, expense.category, expense.id],
    )?;

    Ok(expense)
}

/// Delete an expense by ID. Returns an error if the expense doesn't exist.
pub fn delete_expense(expense_id: &str, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM expenses WHERE id = ?1", [expense_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Initialize the expenses table and indexes.
pub fn create_expenses_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expenses (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            category TEXT NOT NULL DEFAULT 'General',
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expenses_created_at ON expenses(created_at);",
    )?;

    Ok(())
}

/// Format a timestamp for storage as UTC text.
pub(crate) fn encode_timestamp(timestamp: OffsetDateTime) -> Result<String, Error> {
    timestamp
        .to_offset(time::UtcOffset::UTC)
        .format(STORED_TIMESTAMP_FORMAT)
        .map_err(|error| Error::InvalidTimestamp(error.to_string()))
}

/// Map a `SELECT id, name, amount, category, created_at` row to an [Expense].
pub(crate) fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let raw_created_at: String = row.get(4)?;
    let created_at = PrimitiveDateTime::parse(&raw_created_at, STORED_TIMESTAMP_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?;

    Ok(Expense {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        created_at,
    })
}
