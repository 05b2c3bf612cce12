//! Parsing of uploaded CSV files into expenses.

use csv::ReaderBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, expense::{DEFAULT_CATEGORY, Expense}};

/// The column indexes for the required headers in an uploaded file.
struct ColumnIndexes {
    name: usize,
    amount: usize,
    category: usize,
}

impl ColumnIndexes {
    /// Locate the required columns in the header row.
    ///
    /// # Errors
    /// Returns [Error::MissingCsvColumns] if any of `name`, `amount` or
    /// `category` is absent.
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, Error> {
        let find = |wanted: &str| headers.iter().position(|header| header.trim() == wanted);

        match (find("name"), find("amount"), find("category")) {
            (Some(name), Some(amount), Some(category)) => Ok(Self {
                name,
                amount,
                category,
            }),
            _ => Err(Error::MissingCsvColumns),
        }
    }
}

/// Parse CSV text into expenses, one per valid row.
///
/// Rows are validated independently: a row is accepted only if its trimmed
/// name is non-empty and its amount parses to a number greater than zero.
/// Invalid rows are skipped silently rather than failing the whole import.
/// Blank categories default to "General". Every accepted row is stamped with
/// `imported_at` rather than any date from the file.
///
/// # Errors
/// Returns [Error::MissingCsvColumns] if the header row does not contain all
/// of `name`, `amount` and `category`.
pub fn parse_expenses_csv(
    csv_text: &str,
    imported_at: OffsetDateTime,
) -> Result<Vec<Expense>, Error> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let columns = match reader.headers() {
        Ok(headers) => ColumnIndexes::from_headers(headers)?,
        Err(error) => {
            tracing::debug!("could not read CSV header row: {error}");
            return Err(Error::MissingCsvColumns);
        }
    };

    let mut expenses = Vec::new();

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(error) => {
                tracing::debug!("skipping malformed CSV record: {error}");
                continue;
            }
        };

        let name = record.get(columns.name).unwrap_or_default().trim();

        let amount = match record
            .get(columns.amount)
            .unwrap_or_default()
            .trim()
            .parse::<f64>()
        {
            Ok(amount) => amount,
            Err(_) => continue,
        };

        if name.is_empty() || !(amount > 0.0) {
            continue;
        }

        let category = match record.get(columns.category).map(str::trim) {
            Some(category) if !category.is_empty() => category.to_owned(),
            _ => DEFAULT_CATEGORY.to_owned(),
        };

        expenses.push(Expense {
            id: Uuid::new_v4().to_string(),
            name: name.to_owned(),
            amount,
            category,
            created_at: imported_at,
        });
    }

    Ok(expenses)
}
