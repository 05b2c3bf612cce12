//! Expense management for the finance tracking API.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the validation rules for creating one
//! - Database functions for storing, querying and modifying expenses
//! - The JSON endpoints for creating, listing, editing and deleting expenses

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    DEFAULT_CATEGORY, Expense, ExpenseChanges, NewExpense, create_expense, create_expenses_table,
    delete_expense, get_all_expenses, get_expense, update_expense,
};
pub(crate) use core::{encode_timestamp, insert_expense};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::update_expense_endpoint;
pub use list_endpoint::get_expenses_endpoint;
