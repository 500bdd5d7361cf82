pub mod db;

pub mod budgets;
pub mod categories;
pub mod constants;
pub mod errors;
pub mod goals;
pub mod ledger;
pub mod schema;
pub mod transactions;
pub mod users;

pub use errors::{Error, Result};
