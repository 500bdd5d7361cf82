pub mod ledger_model;
pub mod ledger_service;

pub use ledger_model::{
    available_balance, monthly_totals, reserved_in_goals, totals, AccountOverview, LedgerTotals,
};
pub use ledger_service::{LedgerService, LedgerServiceTrait};
