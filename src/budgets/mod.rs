pub mod budgets_model;
pub mod budgets_repository;
pub mod budgets_service;
pub mod budgets_traits;

pub use budgets_model::{
    Budget, BudgetInput, BudgetPatch, BudgetPeriod, BudgetProgress, BudgetWithProgress, NewBudget,
    UpdateBudget,
};
pub use budgets_repository::BudgetRepository;
pub use budgets_service::BudgetService;
pub use budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
