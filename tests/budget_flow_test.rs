use chrono::Utc;
use fintrack_core::budgets::{BudgetInput, BudgetPatch, BudgetServiceTrait};
use fintrack_core::categories::categories_model::CategoryType;
use fintrack_core::errors::{Error, ValidationError};
use fintrack_core::transactions::TransactionType;

mod common;

fn budget_input(category_id: String, amount: f64) -> BudgetInput {
    BudgetInput {
        category_id,
        amount,
        period: None,
        start_date: None,
        end_date: None,
        alert_threshold: None,
        notify_email: false,
        notify_push: false,
    }
}

#[test]
fn test_budget_progress_tracks_category_spending() {
    let app = common::setup();
    let user = common::create_user(&app, "Elisa", "elisa@example.com");
    common::record(&app, &user.id, "Salary", TransactionType::Income, 10_000.0);

    let food = common::category_id(&app, &user.id, "Food", CategoryType::Expense);
    let created = app
        .budgets
        .create_budget(&user.id, budget_input(food, 2000.0))
        .unwrap();
    assert_eq!(created.progress.spent, 0.0);

    common::record(&app, &user.id, "Food", TransactionType::Expense, 1200.0);
    // Spending in another category does not count against this budget
    common::record(&app, &user.id, "Transport", TransactionType::Expense, 900.0);

    let current = app.budgets.get_budget(&user.id, &created.budget.id).unwrap();
    assert_eq!(current.progress.spent, 1200.0);
    assert_eq!(current.progress.remaining, 800.0);
    assert_eq!(current.progress.percentage, 60.0);
    assert!(!current.progress.is_over_budget);
    assert!(!current.progress.alert_triggered);

    common::record(&app, &user.id, "Food", TransactionType::Expense, 1100.0);

    let blown = app.budgets.get_budget(&user.id, &created.budget.id).unwrap();
    assert_eq!(blown.progress.spent, 2300.0);
    assert_eq!(blown.progress.remaining, -300.0);
    assert_eq!(blown.progress.percentage, 100.0);
    assert!(blown.progress.is_over_budget);
    assert!(blown.progress.alert_triggered);
}

#[test]
fn test_budget_requires_positive_amount_and_expense_category() {
    let app = common::setup();
    let user = common::create_user(&app, "Fabio", "fabio@example.com");

    let food = common::category_id(&app, &user.id, "Food", CategoryType::Expense);
    let result = app.budgets.create_budget(&user.id, budget_input(food, 0.0));
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::InvalidAmount(_)))
    ));

    let salary = common::category_id(&app, &user.id, "Salary", CategoryType::Income);
    let result = app.budgets.create_budget(&user.id, budget_input(salary, 500.0));
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[test]
fn test_overlapping_budget_for_same_category_is_refused() {
    let app = common::setup();
    let user = common::create_user(&app, "Gina", "gina@example.com");

    let food = common::category_id(&app, &user.id, "Food", CategoryType::Expense);
    app.budgets
        .create_budget(&user.id, budget_input(food.clone(), 1000.0))
        .unwrap();

    let result = app.budgets.create_budget(&user.id, budget_input(food, 1500.0));
    assert!(matches!(result, Err(Error::PreconditionFailed(_))));
}

#[test]
fn test_budget_update_and_hard_delete() {
    let app = common::setup();
    let user = common::create_user(&app, "Hugo", "hugo@example.com");

    let food = common::category_id(&app, &user.id, "Food", CategoryType::Expense);
    let created = app
        .budgets
        .create_budget(&user.id, budget_input(food, 1000.0))
        .unwrap();

    let updated = app
        .budgets
        .update_budget(
            &user.id,
            &created.budget.id,
            BudgetPatch {
                amount: Some(1500.0),
                alert_threshold: Some(90.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.budget.amount, 1500.0);
    assert_eq!(updated.budget.alert_threshold, 90.0);

    assert_eq!(app.budgets.delete_budget(&user.id, &created.budget.id).unwrap(), 1);
    assert!(matches!(
        app.budgets.get_budget(&user.id, &created.budget.id),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_budget_end_date_is_derived_from_period() {
    let app = common::setup();
    let user = common::create_user(&app, "Iara", "iara@example.com");

    let food = common::category_id(&app, &user.id, "Food", CategoryType::Expense);
    let start = Utc::now();
    let created = app
        .budgets
        .create_budget(
            &user.id,
            BudgetInput {
                start_date: Some(start),
                period: Some(fintrack_core::budgets::BudgetPeriod::Weekly),
                ..budget_input(food, 300.0)
            },
        )
        .unwrap();

    let expected = (start + chrono::Duration::days(7)).naive_utc();
    assert_eq!(created.budget.end_date, expected);
}
