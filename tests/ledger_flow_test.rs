use chrono::Datelike;
use fintrack_core::errors::Error;
use fintrack_core::goals::{GoalInput, GoalServiceTrait};
use fintrack_core::ledger::LedgerServiceTrait;
use fintrack_core::transactions::{TransactionFilters, TransactionServiceTrait, TransactionType};

mod common;

#[test]
fn test_totals_and_available_balance_across_the_ledger() {
    let app = common::setup();
    let user = common::create_user(&app, "Ana", "ana@example.com");

    common::record(&app, &user.id, "Salary", TransactionType::Income, 5000.0);
    common::record(&app, &user.id, "Food", TransactionType::Expense, 1200.0);
    common::record(&app, &user.id, "Transport", TransactionType::Expense, 300.0);

    let totals = app.ledger.get_totals(&user.id).unwrap();
    assert_eq!(totals.total_income, 5000.0);
    assert_eq!(totals.total_expense, 1500.0);
    assert_eq!(totals.balance, 3500.0);

    // Reserve 500 in a goal, the spendable balance drops to 3000
    let goal = app
        .goals
        .create_goal(
            &user.id,
            GoalInput {
                title: "Vacation".to_string(),
                description: None,
                target_amount: 2000.0,
                start_date: None,
                target_date: chrono::Utc::now() + chrono::Duration::days(180),
                category_id: None,
                goal_type: None,
                priority: None,
                is_recurring: false,
                recurring_amount: None,
            },
        )
        .unwrap();
    app.goals.add_amount(&user.id, &goal.id, 500.0).unwrap();

    let overview = app.ledger.get_overview(&user.id).unwrap();
    assert_eq!(overview.balance, 3500.0);
    assert_eq!(overview.reserved_in_goals, 500.0);
    assert_eq!(overview.available_balance, 3000.0);
    assert_eq!(overview.monthly_income, 5000.0);
    assert_eq!(overview.monthly_expense, 1500.0);

    // A month with no transactions sums to zero
    let now = chrono::Utc::now();
    let this_month = app
        .ledger
        .get_monthly_totals(&user.id, now.month(), now.year())
        .unwrap();
    assert_eq!(this_month.total_income, 5000.0);
    let empty_month = app.ledger.get_monthly_totals(&user.id, now.month(), now.year() - 1).unwrap();
    assert_eq!(empty_month.balance, 0.0);
}

#[test]
fn test_expense_beyond_available_balance_is_refused() {
    let app = common::setup();
    let user = common::create_user(&app, "Bruno", "bruno@example.com");

    common::record(&app, &user.id, "Salary", TransactionType::Income, 1000.0);
    common::record(&app, &user.id, "Food", TransactionType::Expense, 800.0);

    let result = app.transactions.create_transaction(
        &user.id,
        fintrack_core::transactions::TransactionInput {
            category_id: common::category_id(
                &app,
                &user.id,
                "Food",
                fintrack_core::categories::categories_model::CategoryType::Expense,
            ),
            transaction_type: TransactionType::Expense,
            amount: 300.0,
            description: "Too much".to_string(),
            date: chrono::Utc::now(),
            tags: None,
            location: None,
            notes: None,
            payment_method: None,
        },
    );

    assert!(matches!(result, Err(Error::PreconditionFailed(_))));
}

#[test]
fn test_transaction_listing_paginates_and_summarizes() {
    let app = common::setup();
    let user = common::create_user(&app, "Carla", "carla@example.com");

    common::record(&app, &user.id, "Salary", TransactionType::Income, 10_000.0);
    for _ in 0..5 {
        common::record(&app, &user.id, "Food", TransactionType::Expense, 100.0);
    }

    let page = app
        .transactions
        .get_transactions(
            &user.id,
            TransactionFilters {
                transaction_type: Some(TransactionType::Expense),
                page: Some(1),
                limit: Some(2),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(page.transactions.len(), 2);
    assert_eq!(page.pagination.total, 5);
    assert_eq!(page.pagination.pages, 3);
    // The summary covers the whole filtered set, not just this page
    assert_eq!(page.summary.total_expense, 500.0);
    assert_eq!(page.summary.total_income, 0.0);
}

#[test]
fn test_type_changing_update_rederives_the_sign() {
    use fintrack_core::categories::categories_model::CategoryType;
    use fintrack_core::transactions::TransactionPatch;

    let app = common::setup();
    let user = common::create_user(&app, "Caio", "caio@example.com");

    common::record(&app, &user.id, "Salary", TransactionType::Income, 1000.0);
    let entry = common::record(&app, &user.id, "Food", TransactionType::Expense, 100.0);
    assert_eq!(entry.amount, -100.0);

    // Reclassified as income under an income category, the sign flips
    let updated = app
        .transactions
        .update_transaction(
            &user.id,
            &entry.id,
            TransactionPatch {
                transaction_type: Some(TransactionType::Income),
                category_id: Some(common::category_id(
                    &app,
                    &user.id,
                    "Other",
                    CategoryType::Income,
                )),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.amount, 100.0);
    assert_eq!(updated.transaction_type, TransactionType::Income);

    let totals = app.ledger.get_totals(&user.id).unwrap();
    assert_eq!(totals.total_income, 1100.0);
    assert_eq!(totals.total_expense, 0.0);
}

#[test]
fn test_deleted_transactions_leave_the_totals() {
    let app = common::setup();
    let user = common::create_user(&app, "Dani", "dani@example.com");

    common::record(&app, &user.id, "Salary", TransactionType::Income, 2000.0);
    let expense = common::record(&app, &user.id, "Food", TransactionType::Expense, 450.0);

    app.transactions
        .delete_transaction(&user.id, &expense.id)
        .unwrap();

    let totals = app.ledger.get_totals(&user.id).unwrap();
    assert_eq!(totals.total_expense, 0.0);
    assert_eq!(totals.balance, 2000.0);

    // A soft-deleted transaction is gone from the API
    assert!(matches!(
        app.transactions.get_transaction(&user.id, &expense.id),
        Err(Error::NotFound(_))
    ));
}
